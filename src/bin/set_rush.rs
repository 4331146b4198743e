//! Runs a match from a configuration file.
//!
//! Automated seats play on their own; the process ends when the match
//! does, or on ctrl-c.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use log::info;

use set_rush::{ClassicRules, GameConfig, LogDisplay, Match};

const HELP: &str = "\
set_rush

USAGE:
  set_rush [--config <path>]

FLAGS:
  -h, --help        Prints help information

OPTIONS:
  --config <path>   Match configuration (JSON); defaults are used when omitted
";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }
    let config_path: Option<PathBuf> = args.opt_value_from_str("--config")?;

    let config = match config_path {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    let game = Match::start(config, Arc::new(ClassicRules::default()), Arc::new(LogDisplay))
        .map_err(|err| anyhow::anyhow!(err))?;

    let stopper = game.stopper();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received; stopping the match");
            stopper.stop();
        }
    });

    let summary = game.wait().await;
    info!("final scores: {:?}", summary.scores);
    info!("winners: {:?}", summary.winners);
    Ok(())
}
