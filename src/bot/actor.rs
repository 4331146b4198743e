//! Bot actor: feeds slot presses into a player's inbox.
//!
//! A bot is an auxiliary task using the exact input path a human would:
//! it only ever sends presses to its player's handle. It idles while the
//! player is frozen or suspended on a claim.

use std::sync::Arc;

use log::debug;
use tokio::sync::{Mutex, watch};
use tokio::time::{Duration, Instant, sleep};

use crate::board::Board;
use crate::game::entities::PlayerId;
use crate::player::actor::PlayerHandle;
use crate::player::session::SharedSession;

use super::decision::{SelectStrategy, Strategy};

/// Pause between bot presses.
const PRESS_INTERVAL: Duration = Duration::from_millis(50);

/// The automated input source for one player.
pub struct BotActor {
    id: PlayerId,
    strategy: Strategy,
    handle: PlayerHandle,
    session: SharedSession,
    board: Arc<Mutex<Board>>,
    shutdown: watch::Receiver<bool>,
}

impl BotActor {
    pub fn new(
        id: PlayerId,
        strategy: Strategy,
        handle: PlayerHandle,
        session: SharedSession,
        board: Arc<Mutex<Board>>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            id,
            strategy,
            handle,
            session,
            board,
            shutdown,
        }
    }

    /// Presses slots at a steady pace until shutdown.
    pub async fn run(mut self) {
        debug!("bot {} starting", self.id);
        loop {
            tokio::select! {
                _ = self.shutdown.changed() => break,
                _ = sleep(PRESS_INTERVAL) => {}
            }

            let idle = {
                let session = self.session.lock().await;
                session.is_awaiting() || session.is_frozen(Instant::now())
            };
            if idle {
                continue;
            }

            let snapshot = self.board.lock().await.snapshot();
            if let Some(slot) = self.strategy.next_press(&snapshot) {
                self.handle.press(slot);
            }
        }
        debug!("bot {} terminated", self.id);
    }
}
