//! Match configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::{
    DEFAULT_BOARD_CAPACITY, DEFAULT_COUNTDOWN_MS, DEFAULT_COUNTDOWN_WARNING_MS, DEFAULT_DECK_SIZE,
    DEFAULT_PENALTY_FREEZE_MS, DEFAULT_SUCCESS_FREEZE_MS, SELECTION_SIZE,
};

/// How a player's slot presses are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    /// Presses arrive from outside the engine (a UI, or a test).
    Human,
    /// A bot pressing random slots.
    Random,
    /// A bot that searches the board for a real triple.
    Solver,
}

impl std::fmt::Display for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Controller::Human => write!(f, "human"),
            Controller::Random => write!(f, "random"),
            Controller::Solver => write!(f, "solver"),
        }
    }
}

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name, used only for logging.
    pub name: String,

    /// Input source for this player.
    pub controller: Controller,
}

/// Match configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of slots on the board.
    pub board_capacity: usize,

    /// Number of distinct cards in the deck.
    pub deck_size: usize,

    /// Countdown until a full reshuffle, in milliseconds.
    pub countdown_ms: u64,

    /// Remaining-countdown threshold under which the display is flagged
    /// as a warning, in milliseconds.
    pub countdown_warning_ms: u64,

    /// Freeze after an accepted claim, in milliseconds.
    pub success_freeze_ms: u64,

    /// Freeze after a rejected claim, in milliseconds.
    pub penalty_freeze_ms: u64,

    /// Seats, in player-id order.
    pub players: Vec<PlayerConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_capacity: DEFAULT_BOARD_CAPACITY,
            deck_size: DEFAULT_DECK_SIZE,
            countdown_ms: DEFAULT_COUNTDOWN_MS,
            countdown_warning_ms: DEFAULT_COUNTDOWN_WARNING_MS,
            success_freeze_ms: DEFAULT_SUCCESS_FREEZE_MS,
            penalty_freeze_ms: DEFAULT_PENALTY_FREEZE_MS,
            players: vec![
                PlayerConfig {
                    name: "bot-0".to_string(),
                    controller: Controller::Solver,
                },
                PlayerConfig {
                    name: "bot-1".to_string(),
                    controller: Controller::Random,
                },
            ],
        }
    }
}

impl GameConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.board_capacity < SELECTION_SIZE {
            return Err(format!(
                "Board capacity must be at least {SELECTION_SIZE}"
            ));
        }

        if self.deck_size < self.board_capacity {
            return Err("Deck must hold at least one full board".to_string());
        }

        if self.countdown_ms == 0 {
            return Err("Countdown must be positive".to_string());
        }

        if self.countdown_warning_ms > self.countdown_ms {
            return Err("Countdown warning threshold exceeds the countdown".to_string());
        }

        if self.players.is_empty() {
            return Err("At least one player is required".to_string());
        }

        Ok(())
    }

    pub fn countdown(&self) -> Duration {
        Duration::from_millis(self.countdown_ms)
    }

    pub fn countdown_warning(&self) -> Duration {
        Duration::from_millis(self.countdown_warning_ms)
    }

    pub fn success_freeze(&self) -> Duration {
        Duration::from_millis(self.success_freeze_ms)
    }

    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_ms)
    }
}
