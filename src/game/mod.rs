//! Match configuration, core identifiers, and the deck.

pub mod config;
pub mod constants;
pub mod entities;

pub use config::{Controller, GameConfig, PlayerConfig};
pub use entities::{CardId, Deck, PlayerId, Score, SlotIndex};
