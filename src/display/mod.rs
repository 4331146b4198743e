//! Display sink boundary.
//!
//! The engine publishes board refreshes, score changes, freeze windows,
//! the countdown, and the final winners through [`DisplaySink`]. Sinks
//! are called while coordination locks are held and must not block.

use std::time::Duration;

use crate::game::entities::{CardId, PlayerId, Score, SlotIndex};

/// Receiver for game state updates.
pub trait DisplaySink: Send + Sync {
    /// A card was dealt onto a slot.
    fn place_card(&self, slot: SlotIndex, card: CardId);

    /// A slot was emptied.
    fn remove_card(&self, slot: SlotIndex);

    /// A player's score changed.
    fn set_score(&self, player: PlayerId, score: Score);

    /// Remaining freeze for a player; zero means unfrozen.
    fn set_freeze(&self, player: PlayerId, remaining: Duration);

    /// Remaining countdown until the reshuffle.
    fn set_countdown(&self, remaining: Duration, warn: bool);

    /// The match is over; every player with the maximum score is listed.
    fn announce_winners(&self, winners: &[PlayerId]);
}

/// Sink that writes updates to the log.
pub struct LogDisplay;

impl DisplaySink for LogDisplay {
    fn place_card(&self, slot: SlotIndex, card: CardId) {
        log::debug!("slot {slot}: card {card}");
    }

    fn remove_card(&self, slot: SlotIndex) {
        log::debug!("slot {slot}: empty");
    }

    fn set_score(&self, player: PlayerId, score: Score) {
        log::info!("player {player} score {score}");
    }

    fn set_freeze(&self, player: PlayerId, remaining: Duration) {
        if !remaining.is_zero() {
            log::debug!("player {player} frozen for {remaining:?}");
        }
    }

    fn set_countdown(&self, remaining: Duration, warn: bool) {
        if warn {
            log::debug!("reshuffle in {remaining:?}");
        } else {
            log::trace!("reshuffle in {remaining:?}");
        }
    }

    fn announce_winners(&self, winners: &[PlayerId]) {
        log::info!("winners: {winners:?}");
    }
}

/// Sink that drops every update.
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn place_card(&self, _slot: SlotIndex, _card: CardId) {}
    fn remove_card(&self, _slot: SlotIndex) {}
    fn set_score(&self, _player: PlayerId, _score: Score) {}
    fn set_freeze(&self, _player: PlayerId, _remaining: Duration) {}
    fn set_countdown(&self, _remaining: Duration, _warn: bool) {}
    fn announce_winners(&self, _winners: &[PlayerId]) {}
}
