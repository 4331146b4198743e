//! Per-player session state.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::game::constants::SELECTION_SIZE;
use crate::game::entities::{CardId, PlayerId, Score};

/// Session state shared between a player's actor and the dealer.
///
/// Both sides take the session lock before the board lock; the dealer
/// additionally locks every session in ascending id order for its
/// multi-session batches (claim resolution, reshuffle).
pub type SharedSession = Arc<Mutex<Session>>;

/// A snapshot of one session, for display layers and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub id: PlayerId,
    pub score: Score,
    pub selection: Vec<CardId>,
    pub frozen: bool,
    pub penalty_lock: bool,
}

/// Mutable per-player state: score, current selection, freeze window,
/// and the penalty latch.
#[derive(Debug)]
pub struct Session {
    id: PlayerId,
    score: Score,
    selection: Vec<CardId>,
    frozen_until: Option<Instant>,
    penalty_lock: bool,
    awaiting: bool,
}

impl Session {
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            score: 0,
            selection: Vec::with_capacity(SELECTION_SIZE),
            frozen_until: None,
            penalty_lock: false,
            awaiting: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    /// Awards a point and returns the new score.
    pub fn add_point(&mut self) -> Score {
        self.score += 1;
        self.score
    }

    #[must_use]
    pub fn selection(&self) -> &[CardId] {
        &self.selection
    }

    #[must_use]
    pub fn selection_full(&self) -> bool {
        self.selection.len() == SELECTION_SIZE
    }

    pub fn push_selection(&mut self, card: CardId) {
        debug_assert!(!self.selection_full(), "selection already full");
        debug_assert!(!self.selection.contains(&card), "card {card} selected twice");
        self.selection.push(card);
    }

    /// Drops a card from the selection, if present. Used both for the
    /// player's own deselect and for the dealer's cascading cleanup when
    /// a card leaves the board.
    pub fn remove_from_selection(&mut self, card: CardId) -> bool {
        let before = self.selection.len();
        self.selection.retain(|&c| c != card);
        self.selection.len() != before
    }

    #[must_use]
    pub fn is_frozen(&self, now: Instant) -> bool {
        self.frozen_until.is_some_and(|until| now < until)
    }

    pub fn freeze_for(&mut self, now: Instant, window: Duration) {
        self.frozen_until = Some(now + window);
    }

    /// Clears an elapsed freeze and returns the remaining window (zero
    /// once unfrozen). The dealer calls this every countdown tick.
    pub fn sweep_freeze(&mut self, now: Instant) -> Duration {
        match self.frozen_until {
            Some(until) if now < until => until - now,
            Some(_) => {
                self.frozen_until = None;
                Duration::ZERO
            }
            None => Duration::ZERO,
        }
    }

    #[must_use]
    pub fn penalty_lock(&self) -> bool {
        self.penalty_lock
    }

    pub fn set_penalty_lock(&mut self, locked: bool) {
        self.penalty_lock = locked;
    }

    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    pub fn set_awaiting(&mut self, awaiting: bool) {
        self.awaiting = awaiting;
    }

    /// Reshuffle cleanup: the selection and the penalty latch go, the
    /// freeze window stays.
    pub fn reset_for_reshuffle(&mut self) {
        self.selection.clear();
        self.penalty_lock = false;
    }

    #[must_use]
    pub fn view(&self, now: Instant) -> SessionView {
        SessionView {
            id: self.id,
            score: self.score,
            selection: self.selection.clone(),
            frozen: self.is_frozen(now),
            penalty_lock: self.penalty_lock,
        }
    }
}
