//! Board error types.

use thiserror::Error;

use crate::game::entities::SlotIndex;

/// Contract violations on board operations.
///
/// These are precondition failures surfaced to the caller, never retried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// The slot already holds a card.
    #[error("slot {0} is occupied")]
    SlotOccupied(SlotIndex),

    /// The slot holds no card.
    #[error("slot {0} is empty")]
    SlotEmpty(SlotIndex),
}
