//! Player actor message types.

use crate::game::entities::SlotIndex;

/// Input delivered to a player actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMessage {
    /// A slot press from the player's input source (UI key or bot).
    Press(SlotIndex),
}
