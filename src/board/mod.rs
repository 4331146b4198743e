//! Shared board state: card placement and selection tokens.
//!
//! The board is the only piece of state mutated by every actor in the
//! match. It is shared as `Arc<tokio::sync::Mutex<Board>>`; each operation
//! runs under the lock, and multi-slot batches (claim resolution, the
//! reshuffle) hold the lock across all their slot touches so they appear
//! atomic to concurrent token toggles.
//!
//! Invariant: `slot_to_card[s] == Some(c)` iff `card_to_slot[c] == s`, and
//! tokens exist only on occupied slots. [`Board::check_consistency`]
//! verifies this and is used by the property tests.

pub mod errors;

use std::collections::{HashMap, HashSet};

use crate::game::entities::{CardId, PlayerId, SlotIndex};

pub use errors::BoardError;

/// Result of a token toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenChange {
    /// The player's token was placed on the slot's card.
    Placed(CardId),
    /// The player's token was removed from the slot's card.
    Removed(CardId),
}

/// The shared grid of card slots and the selection tokens on them.
#[derive(Debug)]
pub struct Board {
    slot_to_card: Vec<Option<CardId>>,
    card_to_slot: HashMap<CardId, SlotIndex>,
    tokens: Vec<HashSet<PlayerId>>,
}

impl Board {
    /// Creates an empty board with `capacity` slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slot_to_card: vec![None; capacity],
            card_to_slot: HashMap::with_capacity(capacity),
            tokens: vec![HashSet::new(); capacity],
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slot_to_card.len()
    }

    /// Places a card on an empty slot.
    pub fn place_card(&mut self, slot: SlotIndex, card: CardId) -> Result<(), BoardError> {
        match self.slot_to_card.get(slot) {
            None => Err(BoardError::SlotEmpty(slot)),
            Some(Some(_)) => Err(BoardError::SlotOccupied(slot)),
            Some(None) => {
                self.slot_to_card[slot] = Some(card);
                self.card_to_slot.insert(card, slot);
                debug_assert!(self.check_consistency());
                Ok(())
            }
        }
    }

    /// Removes the card from a slot, clearing every token on it.
    pub fn remove_card(&mut self, slot: SlotIndex) -> Result<CardId, BoardError> {
        match self.slot_to_card.get(slot) {
            None | Some(None) => Err(BoardError::SlotEmpty(slot)),
            Some(Some(card)) => {
                let card = *card;
                self.slot_to_card[slot] = None;
                self.card_to_slot.remove(&card);
                self.tokens[slot].clear();
                debug_assert!(self.check_consistency());
                Ok(card)
            }
        }
    }

    /// Toggles the player's token on an occupied slot.
    ///
    /// An empty slot is an error, not a no-op. The selection-size cap is
    /// the caller's responsibility: check [`Board::has_token`] before
    /// toggling a new token on.
    pub fn toggle_token(
        &mut self,
        player: PlayerId,
        slot: SlotIndex,
    ) -> Result<TokenChange, BoardError> {
        let card = self.card_at(slot).ok_or(BoardError::SlotEmpty(slot))?;
        if self.tokens[slot].remove(&player) {
            Ok(TokenChange::Removed(card))
        } else {
            self.tokens[slot].insert(player);
            Ok(TokenChange::Placed(card))
        }
    }

    #[must_use]
    pub fn has_token(&self, player: PlayerId, slot: SlotIndex) -> bool {
        self.tokens.get(slot).is_some_and(|t| t.contains(&player))
    }

    #[must_use]
    pub fn card_at(&self, slot: SlotIndex) -> Option<CardId> {
        self.slot_to_card.get(slot).copied().flatten()
    }

    #[must_use]
    pub fn slot_of(&self, card: CardId) -> Option<SlotIndex> {
        self.card_to_slot.get(&card).copied()
    }

    /// Snapshot count of non-empty slots, used to decide whether the
    /// match can still be won.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slot_to_card.iter().flatten().count()
    }

    /// Indices of empty slots, in slot order.
    #[must_use]
    pub fn empty_slots(&self) -> Vec<SlotIndex> {
        self.slot_to_card
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_none())
            .map(|(slot, _)| slot)
            .collect()
    }

    /// All cards currently on the board, in slot order.
    #[must_use]
    pub fn tabled_cards(&self) -> Vec<CardId> {
        self.slot_to_card.iter().flatten().copied().collect()
    }

    /// A copy of the slot-to-card mapping, for strategies and displays.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Option<CardId>> {
        self.slot_to_card.clone()
    }

    /// Verifies the forward/reverse mapping invariant and that tokens
    /// exist only on occupied slots.
    #[must_use]
    pub fn check_consistency(&self) -> bool {
        let forward_ok = self.slot_to_card.iter().enumerate().all(|(slot, card)| {
            card.is_none_or(|card| self.card_to_slot.get(&card) == Some(&slot))
        });
        let reverse_ok = self
            .card_to_slot
            .iter()
            .all(|(card, slot)| self.slot_to_card.get(*slot) == Some(&Some(*card)));
        let tokens_ok = self
            .tokens
            .iter()
            .enumerate()
            .all(|(slot, holders)| holders.is_empty() || self.slot_to_card[slot].is_some());
        forward_ok && reverse_ok && tokens_ok
    }
}
