//! Core identifiers and the dealer's deck.

use rand::seq::SliceRandom;

/// Identity of a card. Opaque to the coordination engine; only the
/// rules evaluator interprets it.
pub type CardId = usize;

/// Identity of a player, assigned densely from 0 in spawn order.
pub type PlayerId = usize;

/// Index of a board slot.
pub type SlotIndex = usize;

/// A player's score. Monotone; +1 per accepted claim.
pub type Score = u32;

/// The dealer's bag of cards that are not currently on the board.
///
/// Shrinks as cards are dealt and grows back when a reshuffle returns
/// tabled cards. A card id is never in the deck twice.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<CardId>,
}

impl Deck {
    /// Creates a full deck holding ids `0..size`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            cards: (0..size).collect(),
        }
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
    }

    /// Removes and returns one card, or `None` if the deck is exhausted.
    pub fn deal(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    /// Returns a card to the deck during a reshuffle.
    pub fn put_back(&mut self, card: CardId) {
        debug_assert!(!self.cards.contains(&card), "card {card} already in deck");
        self.cards.push(card);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The remaining cards, in dealing order (last is dealt first).
    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }
}
