//! Triple validity rules.
//!
//! The coordination engine treats card identity as opaque; deciding
//! whether three cards belong together lives behind [`Evaluator`].
//! [`ClassicRules`] implements the classic game: a card is a vector of
//! features, and a triple is valid iff every feature is all-same or
//! all-distinct across the three cards.

use crate::game::entities::CardId;

/// Judges triples and searches collections for one.
pub trait Evaluator: Send + Sync {
    /// Whether the three cards form a valid triple.
    fn is_valid_triple(&self, a: CardId, b: CardId, c: CardId) -> bool;

    /// Finds any valid triple among `cards`. Used to decide whether the
    /// match can still be won.
    fn find_triple(&self, cards: &[CardId]) -> Option<[CardId; 3]>;
}

/// The classic rules: card `id` encodes `features` base-`options` digits,
/// one per feature (shape, color, count, shading in the physical game).
#[derive(Debug, Clone, Copy)]
pub struct ClassicRules {
    features: u32,
    options: u32,
}

impl ClassicRules {
    #[must_use]
    pub fn new(features: u32, options: u32) -> Self {
        Self { features, options }
    }

    /// Number of distinct cards these rules describe.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        (self.options as usize).pow(self.features)
    }

    fn feature(&self, card: CardId, index: u32) -> usize {
        card / (self.options as usize).pow(index) % self.options as usize
    }
}

impl Default for ClassicRules {
    /// The physical deck: 4 features with 3 options each, 81 cards.
    fn default() -> Self {
        Self::new(4, 3)
    }
}

impl Evaluator for ClassicRules {
    fn is_valid_triple(&self, a: CardId, b: CardId, c: CardId) -> bool {
        (0..self.features).all(|i| {
            let (fa, fb, fc) = (self.feature(a, i), self.feature(b, i), self.feature(c, i));
            let all_same = fa == fb && fb == fc;
            let all_distinct = fa != fb && fb != fc && fa != fc;
            all_same || all_distinct
        })
    }

    fn find_triple(&self, cards: &[CardId]) -> Option<[CardId; 3]> {
        for (i, &a) in cards.iter().enumerate() {
            for (j, &b) in cards.iter().enumerate().skip(i + 1) {
                for &c in cards.iter().skip(j + 1) {
                    if self.is_valid_triple(a, b, c) {
                        return Some([a, b, c]);
                    }
                }
            }
        }
        None
    }
}
