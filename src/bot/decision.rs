//! Bot selection strategies.

use std::sync::Arc;

use enum_dispatch::enum_dispatch;
use rand::Rng;

use crate::game::entities::{CardId, SlotIndex};
use crate::rules::Evaluator;

/// Produces the next slot press from a board snapshot.
#[enum_dispatch]
pub trait SelectStrategy {
    /// Picks the next slot to press, or `None` when nothing is worth
    /// pressing right now.
    fn next_press(&mut self, snapshot: &[Option<CardId>]) -> Option<SlotIndex>;
}

/// Presses uniformly random slots.
#[derive(Debug, Default)]
pub struct RandomStrategy;

impl SelectStrategy for RandomStrategy {
    fn next_press(&mut self, snapshot: &[Option<CardId>]) -> Option<SlotIndex> {
        if snapshot.is_empty() {
            return None;
        }
        Some(rand::rng().random_range(0..snapshot.len()))
    }
}

/// Finds a real triple on the board and presses its slots in order.
pub struct SolverStrategy {
    evaluator: Arc<dyn Evaluator>,
    /// Planned presses, kept in reverse so the next press pops off the end.
    planned: Vec<SlotIndex>,
}

impl SolverStrategy {
    #[must_use]
    pub fn new(evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            evaluator,
            planned: Vec::new(),
        }
    }

    fn replan(&mut self, snapshot: &[Option<CardId>]) {
        let cards: Vec<CardId> = snapshot.iter().flatten().copied().collect();
        let Some(triple) = self.evaluator.find_triple(&cards) else {
            return;
        };
        self.planned = triple
            .iter()
            .filter_map(|&card| snapshot.iter().position(|&slot| slot == Some(card)))
            .rev()
            .collect();
    }
}

impl SelectStrategy for SolverStrategy {
    fn next_press(&mut self, snapshot: &[Option<CardId>]) -> Option<SlotIndex> {
        // The board may have moved since the plan was made; a stale plan
        // is dropped rather than pressed blind.
        if let Some(&slot) = self.planned.last() {
            if snapshot.get(slot).copied().flatten().is_some() {
                return self.planned.pop();
            }
            self.planned.clear();
        }
        self.replan(snapshot);
        self.planned.pop()
    }
}

/// Available strategies, statically dispatched.
#[enum_dispatch(SelectStrategy)]
pub enum Strategy {
    Random(RandomStrategy),
    Solver(SolverStrategy),
}
