//! Automated players.
//!
//! A bot is a per-player auxiliary task that generates slot presses
//! through the same handle a UI would use. Strategies:
//!
//! - [`decision::RandomStrategy`]: uniformly random presses.
//! - [`decision::SolverStrategy`]: finds a real triple via the rules
//!   evaluator and presses its slots.

pub mod actor;
pub mod decision;

pub use actor::BotActor;
pub use decision::{RandomStrategy, SelectStrategy, SolverStrategy, Strategy};
