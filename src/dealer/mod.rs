//! The dealer actor and the match lifecycle.
//!
//! The dealer is the single coordinator: it owns the deck and the
//! countdown, drains the claim queue one claim per tick, sweeps freeze
//! windows, and reshuffles the board when the countdown elapses. The
//! lifecycle half spawns every actor and guarantees a deterministic
//! shutdown: signal, interrupt every suspension point, join everything.

pub mod actor;
pub mod manager;

pub use actor::DealerActor;
pub use manager::{Match, MatchStopper, MatchSummary};
