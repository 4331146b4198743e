//! # Set Rush
//!
//! A concurrent claim-arbitration engine for a Set-style card game:
//! player actors toggle selection tokens on a shared board of cards and
//! submit completed triples as claims; a single dealer actor validates
//! claims strictly in submission order, scores or penalizes, and
//! reshuffles the board under a countdown.
//!
//! ## Architecture
//!
//! Every actor is a tokio task:
//!
//! - **Players** drain slot presses from an mpsc inbox, mutate the shared
//!   board under its lock, and suspend on a oneshot resume channel after
//!   submitting a claim.
//! - **Bots** are optional auxiliary tasks that generate presses through
//!   the same handle a UI would use.
//! - **The dealer** multiplexes the claim queue with a bounded countdown
//!   tick, resolving one claim per tick, sweeping freeze windows, and
//!   refilling or reshuffling the board.
//! - **The lifecycle manager** spawns everything and joins everything;
//!   a shutdown broadcast interrupts every suspension point so no actor
//!   is ever left running or deadlocked.
//!
//! ## Core Modules
//!
//! - [`board`]: the shared slot grid with forward/reverse card mappings
//! - [`claim`]: the FIFO claim queue and resume channels
//! - [`player`]: session state and the player actor
//! - [`dealer`]: the coordinator loop and the match lifecycle
//! - [`bot`]: automated selection strategies
//! - [`rules`]: the triple evaluator boundary and the classic rules
//! - [`display`]: the display sink boundary
//!
//! ## Example
//!
//! ```
//! use set_rush::game::GameConfig;
//!
//! let config = GameConfig::default();
//! assert!(config.validate().is_ok());
//! ```

/// Shared board state and its operations.
pub mod board;

/// Automated players.
pub mod bot;

/// The claim queue between players and the dealer.
pub mod claim;

/// The dealer actor and the match lifecycle.
pub mod dealer;

/// Display sink boundary.
pub mod display;

/// Configuration, identifiers, and the deck.
pub mod game;

/// Player sessions and actors.
pub mod player;

/// Triple validity rules.
pub mod rules;

pub use board::{Board, BoardError, TokenChange};
pub use claim::{Claim, ClaimOutcome, ClaimQueueClosed};
pub use dealer::{Match, MatchStopper, MatchSummary};
pub use display::{DisplaySink, LogDisplay, NullDisplay};
pub use game::{
    CardId, Controller, Deck, GameConfig, PlayerConfig, PlayerId, Score, SlotIndex, constants,
};
pub use player::{PlayerHandle, SessionView};
pub use rules::{ClassicRules, Evaluator};
