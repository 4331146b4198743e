//! The claim queue: the FIFO channel between player actors and the
//! dealer.
//!
//! Claims are resolved strictly in submission order, independent of which
//! actor submitted them. Each claim carries the oneshot sender the dealer
//! uses to resume the suspended claimant.

pub mod errors;
pub mod messages;

pub use errors::ClaimQueueClosed;
pub use messages::{Claim, ClaimOutcome, ClaimReceiver, ClaimSender, claim_queue};
