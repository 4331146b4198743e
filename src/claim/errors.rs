//! Claim queue error types.

use thiserror::Error;

/// The dealer side of the claim queue is gone (match over or shutting
/// down). Submitters treat this as termination.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("claim queue is closed")]
pub struct ClaimQueueClosed;
