//! Claim messages and the FIFO claim queue.
//!
//! The queue is the single ordered channel between player actors and the
//! dealer: submissions append under one lock (which also stamps the
//! submission sequence number), and the dealer removes one claim at a
//! time in submission order, waking as soon as one is available.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, oneshot};

use crate::game::entities::{CardId, PlayerId, Score};

use super::errors::ClaimQueueClosed;

/// Outcome of a resolved claim, delivered on the claimant's resume
/// channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The triple was valid; carries the claimant's new score.
    Accepted { score: Score },

    /// The triple was judged invalid.
    Rejected,

    /// The underlying selection changed before resolution; no effect.
    Void,
}

/// An immutable snapshot of a completed selection awaiting validation.
#[derive(Debug)]
pub struct Claim {
    pub player: PlayerId,
    pub cards: [CardId; 3],

    /// Submission order, strictly increasing across all players.
    pub seq: u64,

    resume: oneshot::Sender<ClaimOutcome>,
}

impl Claim {
    /// Resumes the suspended claimant with the outcome. The claimant may
    /// already be unwinding at shutdown, so a dropped receiver is not an
    /// error.
    pub fn resolve(self, outcome: ClaimOutcome) {
        let _ = self.resume.send(outcome);
    }
}

/// Producer half of the claim queue, shared by all player actors.
#[derive(Clone)]
pub struct ClaimSender {
    tx: mpsc::UnboundedSender<Claim>,
    seq: Arc<Mutex<u64>>,
}

impl ClaimSender {
    /// Appends a claim and returns the receiver the claimant suspends on.
    ///
    /// The append happens while the sequence lock is held, so `seq` order
    /// and queue order agree even across racing submitters.
    pub fn submit(
        &self,
        player: PlayerId,
        cards: [CardId; 3],
    ) -> Result<oneshot::Receiver<ClaimOutcome>, ClaimQueueClosed> {
        let (resume_tx, resume_rx) = oneshot::channel();
        let mut seq = self.seq.lock().unwrap_or_else(PoisonError::into_inner);
        *seq += 1;
        let claim = Claim {
            player,
            cards,
            seq: *seq,
            resume: resume_tx,
        };
        self.tx.send(claim).map_err(|_| ClaimQueueClosed)?;
        Ok(resume_rx)
    }
}

/// Consumer half of the claim queue, owned by the dealer.
pub struct ClaimReceiver {
    rx: mpsc::UnboundedReceiver<Claim>,
}

impl ClaimReceiver {
    /// Removes and returns the earliest-submitted pending claim, waiting
    /// until one arrives. Returns `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Claim> {
        self.rx.recv().await
    }
}

/// Creates the claim queue shared between the player actors and the
/// dealer.
#[must_use]
pub fn claim_queue() -> (ClaimSender, ClaimReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ClaimSender {
            tx,
            seq: Arc::new(Mutex::new(0)),
        },
        ClaimReceiver { rx },
    )
}
