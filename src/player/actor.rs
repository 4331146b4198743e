//! Player actor: drains slot presses, mutates the shared board, and
//! submits completed selections for validation.

use std::sync::Arc;

use log::debug;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::Instant;

use crate::board::{Board, TokenChange};
use crate::claim::{ClaimOutcome, ClaimSender};
use crate::game::entities::{CardId, PlayerId, SlotIndex};

use super::messages::PlayerMessage;
use super::session::SharedSession;

/// Handle for delivering input to a player actor.
#[derive(Clone)]
pub struct PlayerHandle {
    id: PlayerId,
    sender: mpsc::UnboundedSender<PlayerMessage>,
}

impl PlayerHandle {
    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Sends a slot press. Presses sent after termination are dropped.
    pub fn press(&self, slot: SlotIndex) {
        let _ = self.sender.send(PlayerMessage::Press(slot));
    }
}

/// A player's thread of control.
///
/// State machine: Selecting (draining presses) -> AwaitingValidation
/// (suspended on the claim's resume channel) -> Selecting, until the
/// terminate signal arrives. Every suspension point also observes the
/// terminate signal, so shutdown never waits on a claim that will not
/// be drained.
pub struct PlayerActor {
    id: PlayerId,
    session: SharedSession,
    board: Arc<Mutex<Board>>,
    claims: ClaimSender,
    inbox: mpsc::UnboundedReceiver<PlayerMessage>,
    shutdown: watch::Receiver<bool>,
}

impl PlayerActor {
    /// Creates the actor and the handle used to feed it presses.
    pub fn new(
        id: PlayerId,
        session: SharedSession,
        board: Arc<Mutex<Board>>,
        claims: ClaimSender,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, PlayerHandle) {
        let (sender, inbox) = mpsc::unbounded_channel();
        let actor = Self {
            id,
            session,
            board,
            claims,
            inbox,
            shutdown,
        };
        let handle = PlayerHandle { id, sender };
        (actor, handle)
    }

    /// Runs the player loop until shutdown.
    pub async fn run(mut self) {
        debug!("player {} starting", self.id);
        loop {
            tokio::select! {
                _ = self.shutdown.changed() => break,
                msg = self.inbox.recv() => match msg {
                    Some(PlayerMessage::Press(slot)) => {
                        if !self.handle_press(slot).await {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
        debug!("player {} terminated", self.id);
    }

    /// Applies one slot press. Returns `false` when the actor should
    /// unwind (shutdown observed while suspended, or the dealer is gone).
    async fn handle_press(&mut self, slot: SlotIndex) -> bool {
        let claim_cards = {
            let mut session = self.session.lock().await;
            if session.is_frozen(Instant::now()) {
                return true;
            }
            let mut board = self.board.lock().await;

            // The size-3 cap: a fourth token is ignored, it does not toggle.
            if !board.has_token(self.id, slot) && session.selection_full() {
                return true;
            }
            match board.toggle_token(self.id, slot) {
                // Empty slot: presses race with removals, so this is a no-op.
                Err(_) => return true,
                Ok(TokenChange::Removed(card)) => {
                    session.remove_from_selection(card);
                    // Deliberately changing the selection is the only way
                    // out of the penalty latch.
                    session.set_penalty_lock(false);
                    None
                }
                Ok(TokenChange::Placed(card)) => {
                    session.push_selection(card);
                    if session.selection_full() && !session.penalty_lock() {
                        session.set_awaiting(true);
                        let mut cards = [0 as CardId; 3];
                        cards.copy_from_slice(session.selection());
                        Some(cards)
                    } else {
                        None
                    }
                }
            }
        };

        match claim_cards {
            Some(cards) => self.submit_and_suspend(cards).await,
            None => true,
        }
    }

    /// Submits a claim and suspends until the dealer resumes this player
    /// or the terminate signal arrives.
    async fn submit_and_suspend(&mut self, cards: [CardId; 3]) -> bool {
        let resume = match self.claims.submit(self.id, cards) {
            Ok(resume) => resume,
            Err(_) => return false,
        };
        debug!("player {} claims {:?}", self.id, cards);

        let outcome = tokio::select! {
            _ = self.shutdown.changed() => None,
            outcome = resume => outcome.ok(),
        };

        let mut session = self.session.lock().await;
        session.set_awaiting(false);
        match outcome {
            Some(ClaimOutcome::Accepted { score }) => {
                debug!("player {} scored, now at {}", self.id, score);
                true
            }
            Some(ClaimOutcome::Rejected) => {
                debug!("player {} penalized", self.id);
                true
            }
            Some(ClaimOutcome::Void) => {
                debug!("player {} claim voided", self.id);
                true
            }
            // Interrupted, or the dealer dropped the claim at shutdown.
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::claim_queue;
    use crate::player::session::Session;
    use tokio::time::{Duration, timeout};

    fn press_fixture(
        capacity: usize,
        cards: &[CardId],
    ) -> (
        PlayerActor,
        PlayerHandle,
        SharedSession,
        Arc<Mutex<Board>>,
        crate::claim::ClaimReceiver,
        watch::Sender<bool>,
    ) {
        let mut board = Board::new(capacity);
        for (slot, &card) in cards.iter().enumerate() {
            board.place_card(slot, card).unwrap();
        }
        let board = Arc::new(Mutex::new(board));
        let session = Arc::new(Mutex::new(Session::new(0)));
        let (claim_tx, claim_rx) = claim_queue();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (actor, handle) =
            PlayerActor::new(0, session.clone(), board.clone(), claim_tx, shutdown_rx);
        (actor, handle, session, board, claim_rx, shutdown_tx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_toggle_restores_selection_and_clears_latch() {
        let (mut actor, _handle, session, board, _claim_rx, _shutdown_tx) =
            press_fixture(12, &[10, 11, 12]);
        session.lock().await.set_penalty_lock(true);

        assert!(actor.handle_press(1).await);
        assert_eq!(session.lock().await.selection(), &[11]);
        // Placing a token does not clear the latch...
        assert!(session.lock().await.penalty_lock());

        // ...removing one does.
        assert!(actor.handle_press(1).await);
        assert!(session.lock().await.selection().is_empty());
        assert!(!session.lock().await.penalty_lock());
        assert!(!board.lock().await.has_token(0, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_frozen_player_presses_are_ignored() {
        let (mut actor, _handle, session, board, _claim_rx, _shutdown_tx) =
            press_fixture(12, &[10, 11, 12]);
        session
            .lock()
            .await
            .freeze_for(Instant::now(), Duration::from_secs(5));

        assert!(actor.handle_press(0).await);
        assert!(session.lock().await.selection().is_empty());
        assert!(!board.lock().await.has_token(0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_slot_press_is_a_silent_no_op() {
        let (mut actor, _handle, session, _board, _claim_rx, _shutdown_tx) =
            press_fixture(12, &[10]);
        assert!(actor.handle_press(5).await);
        assert!(session.lock().await.selection().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_penalty_lock_blocks_submission_at_three() {
        let (mut actor, _handle, session, _board, mut claim_rx, _shutdown_tx) =
            press_fixture(12, &[10, 11, 12, 13]);
        session.lock().await.set_penalty_lock(true);

        for slot in 0..3 {
            assert!(actor.handle_press(slot).await);
        }
        let session_guard = session.lock().await;
        assert!(session_guard.selection_full());
        assert!(session_guard.penalty_lock());
        drop(session_guard);

        // Nothing was enqueued: the dealer side sees an empty queue.
        assert!(
            timeout(Duration::from_millis(50), claim_rx.recv())
                .await
                .is_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_selection_submits_and_suspends_until_resumed() {
        let (actor, handle, session, _board, mut claim_rx, _shutdown_tx) =
            press_fixture(12, &[10, 11, 12]);
        let task = tokio::spawn(actor.run());

        for slot in 0..3 {
            handle.press(slot);
        }
        let claim = claim_rx.recv().await.unwrap();
        assert_eq!(claim.player, 0);
        assert_eq!(claim.cards, [10, 11, 12]);
        assert!(session.lock().await.is_awaiting());

        claim.resolve(ClaimOutcome::Void);
        // Deselect-then-reselect after resumption proves the loop is
        // alive and produces a fresh claim.
        handle.press(0);
        handle.press(0);
        let claim = claim_rx.recv().await.unwrap();
        assert_eq!(claim.cards, [11, 12, 10]);
        claim.resolve(ClaimOutcome::Void);

        assert!(!task.is_finished());
        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_a_suspended_player() {
        let (actor, handle, _session, _board, mut claim_rx, shutdown_tx) =
            press_fixture(12, &[10, 11, 12]);
        let task = tokio::spawn(actor.run());

        for slot in 0..3 {
            handle.press(slot);
        }
        // Take the claim but never resolve it.
        let claim = claim_rx.recv().await.unwrap();
        assert_eq!(claim.player, 0);

        shutdown_tx.send_replace(true);
        timeout(Duration::from_secs(1), task)
            .await
            .expect("player must unwind on shutdown")
            .unwrap();
    }
}
