//! Dealer actor: drains the claim queue, arbitrates claims, and manages
//! the countdown and reshuffles.

use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::{Mutex, watch};
use tokio::time::{self, Duration, Instant};

use crate::board::Board;
use crate::claim::{Claim, ClaimOutcome, ClaimReceiver};
use crate::display::DisplaySink;
use crate::game::config::GameConfig;
use crate::game::constants::SELECTION_SIZE;
use crate::game::entities::{Deck, PlayerId};
use crate::player::session::SharedSession;
use crate::rules::Evaluator;

/// Idle tick while the countdown is outside the warning window. Bounds
/// how stale the freeze and countdown displays can get.
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Tick inside the warning window, where the display counts down fast.
const WARNING_TICK: Duration = Duration::from_millis(10);

/// How a countdown phase ended.
#[derive(Debug, PartialEq, Eq)]
enum Phase {
    Elapsed,
    Stopped,
}

/// How one claim was settled.
#[derive(Debug, PartialEq, Eq)]
enum Resolution {
    Scored,
    Rejected,
    Void,
}

/// The coordinator: owns the deck and the countdown, arbitrates claims
/// strictly in submission order, and drives the reshuffle cycle.
pub struct DealerActor {
    config: GameConfig,
    board: Arc<Mutex<Board>>,
    deck: Deck,
    sessions: Vec<SharedSession>,
    claims: ClaimReceiver,
    evaluator: Arc<dyn Evaluator>,
    display: Arc<dyn DisplaySink>,
    shutdown: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl DealerActor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: GameConfig,
        board: Arc<Mutex<Board>>,
        deck: Deck,
        sessions: Vec<SharedSession>,
        claims: ClaimReceiver,
        evaluator: Arc<dyn Evaluator>,
        display: Arc<dyn DisplaySink>,
        shutdown: Arc<watch::Sender<bool>>,
    ) -> Self {
        let shutdown_rx = shutdown.subscribe();
        Self {
            config,
            board,
            deck,
            sessions,
            claims,
            evaluator,
            display,
            shutdown,
            shutdown_rx,
        }
    }

    /// Runs the dealer loop until the match cannot be won anymore or an
    /// external stop arrives, then announces the winners and broadcasts
    /// the terminate signal.
    pub async fn run(mut self) {
        info!("dealer starting");
        self.deck.shuffle();
        loop {
            if self.stopped() || !self.match_can_continue().await {
                break;
            }
            self.refill_board().await;
            if self.countdown_phase().await == Phase::Stopped {
                break;
            }
            self.reshuffle().await;
        }
        self.announce_winners().await;
        // Terminate every actor; the lifecycle manager joins them.
        self.shutdown.send_replace(true);
        info!("dealer terminated");
    }

    fn stopped(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Whether any legal triple remains among tabled and undealt cards.
    async fn match_can_continue(&self) -> bool {
        let board = self.board.lock().await;
        if board.occupied_count() == 0 && self.deck.is_empty() {
            return false;
        }
        let mut cards = board.tabled_cards();
        cards.extend_from_slice(self.deck.cards());
        self.evaluator.find_triple(&cards).is_some()
    }

    /// Outer-loop refill: deal into every empty slot.
    async fn refill_board(&mut self) {
        let mut board = self.board.lock().await;
        Self::refill_slots(&mut self.deck, &mut board, self.display.as_ref());
    }

    /// Deals one card into every empty slot, in a fresh shuffle order,
    /// for as long as the deck lasts. Runs under whatever lock the caller
    /// already holds.
    fn refill_slots(deck: &mut Deck, board: &mut Board, display: &dyn DisplaySink) {
        if deck.is_empty() {
            return;
        }
        deck.shuffle();
        for slot in board.empty_slots() {
            let Some(card) = deck.deal() else { break };
            match board.place_card(slot, card) {
                Ok(()) => display.place_card(slot, card),
                Err(err) => {
                    // The slot list came from the board itself.
                    error!("refill failed on slot {slot}: {err}");
                    deck.put_back(card);
                }
            }
        }
    }

    /// The countdown phase: sweep freezes, publish the countdown, and
    /// resolve at most one claim per tick, until the deadline elapses or
    /// the match is stopped.
    async fn countdown_phase(&mut self) -> Phase {
        let mut deadline = Instant::now() + self.config.countdown();
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Phase::Elapsed;
            }
            self.sweep_freezes(now).await;
            let remaining = deadline - now;
            let warn = remaining <= self.config.countdown_warning();
            self.display.set_countdown(remaining, warn);

            let tick = if warn { WARNING_TICK } else { IDLE_TICK };
            let wake = now + tick.min(remaining);
            tokio::select! {
                _ = self.shutdown_rx.changed() => return Phase::Stopped,
                claim = self.claims.recv() => match claim {
                    // One claim per tick: the freeze sweep and countdown
                    // re-run before the next claim is considered, and each
                    // resolution refills the board it leaves behind.
                    Some(claim) => {
                        if self.resolve_claim(claim).await == Resolution::Scored {
                            deadline = Instant::now() + self.config.countdown();
                        }
                    }
                    None => return Phase::Stopped,
                },
                _ = time::sleep_until(wake) => {}
            }
        }
    }

    /// Clears elapsed freezes and publishes the remaining window for
    /// every player.
    async fn sweep_freezes(&self, now: Instant) {
        for session in &self.sessions {
            let mut session = session.lock().await;
            let remaining = session.sweep_freeze(now);
            self.display.set_freeze(session.id(), remaining);
        }
    }

    /// Settles one claim and resumes the claimant unconditionally.
    ///
    /// Locks every session in ascending id order, then the board, so the
    /// whole resolution is atomic with respect to concurrent toggles.
    async fn resolve_claim(&mut self, claim: Claim) -> Resolution {
        let mut sessions = Vec::with_capacity(self.sessions.len());
        for session in &self.sessions {
            sessions.push(session.lock().await);
        }
        let mut board = self.board.lock().await;
        let now = Instant::now();

        // An earlier resolution may have taken one of these cards; the
        // claim is then void: no score, no penalty, just resume.
        let claimant = &sessions[claim.player];
        let tabled = claim.cards.iter().all(|&card| board.slot_of(card).is_some());
        let selection_live = claimant.selection().len() == SELECTION_SIZE
            && claim.cards.iter().all(|card| claimant.selection().contains(card));
        if !tabled || !selection_live {
            debug!("claim #{} from player {} voided", claim.seq, claim.player);
            drop(board);
            drop(sessions);
            claim.resolve(ClaimOutcome::Void);
            return Resolution::Void;
        }

        let [a, b, c] = claim.cards;
        if self.evaluator.is_valid_triple(a, b, c) {
            let claimant = &mut sessions[claim.player];
            let score = claimant.add_point();
            claimant.freeze_for(now, self.config.success_freeze());
            self.display.set_score(claim.player, score);
            info!(
                "player {} scored with {:?}, now at {}",
                claim.player, claim.cards, score
            );

            // Cascade: the cards leave every selection, their slots lose
            // all tokens, and the freed slots refill, all in one batch.
            for card in claim.cards {
                if let Some(slot) = board.slot_of(card) {
                    for session in sessions.iter_mut() {
                        session.remove_from_selection(card);
                    }
                    if board.remove_card(slot).is_ok() {
                        self.display.remove_card(slot);
                    }
                }
            }
            Self::refill_slots(&mut self.deck, &mut board, self.display.as_ref());

            drop(board);
            drop(sessions);
            claim.resolve(ClaimOutcome::Accepted { score });
            Resolution::Scored
        } else {
            let claimant = &mut sessions[claim.player];
            claimant.freeze_for(now, self.config.penalty_freeze());
            claimant.set_penalty_lock(true);
            info!("player {} penalized for {:?}", claim.player, claim.cards);

            drop(board);
            drop(sessions);
            claim.resolve(ClaimOutcome::Rejected);
            Resolution::Rejected
        }
    }

    /// Deadline cleanup: every tabled card goes back to the deck and
    /// every session loses its selection and penalty latch. Claims queued
    /// against the old board resolve as void afterwards.
    async fn reshuffle(&mut self) {
        debug!("countdown elapsed; reshuffling");
        let mut sessions = Vec::with_capacity(self.sessions.len());
        for session in &self.sessions {
            sessions.push(session.lock().await);
        }
        let mut board = self.board.lock().await;
        for slot in 0..board.capacity() {
            if let Ok(card) = board.remove_card(slot) {
                self.deck.put_back(card);
                self.display.remove_card(slot);
            }
        }
        for session in sessions.iter_mut() {
            session.reset_for_reshuffle();
        }
    }

    /// Publishes every player with the maximum score, ties included.
    async fn announce_winners(&self) {
        let mut scores = Vec::with_capacity(self.sessions.len());
        for session in &self.sessions {
            let session = session.lock().await;
            scores.push((session.id(), session.score()));
        }
        let best = scores.iter().map(|&(_, score)| score).max().unwrap_or(0);
        let winners: Vec<PlayerId> = scores
            .iter()
            .filter(|&&(_, score)| score == best)
            .map(|&(id, _)| id)
            .collect();
        info!("match over; winners {winners:?}");
        self.display.announce_winners(&winners);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{ClaimSender, claim_queue};
    use crate::display::NullDisplay;
    use crate::game::entities::CardId;
    use crate::player::session::Session;

    struct AlwaysValid;

    impl Evaluator for AlwaysValid {
        fn is_valid_triple(&self, _a: CardId, _b: CardId, _c: CardId) -> bool {
            true
        }

        fn find_triple(&self, cards: &[CardId]) -> Option<[CardId; 3]> {
            (cards.len() >= 3).then(|| [cards[0], cards[1], cards[2]])
        }
    }

    struct NeverValid;

    impl Evaluator for NeverValid {
        fn is_valid_triple(&self, _a: CardId, _b: CardId, _c: CardId) -> bool {
            false
        }

        fn find_triple(&self, _cards: &[CardId]) -> Option<[CardId; 3]> {
            None
        }
    }

    #[derive(Default)]
    struct WinnerRecorder(std::sync::Mutex<Option<Vec<PlayerId>>>);

    impl DisplaySink for WinnerRecorder {
        fn place_card(&self, _slot: usize, _card: CardId) {}
        fn remove_card(&self, _slot: usize) {}
        fn set_score(&self, _player: PlayerId, _score: u32) {}
        fn set_freeze(&self, _player: PlayerId, _remaining: Duration) {}
        fn set_countdown(&self, _remaining: Duration, _warn: bool) {}
        fn announce_winners(&self, winners: &[PlayerId]) {
            *self.0.lock().unwrap() = Some(winners.to_vec());
        }
    }

    struct Fixture {
        dealer: DealerActor,
        claims: ClaimSender,
        board: Arc<Mutex<Board>>,
        sessions: Vec<SharedSession>,
        shutdown: Arc<watch::Sender<bool>>,
    }

    fn fixture(
        players: usize,
        deck_size: usize,
        evaluator: Arc<dyn Evaluator>,
        display: Arc<dyn DisplaySink>,
    ) -> Fixture {
        let config = GameConfig {
            deck_size,
            countdown_ms: 3_000,
            countdown_warning_ms: 1_000,
            success_freeze_ms: 1_000,
            penalty_freeze_ms: 3_000,
            ..GameConfig::default()
        };
        let board = Arc::new(Mutex::new(Board::new(config.board_capacity)));
        let deck = Deck::new(deck_size);
        let sessions: Vec<SharedSession> = (0..players)
            .map(|id| Arc::new(Mutex::new(Session::new(id))))
            .collect();
        let (claims, claim_rx) = claim_queue();
        let shutdown = Arc::new(watch::channel(false).0);
        let dealer = DealerActor::new(
            config,
            board.clone(),
            deck,
            sessions.clone(),
            claim_rx,
            evaluator,
            display,
            shutdown.clone(),
        );
        Fixture {
            dealer,
            claims,
            board,
            sessions,
            shutdown,
        }
    }

    /// Places `cards` on slots `0..cards.len()`.
    async fn seed_board(fixture: &Fixture, cards: &[CardId]) {
        let mut board = fixture.board.lock().await;
        for (slot, &card) in cards.iter().enumerate() {
            board.place_card(slot, card).unwrap();
        }
    }

    /// Tokens and selects `cards` for `player`, as presses would.
    async fn select_cards(fixture: &Fixture, player: PlayerId, cards: &[CardId]) {
        let mut session = fixture.sessions[player].lock().await;
        let mut board = fixture.board.lock().await;
        for &card in cards {
            let slot = board.slot_of(card).unwrap();
            board.toggle_token(player, slot).unwrap();
            session.push_selection(card);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_accepted_claim_scores_freezes_and_cascades() {
        let mut fx = fixture(2, 0, Arc::new(AlwaysValid), Arc::new(NullDisplay));
        seed_board(&fx, &[10, 11, 12, 13, 14]).await;
        select_cards(&fx, 0, &[10, 11, 12]).await;
        select_cards(&fx, 1, &[12, 13]).await;

        let resume = fx.claims.submit(0, [10, 11, 12]).unwrap();
        let claim = fx.dealer.claims.recv().await.unwrap();
        assert_eq!(fx.dealer.resolve_claim(claim).await, Resolution::Scored);
        assert_eq!(resume.await.unwrap(), ClaimOutcome::Accepted { score: 1 });

        let claimant = fx.sessions[0].lock().await;
        assert_eq!(claimant.score(), 1);
        assert!(claimant.is_frozen(Instant::now()));
        assert!(claimant.selection().is_empty());
        assert!(!claimant.penalty_lock());
        drop(claimant);

        // The shared card cascaded out of the other player's selection.
        let other = fx.sessions[1].lock().await;
        assert_eq!(other.selection(), &[13]);
        assert_eq!(other.score(), 0);
        drop(other);

        let board = fx.board.lock().await;
        assert_eq!(board.occupied_count(), 2);
        assert_eq!(board.slot_of(12), None);
        assert!(board.has_token(1, 3));
        assert!(board.check_consistency());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_claim_penalizes_and_leaves_board_alone() {
        let mut fx = fixture(1, 0, Arc::new(NeverValid), Arc::new(NullDisplay));
        seed_board(&fx, &[10, 11, 12]).await;
        select_cards(&fx, 0, &[10, 11, 12]).await;
        let before = fx.board.lock().await.snapshot();

        let resume = fx.claims.submit(0, [10, 11, 12]).unwrap();
        let claim = fx.dealer.claims.recv().await.unwrap();
        assert_eq!(fx.dealer.resolve_claim(claim).await, Resolution::Rejected);
        assert_eq!(resume.await.unwrap(), ClaimOutcome::Rejected);

        let session = fx.sessions[0].lock().await;
        assert_eq!(session.score(), 0);
        assert!(session.penalty_lock());
        assert!(session.is_frozen(Instant::now()));
        assert_eq!(session.selection(), &[10, 11, 12]);
        drop(session);

        assert_eq!(fx.board.lock().await.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_claims_second_resolves_void() {
        let mut fx = fixture(2, 0, Arc::new(AlwaysValid), Arc::new(NullDisplay));
        seed_board(&fx, &[10, 11, 12, 13, 14]).await;
        select_cards(&fx, 0, &[10, 11, 12]).await;
        select_cards(&fx, 1, &[12, 13, 14]).await;

        let resume0 = fx.claims.submit(0, [10, 11, 12]).unwrap();
        let resume1 = fx.claims.submit(1, [12, 13, 14]).unwrap();

        let first = fx.dealer.claims.recv().await.unwrap();
        assert_eq!(fx.dealer.resolve_claim(first).await, Resolution::Scored);
        let second = fx.dealer.claims.recv().await.unwrap();
        assert_eq!(fx.dealer.resolve_claim(second).await, Resolution::Void);

        assert_eq!(resume0.await.unwrap(), ClaimOutcome::Accepted { score: 1 });
        assert_eq!(resume1.await.unwrap(), ClaimOutcome::Void);

        // Void means untouched: no score, no penalty, no freeze.
        let loser = fx.sessions[1].lock().await;
        assert_eq!(loser.score(), 0);
        assert!(!loser.penalty_lock());
        assert!(!loser.is_frozen(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_claims_resolve_in_submission_order() {
        let mut fx = fixture(3, 0, Arc::new(NeverValid), Arc::new(NullDisplay));
        seed_board(&fx, &[10, 11, 12]).await;
        for player in 0..3 {
            select_cards(&fx, player, &[10, 11, 12]).await;
        }

        // Submission order deliberately differs from player-id order.
        let mut resumes = Vec::new();
        for player in [2, 0, 1] {
            resumes.push((player, fx.claims.submit(player, [10, 11, 12]).unwrap()));
        }

        for (player, mut resume) in resumes {
            // Earlier resolutions must not have touched this claimant.
            assert!(resume.try_recv().is_err());
            let claim = fx.dealer.claims.recv().await.unwrap();
            assert_eq!(claim.player, player);
            fx.dealer.resolve_claim(claim).await;
            assert_eq!(resume.await.unwrap(), ClaimOutcome::Rejected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_deals_into_every_empty_slot() {
        let mut fx = fixture(1, 20, Arc::new(AlwaysValid), Arc::new(NullDisplay));
        fx.dealer.refill_board().await;

        let board = fx.board.lock().await;
        assert_eq!(board.occupied_count(), board.capacity());
        assert!(board.check_consistency());
        drop(board);
        assert_eq!(fx.dealer.deck.len(), 20 - 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_with_short_deck_leaves_slots_empty() {
        let mut fx = fixture(1, 5, Arc::new(AlwaysValid), Arc::new(NullDisplay));
        fx.dealer.refill_board().await;

        assert_eq!(fx.board.lock().await.occupied_count(), 5);
        assert!(fx.dealer.deck.is_empty());

        // A second refill with an exhausted deck is a no-op.
        fx.dealer.refill_board().await;
        assert_eq!(fx.board.lock().await.occupied_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reshuffle_returns_every_tabled_card() {
        let mut fx = fixture(1, 20, Arc::new(AlwaysValid), Arc::new(NullDisplay));
        fx.dealer.refill_board().await;
        {
            let mut session = fx.sessions[0].lock().await;
            let mut board = fx.board.lock().await;
            let card = board.card_at(0).unwrap();
            board.toggle_token(0, 0).unwrap();
            session.push_selection(card);
            session.set_penalty_lock(true);
        }

        fx.dealer.reshuffle().await;

        assert_eq!(fx.board.lock().await.occupied_count(), 0);
        assert_eq!(fx.dealer.deck.len(), 20);
        let returned: std::collections::HashSet<CardId> =
            fx.dealer.deck.cards().iter().copied().collect();
        assert_eq!(returned, (0..20).collect::<std::collections::HashSet<CardId>>());

        let session = fx.sessions[0].lock().await;
        assert!(session.selection().is_empty());
        assert!(!session.penalty_lock());
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_phase_elapses_after_exactly_one_countdown() {
        let mut fx = fixture(1, 0, Arc::new(AlwaysValid), Arc::new(NullDisplay));
        let start = Instant::now();
        assert_eq!(fx.dealer.countdown_phase().await, Phase::Elapsed);
        assert_eq!(start.elapsed(), Duration::from_millis(3_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_phase_observes_the_stop_signal() {
        let mut fx = fixture(1, 0, Arc::new(AlwaysValid), Arc::new(NullDisplay));
        fx.shutdown.send_replace(true);
        assert_eq!(fx.dealer.countdown_phase().await, Phase::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_clears_elapsed_freezes() {
        let fx = fixture(1, 0, Arc::new(AlwaysValid), Arc::new(NullDisplay));
        let start = Instant::now();
        fx.sessions[0]
            .lock()
            .await
            .freeze_for(start, Duration::from_millis(500));

        fx.dealer.sweep_freezes(start).await;
        assert!(fx.sessions[0].lock().await.is_frozen(start));

        let later = start + Duration::from_millis(500);
        fx.dealer.sweep_freezes(later).await;
        assert!(!fx.sessions[0].lock().await.is_frozen(later));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ends_and_announces_tied_winners() {
        let recorder = Arc::new(WinnerRecorder::default());
        let fx = fixture(2, 20, Arc::new(NeverValid), recorder.clone());
        fx.dealer.run().await;

        // No triple anywhere: the match ends at once, both players tie
        // at zero, and the terminate signal is broadcast.
        assert_eq!(
            recorder.0.lock().unwrap().as_deref(),
            Some(&[0, 1][..])
        );
        assert!(*fx.shutdown.subscribe().borrow());
    }
}
