//! Match lifecycle: spawning every actor and driving orderly shutdown.

use std::sync::Arc;

use log::{error, info};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::board::Board;
use crate::bot::{BotActor, RandomStrategy, SolverStrategy, Strategy};
use crate::claim::claim_queue;
use crate::display::DisplaySink;
use crate::game::config::{Controller, GameConfig};
use crate::game::entities::{CardId, Deck, PlayerId, Score};
use crate::player::actor::{PlayerActor, PlayerHandle};
use crate::player::session::{Session, SessionView, SharedSession};
use crate::rules::Evaluator;

use super::actor::DealerActor;

/// Final standings of a finished match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    /// `(player, score)` pairs in player-id order.
    pub scores: Vec<(PlayerId, Score)>,

    /// Every player with the maximum score.
    pub winners: Vec<PlayerId>,
}

/// Clonable handle that stops a running match from another task (for
/// example a signal handler).
#[derive(Clone)]
pub struct MatchStopper {
    shutdown: Arc<watch::Sender<bool>>,
}

impl MatchStopper {
    /// Signals every actor to terminate. Idempotent.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }
}

/// A running match: the dealer, one actor per player, and one bot task
/// per automated player.
///
/// Dropping a `Match` leaks running tasks; call [`Match::wait`] or
/// [`Match::shutdown`] to end it.
pub struct Match {
    handles: Vec<PlayerHandle>,
    sessions: Vec<SharedSession>,
    board: Arc<Mutex<Board>>,
    shutdown: Arc<watch::Sender<bool>>,
    bot_tasks: Vec<(PlayerId, JoinHandle<()>)>,
    player_tasks: Vec<(PlayerId, JoinHandle<()>)>,
    dealer_task: JoinHandle<()>,
}

impl Match {
    /// Validates the configuration and spawns every actor task.
    pub fn start(
        config: GameConfig,
        evaluator: Arc<dyn Evaluator>,
        display: Arc<dyn DisplaySink>,
    ) -> Result<Self, String> {
        config.validate()?;

        let board = Arc::new(Mutex::new(Board::new(config.board_capacity)));
        let deck = Deck::new(config.deck_size);
        let shutdown = Arc::new(watch::channel(false).0);
        let (claim_tx, claim_rx) = claim_queue();

        let mut sessions = Vec::with_capacity(config.players.len());
        let mut handles = Vec::with_capacity(config.players.len());
        let mut player_tasks = Vec::with_capacity(config.players.len());
        let mut bot_tasks = Vec::new();

        for (id, seat) in config.players.iter().enumerate() {
            let session: SharedSession = Arc::new(Mutex::new(Session::new(id)));
            let (actor, handle) = PlayerActor::new(
                id,
                session.clone(),
                board.clone(),
                claim_tx.clone(),
                shutdown.subscribe(),
            );
            info!("spawning player {id} ({}, {})", seat.name, seat.controller);
            player_tasks.push((id, tokio::spawn(actor.run())));

            let strategy = match seat.controller {
                Controller::Human => None,
                Controller::Random => Some(Strategy::Random(RandomStrategy)),
                Controller::Solver => {
                    Some(Strategy::Solver(SolverStrategy::new(evaluator.clone())))
                }
            };
            if let Some(strategy) = strategy {
                let bot = BotActor::new(
                    id,
                    strategy,
                    handle.clone(),
                    session.clone(),
                    board.clone(),
                    shutdown.subscribe(),
                );
                bot_tasks.push((id, tokio::spawn(bot.run())));
            }

            sessions.push(session);
            handles.push(handle);
        }
        // The dealer must see the queue close once the last player actor
        // unwinds, so the spawning copy of the sender goes away here.
        drop(claim_tx);

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
        let dealer_task = tokio::spawn(dealer.run());

        Ok(Self {
            handles,
            sessions,
            board,
            shutdown,
            bot_tasks,
            player_tasks,
            dealer_task,
        })
    }

    /// Handle for feeding presses to a (human) player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerHandle> {
        self.handles.get(id)
    }

    /// Stop handle usable from another task.
    #[must_use]
    pub fn stopper(&self) -> MatchStopper {
        MatchStopper {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Snapshot of one player's session.
    pub async fn session_view(&self, id: PlayerId) -> Option<SessionView> {
        let session = self.sessions.get(id)?;
        Some(session.lock().await.view(Instant::now()))
    }

    /// Snapshot of the slot-to-card mapping.
    pub async fn board_snapshot(&self) -> Vec<Option<CardId>> {
        self.board.lock().await.snapshot()
    }

    /// Signals termination and joins every actor.
    pub async fn shutdown(self) -> MatchSummary {
        self.shutdown.send_replace(true);
        self.join_all().await
    }

    /// Waits for the match to end (naturally or stopped), then joins
    /// every actor.
    pub async fn wait(self) -> MatchSummary {
        let mut rx = self.shutdown.subscribe();
        if !*rx.borrow() {
            let _ = rx.changed().await;
        }
        self.join_all().await
    }

    /// Joins every task in a fixed order: bots, then players, then the
    /// dealer, each in ascending player id. A task that cannot be joined
    /// is a defect, so panics are logged rather than swallowed silently.
    async fn join_all(self) -> MatchSummary {
        for (id, task) in self.bot_tasks {
            if task.await.is_err() {
                error!("bot task {id} panicked");
            }
        }
        for (id, task) in self.player_tasks {
            if task.await.is_err() {
                error!("player task {id} panicked");
            }
        }
        if self.dealer_task.await.is_err() {
            error!("dealer task panicked");
        }

        let mut scores = Vec::with_capacity(self.sessions.len());
        for session in &self.sessions {
            let session = session.lock().await;
            scores.push((session.id(), session.score()));
        }
        let best = scores.iter().map(|&(_, score)| score).max().unwrap_or(0);
        let winners = scores
            .iter()
            .filter(|&&(_, score)| score == best)
            .map(|&(id, _)| id)
            .collect();
        MatchSummary { scores, winners }
    }
}
