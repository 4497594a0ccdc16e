//! Session task on tokio.
//!
//! A spawned task owns the [`Session`]. Callers talk to it through a
//! [`SessionHandle`]: actions go over an mpsc channel, snapshots and events
//! come back on oneshot channels. The task itself drives the one-second
//! countdown and the deferred commit of revealed matches.

use std::future;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace};

use crate::core::{Session, SessionSnapshot};
use crate::types::{SessionAction, SessionEvent, TapOutcome, TICK_MS};

const COMMAND_CAPACITY: usize = 64;

#[derive(Debug)]
enum Command {
    Action(SessionAction, Option<oneshot::Sender<bool>>),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Events(oneshot::Sender<Vec<SessionEvent>>),
    Shutdown,
}

/// Handle to a running session task.
#[derive(Debug)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<Command>,
    task: JoinHandle<Session>,
}

impl SessionHandle {
    /// Start `session` (if needed) and move it into a new task.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn spawn(session: Session, reveal_ms: u32) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CAPACITY);
        let task = tokio::spawn(SessionTask::new(session, reveal_ms).run(cmd_rx));
        Self { cmd_tx, task }
    }

    /// Queue an action without waiting for it to be applied.
    pub async fn send(&self, action: SessionAction) -> Result<()> {
        self.command(Command::Action(action, None)).await
    }

    /// Apply an action and report whether it changed the session.
    pub async fn apply(&self, action: SessionAction) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.command(Command::Action(action, Some(tx))).await?;
        rx.await.context("session task dropped the reply")
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.command(Command::Snapshot(tx)).await?;
        rx.await.context("session task dropped the reply")
    }

    /// Events recorded since the previous call.
    pub async fn drain_events(&self) -> Result<Vec<SessionEvent>> {
        let (tx, rx) = oneshot::channel();
        self.command(Command::Events(tx)).await?;
        rx.await.context("session task dropped the reply")
    }

    /// Stop the task and get the session back with its timer stopped.
    pub async fn shutdown(self) -> Result<Session> {
        // The task also stops once every sender is gone.
        let _ = self.cmd_tx.send(Command::Shutdown).await;
        drop(self.cmd_tx);
        self.task.await.context("session task panicked")
    }

    async fn command(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| anyhow!("session task has stopped"))
    }
}

struct SessionTask {
    session: Session,
    reveal: Duration,
    ticker: Interval,
    commit_at: Option<Instant>,
}

impl SessionTask {
    fn new(mut session: Session, reveal_ms: u32) -> Self {
        session.start();
        let period = Duration::from_millis(u64::from(TICK_MS));
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            session,
            reveal: Duration::from_millis(u64::from(reveal_ms)),
            ticker,
            commit_at: None,
        }
    }

    async fn run(mut self, mut cmd_rx: mpsc::Receiver<Command>) -> Session {
        debug!(mode = self.session.mode().as_str(), "session task started");
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => match cmd {
                    Some(Command::Action(action, reply)) => {
                        let changed = self.apply(action);
                        if let Some(reply) = reply {
                            let _ = reply.send(changed);
                        }
                    }
                    Some(Command::Snapshot(reply)) => {
                        let _ = reply.send(self.session.snapshot());
                    }
                    Some(Command::Events(reply)) => {
                        let _ = reply.send(self.session.drain_events());
                    }
                    Some(Command::Shutdown) | None => break,
                },

                _ = until(self.commit_at) => {
                    self.commit_at = None;
                    self.session.commit_match();
                }

                _ = self.ticker.tick() => {
                    if self.session.tick() {
                        trace!(time_left = self.session.time_left(), "tick");
                    }
                }
            }
        }
        self.session.stop_timer();
        debug!(level = self.session.level(), score = self.session.score(), "session task stopped");
        self.session
    }

    fn apply(&mut self, action: SessionAction) -> bool {
        match action {
            SessionAction::Tap { row, col } => {
                let outcome = self.session.handle_tap(row, col);
                if outcome == TapOutcome::MatchPending {
                    if self.reveal.is_zero() {
                        self.session.commit_match();
                    } else {
                        self.commit_at = Some(Instant::now() + self.reveal);
                    }
                }
                outcome != TapOutcome::Ignored
            }
            SessionAction::CommitMatch => {
                self.commit_at = None;
                self.session.commit_match()
            }
            SessionAction::Restart | SessionAction::NextLevel | SessionAction::Continue => {
                let changed = self.session.apply_action(action);
                if changed {
                    self.commit_at = None;
                    self.ticker.reset();
                }
                changed
            }
            SessionAction::Tick | SessionAction::Hint | SessionAction::TogglePause => {
                self.session.apply_action(action)
            }
        }
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}
