//! Fixed-step driver for a session.
//!
//! The driver owns a [`Session`] and turns wall-clock milliseconds into the
//! two scheduled events the session needs: one tick per second and the
//! deferred commit of a revealed match. Hosts feed it elapsed time from any
//! clock (a terminal loop, a test, a replay) and never sleep inside the core.

use tracing::trace;

use crate::core::{Session, SessionSnapshot};
use crate::types::{SessionAction, TapOutcome, MATCH_REVEAL_MS, TICK_MS};

/// What happened during one [`Driver::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Advance {
    /// Ticks delivered to the session.
    pub ticks: u32,
    /// Whether a pending match was committed.
    pub committed: bool,
}

impl Advance {
    pub fn changed(&self) -> bool {
        self.ticks > 0 || self.committed
    }
}

#[derive(Debug)]
pub struct Driver {
    session: Session,
    reveal_ms: u32,
    /// Milliseconds accumulated toward the next tick
    tick_phase_ms: u32,
    /// Milliseconds until the scheduled commit
    commit_in_ms: Option<u32>,
}

impl Driver {
    pub fn new(session: Session) -> Self {
        Self::with_reveal_ms(session, MATCH_REVEAL_MS)
    }

    /// Use a custom path display delay. Zero commits right after the tap.
    pub fn with_reveal_ms(session: Session, reveal_ms: u32) -> Self {
        Self {
            session,
            reveal_ms,
            tick_phase_ms: 0,
            commit_in_ms: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn reveal_ms(&self) -> u32 {
        self.reveal_ms
    }

    pub fn commit_scheduled(&self) -> bool {
        self.commit_in_ms.is_some()
    }

    pub fn start(&mut self) {
        if !self.session.started() {
            self.session.start();
            self.reset_phase();
        }
    }

    /// Tap a cell, scheduling the commit when a match is revealed.
    pub fn tap(&mut self, row: u8, col: u8) -> TapOutcome {
        let outcome = self.session.handle_tap(row, col);
        if outcome == TapOutcome::MatchPending {
            self.schedule_commit();
        }
        outcome
    }

    /// Apply an action with the scheduling side effects it implies.
    pub fn apply(&mut self, action: SessionAction) -> bool {
        match action {
            SessionAction::Tap { row, col } => self.tap(row, col) != TapOutcome::Ignored,
            SessionAction::CommitMatch => {
                self.commit_in_ms = None;
                self.session.commit_match()
            }
            SessionAction::Restart | SessionAction::NextLevel | SessionAction::Continue => {
                let changed = self.session.apply_action(action);
                if changed {
                    self.reset_phase();
                }
                changed
            }
            SessionAction::Tick | SessionAction::Hint | SessionAction::TogglePause => {
                self.session.apply_action(action)
            }
        }
    }

    fn schedule_commit(&mut self) {
        if self.reveal_ms == 0 {
            self.session.commit_match();
        } else {
            self.commit_in_ms = Some(self.reveal_ms);
        }
    }

    fn reset_phase(&mut self) {
        self.tick_phase_ms = 0;
        self.commit_in_ms = None;
    }

    /// Milliseconds until the next scheduled event.
    pub fn next_deadline_ms(&self) -> u32 {
        let to_tick = TICK_MS - self.tick_phase_ms;
        match self.commit_in_ms {
            Some(commit) => commit.min(to_tick),
            None => to_tick,
        }
    }

    /// Let `elapsed_ms` pass, firing due events in chronological order.
    ///
    /// A commit due at the same instant as a tick fires first.
    pub fn advance(&mut self, elapsed_ms: u32) -> Advance {
        let mut out = Advance::default();
        let mut left = elapsed_ms;

        loop {
            let to_tick = TICK_MS - self.tick_phase_ms;
            match self.commit_in_ms {
                Some(commit) if commit <= left && commit <= to_tick => {
                    left -= commit;
                    self.tick_phase_ms += commit;
                    self.commit_in_ms = None;
                    out.committed |= self.session.commit_match();
                }
                _ if to_tick <= left => {
                    left -= to_tick;
                    self.tick_phase_ms = 0;
                    if let Some(commit) = self.commit_in_ms.as_mut() {
                        *commit -= to_tick;
                    }
                    if self.session.tick() {
                        out.ticks += 1;
                    }
                }
                _ => {
                    self.tick_phase_ms += left;
                    if let Some(commit) = self.commit_in_ms.as_mut() {
                        *commit -= left;
                    }
                    break;
                }
            }
        }

        if out.changed() {
            trace!(elapsed_ms, ticks = out.ticks, committed = out.committed, "advance");
        }
        out
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        self.session.snapshot_into(out);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Board;
    use crate::types::Mode;

    fn driver() -> Driver {
        let mut d = Driver::new(Session::new(Mode::ClassicEasy, 7));
        d.start();
        d.session_mut().load_board(
            Board::parse(
                "tile_001 tile_001 .        .
                 .        .        tile_002 tile_002",
            )
            .unwrap(),
        );
        d
    }

    #[test]
    fn ticks_once_per_second() {
        let mut d = driver();
        assert_eq!(d.advance(999).ticks, 0);
        assert_eq!(d.advance(1).ticks, 1);
        assert_eq!(d.advance(2500).ticks, 2);
        assert_eq!(d.session().time_left(), 117);
        assert_eq!(d.next_deadline_ms(), 500);
    }

    #[test]
    fn commit_fires_after_reveal_delay() {
        let mut d = driver();
        d.tap(1, 1);
        assert_eq!(d.tap(1, 2), TapOutcome::MatchPending);
        assert!(d.commit_scheduled());
        assert_eq!(d.next_deadline_ms(), MATCH_REVEAL_MS);

        assert!(!d.advance(MATCH_REVEAL_MS - 1).committed);
        assert_eq!(d.session().pairs_left(), 2);
        assert!(d.advance(1).committed);
        assert_eq!(d.session().pairs_left(), 1);
        assert!(!d.commit_scheduled());
    }

    #[test]
    fn commit_and_tick_in_one_step_keep_order() {
        let mut d = driver();
        d.advance(900);
        d.tap(1, 1);
        d.tap(1, 2);
        let step = d.advance(2000);
        assert!(step.committed);
        assert_eq!(step.ticks, 2);
        assert_eq!(d.session().score(), 10);
    }

    #[test]
    fn zero_reveal_commits_on_tap() {
        let mut d = Driver::with_reveal_ms(Session::new(Mode::ClassicEasy, 7), 0);
        d.start();
        d.session_mut()
            .load_board(Board::parse("tile_001 tile_001\ntile_002 tile_002").unwrap());
        d.tap(1, 1);
        assert_eq!(d.tap(1, 2), TapOutcome::MatchPending);
        assert_eq!(d.session().pairs_left(), 1);
        assert!(!d.commit_scheduled());
    }

    #[test]
    fn restart_resets_phase() {
        let mut d = driver();
        d.advance(700);
        d.tap(1, 1);
        d.tap(1, 2);
        assert!(d.apply(SessionAction::Restart));
        assert!(!d.commit_scheduled());
        assert_eq!(d.next_deadline_ms(), TICK_MS);
        assert_eq!(d.advance(999).ticks, 0);
    }

    #[test]
    fn explicit_commit_cancels_schedule() {
        let mut d = driver();
        d.apply(SessionAction::Tap { row: 1, col: 1 });
        d.apply(SessionAction::Tap { row: 1, col: 2 });
        assert!(d.apply(SessionAction::CommitMatch));
        assert!(!d.commit_scheduled());
        assert!(!d.advance(MATCH_REVEAL_MS).committed);
    }
}
