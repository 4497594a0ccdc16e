//! Session module - the level/mode state machine
//!
//! A [`Session`] owns the board and every counter of one game instance. It
//! reacts to taps, hint requests, pause toggles and one-second ticks, and
//! drives level setup, scoring, deadlock handling and the endless best record.
//!
//! A successful tap does not remove the pair immediately: it reveals the
//! connecting path and parks a pending match. The host renders the path and
//! calls [`Session::commit_match`] when it sees fit (usually after
//! [`MATCH_REVEAL_MS`](crate::types::MATCH_REVEAL_MS)). Tests call it straight
//! away.
//!
//! Observers either pull a [`SessionSnapshot`] or drain [`SessionEvent`]s
//! after a batch of calls. Cues are also pushed to the [`Feedback`] port as
//! they happen.

use std::fmt;

use tracing::{debug, info};

use crate::board::Board;
use crate::compact::compact;
use crate::deadlock::DeadlockResolver;
use crate::generate::BoardGenerator;
use crate::path::find_path;
use crate::progression::{
    base_time_for_level, can_advance, display_name, fall_style_for_level, hints_after_advance,
    hints_at_setup, level_compacts, score_after_clear, score_after_match, time_after_match,
};
use crate::records::{BestRecord, Feedback, MemoryStore, NullFeedback, RecordStore};
use crate::rng::SimpleRng;
use crate::rules::MatchRule;
use crate::snapshot::SessionSnapshot;
use crate::types::{
    FailReason, FallStyle, Mode, Notice, Pos, SessionAction, SessionEvent, TapOutcome,
    STARTING_HINTS,
};

/// One game instance.
pub struct Session {
    mode: Mode,
    seed: u32,
    rng: SimpleRng,
    generator: BoardGenerator,
    resolver: DeadlockResolver,
    board: Board,
    level: u32,
    rule: MatchRule,
    fall_style: FallStyle,
    base_time: u32,
    time_left: u32,
    timer_running: bool,
    score: u32,
    hints: u32,
    pairs_left: u32,
    selected: Option<Pos>,
    hint_pair: Option<(Pos, Pos)>,
    /// Path of the pending match, empty otherwise
    path: Vec<Pos>,
    pending: Option<(Pos, Pos)>,
    paused: bool,
    cleared: bool,
    failed: Option<FailReason>,
    notice: Option<Notice>,
    /// Automatic reshuffles (wrapping), lets a UI pulse the hint counter
    reshuffles: u32,
    best: BestRecord,
    started: bool,
    store: Box<dyn RecordStore + Send>,
    feedback: Box<dyn Feedback + Send>,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Create a session. Nothing is laid out until [`start`](Self::start).
    pub fn new(mode: Mode, seed: u32) -> Self {
        let store = MemoryStore::new();
        let best = BestRecord::load(&store);
        Self {
            mode,
            seed,
            rng: SimpleRng::new(seed),
            generator: BoardGenerator::new(),
            resolver: DeadlockResolver::new(),
            board: Board::new(),
            level: mode.starting_level(),
            rule: MatchRule::for_level(mode.starting_level()),
            fall_style: FallStyle::None,
            base_time: 0,
            time_left: 0,
            timer_running: false,
            score: 0,
            hints: STARTING_HINTS,
            pairs_left: 0,
            selected: None,
            hint_pair: None,
            path: Vec::new(),
            pending: None,
            paused: false,
            cleared: false,
            failed: None,
            notice: None,
            reshuffles: 0,
            best,
            started: false,
            store: Box::new(store),
            feedback: Box::new(NullFeedback),
            events: Vec::new(),
        }
    }

    /// Use `store` for the endless best record and load it.
    pub fn with_store(mut self, store: impl RecordStore + Send + 'static) -> Self {
        self.store = Box::new(store);
        self.best = BestRecord::load(self.store.as_ref());
        self
    }

    /// Send cues to `feedback`.
    pub fn with_feedback(mut self, feedback: impl Feedback + Send + 'static) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    /// Replace the reshuffle attempt budget.
    pub fn with_resolver(mut self, resolver: DeadlockResolver) -> Self {
        self.resolver = resolver;
        self
    }

    // ----- lifecycle -----

    /// Lay out the first level and start the clock. Later calls do nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.begin_run();
    }

    /// Back to the mode's first level with a fresh score.
    pub fn restart(&mut self) {
        self.stop_timer();
        self.paused = false;
        self.started = true;
        self.begin_run();
    }

    fn begin_run(&mut self) {
        self.level = self.mode.starting_level();
        self.score = 0;
        self.hints = STARTING_HINTS;
        if self.mode == Mode::Endless {
            self.best = BestRecord::load(self.store.as_ref());
        }
        info!(mode = self.mode.as_str(), level = self.level, seed = self.seed, "run started");
        self.setup_level(self.level);
        self.start_timer();
    }

    /// Move to the next level. Refused once a capped mode reaches its cap.
    ///
    /// Does not require the current level to be cleared.
    pub fn advance_to_next_level(&mut self) -> bool {
        if !self.started || !can_advance(self.mode, self.level) {
            return false;
        }
        self.level += 1;
        self.hints = hints_after_advance(self.mode, self.hints);
        self.setup_level(self.level);
        self.start_timer();
        true
    }

    /// What the "continue" prompt does after a clear: practice replays its
    /// level from scratch, other modes advance.
    pub fn continue_after_clear(&mut self) -> bool {
        if !self.cleared {
            return false;
        }
        match self.mode {
            Mode::Practice { .. } => {
                self.restart();
                true
            }
            Mode::ClassicEasy | Mode::ClassicHard | Mode::Endless => self.advance_to_next_level(),
        }
    }

    fn setup_level(&mut self, level: u32) {
        self.level = level;
        self.selected = None;
        self.hint_pair = None;
        self.path.clear();
        self.pending = None;
        self.notice = None;
        self.paused = false;
        self.cleared = false;
        self.failed = None;

        self.rule = MatchRule::for_level(level);
        self.fall_style = match self.mode {
            Mode::Endless => self
                .rng
                .choose(&FallStyle::ALL)
                .copied()
                .unwrap_or_default(),
            Mode::ClassicEasy | Mode::ClassicHard | Mode::Practice { .. } => {
                fall_style_for_level(level)
            }
        };

        self.generator.fill(&mut self.board, level, &mut self.rng);
        self.pairs_left = (self.board.occupied_count() / 2) as u32;
        self.hints = hints_at_setup(self.mode, self.hints);

        debug!(
            level,
            style = self.fall_style.as_str(),
            rule = ?self.rule,
            hints = self.hints,
            "level setup"
        );
        self.emit(SessionEvent::LevelStarted { level });

        if !self.resolver.any_move_exists(&self.board, self.rule) {
            self.handle_deadlock();
        }
    }

    /// Replace the current layout, e.g. with a fixture.
    ///
    /// Selection, hint and any pending match are dropped and the pair counter
    /// is recomputed. A deadlocked layout is handled as at level setup.
    pub fn load_board(&mut self, board: Board) {
        self.board = board;
        self.pairs_left = (self.board.occupied_count() / 2) as u32;
        self.selected = None;
        self.hint_pair = None;
        self.path.clear();
        self.pending = None;
        self.notice = None;
        debug!(pairs = self.pairs_left, "board loaded");
        if self.pairs_left > 0 && !self.resolver.any_move_exists(&self.board, self.rule) {
            self.handle_deadlock();
        }
    }

    // ----- timer -----

    fn start_timer(&mut self) {
        self.base_time = base_time_for_level(self.level);
        self.time_left = self.base_time;
        self.timer_running = self.failed.is_none();
    }

    /// Stop the countdown. Idempotent.
    pub fn stop_timer(&mut self) {
        self.timer_running = false;
    }

    /// One second elapsed. Returns false when the tick had no effect.
    pub fn tick(&mut self) -> bool {
        if !self.timer_running || self.paused || self.is_terminal() {
            return false;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.notice = None;
            self.fail(FailReason::TimeUp);
        }
        true
    }

    // ----- pause -----

    pub fn pause(&mut self) -> bool {
        if !self.mode.pause_allowed() || self.time_left == 0 || self.is_terminal() || self.paused {
            return false;
        }
        self.paused = true;
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    // ----- play -----

    fn accepts_input(&self) -> bool {
        self.started
            && self.time_left > 0
            && !self.paused
            && !self.is_terminal()
            && self.pending.is_none()
    }

    /// Tap a padded-grid cell.
    ///
    /// A matching, connectable second tap reveals the path and returns
    /// [`TapOutcome::MatchPending`]; the pair stays on the board until
    /// [`commit_match`](Self::commit_match).
    pub fn handle_tap(&mut self, row: u8, col: u8) -> TapOutcome {
        let pos = Pos::new(row, col);
        if !self.accepts_input() || !self.board.is_interior(pos) || !self.board.is_occupied(pos) {
            return TapOutcome::Ignored;
        }
        let tile = self.board.tile(pos);
        self.hint_pair = None;

        let Some(first) = self.selected else {
            self.selected = Some(pos);
            self.emit(SessionEvent::Selected(pos));
            return TapOutcome::Selected;
        };

        if first == pos {
            self.selected = None;
            self.emit(SessionEvent::Deselected(pos));
            return TapOutcome::Deselected;
        }

        let first_tile = self.board.tile(first);
        if first_tile.is_empty() {
            self.selected = Some(pos);
            self.emit(SessionEvent::Selected(pos));
            return TapOutcome::Reselected;
        }

        let path = if self.rule.matches(first_tile, tile) {
            find_path(&self.board, first, pos)
        } else {
            None
        };
        let Some(path) = path else {
            self.selected = Some(pos);
            self.emit(SessionEvent::Mismatch(pos));
            return TapOutcome::Reselected;
        };

        debug!(%first, to = %pos, len = path.len(), "match revealed");
        self.path = path;
        self.pending = Some((first, pos));
        self.emit(SessionEvent::MatchRevealed {
            from: first,
            to: pos,
        });
        TapOutcome::MatchPending
    }

    /// Remove the pending pair, score it, compact, then either clear the
    /// level or make sure a move remains.
    ///
    /// Returns false when nothing was pending or the level already ended, in
    /// which case the pending match is discarded.
    pub fn commit_match(&mut self) -> bool {
        let Some((a, b)) = self.pending.take() else {
            return false;
        };
        self.selected = None;
        if self.is_terminal() {
            self.path.clear();
            return false;
        }

        self.board.remove_pair(a, b);
        self.pairs_left = self.pairs_left.saturating_sub(1);
        self.score = score_after_match(self.score);
        self.time_left = time_after_match(self.time_left, self.base_time);
        self.notice = None;
        self.emit(SessionEvent::MatchCommitted { from: a, to: b });

        if level_compacts(self.level) {
            compact(&mut self.board, self.fall_style);
        }
        self.path.clear();

        if self.pairs_left == 0 {
            self.clear_level();
        } else if !self.resolver.any_move_exists(&self.board, self.rule) {
            self.handle_deadlock();
        }
        true
    }

    /// Highlight a connectable pair, spending one hint.
    ///
    /// With no connectable pair a notice is raised and nothing is spent.
    pub fn use_hint(&mut self) -> bool {
        if self.hints == 0 || !self.accepts_input() {
            return false;
        }
        match self.resolver.find_connectable_pair(&self.board, self.rule) {
            Some((first, second)) => {
                self.hint_pair = Some((first, second));
                self.selected = None;
                self.hints -= 1;
                self.notice = None;
                self.emit(SessionEvent::HintShown { first, second });
                true
            }
            None => {
                self.notice = Some(Notice::NoHintAvailable);
                false
            }
        }
    }

    /// Dispatch an action. Returns true when it changed something.
    pub fn apply_action(&mut self, action: SessionAction) -> bool {
        match action {
            SessionAction::Tap { row, col } => self.handle_tap(row, col) != TapOutcome::Ignored,
            SessionAction::CommitMatch => self.commit_match(),
            SessionAction::Tick => self.tick(),
            SessionAction::Hint => self.use_hint(),
            SessionAction::TogglePause => self.toggle_pause(),
            SessionAction::Restart => {
                self.restart();
                true
            }
            SessionAction::NextLevel => self.advance_to_next_level(),
            SessionAction::Continue => self.continue_after_clear(),
        }
    }

    // ----- outcomes -----

    fn clear_level(&mut self) {
        self.score = score_after_clear(self.score, self.time_left);
        self.stop_timer();
        self.cleared = true;
        info!(level = self.level, score = self.score, "level cleared");
        self.emit(SessionEvent::LevelCleared {
            level: self.level,
            score: self.score,
        });
        if self.mode == Mode::Endless {
            self.record_best(self.level);
        }
    }

    fn fail(&mut self, reason: FailReason) {
        self.stop_timer();
        self.failed = Some(reason);
        info!(level = self.level, score = self.score, ?reason, "level failed");
        self.emit(SessionEvent::LevelFailed {
            level: self.level,
            reason,
        });
        if self.mode == Mode::Endless {
            self.record_best(self.level.saturating_sub(1));
        }
    }

    fn record_best(&mut self, level: u32) {
        if self.best.merge(level, self.score) {
            self.emit(SessionEvent::BestRecordUpdated {
                level: self.best.level,
                score: self.best.score,
            });
        }
        self.best.save(self.store.as_mut());
    }

    /// No move left: classic-hard pays a hint per reshuffle and fails without
    /// one, other modes reshuffle for free.
    fn handle_deadlock(&mut self) {
        match self.mode {
            Mode::ClassicHard if self.hints == 0 => {
                self.notice = Some(Notice::DeadlockNoHints);
                self.fail(FailReason::Deadlock);
            }
            Mode::ClassicHard => {
                self.hints -= 1;
                self.reshuffle(true);
            }
            Mode::ClassicEasy | Mode::Practice { .. } | Mode::Endless => self.reshuffle(false),
        }
    }

    fn reshuffle(&mut self, hint_spent: bool) {
        let outcome =
            self.resolver
                .shuffle_until_playable(&mut self.board, self.rule, &mut self.rng, false);
        self.selected = None;
        self.hint_pair = None;
        self.reshuffles = self.reshuffles.wrapping_add(1);
        debug!(?outcome, hint_spent, hints = self.hints, "deadlock reshuffle");
        self.emit(SessionEvent::Reshuffled { hint_spent });
    }

    fn emit(&mut self, event: SessionEvent) {
        if let Some(cue) = event.cue() {
            self.feedback.cue(cue);
        }
        self.events.push(event);
    }

    /// Events since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ----- observation -----

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.board.clone_from(&self.board);
        out.mode = self.mode;
        out.level = self.level;
        out.level_name = display_name(self.mode, self.level, self.fall_style);
        out.fall_style = self.fall_style;
        out.time_left = self.time_left;
        out.base_time = self.base_time;
        out.timer_running = self.timer_running;
        out.score = self.score;
        out.hints = self.hints;
        out.pairs_left = self.pairs_left;
        out.paused = self.paused;
        out.pause_allowed = self.mode.pause_allowed();
        out.selected = self.selected;
        out.hint_pair = self.hint_pair;
        out.path.clear();
        out.path.extend_from_slice(&self.path);
        out.match_pending = self.pending.is_some();
        out.cleared = self.cleared;
        out.failed = self.failed;
        out.notice = self.notice;
        out.reshuffles = self.reshuffles;
        out.best = (self.mode == Mode::Endless).then_some(self.best);
        out.can_advance = can_advance(self.mode, self.level);
        out.seed = self.seed;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn rule(&self) -> MatchRule {
        self.rule
    }

    pub fn fall_style(&self) -> FallStyle {
        self.fall_style
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hints(&self) -> u32 {
        self.hints
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn base_time(&self) -> u32 {
        self.base_time
    }

    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn pairs_left(&self) -> u32 {
        self.pairs_left
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    pub fn hint_pair(&self) -> Option<(Pos, Pos)> {
        self.hint_pair
    }

    pub fn path(&self) -> &[Pos] {
        &self.path
    }

    pub fn pending_match(&self) -> Option<(Pos, Pos)> {
        self.pending
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn cleared(&self) -> bool {
        self.cleared
    }

    pub fn failed(&self) -> Option<FailReason> {
        self.failed
    }

    pub fn is_terminal(&self) -> bool {
        self.cleared || self.failed.is_some()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    pub fn best(&self) -> BestRecord {
        self.best
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("seed", &self.seed)
            .field("level", &self.level)
            .field("score", &self.score)
            .field("hints", &self.hints)
            .field("time_left", &self.time_left)
            .field("pairs_left", &self.pairs_left)
            .field("selected", &self.selected)
            .field("pending", &self.pending)
            .field("paused", &self.paused)
            .field("cleared", &self.cleared)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Mode::ClassicEasy, 1)
    }
}
