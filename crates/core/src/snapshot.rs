use crate::board::Board;
use crate::records::BestRecord;
use crate::types::{FailReason, FallStyle, Mode, Notice, Pos};

/// Everything a presentation layer needs to draw one frame.
///
/// Filled by [`Session::snapshot_into`](crate::Session::snapshot_into), which
/// reuses the board and path allocations of an existing snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub board: Board,
    pub mode: Mode,
    pub level: u32,
    pub level_name: &'static str,
    pub fall_style: FallStyle,
    pub time_left: u32,
    pub base_time: u32,
    pub timer_running: bool,
    pub score: u32,
    pub hints: u32,
    pub pairs_left: u32,
    pub paused: bool,
    pub pause_allowed: bool,
    pub selected: Option<Pos>,
    pub hint_pair: Option<(Pos, Pos)>,
    /// Route of the match being revealed, endpoints included.
    pub path: Vec<Pos>,
    pub match_pending: bool,
    pub cleared: bool,
    pub failed: Option<FailReason>,
    pub notice: Option<Notice>,
    /// Automatic reshuffles so far; wraps.
    pub reshuffles: u32,
    /// Endless mode only.
    pub best: Option<BestRecord>,
    pub can_advance: bool,
    pub seed: u32,
}

impl SessionSnapshot {
    /// Remaining time as a fraction of the level's base time, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.base_time == 0 {
            return 0.0;
        }
        self.time_left.min(self.base_time) as f32 / self.base_time as f32
    }

    pub fn is_terminal(&self) -> bool {
        self.cleared || self.failed.is_some()
    }

    /// Taps would be accepted.
    pub fn playable(&self) -> bool {
        !self.is_terminal() && !self.paused && !self.match_pending && self.time_left > 0
    }

    pub fn is_hinted(&self, pos: Pos) -> bool {
        matches!(self.hint_pair, Some((a, b)) if a == pos || b == pos)
    }

    pub fn on_path(&self, pos: Pos) -> bool {
        self.path.contains(&pos)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            board: Board::new(),
            mode: Mode::ClassicEasy,
            level: 0,
            level_name: "",
            fall_style: FallStyle::None,
            time_left: 0,
            base_time: 0,
            timer_running: false,
            score: 0,
            hints: 0,
            pairs_left: 0,
            paused: false,
            pause_allowed: true,
            selected: None,
            hint_pair: None,
            path: Vec::new(),
            match_pending: false,
            cleared: false,
            failed: None,
            notice: None,
            reshuffles: 0,
            best: None,
            can_advance: false,
            seed: 0,
        }
    }
}
