//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the rules engine, the schedulers and the terminal front end alike.
//!
//! # Board Dimensions
//!
//! - **Rows**: 7 playable rows (padded rows `0` and `8` form the border corridor)
//! - **Columns**: 16 playable columns (padded columns `0` and `17`)
//! - **Pairs**: 56 per level
//!
//! # Timing and Progression Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 1000 | Timer tick interval |
//! | `MATCH_REVEAL_MS` | 250 | Path display delay before a match is committed |
//! | `BASE_TIME_MAX_SECS` | 120 | Base time at level 1 |
//! | `BASE_TIME_STEP_SECS` | 5 | Base time lost per level |
//! | `BASE_TIME_MIN_SECS` | 30 | Base time floor |
//! | `MATCH_BONUS_SECS` | 3 | Time refunded per match (capped at base time) |
//! | `MATCH_SCORE` | 10 | Points per match |
//! | `STARTING_HINTS` | 3 | Hint budget at the start of a level |
//! | `HARD_HINT_BONUS` | 2 | Hints gained per advance in classic-hard |
//! | `CLASSIC_LEVEL_CAP` | 10 | Last classic level |
//! | `TAGGED_LEVEL` | 9 | Tagged-pair level (no compaction) |
//!
//! # Examples
//!
//! ```
//! use tui_link_types::{Direction, Mode, Pos, Tile};
//!
//! let tile = Tile::from_name("pair007_1").unwrap();
//! assert_eq!(tile.pair_base(), Some(7));
//! assert_eq!(tile.suffix(), Some(1));
//! assert_eq!(tile.to_string(), "pair007_1");
//!
//! let plain = Tile::plain(12).unwrap();
//! assert_eq!(plain.to_string(), "tile_012");
//!
//! assert_eq!(Pos::new(1, 1).step(Direction::Up), Some(Pos::new(0, 1)));
//! assert_eq!(Mode::from_str("practice:4"), Some(Mode::Practice { start_level: 4 }));
//! ```

use std::fmt;

/// Playable rows on a standard board.
pub const BOARD_ROWS: u8 = 7;

/// Playable columns on a standard board.
pub const BOARD_COLS: u8 = 16;

/// Timer tick interval in milliseconds (one second).
pub const TICK_MS: u32 = 1000;

/// Delay between revealing a connecting path and committing the removal.
pub const MATCH_REVEAL_MS: u32 = 250;

/// Base time of level 1, in seconds.
pub const BASE_TIME_MAX_SECS: u32 = 120;

/// Base time lost per level, in seconds.
pub const BASE_TIME_STEP_SECS: u32 = 5;

/// Base time floor, in seconds.
pub const BASE_TIME_MIN_SECS: u32 = 30;

/// Seconds refunded for each successful match.
pub const MATCH_BONUS_SECS: u32 = 3;

/// Points awarded for each successful match.
pub const MATCH_SCORE: u32 = 10;

/// Hint budget at the start of a level.
pub const STARTING_HINTS: u32 = 3;

/// Hints gained when classic-hard advances a level.
pub const HARD_HINT_BONUS: u32 = 2;

/// Highest level of the classic campaigns.
pub const CLASSIC_LEVEL_CAP: u32 = 10;

/// Level played with tagged pairs and without compaction.
pub const TAGGED_LEVEL: u32 = 9;

/// Level whose layout seeds adjacent pairs.
pub const CLUSTER_LEVEL: u32 = 1;

/// Share of pairs (in percent) the cluster layout tries to place adjacently.
pub const CLUSTER_PERCENT: u32 = 35;

/// Number of plain symbols in the catalogue.
pub const SYMBOL_CATALOGUE_SIZE: u16 = 35;

/// Number of distinct tagged pair bases.
pub const PAIR_BASE_COUNT: u16 = 32;

/// Permutations tried by a reshuffle before giving up.
pub const SHUFFLE_ATTEMPTS: u32 = 200;

/// Direction changes allowed along a connecting path.
pub const MAX_TURNS: u8 = 2;

/// Persistence key of the best endless level.
pub const BEST_LEVEL_KEY: &str = "EndlessBestLevelKey";

/// Persistence key of the best endless score.
pub const BEST_SCORE_KEY: &str = "EndlessBestScoreKey";

/// A cell address on the padded grid.
///
/// Row `0`, row `rows + 1`, column `0` and column `cols + 1` form the border
/// corridor. Playable cells are `1..=rows` x `1..=cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// The neighbouring address in `dir`, or `None` when it would underflow.
    ///
    /// Upper bounds depend on the board and are checked there.
    pub fn step(self, dir: Direction) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Pos { row, col })
    }

    /// True when `other` is one of the four orthogonal neighbours.
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Search headings, enumerated in the fixed order up, right, down, left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All headings in enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Row/column delta of one step.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Position in [`Direction::ALL`].
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }
}

/// A board cell value: empty, a plain symbol, or a tagged pair half.
///
/// Encoded in 16 bits so a board is a dense array with an explicit empty
/// sentinel:
///
/// - `0`: empty
/// - `1..=0x7FFF`: plain symbol id
/// - `0x8000 | base << 1 | (suffix - 1)`: tagged symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tile(u16);

const TAGGED_BIT: u16 = 0x8000;
const MAX_PAIR_BASE: u16 = 0x3FFF;

impl Tile {
    /// The empty cell.
    pub const EMPTY: Tile = Tile(0);

    /// A plain symbol. Ids start at 1.
    pub fn plain(id: u16) -> Option<Self> {
        if id == 0 || id & TAGGED_BIT != 0 {
            return None;
        }
        Some(Tile(id))
    }

    /// A tagged pair half. `suffix` must be 1 or 2.
    pub fn tagged(base: u16, suffix: u8) -> Option<Self> {
        if base > MAX_PAIR_BASE || !(1..=2).contains(&suffix) {
            return None;
        }
        Some(Tile(TAGGED_BIT | (base << 1) | (suffix as u16 - 1)))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_tagged(self) -> bool {
        self.0 & TAGGED_BIT != 0
    }

    /// Plain symbol id, if this is a plain tile.
    pub fn plain_id(self) -> Option<u16> {
        if self.is_empty() || self.is_tagged() {
            None
        } else {
            Some(self.0)
        }
    }

    /// Pair base of a tagged tile.
    pub fn pair_base(self) -> Option<u16> {
        self.is_tagged().then(|| (self.0 & !TAGGED_BIT) >> 1)
    }

    /// Suffix (1 or 2) of a tagged tile.
    pub fn suffix(self) -> Option<u8> {
        self.is_tagged().then(|| (self.0 & 1) as u8 + 1)
    }

    /// Raw 16-bit encoding.
    pub fn raw(self) -> u16 {
        self.0
    }

    /// Parse a canonical tile name.
    ///
    /// Accepts `tile_NNN` for plain symbols and `pairNNN_S` for tagged halves.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_link_types::Tile;
    ///
    /// assert_eq!(Tile::from_name("tile_003"), Tile::plain(3));
    /// assert_eq!(Tile::from_name("pair012_2"), Tile::tagged(12, 2));
    /// assert_eq!(Tile::from_name("pair012_3"), None);
    /// assert_eq!(Tile::from_name("banana"), None);
    /// ```
    pub fn from_name(s: &str) -> Option<Self> {
        if let Some(id) = s.strip_prefix("tile_") {
            return Tile::plain(id.parse().ok()?);
        }
        let rest = s.strip_prefix("pair")?;
        let (base, suffix) = rest.rsplit_once('_')?;
        if base.is_empty() || !base.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Tile::tagged(base.parse().ok()?, suffix.parse().ok()?)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(base), Some(suffix)) = (self.pair_base(), self.suffix()) {
            write!(f, "pair{:03}_{}", base, suffix)
        } else if let Some(id) = self.plain_id() {
            write!(f, "tile_{:03}", id)
        } else {
            f.write_str(".")
        }
    }
}

/// Game modes.
///
/// - **ClassicEasy**: levels 1..=10, hints reset to 3 every level
/// - **ClassicHard**: levels 1..=10, hints carry over (+2 per level) and pay for
///   automatic reshuffles; a deadlock with no hints fails the level
/// - **Practice**: replay a chosen level
/// - **Endless**: unbounded levels, random compaction, no pause, best record kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    ClassicEasy,
    ClassicHard,
    Practice { start_level: u32 },
    Endless,
}

impl Mode {
    /// First level played by the mode.
    pub fn starting_level(&self) -> u32 {
        match self {
            Mode::Practice { start_level } => (*start_level).max(1),
            Mode::ClassicEasy | Mode::ClassicHard | Mode::Endless => 1,
        }
    }

    /// Whether the player may pause.
    pub fn pause_allowed(&self) -> bool {
        !matches!(self, Mode::Endless)
    }

    /// Last level of the progression, if bounded.
    pub fn level_cap(&self) -> Option<u32> {
        match self {
            Mode::ClassicEasy | Mode::ClassicHard => Some(CLASSIC_LEVEL_CAP),
            Mode::Practice { .. } | Mode::Endless => None,
        }
    }

    /// Parse a mode from its command-line spelling.
    ///
    /// `easy`, `hard`, `endless`, `practice:N`.
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "easy" | "classic-easy" => Some(Mode::ClassicEasy),
            "hard" | "classic-hard" => Some(Mode::ClassicHard),
            "endless" => Some(Mode::Endless),
            other => {
                let level = other.strip_prefix("practice:")?.parse::<u32>().ok()?;
                (level >= 1).then_some(Mode::Practice { start_level: level })
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::ClassicEasy => "classic-easy",
            Mode::ClassicHard => "classic-hard",
            Mode::Practice { .. } => "practice",
            Mode::Endless => "endless",
        }
    }
}

/// Compaction styles applied after a pair is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FallStyle {
    #[default]
    None,
    Down,
    Up,
    Left,
    Right,
    SplitLeftRight,
    SplitUpDown,
    Center,
}

impl FallStyle {
    /// All styles, in the order endless mode draws from.
    pub const ALL: [FallStyle; 8] = [
        FallStyle::None,
        FallStyle::Down,
        FallStyle::Up,
        FallStyle::Left,
        FallStyle::Right,
        FallStyle::SplitLeftRight,
        FallStyle::SplitUpDown,
        FallStyle::Center,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FallStyle::None => "none",
            FallStyle::Down => "down",
            FallStyle::Up => "up",
            FallStyle::Left => "left",
            FallStyle::Right => "right",
            FallStyle::SplitLeftRight => "split-left-right",
            FallStyle::SplitUpDown => "split-up-down",
            FallStyle::Center => "center",
        }
    }

    /// Title shown in endless mode, shared with the matching classic level.
    pub fn title(&self) -> &'static str {
        match self {
            FallStyle::None => "First Steps",
            FallStyle::Down => "Gravity",
            FallStyle::Up => "Castle in the Sky",
            FallStyle::Left => "Heart's Desire",
            FallStyle::Right => "Right-Hand Rule",
            FallStyle::SplitLeftRight => "Left Meets Right",
            FallStyle::SplitUpDown => "Like Poles Repel",
            FallStyle::Center => "Ultimate",
        }
    }
}

/// Commands that drive a session, from human input or a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Tap a padded-grid cell
    Tap { row: u8, col: u8 },
    /// Commit a revealed match
    CommitMatch,
    /// One-second timer tick
    Tick,
    /// Spend a hint
    Hint,
    /// Toggle pause (ignored where pausing is not allowed)
    TogglePause,
    /// Restart the mode from its first level
    Restart,
    /// Advance to the next level
    NextLevel,
    /// Continue after a cleared level (practice replays, others advance)
    Continue,
}

/// Result of a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Nothing changed (empty cell, paused, out of time, terminal, busy)
    Ignored,
    /// The cell became the first selection
    Selected,
    /// The first selection was tapped again and released
    Deselected,
    /// No match or no path: the tapped cell became the new selection
    Reselected,
    /// A path was found; the pair is removed on `commit_match`
    MatchPending,
}

/// Audio/feedback cues. Fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Select,
    Deselect,
    Mismatch,
    Match,
}

/// User-visible advisories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoHintAvailable,
    DeadlockNoHints,
}

impl Notice {
    pub fn text(&self) -> &'static str {
        match self {
            Notice::NoHintAvailable => "No connectable pair right now.",
            Notice::DeadlockNoHints => "No moves left and no hints to reshuffle. Game over.",
        }
    }
}

/// Why a level failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    TimeUp,
    Deadlock,
}

/// Session-side events, drained by observers after each batch of mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LevelStarted { level: u32 },
    Selected(Pos),
    Deselected(Pos),
    Mismatch(Pos),
    MatchRevealed { from: Pos, to: Pos },
    MatchCommitted { from: Pos, to: Pos },
    HintShown { first: Pos, second: Pos },
    Reshuffled { hint_spent: bool },
    LevelCleared { level: u32, score: u32 },
    LevelFailed { level: u32, reason: FailReason },
    BestRecordUpdated { level: u32, score: u32 },
}

impl SessionEvent {
    /// Feedback cue associated with the event, if any.
    pub fn cue(&self) -> Option<Cue> {
        match self {
            SessionEvent::Selected(_) => Some(Cue::Select),
            SessionEvent::Deselected(_) => Some(Cue::Deselect),
            SessionEvent::Mismatch(_) => Some(Cue::Mismatch),
            SessionEvent::MatchCommitted { .. } => Some(Cue::Match),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progression_defaults() {
        assert_eq!(BOARD_ROWS as u32 * BOARD_COLS as u32 / 2, 56);
        assert_eq!(TICK_MS, 1000);
        assert_eq!(MATCH_REVEAL_MS, 250);
        assert_eq!(STARTING_HINTS, 3);
        assert_eq!(HARD_HINT_BONUS, 2);
        assert_eq!(TAGGED_LEVEL, 9);
        assert_eq!(SHUFFLE_ATTEMPTS, 200);
    }

    #[test]
    fn tile_encoding_keeps_kinds_apart() {
        let plain = Tile::plain(7).unwrap();
        let tagged = Tile::tagged(7, 1).unwrap();
        assert_ne!(plain, tagged);
        assert!(!plain.is_tagged());
        assert!(tagged.is_tagged());
        assert_eq!(plain.pair_base(), None);
        assert_eq!(tagged.plain_id(), None);
        assert_eq!(Tile::EMPTY.plain_id(), None);
        assert!(Tile::EMPTY.is_empty());
        assert_eq!(Tile::plain(0), None);
        assert_eq!(Tile::tagged(1, 0), None);
    }

    #[test]
    fn tile_names_round_trip() {
        for name in ["tile_001", "tile_035", "pair001_1", "pair032_2"] {
            let tile = Tile::from_name(name).unwrap();
            assert_eq!(tile.to_string(), name);
        }
        assert_eq!(Tile::from_name("pair_1"), None);
        assert_eq!(Tile::from_name("pairx7_1"), None);
    }

    #[test]
    fn pos_step_stops_at_zero() {
        assert_eq!(Pos::new(0, 3).step(Direction::Up), None);
        assert_eq!(Pos::new(3, 0).step(Direction::Left), None);
        assert_eq!(Pos::new(3, 3).step(Direction::Down), Some(Pos::new(4, 3)));
        assert!(Pos::new(3, 3).is_adjacent(Pos::new(3, 4)));
        assert!(!Pos::new(3, 3).is_adjacent(Pos::new(4, 4)));
    }

    #[test]
    fn mode_rules() {
        assert!(!Mode::Endless.pause_allowed());
        assert!(Mode::ClassicHard.pause_allowed());
        assert_eq!(Mode::ClassicEasy.level_cap(), Some(10));
        assert_eq!(Mode::Endless.level_cap(), None);
        assert_eq!(Mode::Practice { start_level: 0 }.starting_level(), 1);
        assert_eq!(Mode::from_str("practice:0"), None);
        assert_eq!(Mode::from_str("HARD"), Some(Mode::ClassicHard));
    }

    #[test]
    fn event_cues() {
        let p = Pos::new(1, 1);
        assert_eq!(SessionEvent::Selected(p).cue(), Some(Cue::Select));
        assert_eq!(
            SessionEvent::MatchCommitted { from: p, to: p }.cue(),
            Some(Cue::Match)
        );
        assert_eq!(SessionEvent::MatchRevealed { from: p, to: p }.cue(), None);
    }
}
