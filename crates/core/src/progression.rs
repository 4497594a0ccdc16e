//! Progression module - per-level timing, hints, compaction and naming
//!
//! Pure functions over level numbers and modes. The session calls these at
//! level setup and on every match; nothing here holds state.

use crate::types::{
    FallStyle, Mode, BASE_TIME_MAX_SECS, BASE_TIME_MIN_SECS, BASE_TIME_STEP_SECS,
    HARD_HINT_BONUS, MATCH_BONUS_SECS, MATCH_SCORE, STARTING_HINTS, TAGGED_LEVEL,
};

/// Seconds on the clock at the start of `level`.
///
/// `max(30, 120 - (level - 1) * 5)`.
pub fn base_time_for_level(level: u32) -> u32 {
    let lost = level.saturating_sub(1).saturating_mul(BASE_TIME_STEP_SECS);
    BASE_TIME_MAX_SECS
        .saturating_sub(lost)
        .max(BASE_TIME_MIN_SECS)
}

/// Remaining time after a successful match, capped at the base time.
pub fn time_after_match(remaining: u32, base: u32) -> u32 {
    remaining.saturating_add(MATCH_BONUS_SECS).min(base)
}

/// Score after a successful match.
pub fn score_after_match(score: u32) -> u32 {
    score.saturating_add(MATCH_SCORE)
}

/// Score after clearing a level with `remaining` seconds left.
pub fn score_after_clear(score: u32, remaining: u32) -> u32 {
    score.saturating_add(remaining)
}

/// Compaction style of a fixed (non-endless) level.
pub fn fall_style_for_level(level: u32) -> FallStyle {
    match level {
        3 => FallStyle::Down,
        4 => FallStyle::Up,
        5 => FallStyle::Left,
        6 => FallStyle::Right,
        7 => FallStyle::SplitLeftRight,
        8 => FallStyle::SplitUpDown,
        _ => FallStyle::None,
    }
}

/// Whether removals on `level` are followed by compaction.
pub fn level_compacts(level: u32) -> bool {
    level != TAGGED_LEVEL
}

/// Hint budget after advancing from a level with `current` hints left.
pub fn hints_after_advance(mode: Mode, current: u32) -> u32 {
    match mode {
        Mode::ClassicHard => current.saturating_add(HARD_HINT_BONUS),
        Mode::ClassicEasy | Mode::Practice { .. } | Mode::Endless => STARTING_HINTS,
    }
}

/// Hint budget at level setup. Classic-hard carries its budget over.
pub fn hints_at_setup(mode: Mode, current: u32) -> u32 {
    match mode {
        Mode::ClassicHard => current,
        Mode::ClassicEasy | Mode::Practice { .. } | Mode::Endless => STARTING_HINTS,
    }
}

/// Whether the mode may move past `level`.
pub fn can_advance(mode: Mode, level: u32) -> bool {
    match mode.level_cap() {
        Some(cap) => level < cap,
        None => true,
    }
}

/// Display name of a classic level.
pub fn level_name(level: u32) -> &'static str {
    match level {
        1 => "First Steps",
        2 => "Getting There",
        3 => "Gravity",
        4 => "Castle in the Sky",
        5 => "Heart's Desire",
        6 => "Right-Hand Rule",
        7 => "Left Meets Right",
        8 => "Like Poles Repel",
        9 => "Ultimate",
        10 => "Challenge",
        _ => "Complete",
    }
}

/// Name shown for the current level: endless names its compaction style.
pub fn display_name(mode: Mode, level: u32, style: FallStyle) -> &'static str {
    match mode {
        Mode::Endless => style.title(),
        Mode::ClassicEasy | Mode::ClassicHard | Mode::Practice { .. } => level_name(level),
    }
}

/// Label of the "continue" prompt shown after a clear.
pub fn continue_label(mode: Mode, level: u32) -> &'static str {
    match mode {
        Mode::Practice { .. } => "Practice complete! Replay this level",
        Mode::ClassicEasy | Mode::ClassicHard if !can_advance(mode, level) => {
            "Campaign complete!"
        }
        Mode::ClassicEasy | Mode::ClassicHard | Mode::Endless => "Level clear! Next level",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_time_table() {
        assert_eq!(base_time_for_level(1), 120);
        assert_eq!(base_time_for_level(2), 115);
        assert_eq!(base_time_for_level(10), 75);
        assert_eq!(base_time_for_level(19), 30);
        assert_eq!(base_time_for_level(20), 30);
        assert_eq!(base_time_for_level(500), 30);
        // Level 0 is treated like level 1.
        assert_eq!(base_time_for_level(0), 120);
    }

    #[test]
    fn test_match_rewards() {
        assert_eq!(time_after_match(50, 120), 53);
        assert_eq!(time_after_match(119, 120), 120);
        assert_eq!(score_after_match(40), 50);
        assert_eq!(score_after_clear(560, 42), 602);
    }

    #[test]
    fn test_fall_styles() {
        assert_eq!(fall_style_for_level(1), FallStyle::None);
        assert_eq!(fall_style_for_level(2), FallStyle::None);
        assert_eq!(fall_style_for_level(3), FallStyle::Down);
        assert_eq!(fall_style_for_level(7), FallStyle::SplitLeftRight);
        assert_eq!(fall_style_for_level(8), FallStyle::SplitUpDown);
        assert_eq!(fall_style_for_level(9), FallStyle::None);
        assert_eq!(fall_style_for_level(10), FallStyle::None);
        assert!(!level_compacts(9));
        assert!(level_compacts(3));
    }

    #[test]
    fn test_hint_policy() {
        assert_eq!(hints_after_advance(Mode::ClassicHard, 1), 3);
        assert_eq!(hints_after_advance(Mode::ClassicHard, 0), 2);
        assert_eq!(hints_after_advance(Mode::ClassicEasy, 0), 3);
        assert_eq!(hints_after_advance(Mode::Endless, 7), 3);
        assert_eq!(hints_at_setup(Mode::ClassicHard, 0), 0);
        assert_eq!(hints_at_setup(Mode::Practice { start_level: 4 }, 0), 3);
    }

    #[test]
    fn test_level_cap() {
        assert!(can_advance(Mode::ClassicEasy, 9));
        assert!(!can_advance(Mode::ClassicEasy, 10));
        assert!(!can_advance(Mode::ClassicHard, 11));
        assert!(can_advance(Mode::Endless, 10_000));
        assert!(can_advance(Mode::Practice { start_level: 10 }, 10));
    }

    #[test]
    fn test_names() {
        assert_eq!(level_name(9), "Ultimate");
        assert_eq!(level_name(11), "Complete");
        assert_eq!(display_name(Mode::Endless, 4, FallStyle::Center), "Ultimate");
        assert_eq!(display_name(Mode::ClassicEasy, 3, FallStyle::Center), "Gravity");
        assert_eq!(continue_label(Mode::ClassicEasy, 10), "Campaign complete!");
        assert_eq!(continue_label(Mode::ClassicEasy, 3), "Level clear! Next level");
    }
}
