//! Match rules - which two tiles count as a pair
//!
//! Ordinary levels match identical symbols. The tagged level matches the two
//! halves of a pair: equal base, different suffix.

use crate::types::{Tile, TAGGED_LEVEL};

/// Pairing rule in effect for a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchRule {
    /// Symbols are equal.
    #[default]
    Identity,
    /// Same pair base, different suffix.
    PairedTag,
}

/// Grouping key used by deadlock detection.
///
/// Tiles that can possibly match share a key; matching inside a group is still
/// decided by [`MatchRule::matches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Symbol(u16),
    Base(u16),
}

impl MatchRule {
    /// Rule for a level number.
    pub fn for_level(level: u32) -> Self {
        if level == TAGGED_LEVEL {
            MatchRule::PairedTag
        } else {
            MatchRule::Identity
        }
    }

    /// Whether the rule lets tiles fall after a removal.
    pub fn compacts(&self) -> bool {
        matches!(self, MatchRule::Identity)
    }

    /// Do `a` and `b` form a pair? Empty tiles never match.
    pub fn matches(&self, a: Tile, b: Tile) -> bool {
        if a.is_empty() || b.is_empty() {
            return false;
        }
        match self {
            MatchRule::Identity => a == b,
            MatchRule::PairedTag => match (a.pair_base(), b.pair_base()) {
                (Some(base_a), Some(base_b)) => base_a == base_b && a.suffix() != b.suffix(),
                _ => false,
            },
        }
    }

    /// Group of a tile, or `None` for tiles that can never match under this rule.
    pub fn group_key(&self, tile: Tile) -> Option<GroupKey> {
        if tile.is_empty() {
            return None;
        }
        match self {
            MatchRule::Identity => Some(GroupKey::Symbol(tile.raw())),
            MatchRule::PairedTag => tile.pair_base().map(GroupKey::Base),
        }
    }

    /// Match two tiles by their textual names.
    ///
    /// Names that do not parse never match.
    ///
    /// ```
    /// use tui_link_core::MatchRule;
    ///
    /// assert!(MatchRule::PairedTag.matches_names("pair007_1", "pair007_2"));
    /// assert!(!MatchRule::PairedTag.matches_names("pair007_1", "pair009_1"));
    /// assert!(!MatchRule::PairedTag.matches_names("tile_007", "tile_007"));
    /// assert!(MatchRule::Identity.matches_names("tile_007", "tile_007"));
    /// ```
    pub fn matches_names(&self, a: &str, b: &str) -> bool {
        match (Tile::from_name(a), Tile::from_name(b)) {
            (Some(a), Some(b)) => self.matches(a, b),
            _ => false,
        }
    }
}
