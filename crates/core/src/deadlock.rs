//! Deadlock detection and reshuffling
//!
//! A board is deadlocked when no two tiles of the same match group can be
//! connected. Detection is exhaustive: occupied cells are grouped by
//! [`MatchRule::group_key`] and every pair inside a group is tried with the
//! path finder. Reshuffling permutes tile values over the occupied positions
//! (positions never move) until a playable arrangement turns up.

use std::collections::BTreeMap;

use tracing::debug;

use crate::board::Board;
use crate::path::{can_connect_with, PathScratch};
use crate::rng::SimpleRng;
use crate::rules::MatchRule;
use crate::types::{Pos, Tile, SHUFFLE_ATTEMPTS};

/// Result of a reshuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleOutcome {
    /// A playable permutation was found on this attempt (1-based).
    Playable { attempts: u32 },
    /// The last permutation was kept without a move check succeeding.
    Forced,
    /// Fewer than two tiles; nothing to permute.
    Unchanged,
}

impl ShuffleOutcome {
    pub fn is_playable(&self) -> bool {
        matches!(self, ShuffleOutcome::Playable { .. })
    }
}

/// Finds moves and resolves deadlocks.
#[derive(Debug, Clone, Copy)]
pub struct DeadlockResolver {
    max_attempts: u32,
}

impl Default for DeadlockResolver {
    fn default() -> Self {
        Self {
            max_attempts: SHUFFLE_ATTEMPTS,
        }
    }
}

impl DeadlockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the attempt budget (at least one).
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// First connectable pair, scanning groups in key order and cells in
    /// reading order.
    pub fn find_connectable_pair(&self, board: &Board, rule: MatchRule) -> Option<(Pos, Pos)> {
        let mut groups: BTreeMap<_, Vec<(Pos, Tile)>> = BTreeMap::new();
        for (pos, tile) in board.occupied() {
            if let Some(key) = rule.group_key(tile) {
                groups.entry(key).or_default().push((pos, tile));
            }
        }

        let mut scratch = PathScratch::new();
        for cells in groups.values() {
            for (i, &(a, ta)) in cells.iter().enumerate() {
                for &(b, tb) in &cells[i + 1..] {
                    if rule.matches(ta, tb) && can_connect_with(&mut scratch, board, a, b) {
                        return Some((a, b));
                    }
                }
            }
        }
        None
    }

    /// True when at least one legal move exists.
    pub fn any_move_exists(&self, board: &Board, rule: MatchRule) -> bool {
        self.find_connectable_pair(board, rule).is_some()
    }

    /// Permute tile values until a move exists.
    ///
    /// Tries up to `max_attempts` uniform permutations and keeps the first
    /// playable one. The final attempt is kept unconditionally. With `force`
    /// the first permutation is kept without checking for a move. Boards with
    /// fewer than two tiles are left alone.
    pub fn shuffle_until_playable(
        &self,
        board: &mut Board,
        rule: MatchRule,
        rng: &mut SimpleRng,
        force: bool,
    ) -> ShuffleOutcome {
        let (positions, mut values): (Vec<Pos>, Vec<Tile>) = board.occupied().unzip();
        if positions.len() < 2 {
            return ShuffleOutcome::Unchanged;
        }

        for attempt in 1..=self.max_attempts {
            rng.shuffle(&mut values);
            for (pos, tile) in positions.iter().zip(&values) {
                board.set(*pos, *tile);
            }
            if force {
                break;
            }
            if self.any_move_exists(board, rule) {
                debug!(attempt, tiles = positions.len(), "reshuffle found a move");
                return ShuffleOutcome::Playable { attempts: attempt };
            }
        }

        debug!(force, attempts = self.max_attempts, "reshuffle kept last permutation");
        ShuffleOutcome::Forced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Diagonal twins on a 2x2 board need three bends to meet.
    const LOCKED: &str = "tile_001 tile_002
                          tile_002 tile_001";

    #[test]
    fn detects_single_connectable_pair() {
        let board = Board::parse(
            "tile_001 tile_002 tile_003 tile_001
             tile_004 tile_005 tile_006 tile_007",
        )
        .unwrap();
        let found = DeadlockResolver::new().find_connectable_pair(&board, MatchRule::Identity);
        assert_eq!(found, Some((Pos::new(1, 1), Pos::new(1, 4))));
    }

    #[test]
    fn diagonal_twins_are_deadlocked() {
        let board = Board::parse(LOCKED).unwrap();
        assert!(!DeadlockResolver::new().any_move_exists(&board, MatchRule::Identity));
    }

    #[test]
    fn detects_deadlock() {
        // tile_001 twins sit in the middle of a 4x4 wall of unique symbols.
        let board = Board::parse(
            "tile_002 tile_003 tile_004 tile_005
             tile_006 tile_001 tile_007 tile_008
             tile_009 tile_010 tile_001 tile_011
             tile_012 tile_013 tile_014 tile_015",
        )
        .unwrap();
        let resolver = DeadlockResolver::new();
        assert_eq!(resolver.find_connectable_pair(&board, MatchRule::Identity), None);
        assert!(!resolver.any_move_exists(&board, MatchRule::Identity));
    }

    #[test]
    fn paired_tag_rule_needs_complementary_halves() {
        let board = Board::parse("pair007_1 pair007_1 pair009_2 pair009_1").unwrap();
        let resolver = DeadlockResolver::new();
        assert_eq!(
            resolver.find_connectable_pair(&board, MatchRule::PairedTag),
            Some((Pos::new(1, 3), Pos::new(1, 4)))
        );

        let stuck = Board::parse("pair007_1 pair007_1").unwrap();
        assert!(!resolver.any_move_exists(&stuck, MatchRule::PairedTag));
    }

    #[test]
    fn shuffle_preserves_positions_and_values() {
        let mut board = Board::parse(
            "tile_001 .        tile_002 tile_003
             tile_003 tile_001 .        tile_002",
        )
        .unwrap();
        let mut before: Vec<Tile> = board.occupied().map(|(_, t)| t).collect();
        let cells: Vec<Pos> = board.occupied().map(|(p, _)| p).collect();

        let mut rng = SimpleRng::new(5);
        let outcome =
            DeadlockResolver::new().shuffle_until_playable(&mut board, MatchRule::Identity, &mut rng, false);
        assert!(outcome.is_playable());

        let mut after: Vec<Tile> = board.occupied().map(|(_, t)| t).collect();
        assert_eq!(board.occupied().map(|(p, _)| p).collect::<Vec<_>>(), cells);
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert!(DeadlockResolver::new().any_move_exists(&board, MatchRule::Identity));
    }

    #[test]
    fn unsolvable_shuffle_keeps_last_permutation() {
        // pair007_1 has no mate, and the pair008_1 twins never match each other.
        let original = Board::parse("pair007_1 . pair008_1 pair008_1").unwrap();
        let resolver = DeadlockResolver::with_max_attempts(3);

        let mut board = original.clone();
        let mut rng = SimpleRng::new(1);
        let outcome = resolver.shuffle_until_playable(&mut board, MatchRule::PairedTag, &mut rng, false);
        assert_eq!(outcome, ShuffleOutcome::Forced);

        // Replaying the same three shuffles gives the arrangement left on the board.
        let (positions, mut values): (Vec<Pos>, Vec<Tile>) = original.occupied().unzip();
        let mut replay = SimpleRng::new(1);
        for _ in 0..3 {
            replay.shuffle(&mut values);
        }
        for (pos, tile) in positions.iter().zip(&values) {
            assert_eq!(board.get(*pos), Some(*tile));
        }
    }

    #[test]
    fn forced_shuffle_skips_the_move_check() {
        let original = Board::parse("tile_001 tile_001 tile_002 tile_002").unwrap();
        let resolver = DeadlockResolver::new();

        let mut board = original.clone();
        let mut rng = SimpleRng::new(9);
        let outcome = resolver.shuffle_until_playable(&mut board, MatchRule::Identity, &mut rng, true);
        assert_eq!(outcome, ShuffleOutcome::Forced);

        let (positions, mut values): (Vec<Pos>, Vec<Tile>) = original.occupied().unzip();
        SimpleRng::new(9).shuffle(&mut values);
        for (pos, tile) in positions.iter().zip(&values) {
            assert_eq!(board.get(*pos), Some(*tile));
        }
    }

    #[test]
    fn tiny_boards_are_left_alone() {
        let mut board = Board::parse("tile_001 .").unwrap();
        let outcome = DeadlockResolver::new().shuffle_until_playable(
            &mut board,
            MatchRule::Identity,
            &mut SimpleRng::new(1),
            true,
        );
        assert_eq!(outcome, ShuffleOutcome::Unchanged);
    }
}
