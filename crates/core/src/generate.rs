//! Board generator - fills a board with balanced pairs for a level
//!
//! Three layouts exist:
//!
//! - **Shuffled**: symbols drawn round-robin from the catalogue, two per pair,
//!   shuffled and placed in reading order.
//! - **Cluster** (first level): the same pool, but a share of pairs is first
//!   placed on random adjacent slots so the opening board is gentler.
//! - **Tagged** (tagged level): each pair is `pairNNN_1` + `pairNNN_2` with
//!   bases drawn without replacement while they last.
//!
//! The layout depends on the level only; modes share layouts.

use tracing::debug;

use crate::board::Board;
use crate::rng::SimpleRng;
use crate::types::{
    Pos, Tile, CLUSTER_LEVEL, CLUSTER_PERCENT, PAIR_BASE_COUNT, SYMBOL_CATALOGUE_SIZE,
    TAGGED_LEVEL,
};

/// How a level's board is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Shuffled,
    Cluster,
    Tagged,
}

impl Layout {
    pub fn for_level(level: u32) -> Self {
        match level {
            TAGGED_LEVEL => Layout::Tagged,
            CLUSTER_LEVEL => Layout::Cluster,
            _ => Layout::Shuffled,
        }
    }
}

/// Produces filled boards.
#[derive(Debug, Clone, Copy)]
pub struct BoardGenerator {
    symbols: u16,
    pair_bases: u16,
    cluster_percent: u32,
}

impl Default for BoardGenerator {
    fn default() -> Self {
        Self {
            symbols: SYMBOL_CATALOGUE_SIZE,
            pair_bases: PAIR_BASE_COUNT,
            cluster_percent: CLUSTER_PERCENT,
        }
    }
}

impl BoardGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the plain catalogue to `symbols` entries (at least one).
    pub fn with_symbols(mut self, symbols: u16) -> Self {
        self.symbols = symbols.max(1);
        self
    }

    /// Restrict the tagged catalogue to `bases` entries (at least one).
    pub fn with_pair_bases(mut self, bases: u16) -> Self {
        self.pair_bases = bases.max(1);
        self
    }

    /// A freshly filled standard board for `level`.
    pub fn generate(&self, level: u32, rng: &mut SimpleRng) -> Board {
        let mut board = Board::new();
        self.fill(&mut board, level, rng);
        board
    }

    /// Clear `board` and fill every playable cell.
    pub fn fill(&self, board: &mut Board, level: u32, rng: &mut SimpleRng) {
        board.clear();
        let layout = Layout::for_level(level);
        match layout {
            Layout::Shuffled => self.fill_shuffled(board, rng),
            Layout::Cluster => self.fill_clustered(board, rng),
            Layout::Tagged => self.fill_tagged(board, rng),
        }
        debug!(
            level,
            ?layout,
            tiles = board.occupied_count(),
            "board generated"
        );
    }

    /// Two of each symbol per pair slot, round-robin over the catalogue, shuffled.
    fn plain_pool(&self, pairs: usize, rng: &mut SimpleRng) -> Vec<Tile> {
        let mut pool = Vec::with_capacity(pairs * 2);
        for i in 0..pairs {
            let id = (i % self.symbols as usize) as u16 + 1;
            if let Some(tile) = Tile::plain(id) {
                pool.push(tile);
                pool.push(tile);
            }
        }
        rng.shuffle(&mut pool);
        pool
    }

    fn fill_shuffled(&self, board: &mut Board, rng: &mut SimpleRng) {
        let pool = self.plain_pool(board.area() / 2, rng);
        place_in_reading_order(board, &pool);
    }

    fn fill_clustered(&self, board: &mut Board, rng: &mut SimpleRng) {
        let pairs = board.area() / 2;
        let mut pool = self.plain_pool(pairs, rng);
        let target = pairs * self.cluster_percent as usize / 100;

        let mut slots = adjacent_slots(board);
        rng.shuffle(&mut slots);

        let mut placed = 0;
        for (a, b) in slots {
            if placed >= target {
                break;
            }
            if board.is_occupied(a) || board.is_occupied(b) {
                continue;
            }
            let Some(tile) = pop_pair(&mut pool) else {
                break;
            };
            board.set(a, tile);
            board.set(b, tile);
            placed += 1;
        }

        let mut free: Vec<Pos> = board.interior().filter(|p| board.is_empty(*p)).collect();
        rng.shuffle(&mut free);
        for (pos, tile) in free.into_iter().zip(pool) {
            board.set(pos, tile);
        }
        debug!(target, placed, "cluster pairs seeded");
    }

    fn fill_tagged(&self, board: &mut Board, rng: &mut SimpleRng) {
        let pairs = board.area() / 2;
        let catalogue: Vec<u16> = (1..=self.pair_bases).collect();

        let mut bases = catalogue.clone();
        rng.shuffle(&mut bases);
        if pairs <= bases.len() {
            bases.truncate(pairs);
        } else {
            while bases.len() < pairs {
                if let Some(base) = rng.choose(&catalogue) {
                    bases.push(*base);
                }
            }
        }

        let mut names = Vec::with_capacity(pairs * 2);
        for base in bases {
            if let (Some(first), Some(second)) = (Tile::tagged(base, 1), Tile::tagged(base, 2)) {
                names.push(first);
                names.push(second);
            }
        }
        rng.shuffle(&mut names);
        place_in_reading_order(board, &names);
    }
}

/// Every horizontal neighbour pair, then every vertical one.
fn adjacent_slots(board: &Board) -> Vec<(Pos, Pos)> {
    let (rows, cols) = (board.rows(), board.cols());
    let mut slots = Vec::new();
    for r in 1..=rows {
        for c in 1..cols {
            slots.push((Pos::new(r, c), Pos::new(r, c + 1)));
        }
    }
    for r in 1..rows {
        for c in 1..=cols {
            slots.push((Pos::new(r, c), Pos::new(r + 1, c)));
        }
    }
    slots
}

/// Take the pool's first tile and its first mate.
///
/// Without a mate the tile goes back to the front and `None` is returned.
fn pop_pair(pool: &mut Vec<Tile>) -> Option<Tile> {
    if pool.is_empty() {
        return None;
    }
    let tile = pool.remove(0);
    match pool.iter().position(|t| *t == tile) {
        Some(mate) => {
            pool.remove(mate);
            Some(tile)
        }
        None => {
            pool.insert(0, tile);
            None
        }
    }
}

fn place_in_reading_order(board: &mut Board, tiles: &[Tile]) {
    let cells: Vec<Pos> = board.interior().collect();
    for (pos, tile) in cells.into_iter().zip(tiles) {
        board.set(pos, *tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn counts(board: &Board) -> HashMap<Tile, usize> {
        let mut out = HashMap::new();
        for (_, tile) in board.occupied() {
            *out.entry(tile).or_insert(0) += 1;
        }
        out
    }

    #[test]
    fn layout_by_level() {
        assert_eq!(Layout::for_level(1), Layout::Cluster);
        assert_eq!(Layout::for_level(2), Layout::Shuffled);
        assert_eq!(Layout::for_level(9), Layout::Tagged);
        assert_eq!(Layout::for_level(15), Layout::Shuffled);
    }

    #[test]
    fn every_level_fills_the_board_with_pairs() {
        let gen = BoardGenerator::new();
        let mut rng = SimpleRng::new(42);
        for level in 1..=10 {
            let board = gen.generate(level, &mut rng);
            assert_eq!(board.occupied_count(), 112, "level {}", level);
            assert!(board.border_is_empty());
            assert!(counts(&board).values().all(|n| n % 2 == 0), "level {}", level);
        }
    }

    #[test]
    fn shuffled_pool_is_round_robin() {
        let board = BoardGenerator::new().generate(2, &mut SimpleRng::new(7));
        let counts = counts(&board);
        // 56 pairs over 35 symbols: 21 symbols appear twice as pairs.
        assert_eq!(counts.len(), 35);
        assert_eq!(counts.values().filter(|n| **n == 4).count(), 21);
        assert_eq!(counts.values().filter(|n| **n == 2).count(), 14);
    }

    #[test]
    fn cluster_layout_seeds_adjacent_pairs() {
        let board = BoardGenerator::new().generate(1, &mut SimpleRng::new(11));
        let adjacent = adjacent_slots(&board)
            .into_iter()
            .filter(|(a, b)| board.tile(*a) == board.tile(*b))
            .count();
        assert!(adjacent >= 56 * 35 / 100, "only {} adjacent pairs", adjacent);
    }

    #[test]
    fn tagged_layout_uses_distinct_bases_when_possible() {
        let board = BoardGenerator::new()
            .with_pair_bases(64)
            .generate(9, &mut SimpleRng::new(3));
        let counts = counts(&board);
        assert_eq!(counts.len(), 112);
        assert!(board.occupied().all(|(_, t)| t.is_tagged()));
    }

    #[test]
    fn tagged_layout_repeats_bases_when_short() {
        let board = BoardGenerator::new().generate(9, &mut SimpleRng::new(3));
        let mut halves: HashMap<(u16, u8), usize> = HashMap::new();
        for (_, tile) in board.occupied() {
            *halves
                .entry((tile.pair_base().unwrap(), tile.suffix().unwrap()))
                .or_insert(0) += 1;
        }
        // Every base contributes the same number of _1 and _2 halves.
        for base in 1..=32 {
            assert_eq!(halves.get(&(base, 1)), halves.get(&(base, 2)));
        }
        assert_eq!(halves.values().sum::<usize>(), 112);
    }

    #[test]
    fn same_seed_same_board() {
        let gen = BoardGenerator::new();
        let a = gen.generate(4, &mut SimpleRng::new(99));
        let b = gen.generate(4, &mut SimpleRng::new(99));
        assert_eq!(a, b);
    }

    #[test]
    fn pop_pair_takes_first_and_mate() {
        let t = |id| Tile::plain(id).unwrap();
        let mut pool = vec![t(1), t(2), t(1), t(2)];
        assert_eq!(pop_pair(&mut pool), Some(t(1)));
        assert_eq!(pool, vec![t(2), t(2)]);

        let mut lonely = vec![t(3), t(4)];
        assert_eq!(pop_pair(&mut lonely), None);
        assert_eq!(lonely, vec![t(3), t(4)]);
    }
}
