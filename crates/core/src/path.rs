//! Path module - bounded-turn connectivity search
//!
//! Two occupied cells connect when a route of orthogonal steps through empty
//! cells (the border corridor included) joins them with at most
//! [`MAX_TURNS`] direction changes. This is the only connectivity authority
//! in the engine: hints, deadlock detection and taps all go through
//! [`find_path`].
//!
//! The search is a plain breadth-first search over
//! `(cell, heading, turns)` states, so the first time the destination is
//! reached the route is the shortest one (by steps) within the turn budget.
//! Headings are expanded in the order up, right, down, left, which makes the
//! result deterministic.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{Direction, Pos, MAX_TURNS};

/// An ordered route, endpoints included.
pub type Path = Vec<Pos>;

const TURN_STATES: usize = MAX_TURNS as usize + 1;
const ROOT: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct Node {
    pos: Pos,
    dir: Direction,
    turns: u8,
}

/// Flat state index: `((cell * 4) + heading) * 3 + turns`.
#[inline(always)]
fn state_index(cell: usize, dir: Direction, turns: u8) -> usize {
    (cell * 4 + dir.index()) * TURN_STATES + turns as usize
}

/// Neighbours of `pos` on the padded grid, in search order.
fn neighbours(board: &Board, pos: Pos) -> ArrayVec<(Direction, Pos), 4> {
    let mut out = ArrayVec::new();
    for dir in Direction::ALL {
        if let Some(next) = pos.step(dir).filter(|p| board.in_bounds(*p)) {
            out.push((dir, next));
        }
    }
    out
}

/// Reusable search buffers, sized on first use for a given board.
///
/// Scanning a whole board for moves runs one search per candidate pair;
/// sharing a scratch keeps those searches from allocating.
#[derive(Debug, Default, Clone)]
pub struct PathScratch {
    visited: Vec<bool>,
    parent: Vec<u32>,
    queue: VecDeque<Node>,
}

impl PathScratch {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, board: &Board) {
        let states = board.padded_rows() * board.padded_cols() * 4 * TURN_STATES;
        self.visited.clear();
        self.visited.resize(states, false);
        self.parent.clear();
        self.parent.resize(states, ROOT);
        self.queue.clear();
    }
}

/// Find a connecting route between two occupied cells.
///
/// Returns `None` when `from == to`, when either cell is empty or off the
/// grid, or when no route within the turn budget exists. The returned path
/// starts at `from`, ends at `to`, and lists every cell stepped through.
pub fn find_path(board: &Board, from: Pos, to: Pos) -> Option<Path> {
    find_path_with(&mut PathScratch::new(), board, from, to)
}

/// [`find_path`] using caller-owned buffers.
pub fn find_path_with(scratch: &mut PathScratch, board: &Board, from: Pos, to: Pos) -> Option<Path> {
    if from == to || !board.is_occupied(from) || !board.is_occupied(to) {
        return None;
    }

    scratch.reset(board);
    let PathScratch {
        visited,
        parent,
        queue,
    } = scratch;

    // First step out of `from`: only into empty cells, unless it lands on `to`.
    for (dir, next) in neighbours(board, from) {
        if next == to {
            return Some(vec![from, to]);
        }
        if board.is_empty(next) {
            let idx = board.index(next)?;
            let s = state_index(idx, dir, 0);
            visited[s] = true;
            queue.push_back(Node {
                pos: next,
                dir,
                turns: 0,
            });
        }
    }

    while let Some(node) = queue.pop_front() {
        let node_idx = board.index(node.pos)?;
        let node_state = state_index(node_idx, node.dir, node.turns);

        for (dir, next) in neighbours(board, node.pos) {
            let turns = node.turns + u8::from(dir != node.dir);
            if turns > MAX_TURNS {
                continue;
            }
            if next == to {
                return Some(reconstruct(board, parent, node_state, from, to));
            }
            if !board.is_empty(next) {
                continue;
            }
            let idx = board.index(next)?;
            let s = state_index(idx, dir, turns);
            if !visited[s] {
                visited[s] = true;
                parent[s] = node_state as u32;
                queue.push_back(Node {
                    pos: next,
                    dir,
                    turns,
                });
            }
        }
    }

    None
}

/// Walk parent links from the last frontier state back to the first step.
fn reconstruct(board: &Board, parent: &[u32], last: usize, from: Pos, to: Pos) -> Path {
    let mut route = vec![to];
    let mut state = last;
    loop {
        let cell = state / (4 * TURN_STATES);
        route.push(board.pos_of(cell));
        match parent[state] {
            ROOT => break,
            prev => state = prev as usize,
        }
    }
    route.push(from);
    route.reverse();
    route
}

/// True when `find_path` would return a route.
pub fn can_connect(board: &Board, from: Pos, to: Pos) -> bool {
    find_path(board, from, to).is_some()
}

/// [`can_connect`] using caller-owned buffers.
pub fn can_connect_with(scratch: &mut PathScratch, board: &Board, from: Pos, to: Pos) -> bool {
    find_path_with(scratch, board, from, to).is_some()
}

/// Number of heading changes along a path.
pub fn count_turns(path: &[Pos]) -> usize {
    let headings: Vec<(i16, i16)> = path
        .windows(2)
        .map(|w| {
            (
                w[1].row as i16 - w[0].row as i16,
                w[1].col as i16 - w[0].col as i16,
            )
        })
        .collect();
    headings.windows(2).filter(|h| h[0] != h[1]).count()
}

/// Cells where the path changes heading, plus both endpoints.
///
/// Renderers that draw straight segments only need these.
pub fn corners(path: &[Pos]) -> Vec<Pos> {
    let mut out = Vec::new();
    for (i, pos) in path.iter().enumerate() {
        let is_end = i == 0 || i + 1 == path.len();
        let is_bend = !is_end && {
            let a = path[i - 1];
            let c = path[i + 1];
            a.row != c.row && a.col != c.col
        };
        if is_end || is_bend {
            out.push(*pos);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tile;

    fn t(id: u16) -> Tile {
        Tile::plain(id).unwrap()
    }

    fn board_with(rows: u8, cols: u8, tiles: &[(u8, u8, u16)]) -> Board {
        let mut board = Board::with_size(rows, cols);
        for &(r, c, id) in tiles {
            board.set(Pos::new(r, c), t(id));
        }
        board
    }

    #[test]
    fn adjacent_cells_connect_directly() {
        let board = board_with(2, 2, &[(1, 1, 1), (1, 2, 1)]);
        let path = find_path(&board, Pos::new(1, 1), Pos::new(1, 2)).unwrap();
        assert_eq!(path, vec![Pos::new(1, 1), Pos::new(1, 2)]);
    }

    #[test]
    fn same_cell_or_empty_endpoint_has_no_path() {
        let board = board_with(2, 2, &[(1, 1, 1)]);
        assert!(find_path(&board, Pos::new(1, 1), Pos::new(1, 1)).is_none());
        assert!(find_path(&board, Pos::new(1, 1), Pos::new(2, 2)).is_none());
        assert!(find_path(&board, Pos::new(2, 2), Pos::new(1, 1)).is_none());
    }

    #[test]
    fn straight_line_through_empty_cells() {
        let board = board_with(1, 4, &[(1, 1, 1), (1, 4, 1)]);
        let path = find_path(&board, Pos::new(1, 1), Pos::new(1, 4)).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(count_turns(&path), 0);
    }

    #[test]
    fn routes_through_border_corridor() {
        // Both tiles are walled in on the playable side but open to the top border.
        let board = board_with(
            2,
            4,
            &[(1, 1, 1), (1, 2, 2), (1, 3, 3), (1, 4, 1), (2, 1, 4), (2, 2, 4), (2, 3, 5), (2, 4, 5)],
        );
        let path = find_path(&board, Pos::new(1, 1), Pos::new(1, 4)).unwrap();
        assert_eq!(path.first(), Some(&Pos::new(1, 1)));
        assert_eq!(path.last(), Some(&Pos::new(1, 4)));
        assert!(path.iter().any(|p| p.row == 0));
        assert_eq!(count_turns(&path), 2);
    }

    #[test]
    fn three_turn_route_is_rejected() {
        // Opposite corners: (1,1) only exits up or left, (4,4) is only
        // reachable from below or the right.
        let board = Board::parse(
            "tile_001 tile_002 tile_003 tile_004
             tile_005 .        tile_006 tile_007
             tile_008 tile_009 .        tile_010
             tile_011 tile_012 tile_013 tile_001",
        )
        .unwrap();
        let path = find_path(&board, Pos::new(1, 1), Pos::new(4, 4));
        assert!(path.is_none());
    }

    #[test]
    fn u_shape_uses_two_turns() {
        let board = Board::parse(
            "tile_001 tile_002 tile_001
             tile_003 tile_004 tile_005",
        )
        .unwrap();
        let path = find_path(&board, Pos::new(1, 1), Pos::new(1, 3)).unwrap();
        assert_eq!(
            path,
            vec![
                Pos::new(1, 1),
                Pos::new(0, 1),
                Pos::new(0, 2),
                Pos::new(0, 3),
                Pos::new(0, 4),
                Pos::new(1, 4)
            ]
        );
        assert_eq!(corners(&path), vec![Pos::new(1, 1), Pos::new(0, 1), Pos::new(0, 4), Pos::new(1, 4)]);
    }

    #[test]
    fn intermediate_cells_are_empty() {
        let board = board_with(4, 4, &[(1, 1, 1), (4, 4, 1), (2, 2, 2), (3, 3, 3)]);
        let path = find_path(&board, Pos::new(1, 1), Pos::new(4, 4)).unwrap();
        for p in &path[1..path.len() - 1] {
            assert!(board.is_empty(*p), "{} should be empty", p);
        }
        assert!(count_turns(&path) <= 2);
    }

    #[test]
    fn shared_scratch_matches_fresh_search() {
        let small = board_with(1, 4, &[(1, 1, 1), (1, 4, 1)]);
        let large = board_with(4, 4, &[(1, 1, 1), (4, 4, 1), (2, 2, 2), (3, 3, 3)]);
        let walled = board_with(2, 2, &[(1, 1, 1), (1, 2, 2), (2, 1, 2), (2, 2, 1)]);

        let mut scratch = PathScratch::new();
        for (board, from, to) in [
            (&large, Pos::new(1, 1), Pos::new(4, 4)),
            (&small, Pos::new(1, 1), Pos::new(1, 4)),
            (&walled, Pos::new(1, 1), Pos::new(2, 2)),
            (&large, Pos::new(1, 1), Pos::new(4, 4)),
        ] {
            assert_eq!(
                find_path_with(&mut scratch, board, from, to),
                find_path(board, from, to)
            );
        }
        assert!(!can_connect_with(&mut scratch, &walled, Pos::new(1, 1), Pos::new(2, 2)));
    }

    #[test]
    fn count_turns_on_l_shape() {
        let path = [Pos::new(1, 1), Pos::new(1, 2), Pos::new(2, 2)];
        assert_eq!(count_turns(&path), 1);
        assert_eq!(count_turns(&path[..1]), 0);
    }
}
