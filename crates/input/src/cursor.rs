//! Keyboard cursor over the playable cells.

use crate::types::{Direction, Pos, BOARD_COLS, BOARD_ROWS};

/// Cursor confined to `1..=rows` x `1..=cols`. Moves stop at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: Pos,
    rows: u8,
    cols: u8,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(BOARD_ROWS, BOARD_COLS)
    }
}

impl Cursor {
    pub fn new(rows: u8, cols: u8) -> Self {
        Self {
            pos: Pos::new(1, 1),
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Step once; returns false at an edge.
    pub fn step(&mut self, dir: Direction) -> bool {
        match self.pos.step(dir) {
            Some(next) if self.contains(next) => {
                self.pos = next;
                true
            }
            _ => false,
        }
    }

    /// Jump to `pos` if it is a playable cell.
    pub fn set(&mut self, pos: Pos) -> bool {
        if self.contains(pos) {
            self.pos = pos;
            true
        } else {
            false
        }
    }

    fn contains(&self, pos: Pos) -> bool {
        (1..=self.rows).contains(&pos.row) && (1..=self.cols).contains(&pos.col)
    }
}
