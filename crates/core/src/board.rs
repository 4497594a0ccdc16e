//! Board module - manages the tile grid
//!
//! The board is a `rows x cols` grid of tiles surrounded by a one-cell empty
//! border corridor, stored as a flat `(rows + 2) x (cols + 2)` array.
//! Coordinates are padded `(row, col)` pairs: playable cells are
//! `1..=rows` x `1..=cols`, the border is row/column `0` and `rows + 1`/`cols + 1`.
//! The border only ever holds [`Tile::EMPTY`]; paths may route through it.

use std::fmt;

use crate::types::{Pos, Tile, BOARD_COLS, BOARD_ROWS};

/// The tile grid with its border corridor.
#[derive(Debug, PartialEq, Eq)]
pub struct Board {
    rows: u8,
    cols: u8,
    /// Flat array of cells, row-major over the padded grid
    cells: Vec<Tile>,
}

impl Clone for Board {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.clone(),
        }
    }

    /// Reuses the cell allocation; snapshots copy the board every frame.
    fn clone_from(&mut self, source: &Self) {
        self.rows = source.rows;
        self.cols = source.cols;
        self.cells.clone_from(&source.cells);
    }
}

impl Board {
    /// Create an empty standard 7x16 board.
    pub fn new() -> Self {
        Self::with_size(BOARD_ROWS, BOARD_COLS)
    }

    /// Create an empty board with `rows x cols` playable cells.
    ///
    /// The playable area must hold whole pairs; an odd area is a programming error.
    pub fn with_size(rows: u8, cols: u8) -> Self {
        assert!(rows > 0 && cols > 0, "board must have at least one cell");
        assert!(rows < u8::MAX - 1 && cols < u8::MAX - 1, "board too large");
        debug_assert!(
            (rows as usize * cols as usize) % 2 == 0,
            "board must have an even number of cells"
        );
        let len = (rows as usize + 2) * (cols as usize + 2);
        Self {
            rows,
            cols,
            cells: vec![Tile::EMPTY; len],
        }
    }

    /// Build a board from text: one line per row, whitespace-separated tile
    /// names, `.` for an empty cell.
    ///
    /// Returns `None` if rows are ragged or a name does not parse.
    ///
    /// ```
    /// use tui_link_core::Board;
    /// use tui_link_types::{Pos, Tile};
    ///
    /// let board = Board::parse(
    ///     "tile_001 .
    ///      .        tile_001",
    /// )
    /// .unwrap();
    /// assert_eq!(board.rows(), 2);
    /// assert_eq!(board.get(Pos::new(1, 1)), Tile::plain(1));
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let grid: Vec<Vec<&str>> = text
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        let rows = u8::try_from(grid.len()).ok()?;
        let cols = u8::try_from(grid.first()?.len()).ok()?;
        if grid.iter().any(|row| row.len() != cols as usize) {
            return None;
        }

        let mut board = Self::with_size(rows, cols);
        for (r, row) in grid.iter().enumerate() {
            for (c, name) in row.iter().enumerate() {
                let tile = match *name {
                    "." => Tile::EMPTY,
                    other => Tile::from_name(other)?,
                };
                board.set(Pos::new(r as u8 + 1, c as u8 + 1), tile);
            }
        }
        Some(board)
    }

    /// Playable rows.
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Playable columns.
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Number of playable cells.
    pub fn area(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Width of the padded grid.
    pub fn padded_cols(&self) -> usize {
        self.cols as usize + 2
    }

    /// Height of the padded grid.
    pub fn padded_rows(&self) -> usize {
        self.rows as usize + 2
    }

    /// Flat index of a padded address.
    #[inline(always)]
    pub fn index(&self, pos: Pos) -> Option<usize> {
        if pos.row as usize >= self.padded_rows() || pos.col as usize >= self.padded_cols() {
            return None;
        }
        Some(pos.row as usize * self.padded_cols() + pos.col as usize)
    }

    /// Padded address of a flat index.
    #[inline(always)]
    pub fn pos_of(&self, index: usize) -> Pos {
        let w = self.padded_cols();
        Pos::new((index / w) as u8, (index % w) as u8)
    }

    /// True for addresses on the padded grid.
    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// True for playable addresses.
    pub fn is_interior(&self, pos: Pos) -> bool {
        (1..=self.rows).contains(&pos.row) && (1..=self.cols).contains(&pos.col)
    }

    /// Tile at `pos`, or `None` when off the padded grid.
    pub fn get(&self, pos: Pos) -> Option<Tile> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Tile at `pos`, treating off-grid addresses as empty.
    pub fn tile(&self, pos: Pos) -> Tile {
        self.get(pos).unwrap_or(Tile::EMPTY)
    }

    /// Set the tile at `pos`.
    ///
    /// Returns false when `pos` is off the padded grid, or when a non-empty
    /// tile would land on the border.
    pub fn set(&mut self, pos: Pos, tile: Tile) -> bool {
        if !tile.is_empty() && !self.is_interior(pos) {
            return false;
        }
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// On the padded grid and empty (border cells always are).
    pub fn is_empty(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Some(t) if t.is_empty())
    }

    /// On the padded grid and holding a tile.
    pub fn is_occupied(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Some(t) if !t.is_empty())
    }

    /// Empty both cells of a matched pair.
    pub fn remove_pair(&mut self, a: Pos, b: Pos) {
        self.set(a, Tile::EMPTY);
        self.set(b, Tile::EMPTY);
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Tile::EMPTY);
    }

    /// Playable addresses in reading order (top to bottom, left to right).
    pub fn interior(&self) -> impl Iterator<Item = Pos> {
        let cols = self.cols;
        (1..=self.rows).flat_map(move |r| (1..=cols).map(move |c| Pos::new(r, c)))
    }

    /// Occupied playable cells in reading order.
    pub fn occupied(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.interior().filter_map(move |pos| {
            let tile = self.tile(pos);
            (!tile.is_empty()).then_some((pos, tile))
        })
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|t| !t.is_empty()).count()
    }

    /// True when every border cell is empty.
    pub fn border_is_empty(&self) -> bool {
        self.cells
            .iter()
            .enumerate()
            .all(|(idx, tile)| tile.is_empty() || self.is_interior(self.pos_of(idx)))
    }

    /// Flat view of the padded grid.
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// Playable cells, one row per line, names padded to a common width.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 1..=self.rows {
            for c in 1..=self.cols {
                if c > 1 {
                    f.write_str(" ")?;
                }
                write!(f, "{:<9}", self.tile(Pos::new(r, c)).to_string())?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
