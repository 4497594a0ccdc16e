//! Compaction module - re-packs tiles after a pair is removed
//!
//! Every style is expressed as a set of independent *lines* (a column, a row,
//! or half of one). For each line, surviving tiles are read in a fixed order,
//! the line is emptied, and the survivors are written back into a fixed slot
//! order. Sliding styles read and write in the same order (from the target
//! edge inward), which keeps relative order and leaves no gaps. `center` reads
//! in reading order and writes alternately to both sides of the midline.
//!
//! Only playable cells are touched; the border corridor stays empty.

use crate::board::Board;
use crate::types::{FallStyle, Pos, Tile};

/// Re-pack `board` according to `style`.
pub fn compact(board: &mut Board, style: FallStyle) {
    let mut scratch = Scratch::default();
    let rows = board.rows();
    let cols = board.cols();

    match style {
        FallStyle::None => {}
        FallStyle::Down => {
            for c in 1..=cols {
                scratch.slide(board, (1..=rows).rev().map(|r| Pos::new(r, c)));
            }
        }
        FallStyle::Up => {
            for c in 1..=cols {
                scratch.slide(board, (1..=rows).map(|r| Pos::new(r, c)));
            }
        }
        FallStyle::Left => {
            for r in 1..=rows {
                scratch.slide(board, (1..=cols).map(|c| Pos::new(r, c)));
            }
        }
        FallStyle::Right => {
            for r in 1..=rows {
                scratch.slide(board, (1..=cols).rev().map(|c| Pos::new(r, c)));
            }
        }
        FallStyle::SplitLeftRight => {
            let mid = cols / 2;
            for r in 1..=rows {
                scratch.slide(board, (1..=mid).map(|c| Pos::new(r, c)));
                scratch.slide(board, (mid + 1..=cols).rev().map(|c| Pos::new(r, c)));
            }
        }
        FallStyle::SplitUpDown => {
            let mid = rows / 2;
            for c in 1..=cols {
                scratch.slide(board, (1..=mid).map(|r| Pos::new(r, c)));
                scratch.slide(board, (mid + 1..=rows).rev().map(|r| Pos::new(r, c)));
            }
        }
        FallStyle::Center => {
            for c in 1..=cols {
                let read = (1..=rows).map(|r| Pos::new(r, c));
                let write = midline_order(rows).map(|r| Pos::new(r, c));
                scratch.relocate(board, read, write);
            }
            for r in 1..=rows {
                let read = (1..=cols).map(|c| Pos::new(r, c));
                let write = midline_order(cols).map(|c| Pos::new(r, c));
                scratch.relocate(board, read, write);
            }
        }
    }
}

/// Indices `1..=len` ordered from the midline outward, alternating sides:
/// `len/2, len/2 + 1, len/2 - 1, len/2 + 2, ...`. Once one side runs out the
/// other continues alone.
fn midline_order(len: u8) -> impl Iterator<Item = u8> {
    let low = len / 2;
    let mut down = (1..=low).rev();
    let mut up = low + 1..=len;
    let mut take_down = true;
    std::iter::from_fn(move || {
        let next = if take_down {
            down.next().or_else(|| up.next())
        } else {
            up.next().or_else(|| down.next())
        };
        take_down = !take_down;
        next
    })
}

/// Reusable buffers for one compaction pass.
#[derive(Default)]
struct Scratch {
    tiles: Vec<Tile>,
    slots: Vec<Pos>,
}

impl Scratch {
    /// Pack survivors toward the first position of `line`, keeping their order.
    fn slide(&mut self, board: &mut Board, line: impl Iterator<Item = Pos>) {
        self.slots.clear();
        self.slots.extend(line);

        let mut write = 0;
        for read in 0..self.slots.len() {
            let tile = board.tile(self.slots[read]);
            if tile.is_empty() {
                continue;
            }
            if write != read {
                board.set(self.slots[write], tile);
                board.set(self.slots[read], Tile::EMPTY);
            }
            write += 1;
        }
    }

    /// Collect survivors in `read` order, empty them, then fill `write` slots.
    fn relocate(
        &mut self,
        board: &mut Board,
        read: impl Iterator<Item = Pos>,
        write: impl Iterator<Item = Pos>,
    ) {
        self.tiles.clear();
        for pos in read {
            let tile = board.tile(pos);
            if !tile.is_empty() {
                self.tiles.push(tile);
                board.set(pos, Tile::EMPTY);
            }
        }
        for (pos, tile) in write.zip(self.tiles.iter()) {
            board.set(pos, *tile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(text: &str) -> Board {
        Board::parse(text).unwrap()
    }

    fn rendered(b: &Board) -> Vec<String> {
        (1..=b.rows())
            .map(|r| {
                (1..=b.cols())
                    .map(|c| match b.tile(Pos::new(r, c)).plain_id() {
                        Some(id) => char::from_digit(id as u32, 36).unwrap_or('?'),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }

    const SAMPLE: &str = "tile_001 .        tile_002 .
                          .        tile_003 .        .
                          tile_004 .        .        tile_005
                          .        tile_006 .        .";

    #[test]
    fn none_is_noop() {
        let mut b = board(SAMPLE);
        let before = b.clone();
        compact(&mut b, FallStyle::None);
        assert_eq!(b, before);
    }

    #[test]
    fn down_packs_columns_to_bottom() {
        let mut b = board(SAMPLE);
        compact(&mut b, FallStyle::Down);
        assert_eq!(rendered(&b), vec!["....", "....", "13..", "4625"]);
    }

    #[test]
    fn up_packs_columns_to_top() {
        let mut b = board(SAMPLE);
        compact(&mut b, FallStyle::Up);
        assert_eq!(rendered(&b), vec!["1325", "46..", "....", "...."]);
    }

    #[test]
    fn left_and_right_pack_rows() {
        let mut b = board(SAMPLE);
        compact(&mut b, FallStyle::Left);
        assert_eq!(rendered(&b), vec!["12..", "3...", "45..", "6..."]);

        let mut b = board(SAMPLE);
        compact(&mut b, FallStyle::Right);
        assert_eq!(rendered(&b), vec!["..12", "...3", "..45", "...6"]);
    }

    #[test]
    fn split_left_right_packs_halves_outward() {
        let mut b = board(SAMPLE);
        compact(&mut b, FallStyle::SplitLeftRight);
        assert_eq!(rendered(&b), vec!["1..2", "3...", "4..5", "6..."]);
    }

    #[test]
    fn split_up_down_packs_halves_outward() {
        let mut b = board(SAMPLE);
        compact(&mut b, FallStyle::SplitUpDown);
        assert_eq!(rendered(&b), vec!["132.", "....", "....", "46.5"]);
    }

    #[test]
    fn midline_order_alternates() {
        assert_eq!(midline_order(7).collect::<Vec<_>>(), vec![3, 4, 2, 5, 1, 6, 7]);
        assert_eq!(midline_order(4).collect::<Vec<_>>(), vec![2, 3, 1, 4]);
        assert_eq!(midline_order(1).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn center_fills_columns_then_rows_from_midline() {
        let mut b = board(
            "tile_001 tile_002 tile_003 .
             .        .        .        .
             .        .        .        .
             .        .        .        .",
        );
        compact(&mut b, FallStyle::Center);
        // Each lone tile first moves to row 2, then row 2 is refilled in the
        // order col 2, col 3, col 1.
        assert_eq!(rendered(&b), vec!["....", "312.", "....", "...."]);
    }

    #[test]
    fn compaction_keeps_tile_count_and_border() {
        for style in FallStyle::ALL {
            let mut b = board(SAMPLE);
            compact(&mut b, style);
            assert_eq!(b.occupied_count(), 6, "{}", style.as_str());
            assert!(b.border_is_empty(), "{}", style.as_str());
        }
    }
}
