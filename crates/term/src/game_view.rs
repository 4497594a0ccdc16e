//! GameView: maps a [`SessionSnapshot`] into a terminal framebuffer.
//!
//! Pure (no I/O). The board is drawn with its border corridor so revealed
//! paths that leave the tiles stay visible.

use crate::core::progression::continue_label;
use crate::core::SessionSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{FailReason, Mode, Pos, Tile};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const PANEL_W: u16 = 24;
const PANEL_GAP: u16 = 2;
const TIME_BAR_W: u16 = 20;

const GLYPHS: &[u8; 35] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ123456789";

const PALETTE: [Rgb; 10] = [
    Rgb::new(80, 220, 220),
    Rgb::new(240, 220, 80),
    Rgb::new(200, 120, 220),
    Rgb::new(100, 220, 120),
    Rgb::new(230, 90, 90),
    Rgb::new(90, 140, 240),
    Rgb::new(255, 165, 0),
    Rgb::new(240, 240, 240),
    Rgb::new(170, 210, 90),
    Rgb::new(240, 130, 180),
];

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const CORRIDOR_BG: Rgb = Rgb::new(20, 20, 28);
const SELECT_BG: Rgb = Rgb::new(200, 170, 40);
const HINT_BG: Rgb = Rgb::new(40, 120, 60);
const PATH_BG: Rgb = Rgb::new(90, 60, 20);
const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Placement of the board frame inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    x: u16,
    y: u16,
    frame_w: u16,
    frame_h: u16,
}

/// A lightweight terminal renderer for the puzzle.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Three columns leave room for a cursor bracket on each side.
        Self { cell_w: 3, cell_h: 1 }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    fn layout(&self, padded_rows: u16, padded_cols: u16, viewport: Viewport) -> Layout {
        let frame_w = padded_cols * self.cell_w + 2;
        let frame_h = padded_rows * self.cell_h + 2;
        let total_w = frame_w + PANEL_GAP + PANEL_W;
        // Two lines under the frame for the notice and key help.
        let total_h = frame_h + 2;
        Layout {
            x: viewport.width.saturating_sub(total_w) / 2,
            y: viewport.height.saturating_sub(total_h) / 2,
            frame_w,
            frame_h,
        }
    }

    fn board_layout(&self, snap: &SessionSnapshot, viewport: Viewport) -> Layout {
        self.layout(
            snap.board.padded_rows() as u16,
            snap.board.padded_cols() as u16,
            viewport,
        )
    }

    /// Board cell under terminal coordinate `(x, y)`, border corridor included.
    pub fn cell_at(&self, snap: &SessionSnapshot, viewport: Viewport, x: u16, y: u16) -> Option<Pos> {
        let layout = self.board_layout(snap, viewport);
        let dx = x.checked_sub(layout.x + 1)?;
        let dy = y.checked_sub(layout.y + 1)?;
        let col = dx / self.cell_w;
        let row = dy / self.cell_h;
        if col >= snap.board.padded_cols() as u16 || row >= snap.board.padded_rows() as u16 {
            return None;
        }
        Some(Pos::new(row as u8, col as u8))
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    ///
    /// `cursor` is the keyboard cursor, if one should be shown.
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        cursor: Option<Pos>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let layout = self.board_layout(snap, viewport);
        let border = CellStyle::new(Rgb::new(200, 200, 200), BLACK);
        self.draw_border(fb, layout, border);

        for pos in (0..snap.board.padded_rows()).flat_map(|r| {
            (0..snap.board.padded_cols()).map(move |c| Pos::new(r as u8, c as u8))
        }) {
            self.draw_cell(fb, layout, snap, pos);
        }

        if let Some(pos) = cursor {
            if snap.playable() {
                self.draw_cursor(fb, layout, pos);
            }
        }

        self.draw_side_panel(fb, snap, viewport, layout);
        self.draw_footer(fb, snap, layout);

        if snap.paused {
            self.draw_overlay(fb, layout, "PAUSED", Some("press p to resume"));
        } else if snap.cleared {
            self.draw_overlay(fb, layout, continue_label(snap.mode, snap.level), Some(next_hint(snap)));
        } else if let Some(reason) = snap.failed {
            let title = match reason {
                FailReason::TimeUp => "TIME UP",
                FailReason::Deadlock => "NO MOVES LEFT",
            };
            self.draw_overlay(fb, layout, title, Some("press r to restart"));
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, cursor: Option<Pos>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: Layout, style: CellStyle) {
        let Layout { x, y, frame_w: w, frame_h: h } = layout;
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn cell_origin(&self, layout: Layout, pos: Pos) -> (u16, u16) {
        (
            layout.x + 1 + pos.col as u16 * self.cell_w,
            layout.y + 1 + pos.row as u16 * self.cell_h,
        )
    }

    fn draw_cell(&self, fb: &mut FrameBuffer, layout: Layout, snap: &SessionSnapshot, pos: Pos) {
        let (px, py) = self.cell_origin(layout, pos);
        let tile = snap.board.tile(pos);
        let on_path = snap.on_path(pos);

        let bg = if snap.selected == Some(pos) {
            SELECT_BG
        } else if on_path {
            PATH_BG
        } else if snap.is_hinted(pos) {
            HINT_BG
        } else if snap.board.is_interior(pos) {
            BOARD_BG
        } else {
            CORRIDOR_BG
        };
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', CellStyle::new(BLACK, bg));

        let mid = px + self.cell_w / 2;
        if tile.is_empty() {
            if on_path {
                let style = CellStyle::new(Rgb::new(255, 220, 120), bg).bold();
                fb.fill_rect(px, py, self.cell_w, self.cell_h, '•', style);
            } else if snap.board.is_interior(pos) {
                let style = CellStyle::new(Rgb::new(90, 90, 100), bg).dim();
                fb.put_char(mid, py, '·', style);
            }
            return;
        }

        let fg = if bg == SELECT_BG { BLACK } else { tile_color(tile) };
        let style = CellStyle::new(fg, bg).bold();
        fb.put_char(mid, py, tile_glyph(tile), style);
        if let Some(suffix) = tile.suffix() {
            if self.cell_w >= 3 {
                fb.put_u32(mid + 1, py, suffix as u32, CellStyle::new(fg, bg).dim());
            }
        }
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, layout: Layout, pos: Pos) {
        if self.cell_w < 3 {
            return;
        }
        let (px, py) = self.cell_origin(layout, pos);
        for (x, ch) in [(px, '['), (px + self.cell_w - 1, ']')] {
            let bg = fb.get(x, py).map(|c| c.style.bg).unwrap_or(BOARD_BG);
            fb.put_char(x, py, ch, CellStyle::new(Rgb::new(255, 255, 255), bg).bold());
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport, layout: Layout) {
        let panel_x = layout.x.saturating_add(layout.frame_w).saturating_add(PANEL_GAP);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), BLACK).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), BLACK);
        let dim = value.dim();

        let mut y = layout.y;
        fb.put_str(panel_x, y, mode_title(snap.mode), label);
        y += 2;

        let x = fb.put_str(panel_x, y, "LEVEL ", label);
        fb.put_u32(x, y, snap.level, value);
        y += 1;
        fb.put_str(panel_x, y, snap.level_name, dim);
        y += 2;

        let x = fb.put_str(panel_x, y, "SCORE ", label);
        fb.put_u32(x, y, snap.score, value);
        y += 1;

        let x = fb.put_str(panel_x, y, "HINTS ", label);
        let x = fb.put_u32(x, y, snap.hints, value);
        if snap.reshuffles > 0 {
            let x = fb.put_str(x + 1, y, "shuffled x", dim);
            fb.put_u32(x, y, snap.reshuffles, dim);
        }
        y += 1;

        let x = fb.put_str(panel_x, y, "PAIRS ", label);
        fb.put_u32(x, y, snap.pairs_left, value);
        y += 2;

        let x = fb.put_str(panel_x, y, "TIME  ", label);
        fb.put_u32(x, y, snap.time_left, value);
        y += 1;
        self.draw_time_bar(fb, panel_x, y, snap.progress());
        y += 2;

        if let Some(best) = snap.best {
            fb.put_str(panel_x, y, "BEST", label);
            y += 1;
            let x = fb.put_str(panel_x, y, "level ", dim);
            let x = fb.put_u32(x, y, best.level, value);
            let x = fb.put_str(x, y, "  score ", dim);
            fb.put_u32(x, y, best.score, value);
            y += 2;
        }

        let x = fb.put_str(panel_x, y, "seed ", dim);
        fb.put_u32(x, y, snap.seed, dim);
    }

    fn draw_time_bar(&self, fb: &mut FrameBuffer, x: u16, y: u16, progress: f32) {
        let filled = (progress * TIME_BAR_W as f32).round() as u16;
        let fg = if progress > 0.5 {
            Rgb::new(100, 220, 120)
        } else if progress > 0.25 {
            Rgb::new(240, 220, 80)
        } else {
            Rgb::new(230, 90, 90)
        };
        for i in 0..TIME_BAR_W {
            let (ch, style) = if i < filled {
                ('█', CellStyle::new(fg, BLACK))
            } else {
                ('░', CellStyle::new(Rgb::new(70, 70, 80), BLACK))
            };
            fb.put_char(x + i, y, ch, style);
        }
    }

    fn draw_footer(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, layout: Layout) {
        let y = layout.y + layout.frame_h;
        if let Some(notice) = snap.notice {
            let style = CellStyle::new(Rgb::new(240, 220, 80), BLACK).bold();
            fb.put_str(layout.x, y, notice.text(), style);
        }
        let help = CellStyle::new(Rgb::new(150, 150, 160), BLACK).dim();
        let keys = if snap.pause_allowed {
            "arrows move  space tap  ? hint  p pause  r restart  n next  q quit"
        } else {
            "arrows move  space tap  ? hint  r restart  n next  q quit"
        };
        fb.put_str(layout.x, y + 1, keys, help);
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, layout: Layout, title: &str, detail: Option<&str>) {
        let mid_y = layout.y.saturating_add(layout.frame_h / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), BLACK).bold();
        let lines = u16::from(detail.is_some()) + 1;
        let top = mid_y.saturating_sub(lines / 2);

        let width = [Some(title), detail]
            .iter()
            .flatten()
            .map(|s| s.chars().count() as u16)
            .max()
            .unwrap_or(0)
            + 4;
        let left = layout.x.saturating_add(layout.frame_w.saturating_sub(width) / 2);
        fb.fill_rect(left, top, width, lines, ' ', style);

        fb.put_str_centered(layout.x, top, layout.frame_w, title, style);
        if let Some(detail) = detail {
            fb.put_str_centered(layout.x, top + 1, layout.frame_w, detail, style.dim());
        }
    }
}

fn next_hint(snap: &SessionSnapshot) -> &'static str {
    if snap.can_advance || matches!(snap.mode, Mode::Practice { .. }) {
        "press n to continue"
    } else {
        "press r to play again"
    }
}

fn mode_title(mode: Mode) -> &'static str {
    match mode {
        Mode::ClassicEasy => "CLASSIC / EASY",
        Mode::ClassicHard => "CLASSIC / HARD",
        Mode::Practice { .. } => "PRACTICE",
        Mode::Endless => "ENDLESS",
    }
}

/// Symbol letter: upper case for plain tiles, lower case for tagged halves.
pub fn tile_glyph(tile: Tile) -> char {
    if let Some(id) = tile.plain_id() {
        GLYPHS
            .get(usize::from(id).wrapping_sub(1))
            .map(|&b| b as char)
            .unwrap_or('?')
    } else if let Some(base) = tile.pair_base() {
        (GLYPHS[usize::from(base) % GLYPHS.len()] as char).to_ascii_lowercase()
    } else {
        ' '
    }
}

fn tile_color(tile: Tile) -> Rgb {
    let key = tile.plain_id().or(tile.pair_base()).unwrap_or(0);
    PALETTE[usize::from(key) % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, Session};

    fn snapshot(board: &str) -> SessionSnapshot {
        let mut session = Session::new(Mode::ClassicEasy, 1);
        session.start();
        session.load_board(Board::parse(board).unwrap());
        session.snapshot()
    }

    // Tests look tiles up by the glyph 'B' (tile_002): the side panel has
    // no upper-case B.
    fn find_char(fb: &FrameBuffer, ch: char) -> Option<(u16, u16)> {
        (0..fb.height())
            .flat_map(|y| (0..fb.width()).map(move |x| (x, y)))
            .find(|&(x, y)| fb.get(x, y).map(|c| c.ch) == Some(ch))
    }

    #[test]
    fn glyphs() {
        assert_eq!(tile_glyph(Tile::plain(1).unwrap()), 'A');
        assert_eq!(tile_glyph(Tile::plain(35).unwrap()), '9');
        assert_eq!(tile_glyph(Tile::plain(99).unwrap()), '?');
        assert_eq!(tile_glyph(Tile::tagged(2, 1).unwrap()), 'c');
        assert_eq!(tile_glyph(Tile::EMPTY), ' ');
    }

    #[test]
    fn renders_tiles_and_panel() {
        let snap = snapshot("tile_001 .        tile_001\ntile_002 tile_002 .");
        let fb = GameView::default().render(&snap, None, Viewport::new(80, 24));

        let text: String = (0..fb.height()).map(|y| fb.row_text(y)).collect();
        assert_eq!(text.matches('B').count(), 2);
        assert!(text.contains("LEVEL 1"));
        assert!(text.contains("SCORE 0"));
        assert!(text.contains("HINTS 3"));
        assert!(text.contains("PAIRS 2"));
        assert!(text.contains("TIME  120"));
        assert!(text.contains("First Steps"));
    }

    #[test]
    fn cell_at_inverts_layout() {
        let snap = snapshot("tile_002 tile_002\ntile_001 tile_001");
        let view = GameView::default();
        let viewport = Viewport::new(80, 24);
        let fb = view.render(&snap, None, viewport);

        let (x, y) = find_char(&fb, 'B').unwrap();
        assert_eq!(view.cell_at(&snap, viewport, x, y), Some(Pos::new(1, 1)));
        assert_eq!(view.cell_at(&snap, viewport, x + 3, y), Some(Pos::new(1, 2)));
        assert_eq!(view.cell_at(&snap, viewport, x - 3, y), Some(Pos::new(1, 0)));
        assert_eq!(view.cell_at(&snap, viewport, 0, 0), None);
        assert_eq!(view.cell_at(&snap, viewport, x + 9, y), None);
    }

    #[test]
    fn selection_and_path_are_highlighted() {
        let mut session = Session::new(Mode::ClassicEasy, 1);
        session.start();
        session.load_board(Board::parse("tile_002 . tile_002\ntile_001 . tile_001").unwrap());
        session.handle_tap(1, 1);

        let view = GameView::default();
        let viewport = Viewport::new(80, 24);
        let snap = session.snapshot();
        let fb = view.render(&snap, None, viewport);
        let (x, y) = find_char(&fb, 'B').unwrap();
        assert_eq!(fb.get(x, y).unwrap().style.bg, SELECT_BG);

        session.handle_tap(1, 3);
        let snap = session.snapshot();
        assert!(snap.match_pending);
        let fb = view.render(&snap, None, viewport);
        // The empty middle cell of the route is drawn as path dots.
        assert_eq!(fb.get(x + 3, y).unwrap().ch, '•');
        assert_eq!(fb.get(x + 3, y).unwrap().style.bg, PATH_BG);
    }

    #[test]
    fn cursor_brackets_only_while_playable() {
        let mut session = Session::new(Mode::ClassicEasy, 1);
        session.start();
        session.load_board(Board::parse("tile_001 tile_001").unwrap());
        let view = GameView::default();
        let viewport = Viewport::new(80, 24);

        let fb = view.render(&session.snapshot(), Some(Pos::new(1, 2)), viewport);
        assert!(find_char(&fb, '[').is_some());
        assert!(find_char(&fb, ']').is_some());

        session.pause();
        let fb = view.render(&session.snapshot(), Some(Pos::new(1, 2)), viewport);
        assert!(find_char(&fb, '[').is_none());
        let text: String = (0..fb.height()).map(|y| fb.row_text(y)).collect();
        assert!(text.contains("PAUSED"));
    }

    #[test]
    fn overlays_for_terminal_states() {
        let mut session = Session::new(Mode::ClassicEasy, 1);
        session.start();
        session.load_board(Board::parse("tile_001 tile_001").unwrap());
        session.handle_tap(1, 1);
        session.handle_tap(1, 2);
        session.commit_match();

        let view = GameView::default();
        let fb = view.render(&session.snapshot(), None, Viewport::new(80, 24));
        let text: String = (0..fb.height()).map(|y| fb.row_text(y)).collect();
        assert!(text.contains("Level clear! Next level"));
        assert!(text.contains("press n to continue"));
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let snap = snapshot("tile_001 tile_001");
        let view = GameView::default();
        for (w, h) in [(0, 0), (1, 1), (10, 3), (40, 8)] {
            let fb = view.render(&snap, Some(Pos::new(1, 1)), Viewport::new(w, h));
            assert_eq!(fb.width(), w);
        }
    }
}
