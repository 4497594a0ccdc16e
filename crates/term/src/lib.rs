//! Terminal rendering for the puzzle.
//!
//! A small, game-oriented rendering layer: no widget toolkit, just a
//! framebuffer that a [`GameView`] fills from a session snapshot and a
//! [`TerminalRenderer`] flushes with diffing.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Map mouse coordinates back to board cells with the same layout code
//! - Wide cells (3 columns) so tiles and the cursor read well

pub mod fb;
pub mod feedback;
pub mod game_view;
pub mod renderer;

pub use tui_link_core as core;
pub use tui_link_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use feedback::BellFeedback;
pub use game_view::{tile_glyph, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
