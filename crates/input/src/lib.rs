//! Terminal input (engine-facing).
//!
//! Maps `crossterm` key and mouse events to [`UiAction`]s and keeps a board
//! cursor for keyboard play. Independent of any rendering code: turning a
//! mouse coordinate into a board cell is the view's job.

pub mod cursor;
pub mod map;

pub use tui_link_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, left_click, should_quit, UiAction};
