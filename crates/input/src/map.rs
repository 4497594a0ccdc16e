//! Key mapping from terminal events to UI actions.

use crate::types::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// What a key press asks the front end to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Move the board cursor
    Move(Direction),
    /// Tap the cell under the cursor
    Tap,
    Hint,
    TogglePause,
    Restart,
    /// Next level, or replay in practice
    Continue,
}

/// Map keyboard input to UI actions.
pub fn handle_key_event(key: KeyEvent) -> Option<UiAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => Some(UiAction::Move(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => Some(UiAction::Move(Direction::Right)),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(UiAction::Move(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(UiAction::Move(Direction::Down)),

        KeyCode::Char(' ') | KeyCode::Enter => Some(UiAction::Tap),

        KeyCode::Char('?') | KeyCode::Char('t') | KeyCode::Char('T') => Some(UiAction::Hint),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(UiAction::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(UiAction::Restart),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(UiAction::Continue),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Terminal `(column, row)` of a left-button press.
pub fn left_click(mouse: MouseEvent) -> Option<(u16, u16)> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some((mouse.column, mouse.row)),
        _ => None,
    }
}
