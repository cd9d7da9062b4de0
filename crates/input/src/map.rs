//! Key mapping from terminal events to player actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::GameMode;

/// What a key press asks for. Host-level: cursor movement never reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    /// Toggle the block under the cursor
    Select,
    Start(GameMode),
    CycleDifficulty,
    Restart,
    /// Abandon the game and return to the menu
    Menu,
}

/// Map keyboard input to player actions.
pub fn handle_key_event(key: KeyEvent) -> Option<InputAction> {
    match key.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(InputAction::CursorLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(InputAction::CursorRight)
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(InputAction::CursorUp)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(InputAction::CursorDown)
        }

        KeyCode::Char(' ') | KeyCode::Enter => Some(InputAction::Select),

        // Menu
        KeyCode::Char('1') => Some(InputAction::Start(GameMode::Classic)),
        KeyCode::Char('2') => Some(InputAction::Start(GameMode::Time)),
        KeyCode::Tab | KeyCode::Char('f') | KeyCode::Char('F') => Some(InputAction::CycleDifficulty),

        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputAction::Restart),
        KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('M') => Some(InputAction::Menu),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
