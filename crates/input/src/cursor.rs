//! Board cursor for keyboard play.

use crate::map::InputAction;
use crate::types::{GRID_COLS, GRID_ROWS};

/// A cell position clamped to the board. Row 0 is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    row: u8,
    col: u8,
    rows: u8,
    cols: u8,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(GRID_ROWS, GRID_COLS)
    }
}

impl Cursor {
    /// Cursor for a `rows x cols` board, starting bottom-left where blocks are.
    pub fn new(rows: u8, cols: u8) -> Self {
        Self {
            row: rows.saturating_sub(1),
            col: 0,
            rows,
            cols,
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    /// Apply a cursor movement. Returns `false` for non-movement actions.
    pub fn apply(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::CursorUp => self.row = self.row.saturating_sub(1),
            InputAction::CursorDown => {
                if self.row + 1 < self.rows {
                    self.row += 1;
                }
            }
            InputAction::CursorLeft => self.col = self.col.saturating_sub(1),
            InputAction::CursorRight => {
                if self.col + 1 < self.cols {
                    self.col += 1;
                }
            }
            _ => return false,
        }
        true
    }
}
