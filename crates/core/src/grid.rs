//! Grid module - block placement, row injection and gravity
//!
//! The grid is an unordered set of numbered blocks on a `rows` x `cols` board.
//! Coordinates: `row` grows downward (row 0 is the top/danger row), `col` grows
//! to the right. Outside of a transition every column is packed toward the
//! bottom with no gaps.

use serde::Serialize;
use thiserror::Error;

use crate::rng::BlockSource;
use crate::types::{BlockId, MAX_BLOCK_VALUE, MIN_BLOCK_VALUE};

/// A single numbered tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Block {
    pub id: BlockId,
    pub value: u8,
    pub row: u8,
    pub col: u8,
}

/// Result of trying to push a new row in at the bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    /// Everything shifted up one row and a fresh bottom row was added
    Injected,
    /// Row 0 was occupied; the grid was left untouched
    GameOver,
}

/// Rejected hand-built grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("block {id:?} at ({row}, {col}) is outside a {rows}x{cols} grid")]
    OutOfBounds {
        id: BlockId,
        row: u8,
        col: u8,
        rows: u8,
        cols: u8,
    },
    #[error("block {id:?} has value {value}, expected 1..=9")]
    InvalidValue { id: BlockId, value: u8 },
    #[error("two blocks occupy ({row}, {col})")]
    Overlap { row: u8, col: u8 },
    #[error("block id {0:?} is used twice")]
    DuplicateId(BlockId),
    #[error("column {col} has a gap under row {row}")]
    Unsettled { row: u8, col: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: u8,
    cols: u8,
    blocks: Vec<Block>,
}

impl Grid {
    /// Create an empty grid
    pub fn empty(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            blocks: Vec::with_capacity(rows as usize * cols as usize),
        }
    }

    /// Fill the bottom `initial_rows` rows, one fresh block per cell
    pub fn initialize<S: BlockSource>(
        rows: u8,
        cols: u8,
        initial_rows: u8,
        source: &mut S,
    ) -> Self {
        let mut grid = Self::empty(rows, cols);
        let filled = initial_rows.min(rows);
        for r in 0..filled {
            let row = rows - 1 - r;
            for col in 0..cols {
                grid.blocks.push(source.spawn(row, col));
            }
        }
        grid
    }

    /// Build a grid from explicit blocks (scenario setup, replays)
    ///
    /// The blocks must be in bounds, hold valid values, use unique ids and cells,
    /// and already be settled.
    pub fn from_blocks(rows: u8, cols: u8, blocks: Vec<Block>) -> Result<Self, GridError> {
        for (i, b) in blocks.iter().enumerate() {
            if b.row >= rows || b.col >= cols {
                return Err(GridError::OutOfBounds {
                    id: b.id,
                    row: b.row,
                    col: b.col,
                    rows,
                    cols,
                });
            }
            if !(MIN_BLOCK_VALUE..=MAX_BLOCK_VALUE).contains(&b.value) {
                return Err(GridError::InvalidValue {
                    id: b.id,
                    value: b.value,
                });
            }
            for other in &blocks[..i] {
                if other.id == b.id {
                    return Err(GridError::DuplicateId(b.id));
                }
                if other.row == b.row && other.col == b.col {
                    return Err(GridError::Overlap {
                        row: b.row,
                        col: b.col,
                    });
                }
            }
        }

        let grid = Self { rows, cols, blocks };
        if let Some((row, col)) = grid.first_gap() {
            return Err(GridError::Unsettled { row, col });
        }
        Ok(grid)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.block(id).is_some()
    }

    pub fn block_at(&self, row: u8, col: u8) -> Option<&Block> {
        self.blocks.iter().find(|b| b.row == row && b.col == col)
    }

    /// Blocks of one column, bottom first
    pub fn column(&self, col: u8) -> Vec<Block> {
        let mut column: Vec<Block> = self.blocks.iter().filter(|b| b.col == col).copied().collect();
        column.sort_by(|a, b| b.row.cmp(&a.row));
        column
    }

    /// Whether any block sits in the top row
    ///
    /// Not terminal by itself: the next injection attempt is.
    pub fn top_row_occupied(&self) -> bool {
        self.blocks.iter().any(|b| b.row == 0)
    }

    /// Every column is a contiguous run anchored at the bottom row
    pub fn is_gravity_consistent(&self) -> bool {
        self.first_gap().is_none()
    }

    fn first_gap(&self) -> Option<(u8, u8)> {
        for col in 0..self.cols {
            for (depth, block) in self.column(col).iter().enumerate() {
                let expected = self.rows - 1 - depth as u8;
                if block.row != expected {
                    return Some((expected, col));
                }
            }
        }
        None
    }

    /// Shift everything up one row and add a fresh bottom row.
    ///
    /// Reports [`InjectOutcome::GameOver`] without touching the grid when a block
    /// already occupies row 0.
    pub fn inject_row<S: BlockSource>(&mut self, source: &mut S) -> InjectOutcome {
        if self.rows == 0 || self.top_row_occupied() {
            return InjectOutcome::GameOver;
        }

        for block in &mut self.blocks {
            block.row -= 1;
        }

        let bottom = self.rows - 1;
        for col in 0..self.cols {
            self.blocks.push(source.spawn(bottom, col));
        }

        InjectOutcome::Injected
    }

    /// Remove the given blocks and let each column settle.
    ///
    /// Returns the number of blocks actually removed. Unknown ids are ignored.
    pub fn remove_and_compact(&mut self, ids: &[BlockId]) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|b| !ids.contains(&b.id));
        let removed = before - self.blocks.len();
        if removed > 0 {
            self.compact();
        }
        removed
    }

    /// Column-local, bottom-anchored, order-preserving settle
    fn compact(&mut self) {
        let bottom = self.rows - 1;
        for col in 0..self.cols {
            let mut column: Vec<usize> = self
                .blocks
                .iter()
                .enumerate()
                .filter(|(_, b)| b.col == col)
                .map(|(i, _)| i)
                .collect();

            // Lowest block (largest row) first.
            column.sort_by(|&a, &b| self.blocks[b].row.cmp(&self.blocks[a].row));

            for (depth, idx) in column.into_iter().enumerate() {
                self.blocks[idx].row = bottom - depth as u8;
            }
        }
    }
}
