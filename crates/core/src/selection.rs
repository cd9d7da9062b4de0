//! Selection module - the player's in-progress pick and its evaluation
//!
//! A selection is an insertion-ordered set of block ids. [`evaluate`] classifies
//! it against the target; it is a pure function of its inputs.

use crate::grid::Grid;
use crate::types::{BlockId, MatchCentroid, MatchOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<BlockId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[BlockId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.ids.contains(&id)
    }

    /// Flip membership of `id`, keeping the order of everything else.
    ///
    /// Returns `true` if the id is selected afterwards.
    pub fn toggle(&mut self, id: BlockId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Sum of the selected blocks' values
    pub fn sum(&self, grid: &Grid) -> u32 {
        self.ids
            .iter()
            .filter_map(|&id| grid.block(id))
            .map(|b| b.value as u32)
            .sum()
    }

    /// Average column/row of the selected blocks, `None` when nothing is selected
    pub fn centroid(&self, grid: &Grid) -> Option<MatchCentroid> {
        let mut count = 0u32;
        let mut cols = 0u32;
        let mut rows = 0u32;
        for block in self.ids.iter().filter_map(|&id| grid.block(id)) {
            count += 1;
            cols += block.col as u32;
            rows += block.row as u32;
        }
        if count == 0 {
            return None;
        }
        Some(MatchCentroid {
            x: cols as f32 / count as f32,
            y: rows as f32 / count as f32,
        })
    }
}

/// Classify a selection against the target
///
/// An empty selection is always `Under`, even against a zero target.
pub fn evaluate(grid: &Grid, selection: &Selection, target: u32) -> MatchOutcome {
    if selection.is_empty() {
        return MatchOutcome::Under;
    }
    let sum = selection.sum(grid);
    if sum == target {
        MatchOutcome::Exact
    } else if sum > target {
        MatchOutcome::Over
    } else {
        MatchOutcome::Under
    }
}
