//! Scoring module - combo-scaled match rewards
//!
//! A resolved match first advances the combo, then pays
//! `blocks * POINTS_PER_BLOCK * combo`. Reward scales linearly with both the
//! match size and the streak.

use crate::types::POINTS_PER_BLOCK;

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Combo after this match
    pub combo: u32,
    /// Points awarded for this match
    pub points: u32,
}

/// Points for a match of `blocks` blocks at combo `combo`
pub fn calculate_match_points(blocks: usize, combo: u32) -> u32 {
    u32::try_from(blocks)
        .unwrap_or(u32::MAX)
        .saturating_mul(POINTS_PER_BLOCK)
        .saturating_mul(combo)
}

/// Advance the combo and score one resolved match
pub fn score_match(blocks: usize, combo_before: u32) -> ScoreResult {
    let combo = combo_before.saturating_add(1);
    ScoreResult {
        combo,
        points: calculate_match_points(blocks, combo),
    }
}
