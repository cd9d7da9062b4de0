//! Engine configuration
//!
//! Board dimensions, target range and the presentation delays are configuration,
//! not hardcoded constants. [`EngineConfig::default`] is the reference setup.

use thiserror::Error;

use crate::types::{
    DANGER_ROWS, GRID_COLS, GRID_ROWS, INITIAL_ROWS, MATCH_CONFIRM_MS, MATCH_FEEDBACK_MS,
    OVERSHOOT_CLEAR_MS, TARGET_MAX, TARGET_MIN,
};

/// Rejected engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: u8, cols: u8 },
    #[error("initial rows ({initial}) exceed grid rows ({rows})")]
    TooManyInitialRows { initial: u8, rows: u8 },
    #[error("target range {min}..={max} is empty or starts at zero")]
    InvalidTargetRange { min: u32, max: u32 },
    #[error("target must be positive")]
    ZeroTarget,
    #[error("grid is {got_rows}x{got_cols} but the engine is configured for {rows}x{cols}")]
    GridMismatch {
        rows: u8,
        cols: u8,
        got_rows: u8,
        got_cols: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub rows: u8,
    pub cols: u8,
    pub initial_rows: u8,
    pub target_min: u32,
    pub target_max: u32,
    pub match_confirm_ms: u32,
    pub overshoot_clear_ms: u32,
    pub match_feedback_ms: u32,
    /// Blocks above this row are flagged as endangered.
    pub danger_rows: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: GRID_ROWS,
            cols: GRID_COLS,
            initial_rows: INITIAL_ROWS,
            target_min: TARGET_MIN,
            target_max: TARGET_MAX,
            match_confirm_ms: MATCH_CONFIRM_MS,
            overshoot_clear_ms: OVERSHOOT_CLEAR_MS,
            match_feedback_ms: MATCH_FEEDBACK_MS,
            danger_rows: DANGER_ROWS,
        }
    }
}

impl EngineConfig {
    /// Reference config with different board dimensions
    pub fn with_dimensions(rows: u8, cols: u8, initial_rows: u8) -> Self {
        Self {
            rows,
            cols,
            initial_rows,
            ..Self::default()
        }
    }

    /// Create from environment variables, falling back to defaults for anything
    /// missing or unparsable
    pub fn from_env() -> Self {
        use std::env;

        fn var<T: std::str::FromStr>(name: &str) -> Option<T> {
            env::var(name).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            rows: var("SUMFALL_ROWS").unwrap_or(defaults.rows),
            cols: var("SUMFALL_COLS").unwrap_or(defaults.cols),
            initial_rows: var("SUMFALL_INITIAL_ROWS").unwrap_or(defaults.initial_rows),
            target_min: var("SUMFALL_TARGET_MIN").unwrap_or(defaults.target_min),
            target_max: var("SUMFALL_TARGET_MAX").unwrap_or(defaults.target_max),
            ..defaults
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.initial_rows > self.rows {
            return Err(ConfigError::TooManyInitialRows {
                initial: self.initial_rows,
                rows: self.rows,
            });
        }
        if self.target_min == 0 || self.target_min > self.target_max {
            return Err(ConfigError::InvalidTargetRange {
                min: self.target_min,
                max: self.target_max,
            });
        }
        Ok(())
    }
}
