//! Core types module - shared vocabulary and reference constants
//!
//! This crate defines the small, dependency-light types shared between the engine,
//! the input mapping and the terminal view. Everything here is plain data: no game
//! rules live in this crate.
//!
//! # Board Dimensions
//!
//! Reference playfield:
//!
//! - **Columns**: 6 (indexed 0-5)
//! - **Rows**: 10 (indexed 0-9, row 0 is the top/danger row)
//! - **Initial rows**: the bottom 4 rows are filled at game start
//!
//! Dimensions are engine configuration, these constants only provide the defaults.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MATCH_CONFIRM_MS` | 250 | Presentation delay before an exact match resolves |
//! | `OVERSHOOT_CLEAR_MS` | 150 | Delay before an over-target selection is cleared |
//! | `MATCH_FEEDBACK_MS` | 500 | How long the last-match centroid stays visible |
//! | `COUNTDOWN_STEP_MS` | 1000 | Length of one countdown step in time mode |
//! | `TICK_MS` | 16 | Host frame length (~60 FPS) |
//!
//! # Row Cadence by Difficulty
//!
//! | Difficulty | Seconds per row |
//! |------------|-----------------|
//! | Slow | 12 |
//! | Medium | 8 |
//! | Fast | 5 |
//!
//! # Examples
//!
//! ```
//! use sumfall_types::{Difficulty, GameMode, GRID_COLS, GRID_ROWS};
//!
//! let mode = GameMode::from_str("time").unwrap();
//! assert_eq!(mode, GameMode::Time);
//!
//! let difficulty = Difficulty::from_str("FAST").unwrap();
//! assert_eq!(difficulty.seconds_per_row(), 5);
//!
//! assert_eq!(GRID_ROWS, 10);
//! assert_eq!(GRID_COLS, 6);
//! ```

use serde::Serialize;

/// Board height in cells (10 rows)
pub const GRID_ROWS: u8 = 10;

/// Board width in cells (6 columns)
pub const GRID_COLS: u8 = 6;

/// Rows filled with blocks when a game starts
pub const INITIAL_ROWS: u8 = 4;

/// Smallest block value
pub const MIN_BLOCK_VALUE: u8 = 1;

/// Largest block value
pub const MAX_BLOCK_VALUE: u8 = 9;

/// Smallest target sum (inclusive)
pub const TARGET_MIN: u32 = 10;

/// Largest target sum (inclusive)
pub const TARGET_MAX: u32 = 24;

/// Points awarded per matched block, before the combo multiplier
pub const POINTS_PER_BLOCK: u32 = 10;

/// Presentation delay before an exact match resolves (250ms)
pub const MATCH_CONFIRM_MS: u32 = 250;

/// Delay before an over-target selection is cleared (150ms)
pub const OVERSHOOT_CLEAR_MS: u32 = 150;

/// How long the last-match centroid stays available (500ms)
pub const MATCH_FEEDBACK_MS: u32 = 500;

/// One countdown step in time mode (1 second)
pub const COUNTDOWN_STEP_MS: u32 = 1000;

/// Rows at the top of the board that are flagged as endangered
pub const DANGER_ROWS: u8 = 2;

/// Host frame length (16ms = ~60 FPS)
pub const TICK_MS: u32 = 16;


/// Opaque block identifier
///
/// Ids are unique for the lifetime of a game; they are never reused for a
/// different block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockId(pub u32);

/// Game modes
///
/// - **Classic**: a new row is injected after every resolved match
/// - **Time**: a new row is injected whenever the countdown runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Classic,
    Time,
}

impl GameMode {
    /// Parse mode from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use sumfall_types::GameMode;
    ///
    /// assert_eq!(GameMode::from_str("Classic"), Some(GameMode::Classic));
    /// assert_eq!(GameMode::from_str("TIME"), Some(GameMode::Time));
    /// assert_eq!(GameMode::from_str("zen"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "time" => Some(GameMode::Time),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Time => "time",
        }
    }
}

/// Row-injection cadence
///
/// The cadence is both the time-mode countdown length and the pacing reference
/// shown for classic mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Slow,
    Medium,
    Fast,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Slow, Difficulty::Medium, Difficulty::Fast];

    /// Seconds between forced rows
    pub fn seconds_per_row(&self) -> u32 {
        match self {
            Difficulty::Slow => 12,
            Difficulty::Medium => 8,
            Difficulty::Fast => 5,
        }
    }

    /// Next difficulty in menu order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Slow => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Fast,
            Difficulty::Fast => Difficulty::Slow,
        }
    }

    /// Parse difficulty from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(Difficulty::Slow),
            "medium" => Some(Difficulty::Medium),
            "fast" => Some(Difficulty::Fast),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Slow => "slow",
            Difficulty::Medium => "medium",
            Difficulty::Fast => "fast",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

/// Classification of a selection against the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    /// Sum below target (including the empty selection)
    Under,
    /// Sum equals target
    Exact,
    /// Sum strictly above target
    Over,
}

/// Commands a presentation layer can send to the engine
///
/// These are used by both the terminal host and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    /// Start a fresh game
    Start(GameMode, Difficulty),
    /// Flip membership of a block in the selection
    Toggle(BlockId),
    /// Start again with the current mode and difficulty
    Restart,
    /// Return to the menu, discarding the game
    Reset,
}

/// Average position of the most recently matched blocks
///
/// Purely advisory: presentation uses it to place match feedback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchCentroid {
    /// Average column
    pub x: f32,
    /// Average row
    pub y: f32,
}

/// Engine-side event emitted after a match resolves.
///
/// Observers drain it with `take_last_event` (e.g. to show a points popup).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchEvent {
    pub blocks_removed: u32,
    pub points: u32,
    pub combo: u32,
    pub centroid: MatchCentroid,
    pub row_injected: bool,
    pub game_over: bool,
}
