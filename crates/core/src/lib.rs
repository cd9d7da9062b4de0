//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **zero dependencies** on UI, terminal or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Randomness and block ids are injected
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`config`]: Grid dimensions, target range and delays, validated up front
//! - [`grid`]: Block store with column gravity and bottom row injection
//! - [`selection`]: The player's pick and its classification against the target
//! - [`scoring`]: Combo-scaled match points
//! - [`rng`]: Seedable randomness, id sources and block spawning
//! - [`game_state`]: Lifecycle, match resolution and the time-mode countdown
//! - [`snapshot`]: Owned, serializable view of the whole state
//!
//! # Game Rules
//!
//! - The board starts with the bottom rows filled with blocks valued 1-9
//! - The player selects blocks anywhere on the board; order does not matter
//! - A selection summing to exactly the target is removed after a short delay,
//!   the columns settle, and the combo grows
//! - Overshooting the target clears the selection and breaks the combo
//! - **Classic**: every match pushes a new row in from the bottom
//! - **Time**: a new row arrives whenever the countdown runs out
//! - A row that cannot fit ends the game
//!
//! # Example
//!
//! ```
//! use sumfall_core::GameState;
//! use sumfall_types::{Difficulty, GameMode, MatchOutcome};
//!
//! let mut game = GameState::new(12345);
//! game.start(GameMode::Classic, Difficulty::Medium);
//!
//! // A single block is worth at most 9, targets start at 10.
//! let id = game.grid().blocks()[0].id;
//! assert_eq!(game.toggle(id), Some(MatchOutcome::Under));
//! assert_eq!(game.selection_sum(), game.grid().block(id).unwrap().value as u32);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::advance`](game_state::GameState::advance) every frame with
//! the elapsed time. It resolves matches after 250ms, clears overshoots after
//! 150ms and counts the time-mode clock down once per second.

pub mod config;
pub mod game_state;
pub mod grid;
pub mod rng;
pub mod scoring;
pub mod selection;
pub mod snapshot;

pub use sumfall_types as types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, EngineConfig};
pub use game_state::{EngineEvent, EngineEvents, GameState, TickOutcome};
pub use grid::{Block, Grid, GridError, InjectOutcome};
pub use rng::{BlockSource, BlockSpawner, IdSource, SequentialIds, SimpleRng};
pub use scoring::{calculate_match_points, score_match, ScoreResult};
pub use selection::{evaluate, Selection};
pub use snapshot::{BlockSnapshot, GameSnapshot};
