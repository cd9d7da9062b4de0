//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`InputAction`]s and tracks the board cursor the player moves
//! around to pick blocks. Turning actions into engine commands is the host's job.

pub mod cursor;
pub mod map;

pub use sumfall_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, should_quit, InputAction};
