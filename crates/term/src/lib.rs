//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and renders a [`core::GameSnapshot`] into a framebuffer that is then
//! flushed to the terminal as a diff.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Keep view code pure so it can be unit-tested without a terminal
//! - Allow precise control over aspect ratio (3 chars wide per cell by default)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use sumfall_core as core;
pub use sumfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, CursorPos, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
