//! Sumfall (workspace facade crate).
//!
//! Re-exports the workspace crates as `sumfall::{core,input,term,types}` and
//! holds the host-side pieces shared by the binary and the integration tests.

pub mod host;
pub mod logging;

pub use sumfall_core as core;
pub use sumfall_input as input;
pub use sumfall_term as term;
pub use sumfall_types as types;
