//! TUI Snake (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_snake::{core,adapter,term,input,types}`
//! and holds the command-line configuration shared by the binary.

pub mod config;

pub use tui_snake_adapter as adapter;
pub use tui_snake_core as core;
pub use tui_snake_input as input;
pub use tui_snake_term as term;
pub use tui_snake_types as types;
