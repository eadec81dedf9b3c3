//! Terminal input (engine-facing).
//!
//! Maps `crossterm` key events to [`crate::types::Intent`] and coalesces
//! direction requests between ticks.

pub mod handler;
pub mod map;

pub use tui_snake_types as types;

pub use handler::DirectionLatch;
pub use map::{handle_key_event, should_quit};
