//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: views render a
//! [`core::GameSnapshot`] into a framebuffer, and [`TerminalRenderer`] diffs
//! and flushes that framebuffer to the terminal. No widget or layout library
//! is involved.
//!
//! Two views are provided:
//! - [`GameView`]: character grid, two columns per board cell
//! - [`PixelView`]: one pixel per board cell, two pixel rows per terminal row

pub mod fb;
pub mod game_view;
pub mod pixel_view;
pub mod renderer;
pub mod view;

pub use tui_snake_core as core;
pub use tui_snake_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::GameView;
pub use pixel_view::PixelView;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use view::{RemoteStatus, View, Viewport};
