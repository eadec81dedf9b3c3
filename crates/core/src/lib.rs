//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the snake simulation: board bounds, the snake body,
//! food placement and the tick engine. It has **no dependencies** on the
//! terminal, networking, or wall-clock time; the host loop owns the timer and
//! calls the engine once per interval.
//!
//! # Module Structure
//!
//! - [`board`]: grid dimensions and bounds checks
//! - [`snake`]: head-first body with an O(1) occupancy grid
//! - [`food`]: rejection-sampled food placement
//! - [`game_state`]: the tick engine
//! - [`session`]: `Initializing -> Running -> Terminated` lifecycle and restart
//! - [`snapshot`]: render-facing copy of the state
//! - [`rng`]: seeded randomness
//!
//! # Tick rules
//!
//! Each tick resolves the requested direction (reversals are ignored), moves
//! the head one cell, then checks in order: wall, body (the tail about to move
//! away does not count), food. Eating grows the snake by one and places new
//! food; otherwise the tail follows the head.
//!
//! # Example
//!
//! ```
//! use tui_snake_core::{Session, SessionConfig};
//! use tui_snake_core::types::{Direction, TickEvent};
//!
//! let config = SessionConfig::new(20, 10, 100, Some(42)).unwrap();
//! let mut session = Session::new(config).unwrap();
//! session.start();
//!
//! let event = session.tick(Some(Direction::Down)).unwrap();
//! assert!(matches!(event, TickEvent::Moved | TickEvent::Grew));
//! assert_eq!(session.state().direction(), Direction::Down);
//! ```

pub mod board;
pub mod error;
pub mod food;
pub mod game_state;
pub mod rng;
pub mod session;
pub mod snake;
pub mod snapshot;

pub use tui_snake_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use error::ConfigError;
pub use food::{place_food, Occupancy};
pub use game_state::{tick, GameState};
pub use rng::SessionRng;
pub use session::{Phase, Session, SessionConfig};
pub use snake::Snake;
pub use snapshot::GameSnapshot;
