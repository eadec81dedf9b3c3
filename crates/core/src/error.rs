//! Initialization errors.
//!
//! The simulation itself has no failure modes: collisions are ordinary
//! [`TickEvent::Died`](crate::types::TickEvent::Died) events. The only errors are
//! precondition violations detected before a session starts.

use thiserror::Error;

use crate::types::Cell;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: u16, height: u16 },
    #[error("board width {width} is narrower than the starting snake")]
    TooNarrow { width: u16 },
    #[error("board {width}x{height} leaves no free cell for food")]
    NoRoomForFood { width: u16, height: u16 },
    #[error("board {width}x{height} exceeds {max} cells")]
    TooLarge { width: u16, height: u16, max: usize },
    #[error("tick interval must be at least 1ms")]
    ZeroTickInterval,
    #[error("snake must have at least one cell")]
    EmptySnake,
    #[error("cell ({}, {}) lies outside the board", .0.row, .0.col)]
    OutOfBounds(Cell),
    #[error("snake occupies cell ({}, {}) twice", .0.row, .0.col)]
    OverlappingSnake(Cell),
    #[error(
        "snake segments ({}, {}) and ({}, {}) are not adjacent",
        .0.row, .0.col, .1.row, .1.col
    )]
    DisjointSnake(Cell, Cell),
    #[error("food at ({}, {}) overlaps the snake", .0.row, .0.col)]
    FoodOnSnake(Cell),
}
