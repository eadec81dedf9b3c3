//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, remote protocol).
//!
//! # Coordinates
//!
//! Grid positions are `(row, col)` pairs. Rows grow downwards and columns grow
//! to the right, so `Up` is `-row` and `Right` is `+col`. Coordinates are signed:
//! the tick engine computes the next head before checking it against the board,
//! and a head one step past the edge must be representable.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_TICK_MS` | 100 | Fixed tick interval |
//! | `INITIAL_SNAKE_LEN` | 3 | Head plus two body segments |
//!
//! # Examples
//!
//! ```
//! use tui_snake_types::{Cell, Direction};
//!
//! let head = Cell::new(2, 2);
//! assert_eq!(head.step(Direction::Right), Cell::new(2, 3));
//! assert_eq!(head.step(Direction::Up), Cell::new(1, 2));
//!
//! assert!(Direction::Left.is_reversal_of(Direction::Right));
//! assert_eq!(Direction::Up.resolve(Some(Direction::Down)), Direction::Up);
//! ```

/// Fixed tick interval in milliseconds (10 ticks per second)
pub const DEFAULT_TICK_MS: u64 = 100;

/// Number of cells in a freshly spawned snake (head + 2 body segments)
pub const INITIAL_SNAKE_LEN: usize = 3;

/// Largest playable board in cells (1024x1024)
pub const MAX_BOARD_CELLS: usize = 1 << 20;

/// Heading of a new snake
pub const INITIAL_DIRECTION: Direction = Direction::Right;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_defaults() {
        assert_eq!(DEFAULT_TICK_MS, 100);
        assert_eq!(INITIAL_SNAKE_LEN, 3);
        assert_eq!(INITIAL_DIRECTION, Direction::Right);
    }

    #[test]
    fn every_direction_has_exactly_one_reversal() {
        for d in Direction::ALL {
            let reversals: Vec<_> = Direction::ALL
                .iter()
                .filter(|&&o| o.is_reversal_of(d))
                .collect();
            assert_eq!(reversals, vec![&d.opposite()]);
        }
    }

    #[test]
    fn resolve_ignores_reversal_and_accepts_turns() {
        use Direction::*;
        assert_eq!(Right.resolve(Some(Left)), Right);
        assert_eq!(Up.resolve(Some(Down)), Up);
        assert_eq!(Right.resolve(Some(Up)), Up);
        assert_eq!(Right.resolve(Some(Right)), Right);
        assert_eq!(Down.resolve(None), Down);
    }
}

/// A position on the board grid, `(row, col)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell one unit in `direction`
    pub fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

/// The four headings a snake can travel in
///
/// There is no diagonal and no "stopped" state: a live snake always has one
/// committed direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector as `(d_row, d_col)`
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True if travelling in `self` would reverse a snake heading `current`
    pub fn is_reversal_of(self, current: Direction) -> bool {
        self.opposite() == current
    }

    /// Resolve the direction to commit for this tick.
    ///
    /// `requested` wins unless it is the exact opposite of `self`, in which case
    /// the request is dropped and the current heading persists.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_snake_types::Direction;
    ///
    /// assert_eq!(Direction::Right.resolve(Some(Direction::Up)), Direction::Up);
    /// assert_eq!(Direction::Right.resolve(Some(Direction::Left)), Direction::Right);
    /// assert_eq!(Direction::Right.resolve(None), Direction::Right);
    /// ```
    pub fn resolve(self, requested: Option<Direction>) -> Direction {
        match requested {
            Some(next) if !next.is_reversal_of(self) => next,
            _ => self,
        }
    }
}

/// Why a session ended in a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathReason {
    /// The head left the board
    Wall,
    /// The head ran into the snake's own body
    SelfCollision,
}

impl DeathReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathReason::Wall => "wall",
            DeathReason::SelfCollision => "self",
        }
    }
}

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickEvent {
    /// The snake advanced one cell without eating; length unchanged
    Moved,
    /// Food was eaten; length and score grew by one
    Grew,
    /// The snake collided; the session is over
    Died(DeathReason),
    /// Food was eaten and the body now covers the whole board.
    ///
    /// No legal food cell remains, so this ends the session as a win.
    Filled,
}

impl TickEvent {
    /// True for events after which no further ticks are processed
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickEvent::Died(_) | TickEvent::Filled)
    }
}

/// Player intents produced by input collaborators (keyboard or remote)
///
/// Only `Turn` reaches the tick engine; the rest are handled by the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Request a new heading for the next tick
    Turn(Direction),
    /// Toggle host-side pause (ticks are withheld while paused)
    Pause,
    /// Discard the current session and start a fresh one
    Restart,
    /// Leave the program
    Quit,
}
