//! Board module - playable grid dimensions
//!
//! The board is immutable for the lifetime of a session. It defines the legal
//! coordinate range `[0, height)` rows by `[0, width)` columns and provides the
//! flat row-major indexing shared by the occupancy grid and food placement.
//! Any border a renderer draws sits outside this range.

use crate::error::ConfigError;
use crate::types::{Cell, INITIAL_SNAKE_LEN, MAX_BOARD_CELLS};

/// Playable grid dimensions for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    width: u16,
    height: u16,
}

impl Board {
    /// Validate and create a board.
    ///
    /// The board must be wide enough for the horizontal starting snake, leave
    /// at least one cell free for the first food and stay within
    /// [`MAX_BOARD_CELLS`].
    pub fn new(width: u16, height: u16) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroDimension { width, height });
        }
        if (width as usize) < INITIAL_SNAKE_LEN {
            return Err(ConfigError::TooNarrow { width });
        }
        let board = Self { width, height };
        if board.cell_count() <= INITIAL_SNAKE_LEN {
            return Err(ConfigError::NoRoomForFood { width, height });
        }
        if board.cell_count() > MAX_BOARD_CELLS {
            return Err(ConfigError::TooLarge {
                width,
                height,
                max: MAX_BOARD_CELLS,
            });
        }
        Ok(board)
    }

    /// Get width of the board (columns)
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get height of the board (rows)
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Check if a cell lies inside the legal range
    #[inline(always)]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && cell.row < self.height as i32
            && cell.col < self.width as i32
    }

    /// Row-major flat index of `cell`, or `None` when it is off the board
    #[inline(always)]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some((cell.row as usize) * (self.width as usize) + (cell.col as usize))
    }

    /// Inverse of [`Board::index`]
    pub fn cell_at(&self, index: usize) -> Cell {
        let w = self.width as usize;
        Cell::new((index / w) as i32, (index % w) as i32)
    }

    /// Iterate all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.cell_count()).map(move |i| self.cell_at(i))
    }

    /// Head position of a fresh snake: middle row, a quarter of the way across
    /// (never so close to the left edge that the body would not fit).
    pub fn spawn_head(&self) -> Cell {
        let col = (self.width / 4).max(INITIAL_SNAKE_LEN as u16 - 1);
        Cell::new((self.height / 2) as i32, col as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        assert_eq!(
            Board::new(0, 5),
            Err(ConfigError::ZeroDimension {
                width: 0,
                height: 5
            })
        );
        assert!(matches!(
            Board::new(5, 0),
            Err(ConfigError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn test_rejects_boards_smaller_than_snake() {
        assert_eq!(Board::new(2, 10), Err(ConfigError::TooNarrow { width: 2 }));
        // 3x1 fits the snake but leaves nowhere for food.
        assert_eq!(
            Board::new(3, 1),
            Err(ConfigError::NoRoomForFood {
                width: 3,
                height: 1
            })
        );
        assert!(Board::new(4, 1).is_ok());
    }

    #[test]
    fn test_rejects_boards_over_cell_limit() {
        assert_eq!(
            Board::new(u16::MAX, u16::MAX),
            Err(ConfigError::TooLarge {
                width: u16::MAX,
                height: u16::MAX,
                max: MAX_BOARD_CELLS,
            })
        );
        assert!(matches!(
            Board::new(1025, 1024),
            Err(ConfigError::TooLarge { .. })
        ));
        assert_eq!(Board::new(1024, 1024).unwrap().cell_count(), MAX_BOARD_CELLS);
        // Long and thin is fine as long as the area fits.
        assert!(Board::new(u16::MAX, 16).is_ok());
    }

    #[test]
    fn test_contains_is_half_open() {
        let board = Board::new(5, 4).unwrap();
        assert!(board.contains(Cell::new(0, 0)));
        assert!(board.contains(Cell::new(3, 4)));
        assert!(!board.contains(Cell::new(4, 0)));
        assert!(!board.contains(Cell::new(0, 5)));
        assert!(!board.contains(Cell::new(-1, 2)));
        assert!(!board.contains(Cell::new(2, -1)));
    }

    #[test]
    fn test_index_round_trips_every_cell() {
        let board = Board::new(7, 3).unwrap();
        for (i, cell) in board.cells().enumerate() {
            assert_eq!(board.index(cell), Some(i));
        }
        assert_eq!(board.cells().count(), 21);
        assert_eq!(board.index(Cell::new(3, 0)), None);
    }

    #[test]
    fn test_spawn_head_leaves_room_for_body() {
        assert_eq!(Board::new(5, 5).unwrap().spawn_head(), Cell::new(2, 2));
        assert_eq!(Board::new(40, 20).unwrap().spawn_head(), Cell::new(10, 10));
        assert_eq!(Board::new(3, 2).unwrap().spawn_head(), Cell::new(1, 2));
    }
}
