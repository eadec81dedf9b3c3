//! Snake body with an occupancy grid.
//!
//! The body is a ring buffer (`VecDeque`) with the head at the front and the tail
//! at the back. It is sized to the board's cell count up front, so moving and
//! growing never reallocate. A flat occupancy grid mirrors the body for O(1)
//! membership tests; every insert and removal goes through [`Snake::advance`],
//! which keeps the two in lockstep.

use std::collections::VecDeque;

use crate::board::Board;
use crate::error::ConfigError;
use crate::types::{Cell, Direction};

#[derive(Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    occupied: Vec<bool>,
    board: Board,
}

impl Snake {
    /// Lay out a straight snake of `len` cells with its head at `head`, the body
    /// trailing behind it opposite to `heading`.
    pub fn spawn(
        board: Board,
        head: Cell,
        heading: Direction,
        len: usize,
    ) -> Result<Self, ConfigError> {
        let back = heading.opposite();
        let mut cells = Vec::with_capacity(len);
        let mut cell = head;
        for _ in 0..len {
            cells.push(cell);
            cell = cell.step(back);
        }
        Self::from_cells(board, cells)
    }

    /// Build a snake from explicit cells (head first).
    ///
    /// Cells must be on the board, pairwise distinct and orthogonally adjacent in
    /// sequence.
    pub fn from_cells(
        board: Board,
        cells: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, ConfigError> {
        let mut snake = Self {
            body: VecDeque::with_capacity(board.cell_count()),
            occupied: vec![false; board.cell_count()],
            board,
        };

        for cell in cells {
            let idx = board.index(cell).ok_or(ConfigError::OutOfBounds(cell))?;
            if snake.occupied[idx] {
                return Err(ConfigError::OverlappingSnake(cell));
            }
            if let Some(&prev) = snake.body.back() {
                let dist = (prev.row - cell.row).abs() + (prev.col - cell.col).abs();
                if dist != 1 {
                    return Err(ConfigError::DisjointSnake(prev, cell));
                }
            }
            snake.occupied[idx] = true;
            snake.body.push_back(cell);
        }

        if snake.body.is_empty() {
            return Err(ConfigError::EmptySnake);
        }
        Ok(snake)
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a constructed snake; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn board(&self) -> Board {
        self.board
    }

    /// Cells from head to tail
    pub fn cells(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    /// Check whether any segment occupies `cell`
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.board
            .index(cell)
            .map(|i| self.occupied[i])
            .unwrap_or(false)
    }

    /// Check whether moving the head onto `cell` this tick bites the body.
    ///
    /// The tail is excluded: on a non-growing tick it moves out of the way in the
    /// same step. A growing tick can never target the tail because food is never
    /// placed on the snake.
    pub fn bites(&self, cell: Cell) -> bool {
        self.contains(cell) && cell != self.tail()
    }

    /// Insert `new_head` at the front. Unless `grow` is set, the tail is popped
    /// first so the length stays constant.
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        if !grow {
            if let Some(old_tail) = self.body.pop_back() {
                if let Some(i) = self.board.index(old_tail) {
                    self.occupied[i] = false;
                }
            }
        }

        if let Some(i) = self.board.index(new_head) {
            self.occupied[i] = true;
        }
        self.body.push_front(new_head);
    }

    /// Number of board cells not covered by the body
    pub fn free_cells(&self) -> usize {
        self.board.cell_count() - self.body.len()
    }
}

// Manual impl: the derived one would shrink the ring buffer's capacity to the
// current length, and the clone would then reallocate as it grows.
impl Clone for Snake {
    fn clone(&self) -> Self {
        let mut body = VecDeque::with_capacity(self.body.capacity());
        body.extend(self.body.iter().copied());
        Self {
            body,
            occupied: self.occupied.clone(),
            board: self.board,
        }
    }
}

impl PartialEq for Snake {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.body == other.body
    }
}

impl Eq for Snake {}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(w: u16, h: u16) -> Board {
        Board::new(w, h).unwrap()
    }

    fn cells(snake: &Snake) -> Vec<(i32, i32)> {
        snake.cells().map(|c| (c.row, c.col)).collect()
    }

    #[test]
    fn test_spawn_trails_behind_heading() {
        let snake = Snake::spawn(board(5, 5), Cell::new(2, 2), Direction::Right, 3).unwrap();
        assert_eq!(cells(&snake), vec![(2, 2), (2, 1), (2, 0)]);

        let snake = Snake::spawn(board(5, 5), Cell::new(1, 1), Direction::Up, 3).unwrap();
        assert_eq!(cells(&snake), vec![(1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn test_spawn_off_board_fails() {
        let err = Snake::spawn(board(5, 5), Cell::new(2, 1), Direction::Right, 3).unwrap_err();
        assert_eq!(err, ConfigError::OutOfBounds(Cell::new(2, -1)));
    }

    #[test]
    fn test_from_cells_validates_layout() {
        let b = board(5, 5);
        assert_eq!(
            Snake::from_cells(b, Vec::new()).unwrap_err(),
            ConfigError::EmptySnake
        );
        assert_eq!(
            Snake::from_cells(b, [Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 0)]).unwrap_err(),
            ConfigError::OverlappingSnake(Cell::new(0, 0))
        );
        assert_eq!(
            Snake::from_cells(b, [Cell::new(0, 0), Cell::new(1, 1)]).unwrap_err(),
            ConfigError::DisjointSnake(Cell::new(0, 0), Cell::new(1, 1))
        );
    }

    #[test]
    fn test_advance_without_growth_keeps_length() {
        let mut snake = Snake::spawn(board(5, 5), Cell::new(2, 2), Direction::Right, 3).unwrap();
        snake.advance(Cell::new(2, 3), false);

        assert_eq!(cells(&snake), vec![(2, 3), (2, 2), (2, 1)]);
        assert!(!snake.contains(Cell::new(2, 0)));
        assert!(snake.contains(Cell::new(2, 3)));
    }

    #[test]
    fn test_advance_with_growth_keeps_tail() {
        let mut snake = Snake::spawn(board(5, 5), Cell::new(2, 2), Direction::Right, 3).unwrap();
        snake.advance(Cell::new(2, 3), true);

        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Cell::new(2, 0));
        assert!(snake.contains(Cell::new(2, 0)));
        assert_eq!(snake.free_cells(), 21);
    }

    #[test]
    fn test_moving_into_vacated_tail_keeps_cell_occupied() {
        // 2x2 loop: head (0,0) -> (0,1) -> (1,1) -> tail (1,0).
        let b = board(4, 4);
        let mut snake = Snake::from_cells(
            b,
            [Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1), Cell::new(1, 0)],
        )
        .unwrap();

        let next = Cell::new(1, 0);
        assert!(!snake.bites(next));
        snake.advance(next, false);

        assert_eq!(snake.head(), next);
        assert!(snake.contains(next));
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn test_bites_body_but_not_tail() {
        let snake = Snake::from_cells(
            board(4, 4),
            [Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1), Cell::new(1, 0)],
        )
        .unwrap();
        assert!(snake.bites(Cell::new(0, 1)));
        assert!(snake.bites(Cell::new(1, 1)));
        assert!(!snake.bites(Cell::new(1, 0)));
        assert!(!snake.bites(Cell::new(2, 2)));
    }

    #[test]
    fn test_clone_preserves_capacity() {
        let snake = Snake::spawn(board(10, 10), Cell::new(5, 5), Direction::Right, 3).unwrap();
        let copy = snake.clone();
        assert_eq!(copy, snake);
        assert!(copy.body.capacity() >= 100);
    }
}
