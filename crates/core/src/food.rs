//! Food placement by rejection sampling.
//!
//! Draw a uniformly random row and column on the board; redraw while the cell
//! is occupied. The result is uniform over the free cells. Expected draws grow
//! as `cells / free_cells`, so placement slows down on a nearly full board but
//! still terminates with probability 1 while at least one cell is free.
//! A completely full board has no answer and yields `None`.

use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::board::Board;
use crate::snake::Snake;
use crate::types::Cell;

/// A set of cells food must avoid
pub trait Occupancy {
    fn is_occupied(&self, cell: Cell) -> bool;

    /// Number of distinct occupied cells on the board
    fn occupied_count(&self) -> usize;
}

impl Occupancy for Snake {
    fn is_occupied(&self, cell: Cell) -> bool {
        self.contains(cell)
    }

    fn occupied_count(&self) -> usize {
        self.len()
    }
}

impl Occupancy for HashSet<Cell> {
    fn is_occupied(&self, cell: Cell) -> bool {
        self.contains(&cell)
    }

    fn occupied_count(&self) -> usize {
        self.len()
    }
}

/// Linear-scan occupancy over a plain list of distinct cells.
impl Occupancy for [Cell] {
    fn is_occupied(&self, cell: Cell) -> bool {
        self.contains(&cell)
    }

    fn occupied_count(&self) -> usize {
        self.len()
    }
}

/// Pick a uniformly random cell on `board` that is not in `occupied`.
///
/// Returns `None` only when `occupied` covers the whole board.
pub fn place_food<O, R>(board: Board, occupied: &O, rng: &mut R) -> Option<Cell>
where
    O: Occupancy + ?Sized,
    R: Rng + ?Sized,
{
    if occupied.occupied_count() >= board.cell_count() {
        return None;
    }

    let mut draws: u32 = 0;
    loop {
        draws = draws.wrapping_add(1);
        let cell = Cell::new(
            rng.random_range(0..board.height() as i32),
            rng.random_range(0..board.width() as i32),
        );
        if !occupied.is_occupied(cell) {
            debug!("food placed at ({}, {}) after {} draws", cell.row, cell.col, draws);
            return Some(cell);
        }
    }
}
