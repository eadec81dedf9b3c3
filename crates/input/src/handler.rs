//! Coalesces direction requests between ticks.
//!
//! Keys arrive at any rate; the engine consumes at most one direction per
//! tick. [`DirectionLatch`] keeps the latest *accepted* request: a request that
//! would reverse the committed heading is dropped on arrival and does not
//! overwrite an earlier accepted one.

use crate::types::Direction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionLatch {
    pending: Option<Direction>,
}

impl DirectionLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a request against the heading committed by the last tick.
    ///
    /// Returns whether the request was accepted.
    pub fn request(&mut self, direction: Direction, committed: Direction) -> bool {
        if direction.is_reversal_of(committed) {
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Hand the pending request to the next tick and reset.
    pub fn take(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
