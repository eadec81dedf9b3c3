use crate::types::{Cell, DeathReason, Direction, TickEvent, INITIAL_DIRECTION};

/// Render-facing copy of one session's state.
///
/// Views and the remote adapter read this instead of borrowing the live
/// [`GameState`](crate::GameState). The snake buffer is reused across
/// [`GameState::snapshot_into`](crate::GameState::snapshot_into) calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: u16,
    pub height: u16,
    /// Head first
    pub snake: Vec<Cell>,
    pub direction: Direction,
    pub food: Option<Cell>,
    pub score: u32,
    pub alive: bool,
    pub death: Option<DeathReason>,
    pub filled: bool,
    /// Event produced by the most recent tick, if any
    pub last_event: Option<TickEvent>,
    pub paused: bool,
    pub episode_id: u32,
    pub seed: u64,
    pub tick: u64,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            snake: Vec::new(),
            direction: INITIAL_DIRECTION,
            food: None,
            score: 0,
            alive: true,
            death: None,
            filled: false,
            last_event: None,
            paused: false,
            episode_id: 0,
            seed: 0,
            tick: 0,
        }
    }
}

impl GameSnapshot {
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    /// Session over (death or full board)
    pub fn game_over(&self) -> bool {
        !self.alive
    }
}
