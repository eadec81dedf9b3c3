//! Game state module - the tick engine
//!
//! [`GameState`] holds everything one session needs: the snake, its committed
//! heading, the food cell and the score. [`GameState::step`] advances it by
//! exactly one tick; [`tick`] is the same transition as a pure function.

use rand::Rng;

use crate::board::Board;
use crate::error::ConfigError;
use crate::food::place_food;
use crate::snake::Snake;
use crate::snapshot::GameSnapshot;
use crate::types::*;

/// Complete simulation state of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    snake: Snake,
    direction: Direction,
    /// `None` only after the body has filled the board.
    food: Option<Cell>,
    score: u32,
    /// Number of ticks processed, including the terminal one.
    ticks: u64,
    /// Terminal event, once the session has ended.
    end: Option<TickEvent>,
}

impl GameState {
    /// Create the starting state: a 3-cell snake heading right from
    /// [`Board::spawn_head`], score 0, and one randomly placed food.
    pub fn new<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Result<Self, ConfigError> {
        let snake = Snake::spawn(board, board.spawn_head(), INITIAL_DIRECTION, INITIAL_SNAKE_LEN)?;
        let food = place_food(board, &snake, rng);
        if food.is_none() {
            return Err(ConfigError::NoRoomForFood {
                width: board.width(),
                height: board.height(),
            });
        }

        Ok(Self {
            board,
            snake,
            direction: INITIAL_DIRECTION,
            food,
            score: 0,
            ticks: 0,
            end: None,
        })
    }

    /// Build a live state from an explicit layout (head first).
    ///
    /// Used to resume a known position, e.g. in tests and benchmarks.
    pub fn from_layout(
        board: Board,
        cells: impl IntoIterator<Item = Cell>,
        direction: Direction,
        food: Cell,
        score: u32,
    ) -> Result<Self, ConfigError> {
        let snake = Snake::from_cells(board, cells)?;
        if !board.contains(food) {
            return Err(ConfigError::OutOfBounds(food));
        }
        if snake.contains(food) {
            return Err(ConfigError::FoodOnSnake(food));
        }

        Ok(Self {
            board,
            snake,
            direction,
            food: Some(food),
            score,
            ticks: 0,
            end: None,
        })
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn alive(&self) -> bool {
        self.end.is_none()
    }

    pub fn death(&self) -> Option<DeathReason> {
        match self.end {
            Some(TickEvent::Died(reason)) => Some(reason),
            _ => None,
        }
    }

    /// True once the body covers every cell of the board
    pub fn filled(&self) -> bool {
        self.end == Some(TickEvent::Filled)
    }

    /// Terminal event, if the session has ended
    pub fn end(&self) -> Option<TickEvent> {
        self.end
    }

    /// Advance one tick in place.
    ///
    /// Once a terminal event has been returned the state is frozen and every
    /// further call re-reports that event without touching anything.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        requested: Option<Direction>,
        rng: &mut R,
    ) -> TickEvent {
        if let Some(end) = self.end {
            return end;
        }
        self.ticks = self.ticks.wrapping_add(1);

        let direction = self.direction.resolve(requested);
        let new_head = self.snake.head().step(direction);

        // Wall before body before food.
        if !self.board.contains(new_head) {
            return self.finish(TickEvent::Died(DeathReason::Wall));
        }
        if self.snake.bites(new_head) {
            return self.finish(TickEvent::Died(DeathReason::SelfCollision));
        }

        self.direction = direction;
        let grows = self.food == Some(new_head);
        self.snake.advance(new_head, grows);

        if !grows {
            return TickEvent::Moved;
        }

        self.score += 1;
        self.food = place_food(self.board, &self.snake, rng);
        match self.food {
            Some(_) => TickEvent::Grew,
            None => self.finish(TickEvent::Filled),
        }
    }

    fn finish(&mut self, event: TickEvent) -> TickEvent {
        self.end = Some(event);
        event
    }

    /// Copy the render-facing parts of the state into `out`.
    ///
    /// Reuses `out`'s snake buffer, so steady-state calls do not allocate.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.snake.clear();
        out.snake.extend(self.snake.cells());
        out.direction = self.direction;
        out.food = self.food;
        out.score = self.score;
        out.alive = self.alive();
        out.death = self.death();
        out.filled = self.filled();
        out.tick = self.ticks;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

/// Pure tick: compute the successor of `state` without modifying it.
///
/// Equivalent to cloning `state` and calling [`GameState::step`].
pub fn tick<R: Rng + ?Sized>(
    state: &GameState,
    requested: Option<Direction>,
    rng: &mut R,
) -> (GameState, TickEvent) {
    let mut next = state.clone();
    let event = next.step(requested, rng);
    (next, event)
}
