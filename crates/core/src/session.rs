//! Session lifecycle: `Initializing -> Running -> Terminated`.
//!
//! A [`Session`] owns the [`GameState`] and the seeded RNG that feeds food
//! placement. Only a running session ticks; a terminal event moves it to
//! `Terminated`, which only [`Session::restart`] leaves. Pausing is not a core
//! concept: the host simply stops calling [`Session::tick`].

use std::time::Duration;

use log::{debug, info};

use crate::board::Board;
use crate::error::ConfigError;
use crate::game_state::GameState;
use crate::rng::SessionRng;
use crate::snapshot::GameSnapshot;
use crate::types::{Direction, TickEvent};

/// Validated session parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub board: Board,
    pub tick_interval: Duration,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn new(
        width: u16,
        height: u16,
        tick_ms: u64,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if tick_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(Self {
            board: Board::new(width, height)?,
            tick_interval: Duration::from_millis(tick_ms),
            seed,
        })
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_interval.as_millis() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Running,
    Terminated,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Initializing => "initializing",
            Phase::Running => "running",
            Phase::Terminated => "terminated",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    state: GameState,
    rng: SessionRng,
    phase: Phase,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    last_event: Option<TickEvent>,
}

impl Session {
    /// Build the starting state. The session does not tick until [`start`](Self::start).
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let mut rng = match config.seed {
            Some(seed) => SessionRng::new(seed),
            None => SessionRng::from_random(),
        };
        let state = GameState::new(config.board, &mut rng)?;
        info!(
            "session initialized: board {}x{}, tick {}ms, seed {}",
            config.board.width(),
            config.board.height(),
            config.tick_ms(),
            rng.seed()
        );

        Ok(Self {
            config,
            state,
            rng,
            phase: Phase::Initializing,
            episode_id: 0,
            last_event: None,
        })
    }

    /// Resume from an explicit state (tests, benchmarks).
    pub fn with_state(config: SessionConfig, state: GameState, seed: u64) -> Self {
        let phase = if state.alive() {
            Phase::Initializing
        } else {
            Phase::Terminated
        };
        Self {
            config,
            state,
            rng: SessionRng::new(seed),
            phase,
            episode_id: 0,
            last_event: None,
        }
    }

    pub fn start(&mut self) {
        if self.phase != Phase::Initializing {
            return;
        }
        self.phase = Phase::Running;
        debug!("episode {} {}", self.episode_id, self.phase.as_str());
    }

    /// Run one tick. Returns `None` when the session is not running.
    pub fn tick(&mut self, requested: Option<Direction>) -> Option<TickEvent> {
        if self.phase != Phase::Running {
            return None;
        }

        let event = self.state.step(requested, &mut self.rng);
        self.last_event = Some(event);

        match event {
            TickEvent::Moved => {}
            TickEvent::Grew => debug!(
                "ate food, score {}, {} cells free",
                self.state.score(),
                self.state.snake().free_cells()
            ),
            TickEvent::Died(reason) => {
                self.phase = Phase::Terminated;
                info!(
                    "episode {} over: {} after {} ticks, score {}",
                    self.episode_id,
                    reason.as_str(),
                    self.state.ticks(),
                    self.state.score()
                );
            }
            TickEvent::Filled => {
                self.phase = Phase::Terminated;
                info!(
                    "episode {} won: board filled after {} ticks, score {}",
                    self.episode_id,
                    self.state.ticks(),
                    self.state.score()
                );
            }
        }
        Some(event)
    }

    /// Discard the current state and start a fresh episode.
    ///
    /// The RNG keeps its stream, so consecutive episodes differ while a seeded
    /// run stays reproducible as a whole.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.state = GameState::new(self.config.board, &mut self.rng)?;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.last_event = None;
        self.phase = Phase::Running;
        info!("restarted, episode {}", self.episode_id);
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn last_event(&self) -> Option<TickEvent> {
        self.last_event
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.state.snapshot_into(out);
        out.last_event = self.last_event;
        out.episode_id = self.episode_id;
        out.seed = self.rng.seed();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, DeathReason};

    fn config(w: u16, h: u16) -> SessionConfig {
        SessionConfig::new(w, h, 100, Some(7)).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            SessionConfig::new(10, 10, 0, None),
            Err(ConfigError::ZeroTickInterval)
        );
        assert_eq!(
            SessionConfig::new(0, 10, 100, None),
            Err(ConfigError::ZeroDimension {
                width: 0,
                height: 10
            })
        );
        assert!(matches!(
            SessionConfig::new(u16::MAX, u16::MAX, 100, Some(1)),
            Err(ConfigError::TooLarge { .. })
        ));
        assert_eq!(config(10, 8).tick_ms(), 100);
    }

    #[test]
    fn test_does_not_tick_before_start() {
        let mut session = Session::new(config(10, 10)).unwrap();
        assert_eq!(session.phase(), Phase::Initializing);
        assert_eq!(session.tick(None), None);
        assert_eq!(session.state().ticks(), 0);

        session.start();
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.tick(None).is_some());
    }

    #[test]
    fn test_death_terminates() {
        // Heading Right from column 2 on a 5-wide board hits the wall on tick 3.
        let mut session = Session::new(config(5, 2)).unwrap();
        session.start();

        let mut events = Vec::new();
        while let Some(event) = session.tick(None) {
            events.push(event);
            assert!(events.len() < 10);
        }

        assert_eq!(session.phase(), Phase::Terminated);
        assert_eq!(
            session.last_event(),
            Some(TickEvent::Died(DeathReason::Wall))
        );
        assert_eq!(session.tick(Some(Direction::Up)), None);
    }

    #[test]
    fn test_restart_increments_episode_id() {
        let mut session = Session::new(config(5, 2)).unwrap();
        session.start();
        while session.tick(None).is_some() {}

        session.restart().unwrap();
        assert_eq!(session.episode_id(), 1);
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.state().alive());
        assert_eq!(session.state().score(), 0);
        assert_eq!(session.last_event(), None);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = Session::new(config(12, 9)).unwrap();
        let mut b = Session::new(config(12, 9)).unwrap();
        a.start();
        b.start();
        let turns = [None, Some(Direction::Down), None, Some(Direction::Left), None];
        for turn in turns {
            assert_eq!(a.tick(turn), b.tick(turn));
        }
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_snapshot_carries_session_fields() {
        let state = GameState::from_layout(
            Board::new(5, 5).unwrap(),
            [Cell::new(2, 2), Cell::new(2, 1), Cell::new(2, 0)],
            Direction::Right,
            Cell::new(2, 3),
            0,
        )
        .unwrap();
        let mut session = Session::with_state(config(5, 5), state, 3);
        session.start();
        session.tick(None);

        let snap = session.snapshot();
        assert_eq!(snap.last_event, Some(TickEvent::Grew));
        assert_eq!(snap.seed, 3);
        assert_eq!(snap.episode_id, 0);
        assert_eq!(snap.score, 1);
    }
}
