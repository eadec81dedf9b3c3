//! Command-line configuration.
//!
//! Every flag falls back to a `SNAKE_*` environment variable, then to a
//! built-in default.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use simplelog::LevelFilter;

use crate::adapter::{ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use crate::core::{ConfigError, SessionConfig};
use crate::term::{GameView, PixelView, View, Viewport};
use crate::types::DEFAULT_TICK_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ViewKind {
    /// Character grid, two columns per cell.
    #[default]
    Chars,
    /// Half-block pixels, two board rows per terminal row.
    Pixels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Grid snake in the terminal.
#[derive(Debug, Parser)]
#[command(name = "tui-snake", version, about, long_about = None)]
pub struct Cli {
    /// Board width in cells. Fitted to the terminal when omitted.
    #[arg(long, env = "SNAKE_WIDTH", value_name = "COLUMNS")]
    pub width: Option<u16>,

    /// Board height in cells. Fitted to the terminal when omitted.
    #[arg(long, env = "SNAKE_HEIGHT", value_name = "ROWS")]
    pub height: Option<u16>,

    /// Milliseconds between ticks.
    #[arg(
        long,
        env = "SNAKE_TICK_MS",
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_TICK_MS,
        value_parser = clap::value_parser!(u64).range(1..=60_000)
    )]
    pub tick_ms: u64,

    /// Fixed RNG seed for a reproducible run.
    #[arg(long, env = "SNAKE_SEED")]
    pub seed: Option<u64>,

    #[arg(long, env = "SNAKE_VIEW", value_enum, default_value_t = ViewKind::Chars)]
    pub view: ViewKind,

    /// Log file; defaults to `tui-snake.log` in the temp directory.
    #[arg(long, env = "SNAKE_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[arg(long, env = "SNAKE_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Accept remote clients over TCP.
    #[arg(long, env = "SNAKE_REMOTE")]
    pub remote: bool,

    #[arg(long, env = "SNAKE_REMOTE_HOST", default_value = DEFAULT_HOST)]
    pub remote_host: String,

    #[arg(long, env = "SNAKE_REMOTE_PORT", default_value_t = DEFAULT_PORT)]
    pub remote_port: u16,
}

impl Cli {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("tui-snake.log"))
    }

    /// Board size: explicit flags win, missing ones are fitted to `viewport`.
    pub fn board_size(&self, viewport: Viewport) -> (u16, u16) {
        let (fit_w, fit_h) = match self.view {
            ViewKind::Chars => GameView::default().fit_board(viewport),
            ViewKind::Pixels => PixelView::new().fit_board(viewport),
        };
        (self.width.unwrap_or(fit_w), self.height.unwrap_or(fit_h))
    }

    pub fn session_config(&self, viewport: Viewport) -> Result<SessionConfig, ConfigError> {
        let (width, height) = self.board_size(viewport);
        SessionConfig::new(width, height, self.tick_ms, self.seed)
    }

    /// `None` unless `--remote` is set.
    pub fn server_config(&self, session: &SessionConfig) -> Option<ServerConfig> {
        if !self.remote {
            return None;
        }
        Some(
            ServerConfig::new(self.remote_host.clone(), self.remote_port).with_game(
                session.board.width(),
                session.board.height(),
                session.tick_ms(),
            ),
        )
    }

    pub fn view(&self) -> Box<dyn View> {
        match self.view {
            ViewKind::Chars => Box::new(GameView::default()),
            ViewKind::Pixels => Box::new(PixelView::new()),
        }
    }
}
