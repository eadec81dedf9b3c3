//! Terminal snake runner (default binary).
//!
//! Owns the clock: polls crossterm for keys until the next tick is due, feeds
//! the latched direction to the session, then renders through the selected
//! view. Remote commands, when enabled, are drained once per loop iteration.

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::{error, info};
use simplelog::{Config, WriteLogger};

use tui_snake::adapter::{
    build_observation, create_ack, Adapter, InboundCommand, InboundPayload, ObservationMessage,
    OutboundMessage,
};
use tui_snake::config::Cli;
use tui_snake::core::{GameSnapshot, Phase, Session};
use tui_snake::input::{handle_key_event, DirectionLatch};
use tui_snake::term::{FrameBuffer, RemoteStatus, TerminalRenderer, View, Viewport};
use tui_snake::types::Intent;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let config = cli
        .session_config(Viewport::new(w, h))
        .context("invalid game configuration")?;
    let session = Session::new(config)?;

    let adapter = match cli.server_config(&config) {
        Some(server) => {
            let adapter = Adapter::start(server)?;
            info!("remote control enabled on {}", adapter.local_addr());
            Some(adapter)
        }
        None => None,
    };

    let view = cli.view();
    let mut host = Host::new(session, adapter);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = host.run(&mut term, view.as_ref());

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        error!("exiting with error: {e:#}");
    }
    info!("final score {}", host.session.state().score());
    result
}

fn init_logging(cli: &Cli) -> Result<()> {
    let path = cli.log_path();
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    WriteLogger::init(cli.log_level.into(), Config::default(), file)
        .context("failed to install logger")?;
    Ok(())
}

struct Host {
    session: Session,
    adapter: Option<Adapter>,
    latch: DirectionLatch,
    paused: bool,
    quit: bool,
    snap: GameSnapshot,
    obs_seq: u64,
}

impl Host {
    fn new(session: Session, adapter: Option<Adapter>) -> Self {
        Self {
            session,
            adapter,
            latch: DirectionLatch::new(),
            paused: false,
            quit: false,
            snap: GameSnapshot::default(),
            obs_seq: 0,
        }
    }

    fn run(&mut self, term: &mut TerminalRenderer, view: &dyn View) -> Result<()> {
        let tick_duration = self.session.config().tick_interval;
        let mut fb = FrameBuffer::new(0, 0);
        let mut last_tick = Instant::now();

        self.session.start();
        self.broadcast();

        while !self.quit {
            // Render.
            self.refresh_snapshot();
            let remote = self.remote_status();
            view.render_into(&self.snap, remote.as_ref(), term.viewport()?, &mut fb);
            term.draw_swap(&mut fb)?;

            // Input with timeout until next tick.
            let timeout = tick_duration
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(intent) = handle_key_event(key) {
                            self.apply(intent)?;
                        }
                    }
                    Event::Resize(_, _) => term.invalidate(),
                    _ => {}
                }
            }
            if self.quit {
                break;
            }

            self.drain_remote()?;

            // Tick.
            if last_tick.elapsed() >= tick_duration {
                last_tick = Instant::now();
                if !self.paused && self.session.tick(self.latch.take()).is_some() {
                    self.broadcast();
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, intent: Intent) -> Result<()> {
        match intent {
            Intent::Turn(direction) => {
                if self.session.phase() == Phase::Running {
                    self.latch.request(direction, self.session.state().direction());
                }
            }
            Intent::Pause => {
                if self.session.phase() == Phase::Running {
                    self.paused = !self.paused;
                    info!("{}", if self.paused { "paused" } else { "resumed" });
                    self.broadcast();
                }
            }
            Intent::Restart => {
                self.session.restart()?;
                self.latch.clear();
                self.paused = false;
                self.broadcast();
            }
            Intent::Quit => self.quit = true,
        }
        Ok(())
    }

    fn drain_remote(&mut self) -> Result<()> {
        let mut pending: Vec<InboundCommand> = Vec::new();
        if let Some(adapter) = self.adapter.as_mut() {
            while let Some(cmd) = adapter.try_recv() {
                pending.push(cmd);
            }
        }

        for cmd in pending {
            match cmd.payload {
                InboundPayload::Command(intent) => {
                    self.apply(intent)?;
                    self.send(OutboundMessage::ToClientAck {
                        client_id: cmd.client_id,
                        ack: create_ack(cmd.seq),
                    });
                }
                InboundPayload::SnapshotRequest => {
                    let obs = self.next_observation();
                    self.send(OutboundMessage::ToClientObservation {
                        client_id: cmd.client_id,
                        obs,
                    });
                }
            }
        }
        Ok(())
    }

    fn refresh_snapshot(&mut self) {
        self.session.snapshot_into(&mut self.snap);
        self.snap.paused = self.paused;
    }

    fn next_observation(&mut self) -> ObservationMessage {
        self.refresh_snapshot();
        self.obs_seq += 1;
        build_observation(&self.snap, self.obs_seq)
    }

    fn broadcast(&mut self) {
        if self.adapter.is_none() {
            return;
        }
        let obs = self.next_observation();
        self.send(OutboundMessage::BroadcastObservation { obs });
    }

    fn send(&self, msg: OutboundMessage) {
        if let Some(adapter) = self.adapter.as_ref() {
            adapter.send(msg);
        }
    }

    fn remote_status(&self) -> Option<RemoteStatus> {
        self.adapter.as_ref().map(|adapter| {
            let status = adapter.status();
            RemoteStatus {
                clients: u16::try_from(status.clients).unwrap_or(u16::MAX),
                controller_id: status.controller_id,
            }
        })
    }
}
