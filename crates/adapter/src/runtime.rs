//! Adapter runtime integration.
//!
//! Bridges the synchronous game loop with the async TCP server: the server
//! runs on a background tokio runtime, commands flow to the game loop through a
//! bounded channel, and replies flow back through an unbounded one.

use std::net::SocketAddr;

use anyhow::{anyhow, Context, Result};
use log::error;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot, watch};

use crate::protocol::{AckMessage, ObservationMessage};
use crate::server::{run_server, ServerConfig};
use crate::types::Intent;

/// Command delivered to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundPayload {
    /// Apply an intent, then ack `seq`.
    Command(Intent),
    /// A client just completed its handshake and wants a first observation.
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClientAck { client_id: usize, ack: AckMessage },
    ToClientObservation { client_id: usize, obs: ObservationMessage },
    /// Sent to every client that asked for streamed observations.
    BroadcastObservation { obs: ObservationMessage },
}

/// Connection summary published by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdapterStatus {
    pub clients: usize,
    pub controller_id: Option<usize>,
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    local_addr: SocketAddr,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    status_rx: watch::Receiver<AdapterStatus>,
}

impl Adapter {
    /// Start the server and wait until it is listening.
    pub fn start(config: ServerConfig) -> Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (status_tx, status_rx) = watch::channel(AdapterStatus::default());
        let (ready_tx, ready_rx) = oneshot::channel();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let endpoint = format!("{}:{}", config.host, config.port);
        rt.spawn(async move {
            let result = run_server(config, cmd_tx, out_rx, Some(ready_tx), Some(status_tx)).await;
            if let Err(e) = result {
                error!("remote adapter stopped: {e:#}");
            }
        });

        // The sender is dropped without a value when binding fails.
        let local_addr = ready_rx
            .blocking_recv()
            .map_err(|_| anyhow!("remote adapter failed to listen on {endpoint}"))?;

        Ok(Self {
            _rt: rt,
            local_addr,
            cmd_rx,
            out_tx,
            status_rx,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    pub fn status(&self) -> AdapterStatus {
        *self.status_rx.borrow()
    }
}
