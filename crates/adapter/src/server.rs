//! TCP server for the remote adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, watch, RwLock};

use crate::protocol::*;
use crate::runtime::{AdapterStatus, InboundCommand, InboundPayload, OutboundMessage};
use crate::types::DEFAULT_TICK_MS;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_pending_commands: usize,
    /// Reported to clients in `welcome`.
    pub board: BoardInfo,
    pub tick_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_pending_commands: 10,
            board: BoardInfo {
                width: 0,
                height: 0,
            },
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_game(mut self, width: u16, height: u16, tick_ms: u64) -> Self {
        self.board = BoardInfo { width, height };
        self.tick_ms = tick_ms;
        self
    }
}

/// Handle to a connected client
struct ClientHandle {
    id: usize,
    addr: SocketAddr,
    handshaken: bool,
    stream_observations: bool,
    last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
enum ClientOutbound {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

#[derive(Default)]
struct Registry {
    clients: Vec<ClientHandle>,
    controller: Option<usize>,
}

impl Registry {
    fn get_mut(&mut self, client_id: usize) -> Option<&mut ClientHandle> {
        self.clients.iter_mut().find(|c| c.id == client_id)
    }

    fn send_to(&self, client_id: usize, msg: ClientOutbound) {
        if let Some(c) = self.clients.iter().find(|c| c.id == client_id) {
            let _ = c.tx.send(msg);
        }
    }

    fn status(&self) -> AdapterStatus {
        AdapterStatus {
            clients: self.clients.len(),
            controller_id: self.controller,
        }
    }

    /// Record `seq` if it is strictly greater than the last one seen.
    fn advance_seq(&mut self, client_id: usize, seq: u64) -> bool {
        let Some(client) = self.get_mut(client_id) else {
            return false;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }
}

/// Shared server state
struct ServerState {
    config: ServerConfig,
    registry: RwLock<Registry>,
    status_tx: Option<watch::Sender<AdapterStatus>>,
}

impl ServerState {
    async fn publish_status(&self) {
        if let Some(tx) = self.status_tx.as_ref() {
            let status = self.registry.read().await.status();
            let _ = tx.send(status);
        }
    }
}

/// Start the TCP server.
///
/// `ready_tx` receives the bound address once the listener is up (useful with
/// port 0); `status_tx` receives a summary whenever clients come and go.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    status_tx: Option<watch::Sender<AdapterStatus>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let bound = listener.local_addr()?;
    info!("remote adapter listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState {
        config,
        registry: RwLock::new(Registry::default()),
        status_tx,
    });
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let registry = state.registry.read().await;
                match msg {
                    OutboundMessage::ToClientAck { client_id, ack } => {
                        registry.send_to(client_id, ClientOutbound::Ack(ack));
                    }
                    OutboundMessage::ToClientObservation { client_id, obs } => {
                        registry.send_to(client_id, ClientOutbound::Observation(obs));
                    }
                    OutboundMessage::BroadcastObservation { obs } => {
                        for c in registry
                            .clients
                            .iter()
                            .filter(|c| c.handshaken && c.stream_observations)
                        {
                            let _ = c.tx.send(ClientOutbound::Observation(obs.clone()));
                        }
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!("client {} connected from {}", client_id, addr);

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            let result =
                handle_client(socket, addr, client_id, Arc::clone(&state), command_tx).await;
            if let Err(e) = result {
                warn!("client {} error: {}", client_id, e);
                disconnect(&state, client_id).await;
            }
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    // Channel to send messages to this client
    let (tx, rx) = mpsc::unbounded_channel::<ClientOutbound>();

    state.registry.write().await.clients.push(ClientHandle {
        id: client_id,
        addr,
        handshaken: false,
        stream_observations: false,
        last_seq: None,
        tx: tx.clone(),
    });
    state.publish_status().await;

    let write_task = tokio::spawn(write_loop(writer, rx));

    let reply = |err: ErrorMessage| {
        let _ = tx.send(ClientOutbound::Error(err));
    };

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!("client {} <- {}", client_id, trimmed);

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if !hello.protocol_version.starts_with(PROTOCOL_MAJOR) {
                    reply(create_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    ));
                    break;
                }

                let welcome = {
                    let mut registry = state.registry.write().await;
                    let already = registry
                        .get_mut(client_id)
                        .map(|c| c.handshaken)
                        .unwrap_or(false);
                    if already && !registry.advance_seq(client_id, hello.seq) {
                        drop(registry);
                        reply(seq_error(hello.seq));
                        continue;
                    }

                    if registry.controller.is_none() {
                        registry.controller = Some(client_id);
                        info!("client {} ({}) is now controller", client_id, hello.client.name);
                    }
                    let role = if registry.controller == Some(client_id) {
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    };
                    if let Some(client) = registry.get_mut(client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.stream_observations = hello.stream_observations;
                    }

                    create_welcome(
                        hello.seq,
                        client_id as u64,
                        role,
                        registry.controller.map(|id| id as u64),
                        state.config.board,
                        state.config.tick_ms,
                    )
                };
                let _ = tx.send(ClientOutbound::Welcome(welcome));
                state.publish_status().await;

                // Give a streaming client the current state right away.
                if hello.stream_observations {
                    let request = InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::SnapshotRequest,
                    };
                    if command_tx.try_send(request).is_err() {
                        warn!(
                            "client {} first observation dropped: command queue is full",
                            client_id
                        );
                    }
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                {
                    let mut registry = state.registry.write().await;
                    let handshaken = registry
                        .get_mut(client_id)
                        .map(|c| c.handshaken)
                        .unwrap_or(false);
                    if !handshaken {
                        drop(registry);
                        reply(create_error(
                            cmd.seq,
                            ErrorCode::HandshakeRequired,
                            "Send hello before command",
                        ));
                        continue;
                    }
                    if !registry.advance_seq(client_id, cmd.seq) {
                        drop(registry);
                        reply(seq_error(cmd.seq));
                        continue;
                    }
                    if registry.controller != Some(client_id) {
                        drop(registry);
                        reply(create_error(
                            cmd.seq,
                            ErrorCode::NotController,
                            "Only controller may send commands",
                        ));
                        continue;
                    }
                }

                // Backpressure: bounded queue. The game loop acks once applied.
                let inbound = InboundCommand {
                    client_id,
                    seq: cmd.seq,
                    payload: InboundPayload::Command(cmd.action.into()),
                };
                if command_tx.try_send(inbound).is_err() {
                    reply(create_error(
                        cmd.seq,
                        ErrorCode::Backpressure,
                        "Command queue is full",
                    ));
                }
            }

            Ok(ParsedMessage::Unknown(msg)) => {
                reply(create_error(msg.seq, ErrorCode::InvalidCommand, "Unknown message type"));
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                reply(create_error(
                    seq,
                    ErrorCode::InvalidCommand,
                    &format!("JSON parse error: {}", e),
                ));
            }
        }
    }

    // Close the writer once everything queued so far is flushed.
    drop(reply);
    drop(tx);
    disconnect(&state, client_id).await;
    let _ = write_task.await;
    Ok(())
}

fn seq_error(seq: u64) -> ErrorMessage {
    create_error(seq, ErrorCode::InvalidCommand, "seq must be strictly increasing")
}

/// Remove a client and promote the lowest remaining id if it was controller.
async fn disconnect(state: &ServerState, client_id: usize) {
    {
        let mut registry = state.registry.write().await;
        let addr = registry
            .clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.addr);
        registry.clients.retain(|c| c.id != client_id);

        if registry.controller == Some(client_id) {
            registry.controller = registry
                .clients
                .iter()
                .filter(|c| c.handshaken)
                .map(|c| c.id)
                .min();
            match registry.controller {
                Some(next) => info!("controller {} left; client {} promoted", client_id, next),
                None => info!("controller {} released", client_id),
            }
        }
        match addr {
            Some(addr) => info!("client {} ({}) disconnected", client_id, addr),
            None => info!("client {} disconnected", client_id),
        }
    }
    state.publish_status().await;
}

/// Serialize queued messages as JSON lines until the channel closes.
async fn write_loop<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<ClientOutbound>)
where
    W: AsyncWrite + Unpin,
{
    let mut buf: Vec<u8> = Vec::with_capacity(4096);
    while let Some(msg) = rx.recv().await {
        buf.clear();
        let encoded = match &msg {
            ClientOutbound::Welcome(m) => encode("welcome", m, &mut buf),
            ClientOutbound::Ack(m) => encode("ack", m, &mut buf),
            ClientOutbound::Error(m) => encode("error", m, &mut buf),
            ClientOutbound::Observation(m) => encode("observation", m, &mut buf),
        };
        if !encoded {
            continue;
        }
        if writer.write_all(&buf).await.is_err() || writer.flush().await.is_err() {
            break;
        }
    }
    let _ = writer.shutdown().await;
}

fn encode<T: Serialize>(msg_type: &str, msg: &T, buf: &mut Vec<u8>) -> bool {
    match to_line(msg_type, msg, buf) {
        Ok(()) => {
            buf.push(b'\n');
            true
        }
        Err(e) => {
            warn!("failed to encode {} message: {}", msg_type, e);
            false
        }
    }
}
