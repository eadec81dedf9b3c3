//! Protocol module - JSON message types for the remote adapter
//!
//! Line-delimited JSON: every message is one object on one line carrying
//! `type` and `seq`. `ts` (milliseconds since the Unix epoch) is optional on
//! client messages and always present on server messages.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::core::GameSnapshot;
use crate::types::{Cell, DeathReason, Direction, Intent, TickEvent};

pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Major version prefix a client must speak.
pub const PROTOCOL_MAJOR: &str = "1.";

pub const GAME_ID: &str = "tui-snake";

// ============== Client -> Game Messages ==============

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default = "default_stream")]
    pub stream_observations: bool,
}

fn default_stream() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Command message (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub action: ActionName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionName {
    Up,
    Down,
    Left,
    Right,
    Pause,
    Restart,
}

impl From<ActionName> for Intent {
    fn from(action: ActionName) -> Self {
        match action {
            ActionName::Up => Intent::Turn(Direction::Up),
            ActionName::Down => Intent::Turn(Direction::Down),
            ActionName::Left => Intent::Turn(Direction::Left),
            ActionName::Right => Intent::Turn(Direction::Right),
            ActionName::Pause => Intent::Pause,
            ActionName::Restart => Intent::Restart,
        }
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignedRole {
    Controller,
    Observer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    NotController,
    InvalidCommand,
    Backpressure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInfo {
    pub width: u16,
    pub height: u16,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub game_id: String,
    pub client_id: u64,
    pub role: AssignedRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<u64>,
    pub board: BoardInfo,
    pub tick_ms: u64,
}

/// Acknowledgment: the command was applied by the game loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionName {
    Up,
    Down,
    Left,
    Right,
}

impl From<Direction> for DirectionName {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathName {
    #[serde(rename = "wall")]
    Wall,
    #[serde(rename = "self")]
    SelfCollision,
}

impl From<DeathReason> for DeathName {
    fn from(r: DeathReason) -> Self {
        match r {
            DeathReason::Wall => Self::Wall,
            DeathReason::SelfCollision => Self::SelfCollision,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventName {
    Moved,
    Grew,
    Died,
    Filled,
}

impl From<TickEvent> for EventName {
    fn from(e: TickEvent) -> Self {
        match e {
            TickEvent::Moved => Self::Moved,
            TickEvent::Grew => Self::Grew,
            TickEvent::Died(_) => Self::Died,
            TickEvent::Filled => Self::Filled,
        }
    }
}

/// Stable 64-bit digest of the observable game state.
///
/// Lets agents detect duplicate observations without comparing payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u64::from_str_radix(&s, 16)
            .map(StateHash)
            .map_err(serde::de::Error::custom)
    }
}

/// Game state observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    pub seq: u64,
    pub ts: u64,
    pub episode_id: u32,
    pub tick: u64,
    pub seed: u64,
    pub board: BoardInfo,
    /// `[row, col]` pairs, head first
    pub snake: Vec<[i32; 2]>,
    pub food: Option<[i32; 2]>,
    pub direction: DirectionName,
    pub score: u32,
    pub alive: bool,
    pub paused: bool,
    pub death: Option<DeathName>,
    pub event: Option<EventName>,
    pub state_hash: StateHash,
}

// ============== Message Parsing ==============

/// Inbound message with its `type` tag resolved
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Parse one line.
///
/// An unrecognised `type` is not a parse error; it comes back as
/// [`ParsedMessage::Unknown`] so the server can answer with the client's seq.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Deserialize)]
    #[serde(tag = "type", rename_all = "lowercase")]
    enum Inbound {
        Hello(HelloMessage),
        Command(CommandMessage),
    }

    match serde_json::from_str::<Inbound>(json) {
        Ok(Inbound::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(Inbound::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            #[derive(Deserialize)]
            struct Header {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let header = serde_json::from_str::<Header>(json)?;
            match header.msg_type.as_deref() {
                Some("hello") | Some("command") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: header.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Best-effort `seq` from a line that is not valid JSON, for error replies.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let rest = s[start + 5..].trim_start().strip_prefix(':')?.trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

// ============== Utility Functions ==============

/// Serialize `msg` with its `type` tag as one JSON line (no trailing newline).
pub fn to_line<T: Serialize>(msg_type: &str, msg: &T, out: &mut Vec<u8>) -> serde_json::Result<()> {
    #[derive(Serialize)]
    struct Tagged<'a, T> {
        #[serde(rename = "type")]
        msg_type: &'a str,
        #[serde(flatten)]
        body: &'a T,
    }
    serde_json::to_writer(out, &Tagged { msg_type, body: msg })
}

pub fn create_hello(seq: u64, client_name: &str, stream_observations: bool) -> HelloMessage {
    HelloMessage {
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: PROTOCOL_VERSION.to_string(),
        stream_observations,
    }
}

pub fn create_welcome(
    seq: u64,
    client_id: u64,
    role: AssignedRole,
    controller_id: Option<u64>,
    board: BoardInfo,
    tick_ms: u64,
) -> WelcomeMessage {
    WelcomeMessage {
        seq,
        ts: current_timestamp_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        game_id: GAME_ID.to_string(),
        client_id,
        role,
        controller_id,
        board,
        tick_ms,
    }
}

pub fn create_ack(seq: u64) -> AckMessage {
    AckMessage {
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Build an observation from a render snapshot
pub fn build_observation(snap: &GameSnapshot, seq: u64) -> ObservationMessage {
    let cell = |c: Cell| [c.row, c.col];

    ObservationMessage {
        seq,
        ts: current_timestamp_ms(),
        episode_id: snap.episode_id,
        tick: snap.tick,
        seed: snap.seed,
        board: BoardInfo {
            width: snap.width,
            height: snap.height,
        },
        snake: snap.snake.iter().copied().map(cell).collect(),
        food: snap.food.map(cell),
        direction: snap.direction.into(),
        score: snap.score,
        alive: snap.alive,
        paused: snap.paused,
        death: snap.death.map(DeathName::from),
        event: snap.last_event.map(EventName::from),
        state_hash: state_hash(snap),
    }
}

/// FNV-1a over the observable fields; stable across platforms and releases,
/// unlike `DefaultHasher`.
pub fn state_hash(snap: &GameSnapshot) -> StateHash {
    let mut h = Fnv1aHasher::new();
    snap.episode_id.hash(&mut h);
    (snap.width, snap.height).hash(&mut h);
    snap.snake.hash(&mut h);
    snap.food.hash(&mut h);
    snap.direction.hash(&mut h);
    snap.score.hash(&mut h);
    snap.alive.hash(&mut h);
    snap.paused.hash(&mut h);
    StateHash(h.finish())
}

struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
