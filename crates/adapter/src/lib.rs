//! Remote control of the snake session over a TCP socket.
//!
//! External agents (bots, scripted testers, spectators) connect to the game
//! and speak a **line-delimited JSON protocol**:
//!
//! 1. **Connection**: client connects to the TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: client sends `hello`, server responds with `welcome`
//! 3. **Controller assignment**: the first client to complete `hello` becomes
//!    the controller; everyone else observes
//! 4. **Observation streaming**: after every tick the game loop broadcasts the
//!    session state to clients that asked for it
//! 5. **Commanding**: the controller sends one action per `command`
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: handshake with client info and the streaming preference
//! - **command**: `up`, `down`, `left`, `right`, `pause` or `restart`
//!
//! ## Server → Client
//!
//! - **welcome**: role, board size and tick interval
//! - **observation**: snake, food, score, direction and last tick event
//! - **ack**: the command was applied by the game loop
//! - **error**: error response with code and message
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"client":{"name":"bot","version":"0.1.0"},"protocol_version":"1.0.0","stream_observations":true}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1700000000000,"protocol_version":"1.0.0","game_id":"tui-snake","client_id":1,"role":"controller",...}
//! Server -> Client: {"type":"observation","seq":1,"episode_id":0,"tick":0,"snake":[[5,10],[5,9],[5,8]],"food":[2,3],...}
//! Client -> Server: {"type":"command","seq":2,"action":"up"}
//! Server -> Client: {"type":"ack","seq":2,"ts":1700000000050,"status":"ok"}
//! ```
//!
//! The server side lives in [`server`]; [`Adapter`] runs it on a background
//! runtime and exposes non-blocking channels to the synchronous game loop.

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_snake_core as core;
pub use tui_snake_types as types;

pub use protocol::*;
pub use runtime::{Adapter, AdapterStatus, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{run_server, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
