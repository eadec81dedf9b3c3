use std::net::SocketAddr;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use tui_snake::adapter::{
    build_observation, create_ack, create_hello, run_server, to_line, AdapterStatus,
    InboundCommand, InboundPayload, OutboundMessage, ServerConfig,
};
use tui_snake::core::{Session, SessionConfig};
use tui_snake::types::{Direction, Intent};

struct Harness {
    addr: SocketAddr,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    status_rx: watch::Receiver<AdapterStatus>,
    server: JoinHandle<()>,
}

async fn start(max_pending: usize) -> Harness {
    let config = ServerConfig {
        max_pending_commands: max_pending,
        ..ServerConfig::new("127.0.0.1", 0).with_game(20, 10, 100)
    };

    let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (status_tx, status_rx) = watch::channel(AdapterStatus::default());
    let (ready_tx, ready_rx) = oneshot::channel();

    let server = tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx), Some(status_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    Harness {
        addr,
        cmd_rx,
        out_tx,
        status_rx,
        server,
    }
}

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    write_half: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, write_half) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            write_half,
        }
    }

    async fn send_raw(&mut self, line: &str) {
        self.write_half.write_all(line.as_bytes()).await.unwrap();
        self.write_half.write_all(b"\n").await.unwrap();
        self.write_half.flush().await.unwrap();
    }

    async fn send(&mut self, msg: Value) {
        self.send_raw(&msg.to_string()).await;
    }

    async fn next_line(&mut self) -> Option<String> {
        tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("timeout waiting for line")
            .expect("io error")
    }

    async fn recv(&mut self) -> Value {
        let line = self.next_line().await.expect("expected line");
        serde_json::from_str(&line).unwrap()
    }

    async fn hello(&mut self, seq: u64, name: &str, stream: bool) -> Value {
        let mut line = Vec::new();
        to_line("hello", &create_hello(seq, name, stream), &mut line).unwrap();
        self.send_raw(std::str::from_utf8(&line).unwrap()).await;
        let welcome = self.recv().await;
        assert_eq!(welcome["type"], "welcome");
        welcome
    }

    async fn command(&mut self, seq: u64, action: &str) {
        self.send(json!({"type": "command", "seq": seq, "action": action}))
            .await;
    }
}

async fn next_inbound(rx: &mut mpsc::Receiver<InboundCommand>) -> InboundCommand {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timeout waiting for inbound command")
        .expect("command channel closed")
}

#[tokio::test]
async fn hello_command_ack_and_observation() {
    let mut h = start(8).await;
    let mut client = Client::connect(h.addr).await;

    let welcome = client.hello(1, "e2e", true).await;
    assert_eq!(welcome["seq"], 1);
    assert_eq!(welcome["role"], "controller");
    assert_eq!(welcome["game_id"], "tui-snake");
    assert_eq!(welcome["board"], json!({"width": 20, "height": 10}));
    assert_eq!(welcome["tick_ms"], 100);

    // A streaming client asks the game loop for a first observation.
    let first = next_inbound(&mut h.cmd_rx).await;
    assert_eq!(first.payload, InboundPayload::SnapshotRequest);

    client.command(2, "up").await;
    let inbound = next_inbound(&mut h.cmd_rx).await;
    assert_eq!(inbound.seq, 2);
    assert_eq!(inbound.payload, InboundPayload::Command(Intent::Turn(Direction::Up)));

    // ack after apply
    h.out_tx
        .send(OutboundMessage::ToClientAck {
            client_id: inbound.client_id,
            ack: create_ack(2),
        })
        .unwrap();
    let ack = client.recv().await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["seq"], 2);
    assert_eq!(ack["status"], "ok");

    // broadcast observation
    let mut session = Session::new(SessionConfig::new(20, 10, 100, Some(4)).unwrap()).unwrap();
    session.start();
    session.tick(Some(Direction::Up));
    let obs = build_observation(&session.snapshot(), 10);
    h.out_tx
        .send(OutboundMessage::BroadcastObservation { obs })
        .unwrap();

    let obs = client.recv().await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["seq"], 10);
    assert_eq!(obs["tick"], 1);
    assert_eq!(obs["direction"], "up");
    assert!(obs["event"] == "moved" || obs["event"] == "grew");
    assert!(obs["snake"].as_array().unwrap().len() >= 3);
    assert_eq!(obs["state_hash"].as_str().unwrap().len(), 16);

    h.server.abort();
}

#[tokio::test]
async fn protocol_errors_are_reported_with_codes() {
    let mut h = start(8).await;

    let mut controller = Client::connect(h.addr).await;
    controller.command(1, "up").await;
    let err = controller.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "handshake_required");

    let ctrl = controller.hello(2, "ctrl", false).await;

    let mut observer = Client::connect(h.addr).await;
    let welcome = observer.hello(1, "watcher", false).await;
    assert_eq!(welcome["role"], "observer");
    assert_eq!(welcome["controller_id"], ctrl["client_id"]);

    observer.command(2, "left").await;
    let err = observer.recv().await;
    assert_eq!(err["code"], "not_controller");
    assert_eq!(err["seq"], 2);

    // seq must strictly increase
    controller.command(5, "down").await;
    assert_eq!(next_inbound(&mut h.cmd_rx).await.seq, 5);
    controller.command(5, "down").await;
    let err = controller.recv().await;
    assert_eq!(err["code"], "invalid_command");

    controller.send_raw(r#"{"type":"command","seq":9,"action":"jump"}"#).await;
    let err = controller.recv().await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 9);

    controller.send_raw("not json").await;
    let err = controller.recv().await;
    assert_eq!(err["code"], "invalid_command");

    controller.send(json!({"type": "teleport", "seq": 11})).await;
    let err = controller.recv().await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 11);

    h.server.abort();
}

#[tokio::test]
async fn protocol_mismatch_closes_the_connection() {
    let h = start(8).await;
    let mut client = Client::connect(h.addr).await;

    client
        .send(json!({
            "type": "hello",
            "seq": 1,
            "client": {"name": "old"},
            "protocol_version": "0.9.0",
        }))
        .await;
    let err = client.recv().await;
    assert_eq!(err["code"], "protocol_mismatch");
    assert_eq!(client.next_line().await, None);

    h.server.abort();
}

#[tokio::test]
async fn controller_disconnect_promotes_next_client() {
    let mut h = start(8).await;

    let mut first = Client::connect(h.addr).await;
    first.hello(1, "ctrl1", false).await;
    let mut second = Client::connect(h.addr).await;
    let welcome = second.hello(1, "ctrl2", false).await;
    assert_eq!(welcome["role"], "observer");
    let second_id = welcome["client_id"].as_u64().unwrap() as usize;

    drop(first);

    // Give the server a moment to observe the disconnect and run cleanup.
    tokio::time::timeout(Duration::from_secs(2), async {
        while h.status_rx.borrow().controller_id != Some(second_id) {
            h.status_rx.changed().await.unwrap();
        }
    })
    .await
    .expect("second client was not promoted");
    assert_eq!(h.status_rx.borrow().clients, 1);

    second.command(2, "restart").await;
    let inbound = next_inbound(&mut h.cmd_rx).await;
    assert_eq!(inbound.client_id, second_id);
    assert_eq!(inbound.payload, InboundPayload::Command(Intent::Restart));

    h.server.abort();
}

#[tokio::test]
async fn full_command_queue_returns_backpressure() {
    let mut h = start(1).await;
    let mut client = Client::connect(h.addr).await;
    client.hello(1, "spammer", false).await;

    // Nobody drains the queue: the second command does not fit.
    client.command(2, "up").await;
    client.command(3, "left").await;

    let err = client.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "backpressure");
    assert_eq!(err["seq"], 3);

    assert_eq!(next_inbound(&mut h.cmd_rx).await.seq, 2);

    h.server.abort();
}

#[tokio::test]
async fn handshake_succeeds_when_queue_is_full() {
    let mut h = start(1).await;

    let mut first = Client::connect(h.addr).await;
    let first_id = first.hello(1, "first", true).await["client_id"].clone();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The first snapshot request fills the queue; the second is dropped.
    let mut second = Client::connect(h.addr).await;
    let welcome = second.hello(1, "second", true).await;
    assert_eq!(welcome["role"], "observer");
    tokio::time::sleep(Duration::from_millis(50)).await;

    let request = next_inbound(&mut h.cmd_rx).await;
    assert_eq!(request.payload, InboundPayload::SnapshotRequest);
    assert_eq!(json!(request.client_id), first_id);
    assert!(h.cmd_rx.try_recv().is_err());

    h.server.abort();
}
