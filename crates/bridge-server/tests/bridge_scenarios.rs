// crates/bridge-server/tests/bridge_scenarios.rs
//
// End-to-end scenarios against a real TCP listener with a scripted
// device channel, plus registry behavior on its own.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bridge_server::config::Config;
use bridge_server::device::mock::MockChannel;
use bridge_server::registry::ClientRegistry;
use bridge_server::server;
use bridge_server::types::ClientId;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn test_config() -> Config {
    Config {
        bind_addr: "127.0.0.1".to_string(),
        port: 0,
        max_clients: 8,
        serial_port: "unused".to_string(),
        baud_rate: 115_200,
        serial_timeout_ms: 50,
        poll_interval_ms: 5,
    }
}

/// Spawn the bridge on an ephemeral local port with the given device.
async fn start_bridge(channel: &MockChannel) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let channel: Arc<dyn bridge_server::device::DeviceChannel> = Arc::new(channel.clone());
    tokio::spawn(server::serve(listener, channel, test_config()));
    addr
}

struct TestClient {
    lines: tokio::io::Lines<BufReader<OwnedReadHalf>>,
    write: tokio::net::tcp::OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        let (read, write) = stream.into_split();
        TestClient {
            lines: BufReader::new(read).lines(),
            write,
        }
    }

    async fn send_line(&mut self, line: &str) {
        self.write
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .expect("send line");
    }

    async fn expect_line(&mut self) -> String {
        timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .expect("read line")
            .expect("connection closed")
    }

    /// Assert nothing arrives within a short window.
    async fn expect_silence(&mut self) {
        let got = timeout(Duration::from_millis(300), self.lines.next_line()).await;
        assert!(got.is_err(), "expected silence, got {:?}", got);
    }
}

/// Wait until the device has captured at least `expected` writes.
async fn wait_for_writes(channel: &MockChannel, expected: usize) -> Vec<String> {
    for _ in 0..200 {
        let written = channel.written();
        if written.len() >= expected {
            return written;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    channel.written()
}

/// Give the accept loop a moment to register freshly connected clients.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

// -----------------------------------------------------------------------------
// Registry behavior
// -----------------------------------------------------------------------------

#[tokio::test]
async fn broadcast_never_reaches_unregistered_client() {
    let registry = ClientRegistry::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    registry.register(ClientId(1), tx).await;
    registry.unregister(ClientId(1)).await;
    registry.broadcast("17", None).await;

    assert!(rx.try_recv().is_err());
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn broadcast_excludes_exactly_the_excluded_client() {
    let registry = ClientRegistry::new();
    let (tx_a, mut rx_a) = mpsc::unbounded_channel();
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    let (tx_c, mut rx_c) = mpsc::unbounded_channel();

    registry.register(ClientId(1), tx_a).await;
    registry.register(ClientId(2), tx_b).await;
    registry.register(ClientId(3), tx_c).await;

    registry.broadcast("42", Some(ClientId(2))).await;

    assert_eq!(rx_a.try_recv().unwrap(), "42");
    assert!(rx_b.try_recv().is_err());
    assert_eq!(rx_c.try_recv().unwrap(), "42");
}

#[tokio::test]
async fn double_registration_delivers_once() {
    let registry = ClientRegistry::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    registry.register(ClientId(1), tx.clone()).await;
    registry.register(ClientId(1), tx).await;
    assert_eq!(registry.len().await, 1);

    registry.broadcast("once", None).await;

    assert_eq!(rx.try_recv().unwrap(), "once");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn failed_send_drops_only_that_client() {
    let registry = ClientRegistry::new();
    let (tx_dead, rx_dead) = mpsc::unbounded_channel();
    let (tx_live, mut rx_live) = mpsc::unbounded_channel();

    registry.register(ClientId(1), tx_dead).await;
    registry.register(ClientId(2), tx_live).await;
    drop(rx_dead);

    registry.broadcast("still here", None).await;

    assert_eq!(rx_live.try_recv().unwrap(), "still here");
    assert_eq!(registry.len().await, 1);
}

// -----------------------------------------------------------------------------
// End-to-end scenarios
// -----------------------------------------------------------------------------

#[tokio::test]
async fn quest_command_reaches_the_device() {
    let device = MockChannel::new();
    let addr = start_bridge(&device).await;

    let mut client = TestClient::connect(addr).await;
    client
        .send_line(r#"{"type":"questcard_positions","positions":[1,48,24]}"#)
        .await;

    let written = wait_for_writes(&device, 1).await;
    assert_eq!(written, vec!["QUEST:1,48,24\n".to_string()]);
}

#[tokio::test]
async fn invalid_color_is_rejected_without_a_device_write() {
    let device = MockChannel::new();
    let addr = start_bridge(&device).await;

    let mut client = TestClient::connect(addr).await;
    client
        .send_line(r#"{"type":"piece_color","color":[0,255,999]}"#)
        .await;

    settle().await;
    assert!(device.written().is_empty());

    // The connection survives the rejection and keeps serving commands.
    client.send_line(r#"{"type":"init_effect"}"#).await;
    let written = wait_for_writes(&device, 1).await;
    assert_eq!(written, vec!["INIT_EFFECT\n".to_string()]);
}

#[tokio::test]
async fn raw_token_relays_to_other_clients_only() {
    let device = MockChannel::new();
    let addr = start_bridge(&device).await;

    let mut client_a = TestClient::connect(addr).await;
    let mut client_b = TestClient::connect(addr).await;
    settle().await;

    client_a.send_line("42").await;

    assert_eq!(client_b.expect_line().await, "42");
    client_a.expect_silence().await;

    // The token never touches the device.
    assert!(device.written().is_empty());
}

#[tokio::test]
async fn device_lines_broadcast_to_all_clients() {
    let device = MockChannel::new();
    let addr = start_bridge(&device).await;

    let mut client_a = TestClient::connect(addr).await;
    let mut client_b = TestClient::connect(addr).await;
    settle().await;

    device.inject_line("EFFECT_DONE");
    assert_eq!(client_a.expect_line().await, "EFFECT_DONE");
    assert_eq!(client_b.expect_line().await, "EFFECT_DONE");

    device.inject_line("17");
    assert_eq!(client_a.expect_line().await, "17");
    assert_eq!(client_b.expect_line().await, "17");
}

#[tokio::test]
async fn unknown_device_lines_are_not_broadcast() {
    let device = MockChannel::new();
    let addr = start_bridge(&device).await;

    let mut client = TestClient::connect(addr).await;
    settle().await;

    device.inject_line("READY");
    client.expect_silence().await;
}

#[tokio::test]
async fn missing_device_keeps_the_bridge_serving() {
    let device = MockChannel::with_open(false);
    let addr = start_bridge(&device).await;

    let mut client_a = TestClient::connect(addr).await;
    let mut client_b = TestClient::connect(addr).await;
    settle().await;

    // Command for the device is dropped, not fatal.
    client_a.send_line(r#"{"type":"init_effect"}"#).await;
    settle().await;
    assert!(device.written().is_empty());

    // The same connection still relays raw tokens.
    client_a.send_line("7").await;
    assert_eq!(client_b.expect_line().await, "7");
}

#[tokio::test]
async fn malformed_lines_never_close_the_connection() {
    let device = MockChannel::new();
    let addr = start_bridge(&device).await;

    let mut client_a = TestClient::connect(addr).await;
    let mut client_b = TestClient::connect(addr).await;
    settle().await;

    client_a.send_line("this is not a message").await;
    client_a.send_line(r#"{"type":"self_destruct"}"#).await;
    client_a.send_line("{broken json").await;

    // Still connected, still relaying.
    client_a.send_line("99").await;
    assert_eq!(client_b.expect_line().await, "99");
    assert!(device.written().is_empty());
}

#[tokio::test]
async fn disconnected_client_stops_receiving_broadcasts() {
    let device = MockChannel::new();
    let addr = start_bridge(&device).await;

    let client_a = TestClient::connect(addr).await;
    let mut client_b = TestClient::connect(addr).await;
    settle().await;

    drop(client_a);
    settle().await;

    device.inject_line("23");
    assert_eq!(client_b.expect_line().await, "23");
}
