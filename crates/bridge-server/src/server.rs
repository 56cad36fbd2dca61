//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Opens the serial device channel (or falls back to a permanently
//!   closed one; the bridge still serves clients without a device).
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ClientId` and registers it.
//! - Spawns:
//!   - a per-client task to handle I/O,
//!   - a single device poller task for the process lifetime.
//!
//! The actual per-client logic and polling loop live in `client`
//! and `poller` modules respectively.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::client;
use crate::config::Config;
use crate::device::{ClosedChannel, DeviceChannel, SerialChannel};
use crate::poller;
use crate::registry::ClientRegistry;
use crate::types::{ClientId, OutboundRx, OutboundTx};

/// Global-ish counter for assigning unique `ClientId`s.
///
/// In a more elaborate setup you might encapsulate this in a struct,
/// but this is sufficient and threadsafe for our server.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
    ClientId(id)
}

/// Open the device channel and run the TCP server with the given
/// configuration.
pub async fn run(config: Config) -> Result<()> {
    let channel: Arc<dyn DeviceChannel> = match SerialChannel::open(
        &config.serial_port,
        config.baud_rate,
        config.serial_timeout(),
    ) {
        Ok(ch) => Arc::new(ch),
        Err(e) => {
            warn!(
                port = %config.serial_port,
                error = %e,
                "failed to open serial port; running without a device"
            );
            Arc::new(ClosedChannel)
        }
    };

    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);

    serve(listener, channel, config).await
}

/// Accept clients on an already-bound listener.
///
/// Split out from [`run`] so tests can drive the server against a local
/// listener and a mock device channel.
pub async fn serve(
    listener: TcpListener,
    channel: Arc<dyn DeviceChannel>,
    config: Config,
) -> Result<()> {
    // Shared registry of clients → outbound channels.
    let registry = ClientRegistry::new();

    // Spawn the device poller for the process lifetime.
    {
        let channel = Arc::clone(&channel);
        let registry = registry.clone();
        let poll_interval = config.poll_interval();
        tokio::spawn(async move {
            poller::run_poller(channel, registry, poll_interval).await;
        });
    }

    loop {
        let (stream, peer_addr) = listener.accept().await?;

        if registry.len().await >= config.max_clients {
            warn!(
                peer = %peer_addr,
                max_clients = config.max_clients,
                "rejecting connection: max_clients reached"
            );
            // Just drop the stream; client will see the connection closed.
            continue;
        }

        let client_id = next_client_id();
        info!(client = client_id.0, peer = %peer_addr, "accepted connection");

        // Create outbound channel for this client and register it.
        let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();
        registry.register(client_id, out_tx).await;

        // Clone handles to move into the client task.
        let channel = Arc::clone(&channel);
        let registry = registry.clone();

        tokio::spawn(async move {
            if let Err(e) = client::run_client(client_id, stream, channel, out_rx, registry).await {
                error!(client = client_id.0, error = %e, "client task failed");
            }
        });
    }
}
