//! Per-client connection handling.
//!
//! Each accepted connection gets one task running [`run_client`]:
//! - a writer task drains the client's outbound channel and frames each
//!   text line with `\n`;
//! - the reader loop assembles newline-delimited lines from the socket
//!   and dispatches each one.
//!
//! No inbound payload ever terminates the connection: validation
//! failures, unknown types, and malformed lines are logged and the loop
//! keeps reading. The only exit is the transport closing (EOF or a read
//! error), which unregisters the client.

use std::sync::Arc;

use anyhow::Result;
use bridge_core::{translate, InboundMessage};
use bridge_protocol::{encode_command, parse_client_message};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::device::DeviceChannel;
use crate::registry::ClientRegistry;
use crate::types::{ClientId, OutboundRx};

/// Run the client I/O loop for a single connection.
pub async fn run_client(
    client_id: ClientId,
    stream: TcpStream,
    channel: Arc<dyn DeviceChannel>,
    mut out_rx: OutboundRx,
    registry: ClientRegistry,
) -> Result<()> {
    let peer_addr = stream.peer_addr().ok();

    let (mut read_stream, mut write_stream) = stream.into_split();

    // Writer task: frame outbound text lines onto the socket. Ends when
    // the registry drops this client's sender or the socket rejects a
    // write.
    let _writer_handle = tokio::spawn(async move {
        while let Some(text) = out_rx.recv().await {
            let framed = format!("{}\n", text);
            if let Err(e) = write_stream.write_all(framed.as_bytes()).await {
                debug!(client = client_id.0, error = %e, "client write failed");
                break;
            }
            if let Err(e) = write_stream.flush().await {
                debug!(client = client_id.0, error = %e, "client flush failed");
                break;
            }
        }
    });

    // Reader loop: byte buffer in, complete lines out.
    let mut buffer = Vec::new();
    let mut temp_buf = [0u8; 1024];

    loop {
        match read_stream.read(&mut temp_buf).await {
            Ok(0) => {
                // EOF - client disconnected
                info!(client = client_id.0, peer = ?peer_addr, "client disconnected");
                break;
            }
            Ok(n) => {
                buffer.extend_from_slice(&temp_buf[..n]);

                while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                    let line = buffer.drain(..=newline_pos).collect::<Vec<u8>>();
                    let line_str = String::from_utf8_lossy(&line);
                    let line_str = line_str.trim();

                    if line_str.is_empty() {
                        continue;
                    }

                    handle_line(client_id, line_str, &channel, &registry).await;
                }
            }
            Err(e) => {
                warn!(client = client_id.0, error = %e, "client read failed");
                break;
            }
        }
    }

    registry.unregister(client_id).await;

    Ok(())
}

/// Dispatch one complete inbound line.
async fn handle_line(
    client_id: ClientId,
    line: &str,
    channel: &Arc<dyn DeviceChannel>,
    registry: &ClientRegistry,
) {
    match parse_client_message(line) {
        InboundMessage::RawToken { text } => {
            debug!(client = client_id.0, token = %text, "relaying raw token");
            registry.broadcast(&text, Some(client_id)).await;
        }

        InboundMessage::Malformed { raw, reason } => {
            warn!(client = client_id.0, payload = %raw, %reason, "malformed message");
        }

        msg => match translate(&msg) {
            Ok(cmd) => {
                let line = encode_command(&cmd);
                write_device_line(client_id, line, channel).await;
            }
            Err(e) => {
                warn!(client = client_id.0, error = %e, "rejected command");
            }
        },
    }
}

/// Write one command line to the device, if it is there to take it.
///
/// A closed or failing device costs only this one command; the client
/// connection is unaffected.
async fn write_device_line(client_id: ClientId, line: String, channel: &Arc<dyn DeviceChannel>) {
    if !channel.is_open() {
        warn!(client = client_id.0, "device unavailable, dropping command");
        return;
    }

    debug!(client = client_id.0, command = %line.trim_end(), "sending to device");

    let ch = Arc::clone(channel);
    match tokio::task::spawn_blocking(move || ch.write_line(&line)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(client = client_id.0, error = %e, "device write failed"),
        Err(e) => warn!(client = client_id.0, error = %e, "device write task failed"),
    }
}
