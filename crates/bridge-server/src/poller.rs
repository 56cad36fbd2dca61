//! The device poller.
//!
//! One long-lived task for the process lifetime that drains the device
//! channel, classifies each line, and fans recognized lines out to every
//! connected client (no exclusion). The blocking serial read runs on a
//! dedicated blocking thread per attempt, bounded by the channel's own
//! read timeout, with a short idle backoff when the device is silent.
//!
//! Nothing terminates this loop: a read or decode error is logged and
//! the next iteration carries on, and a missing device just means every
//! iteration is an idle one.

use std::sync::Arc;
use std::time::Duration;

use bridge_core::DeviceLine;
use bridge_protocol::classify_line;
use tracing::{debug, info, warn};

use crate::device::DeviceChannel;
use crate::registry::ClientRegistry;

/// Run the device polling loop.
///
/// - `channel`: the device channel shared with the connection handlers.
/// - `registry`: where recognized lines get broadcast.
/// - `poll_interval`: idle backoff between empty read attempts.
pub async fn run_poller(
    channel: Arc<dyn DeviceChannel>,
    registry: ClientRegistry,
    poll_interval: Duration,
) {
    if !channel.is_open() {
        info!("device channel unavailable; polling idles until shutdown");
    }

    loop {
        if !channel.is_open() {
            tokio::time::sleep(poll_interval).await;
            continue;
        }

        let ch = Arc::clone(&channel);
        let read = tokio::task::spawn_blocking(move || ch.read_line()).await;

        match read {
            Ok(Ok(Some(raw))) => match classify_line(&raw) {
                DeviceLine::SensorId { id } => {
                    debug!(sensor = %id, "device reported sensor");
                    registry.broadcast(&id, None).await;
                }
                DeviceLine::EffectDone => {
                    debug!("device finished init effect");
                    registry.broadcast("EFFECT_DONE", None).await;
                }
                DeviceLine::Unknown { text } => {
                    warn!(line = %text, "unrecognized device line");
                }
            },
            Ok(Ok(None)) => {
                tokio::time::sleep(poll_interval).await;
            }
            Ok(Err(e)) => {
                warn!(error = %e, "device read failed");
                tokio::time::sleep(poll_interval).await;
            }
            Err(e) => {
                warn!(error = %e, "device read task failed");
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
}
