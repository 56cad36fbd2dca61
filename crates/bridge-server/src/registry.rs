//! The shared client registry.
//!
//! A thread-safe map of connected clients to their outbound channels,
//! mutated concurrently by every connection task and read by the device
//! poller. Broadcasts snapshot the membership under the read lock and
//! deliver outside it, so a slow client can never stall the lock and a
//! removal mid-broadcast can never crash the broadcaster.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::types::{ClientId, OutboundTx};

/// Registry of connected clients and their outbound channels.
///
/// Cloning is cheap; all clones share the same underlying map.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    inner: Arc<RwLock<HashMap<ClientId, OutboundTx>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client. Registering an already-present handle replaces its
    /// sender, which is observably the same as registering once.
    pub async fn register(&self, id: ClientId, tx: OutboundTx) {
        let mut guard = self.inner.write().await;
        guard.insert(id, tx);
    }

    /// Remove a client. No-op if the handle is absent.
    pub async fn unregister(&self, id: ClientId) {
        let mut guard = self.inner.write().await;
        guard.remove(&id);
    }

    /// Number of currently registered clients.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Deliver `text` to every registered client except `excluding`.
    ///
    /// Membership is snapshotted up front; clients joining mid-broadcast
    /// are not required to receive it. A failed send means the client's
    /// writer task is gone; that client is removed from the registry and
    /// the broadcast carries on with the rest.
    pub async fn broadcast(&self, text: &str, excluding: Option<ClientId>) {
        let snapshot: Vec<(ClientId, OutboundTx)> = {
            let guard = self.inner.read().await;
            guard
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        debug!(text, excluding = ?excluding, "broadcasting");

        let mut dead: Vec<ClientId> = Vec::new();

        for (id, tx) in snapshot {
            if Some(id) == excluding {
                continue;
            }
            if tx.send(text.to_string()).is_err() {
                dead.push(id);
            }
        }

        if !dead.is_empty() {
            let mut guard = self.inner.write().await;
            for id in dead {
                if guard.remove(&id).is_some() {
                    warn!(client = id.0, "dropping client with closed outbound channel");
                }
            }
        }
    }
}
