//! Shared types for the bridge TCP server.
//!
//! This module defines:
//! - `ClientId`: a lightweight handle for connected clients
//! - channel aliases for each client's outbound text lines

use tokio::sync::mpsc;

/// Identifier for a connected client.
///
/// This is intentionally opaque; we just guarantee uniqueness
/// over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

/// Outbound text lines bound for a given client.
///
/// Everything a client receives (relayed raw tokens and device status
/// lines alike) travels through this channel as bare text; the client's
/// writer task appends the newline framing.
pub type OutboundTx = mpsc::UnboundedSender<String>;
pub type OutboundRx = mpsc::UnboundedReceiver<String>;
