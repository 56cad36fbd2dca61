//! bridge-server
//!
//! Multi-client async TCP bridge to a single serial-attached board.
//!
//! Clients connect over TCP and exchange newline-delimited text with the
//! bridge; the bridge translates structured commands onto the serial
//! device and fans device status lines out to every client.

pub mod config;
pub mod device;
pub mod poller;
pub mod registry;
pub mod server;
pub mod types;

// internal module, not re-exported
mod client;
