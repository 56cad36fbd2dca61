//! Configuration for the bridge server.
//!
//! For now this is intentionally simple: you can either use defaults
//! or override via a few environment variables:
//!
//! - `BRIDGE_BIND_ADDR`        (default: "0.0.0.0")
//! - `BRIDGE_PORT`             (default: "8765")
//! - `BRIDGE_MAX_CLIENTS`      (default: "32")
//! - `BRIDGE_SERIAL_PORT`      (default: "/dev/ttyUSB0")
//! - `BRIDGE_BAUD_RATE`        (default: "115200")
//! - `BRIDGE_SERIAL_TIMEOUT_MS` (default: "1000")
//! - `BRIDGE_POLL_INTERVAL_MS` (default: "10")

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// Serial device path (e.g. "/dev/ttyUSB0").
    pub serial_port: String,

    /// Serial baud rate.
    pub baud_rate: u32,

    /// Serial read timeout in milliseconds.
    pub serial_timeout_ms: u64,

    /// Poller idle backoff between read attempts, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to reasonable defaults.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("BRIDGE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = read_env_or_default("BRIDGE_PORT", 8765u16)?;
        let max_clients = read_env_or_default("BRIDGE_MAX_CLIENTS", 32usize)?;
        let serial_port =
            env::var("BRIDGE_SERIAL_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
        let baud_rate = read_env_or_default("BRIDGE_BAUD_RATE", 115_200u32)?;
        let serial_timeout_ms = read_env_or_default("BRIDGE_SERIAL_TIMEOUT_MS", 1000u64)?;
        let poll_interval_ms = read_env_or_default("BRIDGE_POLL_INTERVAL_MS", 10u64)?;

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            serial_port,
            baud_rate,
            serial_timeout_ms,
            poll_interval_ms,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Serial read timeout as a `Duration`.
    pub fn serial_timeout(&self) -> Duration {
        Duration::from_millis(self.serial_timeout_ms)
    }

    /// Poller idle backoff as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => Ok(val.parse::<T>()?),
        Err(_) => Ok(default),
    }
}
