//! TCP-to-serial bridge server binary.

use anyhow::Result;
use bridge_server::config::Config;
use bridge_server::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    info!(
        "starting bridge-server on {} (serial = {} @ {} baud, max_clients = {})",
        config.socket_addr_string(),
        config.serial_port,
        config.baud_rate,
        config.max_clients
    );

    server::run(config).await
}
