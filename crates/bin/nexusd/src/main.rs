//! # nexusd — nexus daemon
//!
//! Loads `nexus.toml`, starts the hub and runs until interrupted.

use nexusd::Hub;
use nexusd::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let hub = Hub::start(config);
    if hub.connectors() == 0 {
        tracing::warn!("no input connector running, nothing will be received");
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupt received, shutting down");
    hub.shutdown();
    Ok(())
}
