//! Mavuno bulk-auction service - entry point.

use anyhow::Result;
use clap::Parser;
use mavuno_core::SystemClock;
use mavuno_service::{AppConfig, AuctionService, DynInventory, HttpInventoryClient, StaticInventory};
use std::sync::Arc;
use tracing::{info, warn};

/// Mavuno bulk-auction bidding service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via MAVUNO_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    mavuno_telemetry::init_logging()?;

    info!("Starting Mavuno auction service v{}", env!("CARGO_PKG_VERSION"));

    // Determine config path: CLI arg > MAVUNO_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("MAVUNO_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");
    let config = AppConfig::load(&config_path)?;

    let inventory: DynInventory = match &config.inventory.base_url {
        Some(url) => {
            info!(url = %url, "Using catalog inventory over HTTP");
            Arc::new(HttpInventoryClient::new(
                url.clone(),
                Some(config.inventory.request_timeout()),
            )?)
        }
        None => {
            warn!("No inventory endpoint configured, using an empty in-memory inventory");
            Arc::new(StaticInventory::new())
        }
    };

    let service = Arc::new(AuctionService::new(
        &config,
        Arc::new(SystemClock),
        inventory,
    ));

    mavuno_service::app::run(service, &config).await?;

    info!("Mavuno auction service stopped");
    Ok(())
}
