//! Formcast Server - Main Entry Point

use anyhow::Context;
use api::config::ServerConfig;
use api::{init_logging, run_server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Formcast v{} ===", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1);
    let config = ServerConfig::load(config_path.as_deref())
        .context("failed to load server configuration")?;
    info!("Configured apps: {}", config.apps.len());

    run_server(config).await
}
