use std::sync::Arc;

use clap::Parser;
use folderstats_exporter::{Cli, SnapshotExporter, server, start_ingestion};
use folderstats_watcher::WatchRegistry;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Cli::parse().into_config()?;
    info!("Startup file system monitoring of {}", config.paths.join(", "));

    let registry = Arc::new(WatchRegistry::new(config.paths.iter().cloned()));

    // Not being able to watch a configured directory is fatal.
    let watcher = start_ingestion(&registry)?;

    let exporter = Arc::new(SnapshotExporter::new(Arc::clone(&registry)));
    let app = server::router(exporter, &config.telemetry_path);
    let listener = server::bind(config.socket_addr()?).await?;

    server::serve(listener, app, shutdown_signal()).await?;

    info!("Exporter for {} directories ends now", watcher.watched());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
