use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use explorer::{BeaconchainClient, EpochClient};
use graffiti_scraper::{router, AppState, Args};
use metrics::Metrics;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let client: Arc<dyn EpochClient> = Arc::new(
        BeaconchainClient::new(&args.api_base_url, &args.api_key, args.request_timeout())
            .context("Failed to build explorer client")?,
    );
    let store = storage::connect(&args.db_connect_string)
        .await
        .context("Failed to open slot store")?;
    let metrics = Arc::new(Metrics::new().context("Failed to register metrics")?);

    let state = AppState::new(client, store, args.sync_config(), metrics, args.export_mode);

    let addr = args.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        address = %addr,
        explorer = %args.api_base_url,
        export_mode = ?args.export_mode,
        resume_policy = ?args.resume_policy,
        "Graffiti scraper listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server exited with error")?;

    info!("Main async task exiting...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
