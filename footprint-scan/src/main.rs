//! footprint-scan - Footprint Scan Service
//!
//! Runs registered connectors for a query, refines identity confidence,
//! scores content risk and returns a merged timeline over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use footprint_common::config::ScanConfig;
use footprint_scan::services::ScanPipeline;
use footprint_scan::AppState;
use std::path::PathBuf;
use tokio::signal;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, env = "FOOTPRINT_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and FOOTPRINT_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = footprint_scan::logging::init_tracing();

    let mut config = ScanConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }

    log_filter.apply_level(&config.log_level);

    info!("Starting footprint-scan");
    info!(
        "Version: {} (git {}, built {}, {}, features: {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE"),
        env!("BUILD_FEATURES")
    );

    let pipeline = ScanPipeline::from_config(&config).context("Failed to build scan pipeline")?;
    info!("Scan pipeline ready with {} connector(s)", pipeline.connector_count());

    let app = footprint_scan::build_router(AppState::new(pipeline), &config.cors_origins);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
