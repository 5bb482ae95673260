//! solarscan-api - solar installation feasibility service
//!
//! Accepts an address, runs the analysis pipeline in the background and
//! serves the result for polling.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use solarscan_common::config::ServiceConfig;
use tokio::signal;
use tracing::info;

use solarscan_api::AppState;

#[derive(Parser, Debug)]
#[command(name = "solarscan-api", version, about = "SolarScan feasibility analysis API")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "SOLARSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port
    #[arg(short, long, env = "SOLARSCAN_PORT")]
    port: Option<u16>,

    /// Bind address
    #[arg(long, env = "SOLARSCAN_BIND")]
    bind: Option<String>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, config_source) =
        ServiceConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(args.bind, args.port, args.log_level);

    // The log level comes from the config, so the source is reported once the subscriber exists
    solarscan_common::logging::init(&config.logging.level)
        .context("Failed to initialize logging")?;
    config_source.log();

    info!(
        "Starting solarscan-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("SOLARSCAN_GIT_HASH"),
        env!("SOLARSCAN_BUILD_TIMESTAMP"),
        env!("SOLARSCAN_BUILD_PROFILE")
    );

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let state = AppState::new(config);
    let lifecycle = state.lifecycle.clone();
    let app = solarscan_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Draining analysis queue");
    lifecycle.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
