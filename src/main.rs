//! qsy-gateway server entry point.
//!
//! Starts the Axum HTTP server with the command endpoints and the device
//! WebSocket endpoint.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use qsy_gateway::app_state::AppState;
use qsy_gateway::config::{GatewayConfig, TablesLocation};
use qsy_gateway::server::{build_app, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .init();

    match &config.tables {
        TablesLocation::Local(dir) => {
            tracing::info!(dir = %dir.display(), "lookup tables from local directory");
        }
        TablesLocation::Remote(template) => {
            tracing::info!(%template, "lookup tables from remote location");
        }
    }
    if config.admin_password.is_none() {
        tracing::warn!("ADMIN_PASSWORD not set, cache flush is disabled");
    }

    // Build application state
    let app_state = AppState::from_config(&config).context("failed to build lookup table client")?;
    let registry = Arc::clone(&app_state.registry);

    // Build router
    let app = build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "qsy-gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(registry))
        .await
        .context("HTTP server failed")?;

    tracing::info!("server stopped");
    Ok(())
}
