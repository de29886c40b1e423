//! Router assembly and shutdown handling.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::domain::ConnectionRegistry;
use crate::ws::handler::device_ws_handler;

/// Builds the full application: REST API, device WebSocket, middleware.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws/connect-device/{device_id}", get(device_ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// How long shutdown waits for device connections to unregister.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Asks every open device connection to close, then waits up to
/// `drain_timeout` for all of them to unregister.
///
/// Close requests never wait on a full outbound queue, so a stalled device
/// cannot hold up shutdown past `drain_timeout`.
///
/// Returns `true` if the registry drained in time.
pub async fn close_all_connections(registry: &ConnectionRegistry, drain_timeout: Duration) -> bool {
    let handles = registry.all().await;
    tracing::info!(count = handles.len(), "closing device connections");
    for handle in &handles {
        handle.close();
    }

    let drained = tokio::time::timeout(drain_timeout, async {
        while !registry.is_empty().await {
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    })
    .await
    .is_ok();
    if !drained {
        let remaining = registry.len().await;
        tracing::warn!(remaining, "device connections did not drain");
    }
    drained
}

/// Resolves on Ctrl+C or SIGTERM, then closes all device connections so
/// the server can drain.
pub async fn shutdown_signal(registry: Arc<ConnectionRegistry>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
    close_all_connections(&registry, DRAIN_TIMEOUT).await;
}
