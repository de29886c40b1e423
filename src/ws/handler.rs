//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use super::connection::run_device_connection;
use crate::app_state::AppState;
use crate::domain::DeviceId;

/// `GET /ws/connect-device/{device_id}` — Upgrade a device connection.
pub async fn device_ws_handler(
    ws: WebSocketUpgrade,
    Path(device_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let device_id = DeviceId::from(device_id);
    let registry = Arc::clone(&state.registry);
    let settings = state.connection;

    ws.on_upgrade(move |socket| run_device_connection(socket, device_id, registry, settings))
}
