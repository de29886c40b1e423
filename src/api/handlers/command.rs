//! QSY command endpoint handlers.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{QsyResponse, QsyWithModeResponse};
use crate::app_state::AppState;
use crate::domain::DeviceId;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /cmd/{device_id}/qsy/{qrg}` — Change a device's frequency.
///
/// # Errors
///
/// Returns [`GatewayError`] if the frequency is malformed, the device is
/// not connected, or delivery fails.
#[utoipa::path(
    get,
    path = "/cmd/{device_id}/qsy/{qrg}",
    tag = "Commands",
    summary = "QSY",
    description = "Sends a frequency change to the connected device.",
    params(
        ("device_id" = String, Path, description = "Device identifier"),
        ("qrg" = u64, Path, description = "Target frequency"),
    ),
    responses(
        (status = 200, description = "Command delivered", body = QsyResponse),
        (status = 400, description = "Malformed frequency", body = ErrorResponse),
        (status = 404, description = "Device not connected", body = ErrorResponse),
        (status = 500, description = "Delivery failed", body = ErrorResponse),
    )
)]
pub async fn qsy(
    State(state): State<AppState>,
    Path((device_id, qrg)): Path<(String, String)>,
) -> Result<Json<QsyResponse>, GatewayError> {
    let frequency = parse_qrg(&qrg)?;
    let ack = state
        .dispatcher
        .issue_qsy(&DeviceId::from(device_id), frequency)
        .await?;
    Ok(Json(ack.into()))
}

/// `GET /cmd/{device_id}/qsy-with-mode/{table_name}/{qrg}` — Change frequency
/// and mode.
///
/// # Errors
///
/// Returns [`GatewayError`] if the frequency is malformed, the table is
/// missing or invalid, the device is not connected, or delivery fails.
#[utoipa::path(
    get,
    path = "/cmd/{device_id}/qsy-with-mode/{table_name}/{qrg}",
    tag = "Commands",
    summary = "QSY with mode",
    description = "Resolves the mode for the frequency from the named lookup table and sends both to the connected device. A frequency outside every range is sent with a null mode.",
    params(
        ("device_id" = String, Path, description = "Device identifier"),
        ("table_name" = String, Path, description = "Lookup table name"),
        ("qrg" = u64, Path, description = "Target frequency"),
    ),
    responses(
        (status = 200, description = "Command delivered", body = QsyWithModeResponse),
        (status = 400, description = "Malformed frequency", body = ErrorResponse),
        (status = 404, description = "Table missing/invalid or device not connected", body = ErrorResponse),
        (status = 500, description = "Delivery failed", body = ErrorResponse),
        (status = 502, description = "Remote table fetch failed", body = ErrorResponse),
    )
)]
pub async fn qsy_with_mode(
    State(state): State<AppState>,
    Path((device_id, table_name, qrg)): Path<(String, String, String)>,
) -> Result<Json<QsyWithModeResponse>, GatewayError> {
    let frequency = parse_qrg(&qrg)?;
    let ack = state
        .dispatcher
        .issue_qsy_with_mode(&DeviceId::from(device_id), &table_name, frequency)
        .await?;
    Ok(Json(ack.into()))
}

fn parse_qrg(raw: &str) -> Result<u64, GatewayError> {
    raw.parse()
        .map_err(|_| GatewayError::InvalidRequest(format!("invalid qrg: {raw}")))
}

/// Command routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cmd/{device_id}/qsy/{qrg}", get(qsy))
        .route(
            "/cmd/{device_id}/qsy-with-mode/{table_name}/{qrg}",
            get(qsy_with_mode),
        )
}
