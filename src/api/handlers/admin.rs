//! Admin endpoints.
//!
//! The admin secret is a plaintext shared value compared directly against
//! the query string. It is weak authentication: it travels in URLs and
//! ends up in access logs. Deploy behind TLS and a private network.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{FlushParams, FlushResponse, RESULT_SUCCESS};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /cmd/flush_qrg_tables_cache` — Drop every cached lookup table.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] if the secret is missing, wrong,
/// or no secret is configured.
#[utoipa::path(
    get,
    path = "/cmd/flush_qrg_tables_cache",
    tag = "Admin",
    summary = "Flush lookup table cache",
    description = "Clears the lookup table cache so the next resolution of every table reloads it from its source.",
    params(FlushParams),
    responses(
        (status = 200, description = "Cache flushed", body = FlushResponse),
        (status = 403, description = "Wrong or missing admin password", body = ErrorResponse),
    )
)]
pub async fn flush_tables_cache(
    State(state): State<AppState>,
    Query(params): Query<FlushParams>,
) -> Result<Json<FlushResponse>, GatewayError> {
    let authorized = match (state.admin_password.as_deref(), params.admin_password.as_deref()) {
        (Some(expected), Some(given)) => expected == given,
        _ => false,
    };
    if !authorized {
        tracing::warn!("rejected lookup table cache flush");
        return Err(GatewayError::Unauthorized);
    }

    let flushed_tables = state.cache.flush().await;
    tracing::info!(flushed_tables, "lookup table cache flushed");
    Ok(Json(FlushResponse {
        result: RESULT_SUCCESS.to_string(),
        flushed_tables,
    }))
}

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/cmd/flush_qrg_tables_cache", get(flush_tables_cache))
}
