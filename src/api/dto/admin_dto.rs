//! Admin endpoint DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for `GET /cmd/flush_qrg_tables_cache`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FlushParams {
    /// Shared admin secret.
    #[serde(default)]
    pub admin_password: Option<String>,
}

/// Response body for a successful cache flush.
#[derive(Debug, Serialize, ToSchema)]
pub struct FlushResponse {
    /// Always `"success"`.
    pub result: String,
    /// Number of tables dropped from the cache.
    pub flushed_tables: usize,
}
