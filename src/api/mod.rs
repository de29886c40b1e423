//! REST API layer: route handlers, DTOs, router composition, OpenAPI.
//!
//! Command and admin endpoints live under `/cmd`; the health check is at
//! the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of the HTTP surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "qsy-gateway", description = "Relays QSY commands to connected radio hardware interfaces."),
    paths(
        handlers::command::qsy,
        handlers::command::qsy_with_mode,
        handlers::admin::flush_tables_cache,
        handlers::system::health_handler,
    ),
    components(schemas(
        dto::QsyResponse,
        dto::QsyWithModeResponse,
        dto::FlushResponse,
        handlers::system::HealthResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Commands", description = "Frequency and mode changes"),
        (name = "Admin", description = "Cache administration"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_command_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/cmd/{device_id}/qsy/{qrg}"));
        assert!(paths.contains_key("/cmd/{device_id}/qsy-with-mode/{table_name}/{qrg}"));
        assert!(paths.contains_key("/cmd/flush_qrg_tables_cache"));
        assert_eq!(paths.len(), 4);
    }
}
