//! REST endpoint handlers organized by resource.

pub mod admin;
pub mod command;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all `/cmd` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(command::routes())
        .merge(admin::routes())
}
