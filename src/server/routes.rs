//! Route definitions.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/filters/links", post(handlers::filter_links))
        .route("/filters/panel", get(handlers::filter_panel))
        .route("/results/highlight", post(handlers::highlight_result))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
