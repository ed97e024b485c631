use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::{handlers, AppState};
use crate::system::middleware::{cors, request_logger::request_logger};

/// Configure every route of the application.
///
/// Layers, outermost first: request logging, preflight short-circuit, CORS
/// headers.
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // PUBLIC DASHBOARD (token-based, no login)
        // ========================================
        .route(
            "/api/public/dashboard",
            post(handlers::d402_shared_dashboard::get_shared_dashboard),
        )
        .with_state(state)
        .layer(cors::cors_layer())
        .layer(middleware::from_fn(cors::preflight))
        .layer(middleware::from_fn(request_logger))
}
