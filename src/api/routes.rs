//! API route configuration.

use crate::api::handlers::{health_handler, method_not_allowed_handler, register_url_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Versioned API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET  /health`  - Store reachability
/// - `POST /v1/urls` - Register a URL (any other method answers 405)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/v1/urls",
            post(register_url_handler).fallback(method_not_allowed_handler),
        )
}
