//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`       - Short link redirect
//! - `GET  /api/health`   - Store reachability check
//! - `POST /api/v1/urls`  - URL registration
//!
//! Other methods on these paths answer `405`, unknown paths `404`, both with
//! a JSON `{ "error": ... }` body.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Body limit** - Request bodies are capped at 1 MiB

use crate::api;
use crate::api::handlers::{method_not_allowed_handler, not_found_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;

/// Largest accepted request body.
pub const MAX_REQUEST_BODY: usize = 1 << 20;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/{code}",
            get(redirect_handler).fallback(method_not_allowed_handler),
        )
        .nest("/api", api::routes::api_routes())
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY))
        .with_state(state)
        .layer(tracing::layer())
}
