//! Handler for URL registration endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::warn;
use validator::Validate;

use crate::api::dto::register::{RegisterUrlRequest, RegisterUrlResponse};
use crate::domain::error::ShortenError;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a URL and returns its short code.
///
/// # Endpoint
///
/// `POST /api/v1/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "expireAt": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "id": "EAaArVRs",
///   "shortUrl": "http://localhost:8080/EAaArVRs"
/// }
/// ```
///
/// Registering the same URL again returns the same code. A later `expireAt`
/// extends the stored expiration; an equal or earlier one changes nothing.
///
/// # Errors
///
/// Returns 400 Bad Request for malformed JSON or failed validation; every
/// violation is listed in `details`. Returns 500 Internal Server Error for
/// storage failures and unresolvable collisions.
pub async fn register_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUrlRequest>, JsonRejection>,
) -> Result<Json<RegisterUrlResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let service = &state.url_service;
    let registration = match service.register(&payload.url, payload.expire_at).await {
        Err(ShortenError::TransientConflict { code }) => {
            warn!(%code, "retrying registration once after transient conflict");
            service.register(&payload.url, payload.expire_at).await?
        }
        result => result?,
    };

    let code = registration.code().to_string();
    Ok(Json(RegisterUrlResponse {
        short_url: state.short_url(&code),
        id: code,
    }))
}
