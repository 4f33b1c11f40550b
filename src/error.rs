//! HTTP-facing error type.
//!
//! Every error renders as `{ "error": "<message>" }`. Validation failures
//! add a `"details"` array with one entry per violation. Internal failures
//! are logged with full detail and answered with a generic message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::error::ShortenError;

/// Body returned for internal failures. Details are never echoed.
pub const SERVER_ERROR_MESSAGE: &str = "server cannot process your request now";

/// Body returned for absent and expired codes alike.
pub const NOT_FOUND_MESSAGE: &str = "record not found or expired";

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "this method is not allowed";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },
    #[error("{message}")]
    NotFound { message: String },
    #[error("this method is not allowed")]
    MethodNotAllowed,
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Validation {
            details: vec![message.clone()],
            message,
        }
    }
    pub fn not_found() -> Self {
        Self::NotFound {
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Validation { message, details } => ErrorBody {
                error: message,
                details,
            },
            AppError::NotFound { message } => ErrorBody {
                error: message,
                details: Vec::new(),
            },
            AppError::MethodNotAllowed => ErrorBody {
                error: METHOD_NOT_ALLOWED_MESSAGE.to_string(),
                details: Vec::new(),
            },
            AppError::Internal { message, details } => {
                tracing::error!(error = %message, details = %details, "request failed");
                ErrorBody {
                    error: SERVER_ERROR_MESSAGE.to_string(),
                    details: Vec::new(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ShortenError> for AppError {
    fn from(e: ShortenError) -> Self {
        match e {
            ShortenError::InvalidUrl | ShortenError::InvalidExpiration => {
                AppError::bad_request(e.to_string())
            }
            ShortenError::NotFound => AppError::not_found(),
            ShortenError::TransientConflict { ref code } => {
                let details = json!({ "kind": "transient_conflict", "code": code });
                AppError::internal(e.to_string(), details)
            }
            ShortenError::ExhaustedCollisionSpace { max_length, .. } => {
                let details = json!({ "kind": "exhausted_collision_space", "max_length": max_length });
                AppError::internal(e.to_string(), details)
            }
            ShortenError::InvalidLength { length, max } => {
                let details = json!({ "kind": "invalid_length", "length": length, "max": max });
                AppError::internal(e.to_string(), details)
            }
            ShortenError::Storage(ref source) => {
                let details = json!({ "kind": "storage", "source": format!("{source:?}") });
                AppError::internal(e.to_string(), details)
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    (field.to_string(), message)
                })
            })
            .collect();
        violations.sort();

        let details: Vec<String> = violations.into_iter().map(|(_, m)| m).collect();
        AppError::Validation {
            message: details.join("; "),
            details,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::bad_request("body size should not exceed 1 MB");
        }
        AppError::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::StoreError;
    use validator::ValidationError;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = AppError::from(ShortenError::NotFound).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "record not found or expired" })
        );
    }

    #[tokio::test]
    async fn test_method_not_allowed_body() {
        let response = AppError::MethodNotAllowed.into_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "this method is not allowed" })
        );
    }

    #[tokio::test]
    async fn test_internal_errors_hide_detail() {
        for err in [
            ShortenError::Storage(StoreError::Timeout),
            ShortenError::TransientConflict {
                code: "abc".to_string(),
            },
            ShortenError::ExhaustedCollisionSpace {
                url: "https://secret.example".to_string(),
                max_length: 12,
            },
        ] {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                body_json(response).await,
                json!({ "error": SERVER_ERROR_MESSAGE })
            );
        }
    }

    #[tokio::test]
    async fn test_validation_errors_enumerate_violations() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "url",
            ValidationError::new("invalid_url").with_message("invalid url".into()),
        );
        errors.add(
            "expire_at",
            ValidationError::new("invalid_expiration").with_message("too early".into()),
        );

        let response = AppError::from(errors).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["details"], json!(["too early", "invalid url"]));
        assert_eq!(body["error"], "too early; invalid url");
    }
}
