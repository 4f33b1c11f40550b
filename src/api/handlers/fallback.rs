//! Handlers for unmatched methods and paths.

use crate::error::AppError;

/// Answers `405` with a JSON body for a known path hit with the wrong method.
pub async fn method_not_allowed_handler() -> AppError {
    AppError::MethodNotAllowed
}

/// Answers unknown paths the same way as unknown codes.
pub async fn not_found_handler() -> AppError {
    AppError::not_found()
}
