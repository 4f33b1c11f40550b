//! Syntactic checks on submitted registrations.
//!
//! The checks are pure: the current time is passed in by the caller.
//! [`crate::api::dto::register::RegisterUrlRequest`] wires them into
//! `validator` so that every violation of a request is reported at once.

use std::borrow::Cow;

use crate::domain::error::ShortenError;
use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Accepts strings starting with `http://` or `https://`.
///
/// This is a prefix check only, not full URI validation.
///
/// # Errors
///
/// Returns [`ShortenError::InvalidUrl`] otherwise.
pub fn validate_url(url: &str) -> Result<(), ShortenError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ShortenError::InvalidUrl)
    }
}

/// Accepts expirations strictly after `now`.
///
/// # Errors
///
/// Returns [`ShortenError::InvalidExpiration`] if `expire_at <= now`.
pub fn validate_expiration(
    expire_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ShortenError> {
    if expire_at > now {
        Ok(())
    } else {
        Err(ShortenError::InvalidExpiration)
    }
}

fn to_validation_error(code: &'static str, err: ShortenError) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(err.to_string()))
}

/// `validator` adapter for [`validate_url`].
pub fn url_field(url: &str) -> Result<(), ValidationError> {
    validate_url(url).map_err(|e| to_validation_error("invalid_url", e))
}

/// `validator` adapter for [`validate_expiration`] against the wall clock.
pub fn expire_at_field(expire_at: &DateTime<Utc>) -> Result<(), ValidationError> {
    validate_expiration(*expire_at, Utc::now())
        .map_err(|e| to_validation_error("invalid_expiration", e))
}
