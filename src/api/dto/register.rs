//! DTOs for URL registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{expire_at_field, url_field};

/// Request to register a URL until a given time.
///
/// Unknown fields are rejected. `expireAt` is an RFC 3339 timestamp.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterUrlRequest {
    /// Must start with `http://` or `https://`.
    #[validate(custom(function = "url_field"))]
    pub url: String,

    /// Must be in the future.
    #[validate(custom(function = "expire_at_field"))]
    pub expire_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUrlResponse {
    /// The short code.
    pub id: String,
    pub short_url: String,
}
