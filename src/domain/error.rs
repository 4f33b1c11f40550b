//! Error types shared by the domain and application layers.

use thiserror::Error;

/// Errors reported by a [`crate::domain::repositories::UrlRepository`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another record already owns this short code.
    ///
    /// The store rejects duplicates regardless of whether the existing
    /// record has expired.
    #[error("short code '{code}' is already taken")]
    DuplicateKey { code: String },

    /// An update targeted an id the store does not know about.
    #[error("no record with id {id}")]
    MissingRecord { id: i64 },

    /// The store call did not finish within the configured query timeout.
    #[error("store call timed out")]
    Timeout,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failures of URL registration and lookup.
#[derive(Debug, Error)]
pub enum ShortenError {
    #[error("invalid url: must start with http:// or https://")]
    InvalidUrl,

    #[error("expiration time should be after now")]
    InvalidExpiration,

    /// A code length outside `1..=max` was requested. Configuration misuse.
    #[error("code length {length} is out of range [1, {max}]")]
    InvalidLength { length: usize, max: usize },

    #[error("record not found or expired")]
    NotFound,

    /// The record that caused a duplicate-key rejection disappeared before
    /// it could be fetched. The caller may retry the registration once.
    #[error("record for code '{code}' vanished after a duplicate-key rejection")]
    TransientConflict { code: String },

    /// Every candidate length up to `max_length` collided.
    #[error("no free short code for '{url}' up to length {max_length}")]
    ExhaustedCollisionSpace { url: String, max_length: usize },

    #[error(transparent)]
    Storage(#[from] StoreError),
}
