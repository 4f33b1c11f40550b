//! Repository trait for short code records.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::error::StoreError;
use async_trait::async_trait;

/// Storage capability consumed by registration and lookup.
///
/// Uniqueness of `short_code` must be enforced atomically by [`insert`]:
/// the registration service never locks, it relies on
/// [`StoreError::DuplicateKey`] as its only concurrency signal.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - In-process map
/// - Test mocks available with `cfg(test)`
///
/// [`insert`]: UrlRepository::insert
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds a record by its short code, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] or [`StoreError::Database`] on backend failure.
    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Inserts a record and returns it with its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if any record (live or expired)
    /// already owns the short code.
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError>;

    /// Overwrites the record matching `record.id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingRecord`] if no record has that id.
    async fn update(&self, record: &UrlRecord) -> Result<(), StoreError>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;
}
