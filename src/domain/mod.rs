//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`error`] - Registration, lookup and store error types
//!
//! The domain layer has no dependencies on the HTTP layer. Registration and
//! lookup logic lives in [`crate::application::services`].

pub mod entities;
pub mod error;
pub mod repositories;

pub use error::{ShortenError, StoreError};
