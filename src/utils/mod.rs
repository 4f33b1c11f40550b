//! Helper functions shared across layers.
//!
//! - [`code_generator`] - Short code derivation from a URL digest
//! - [`validation`] - URL and expiration checks
//! - [`db_error`] - PostgreSQL error classification

pub mod code_generator;
pub mod db_error;
pub mod validation;
