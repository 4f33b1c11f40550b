//! Core domain entities.
//!
//! - [`UrlRecord`] - A stored short code to URL mapping
//! - [`NewUrlRecord`] - Input for inserting a mapping (no id yet)

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};
