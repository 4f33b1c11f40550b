//! URL record entity representing a short code mapping.

use chrono::{DateTime, Utc};

/// A stored mapping from a short code to its original URL.
///
/// The `original_url` never changes for a given `short_code`; only
/// `expire_at` may be advanced. Expired records are kept in the store but
/// are unreachable through lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
    pub expire_at: DateTime<Utc>,
    pub short_code: String,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        id: i64,
        original_url: String,
        expire_at: DateTime<Utc>,
        short_code: String,
    ) -> Self {
        Self {
            id,
            original_url,
            expire_at,
            short_code,
        }
    }

    /// Returns true if the record is still reachable at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_at > now
    }

    /// Returns true if the record has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        !self.is_live_at(Utc::now())
    }
}

/// Input data for inserting a new record. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub original_url: String,
    pub expire_at: DateTime<Utc>,
    pub short_code: String,
}

impl NewUrlRecord {
    /// Attaches a store-assigned id, producing the persisted record.
    pub fn with_id(self, id: i64) -> UrlRecord {
        UrlRecord::new(id, self.original_url, self.expire_at, self.short_code)
    }
}
