//! In-process URL repository.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::error::StoreError;
use crate::domain::repositories::UrlRepository;

/// Repository keeping records in a [`DashMap`] keyed by short code.
///
/// Inserts go through the map's entry API, which holds the shard lock for
/// the code while checking and inserting, so duplicate detection is atomic
/// like the unique constraint of the PostgreSQL backend. Expired records are
/// kept and still count as duplicates.
#[derive(Debug, Default)]
pub struct InMemoryUrlRepository {
    records: DashMap<String, UrlRecord>,
    codes_by_id: DashMap<i64, String>,
    last_id: AtomicI64,
}

impl InMemoryUrlRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.records.get(code).map(|r| r.value().clone()))
    }

    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        match self.records.entry(new_record.short_code.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey {
                code: new_record.short_code,
            }),
            Entry::Vacant(slot) => {
                let id = self.last_id.fetch_add(1, Ordering::Relaxed) + 1;
                let record = new_record.with_id(id);
                self.codes_by_id.insert(id, record.short_code.clone());
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn update(&self, record: &UrlRecord) -> Result<(), StoreError> {
        let current_code = self
            .codes_by_id
            .get(&record.id)
            .map(|c| c.value().clone())
            .ok_or(StoreError::MissingRecord { id: record.id })?;

        if current_code != record.short_code {
            self.records.remove(&current_code);
            self.codes_by_id.insert(record.id, record.short_code.clone());
        }
        self.records.insert(record.short_code.clone(), record.clone());

        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
