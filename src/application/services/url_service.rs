//! Registration and lookup of short codes.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info, warn};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::error::{ShortenError, StoreError};
use crate::domain::repositories::UrlRepository;
use crate::utils::code_generator::{CandidateCodes, MAX_CODE_LENGTH, derive_code};

/// Code lengths used during registration.
///
/// Codes are first derived at `base_length`. On a collision with a different
/// URL, lengths `base_length + 1 ..= max_length` are tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeLengths {
    base_length: usize,
    max_length: usize,
}

impl CodeLengths {
    /// # Errors
    ///
    /// Returns [`ShortenError::InvalidLength`] unless
    /// `1 <= base_length < max_length <= 43`.
    pub fn new(base_length: usize, max_length: usize) -> Result<Self, ShortenError> {
        if base_length == 0 || base_length >= MAX_CODE_LENGTH {
            return Err(ShortenError::InvalidLength {
                length: base_length,
                max: MAX_CODE_LENGTH - 1,
            });
        }
        if max_length <= base_length || max_length > MAX_CODE_LENGTH {
            return Err(ShortenError::InvalidLength {
                length: max_length,
                max: MAX_CODE_LENGTH,
            });
        }

        Ok(Self {
            base_length,
            max_length,
        })
    }

    pub fn base_length(&self) -> usize {
        self.base_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

/// How a registration was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A new record was stored at the base length.
    Created,
    /// The base code belonged to another URL; a longer code was stored.
    Reshortened,
    /// The URL was already registered; its expiration was pushed back.
    Extended,
    /// The URL was already registered with an equal or later expiration.
    Unchanged,
}

/// Result of [`UrlService::register`]: the stored record and how it got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub record: UrlRecord,
    pub outcome: RegistrationOutcome,
}

impl Registration {
    pub fn code(&self) -> &str {
        &self.record.short_code
    }
}

/// Service assigning short codes to URLs and resolving them back.
///
/// Holds no mutable state of its own. Concurrent registrations are
/// serialized only by the repository rejecting duplicate codes.
pub struct UrlService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    lengths: CodeLengths,
}

impl<R: UrlRepository + ?Sized> UrlService<R> {
    /// Creates a new URL service.
    pub fn new(repository: Arc<R>, lengths: CodeLengths) -> Self {
        Self {
            repository,
            lengths,
        }
    }

    pub fn lengths(&self) -> CodeLengths {
        self.lengths
    }

    /// Registers `url` until `expire_at` and returns the code it is reachable at.
    ///
    /// Both inputs are expected to be validated already. `expire_at` is
    /// truncated to whole microseconds, the precision the store keeps.
    ///
    /// # Conflict Resolution
    ///
    /// - Base code free: a record is inserted.
    /// - Base code owned by another URL: longer codes are tried up to the
    ///   maximum length, first free one wins. A longer code already owned by
    ///   the same URL is reused.
    /// - Code owned by the same URL: the expiration is extended if
    ///   `expire_at` is strictly later, otherwise nothing is written.
    ///
    /// # Errors
    ///
    /// - [`ShortenError::TransientConflict`] if a colliding record vanished
    ///   before it could be read
    /// - [`ShortenError::ExhaustedCollisionSpace`] if every longer code is
    ///   owned by other URLs
    /// - [`ShortenError::Storage`] on any other store failure
    pub async fn register(
        &self,
        url: &str,
        expire_at: DateTime<Utc>,
    ) -> Result<Registration, ShortenError> {
        let expire_at = expire_at.trunc_subsecs(6);
        let code = derive_code(url, self.lengths.base_length)?;

        if let Some(record) = self.try_insert(url, expire_at, &code).await? {
            debug!(code = %record.short_code, "registered new code");
            return Ok(Registration {
                record,
                outcome: RegistrationOutcome::Created,
            });
        }
        debug!(%code, "base code already taken");

        let existing = self.fetch_colliding(&code).await?;
        if existing.original_url == url {
            return self.refresh(existing, expire_at).await;
        }

        self.reshorten(url, expire_at).await
    }

    /// Retries the insert with codes longer than the base length.
    async fn reshorten(
        &self,
        url: &str,
        expire_at: DateTime<Utc>,
    ) -> Result<Registration, ShortenError> {
        let lengths = self.lengths.base_length + 1..=self.lengths.max_length;

        for code in CandidateCodes::new(url, lengths)? {
            if let Some(record) = self.try_insert(url, expire_at, &code).await? {
                debug!(code = %record.short_code, "registered re-shortened code");
                return Ok(Registration {
                    record,
                    outcome: RegistrationOutcome::Reshortened,
                });
            }

            let existing = self.fetch_colliding(&code).await?;
            if existing.original_url == url {
                return self.refresh(existing, expire_at).await;
            }
            debug!(%code, "candidate code already taken");
        }

        warn!(
            url,
            max_length = self.lengths.max_length,
            "collision space exhausted"
        );
        Err(ShortenError::ExhaustedCollisionSpace {
            url: url.to_string(),
            max_length: self.lengths.max_length,
        })
    }

    /// Reads the record that made an insert of `code` fail.
    async fn fetch_colliding(&self, code: &str) -> Result<UrlRecord, ShortenError> {
        self.repository.get(code).await?.ok_or_else(|| {
            warn!(%code, "colliding record vanished before it could be read");
            ShortenError::TransientConflict {
                code: code.to_string(),
            }
        })
    }

    /// Pushes back the expiration of a record already holding the URL.
    ///
    /// Equal or earlier expirations never write.
    async fn refresh(
        &self,
        existing: UrlRecord,
        expire_at: DateTime<Utc>,
    ) -> Result<Registration, ShortenError> {
        if expire_at <= existing.expire_at {
            return Ok(Registration {
                record: existing,
                outcome: RegistrationOutcome::Unchanged,
            });
        }

        let record = UrlRecord {
            expire_at,
            ..existing
        };
        self.repository.update(&record).await?;
        info!(
            code = %record.short_code,
            expire_at = %record.expire_at,
            "extended expiration"
        );

        Ok(Registration {
            record,
            outcome: RegistrationOutcome::Extended,
        })
    }

    /// Inserts a record, mapping a duplicate key to `Ok(None)`.
    async fn try_insert(
        &self,
        url: &str,
        expire_at: DateTime<Utc>,
        code: &str,
    ) -> Result<Option<UrlRecord>, ShortenError> {
        let new_record = NewUrlRecord {
            original_url: url.to_string(),
            expire_at,
            short_code: code.to_string(),
        };

        match self.repository.insert(new_record).await {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::DuplicateKey { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolves `code` to a live record.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenError::NotFound`] for both absent and expired codes.
    pub async fn resolve(&self, code: &str) -> Result<UrlRecord, ShortenError> {
        self.resolve_at(code, Utc::now()).await
    }

    /// Same as [`Self::resolve`] with an explicit current time.
    pub async fn resolve_at(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<UrlRecord, ShortenError> {
        // No derived code can be empty or longer than the digest encoding.
        if code.is_empty() || code.len() > MAX_CODE_LENGTH {
            return Err(ShortenError::NotFound);
        }

        match self.repository.get(code).await? {
            Some(record) if record.is_live_at(now) => Ok(record),
            Some(record) => {
                debug!(code, expire_at = %record.expire_at, "code expired");
                Err(ShortenError::NotFound)
            }
            None => Err(ShortenError::NotFound),
        }
    }

    /// Checks if the underlying store is reachable.
    pub async fn health_check(&self) -> bool {
        self.repository.health_check().await
    }
}
