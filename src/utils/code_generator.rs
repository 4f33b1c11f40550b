//! Short code derivation.
//!
//! A code is a prefix of the URL-safe base64 encoding (no padding) of the
//! SHA-256 digest of the original URL. Because every length is cut from the
//! same encoded digest, `derive_code(url, n)` is always a prefix of
//! `derive_code(url, n + 1)`.

use std::ops::RangeInclusive;

use crate::domain::error::ShortenError;
use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Number of symbols in the encoded 256-bit digest.
pub const MAX_CODE_LENGTH: usize = 43;

/// Hashes `url` and encodes the digest, producing [`MAX_CODE_LENGTH`] symbols
/// from the alphabet `[A-Za-z0-9_-]`.
fn encoded_digest(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest)
}

fn check_length(length: usize) -> Result<(), ShortenError> {
    if length == 0 || length > MAX_CODE_LENGTH {
        return Err(ShortenError::InvalidLength {
            length,
            max: MAX_CODE_LENGTH,
        });
    }
    Ok(())
}

/// Derives the short code of `url` at the given length.
///
/// # Errors
///
/// Returns [`ShortenError::InvalidLength`] unless `1 <= length <= 43`.
///
/// # Examples
///
/// ```ignore
/// let short = derive_code("https://example.com", 8)?;
/// let long = derive_code("https://example.com", 12)?;
/// assert!(long.starts_with(&short));
/// ```
pub fn derive_code(url: &str, length: usize) -> Result<String, ShortenError> {
    check_length(length)?;
    let mut code = encoded_digest(url);
    code.truncate(length);
    Ok(code)
}

/// Candidate codes of strictly increasing length for one URL.
///
/// The digest is computed once; each step yields the next longer prefix.
/// Clone before iterating to replay the sequence.
#[derive(Debug, Clone)]
pub struct CandidateCodes {
    encoded: String,
    next_length: usize,
    max_length: usize,
}

impl CandidateCodes {
    /// Builds the sequence of codes for every length in `lengths`.
    ///
    /// An empty range yields nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenError::InvalidLength`] if a non-empty range reaches
    /// outside `1..=43`.
    pub fn new(url: &str, lengths: RangeInclusive<usize>) -> Result<Self, ShortenError> {
        let (start, end) = lengths.into_inner();
        if start <= end {
            check_length(start)?;
            check_length(end)?;
        }

        Ok(Self {
            encoded: encoded_digest(url),
            next_length: start,
            max_length: end,
        })
    }
}

impl Iterator for CandidateCodes {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next_length > self.max_length {
            return None;
        }

        let code = self.encoded[..self.next_length].to_owned();
        self.next_length += 1;
        Some(code)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.max_length + 1).saturating_sub(self.next_length);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CandidateCodes {}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://a.example";

    #[test]
    fn test_derive_code_has_requested_length() {
        for length in 1..=MAX_CODE_LENGTH {
            assert_eq!(derive_code(URL, length).unwrap().len(), length);
        }
    }

    #[test]
    fn test_derive_code_is_stable() {
        let first = derive_code(URL, 8).unwrap();
        let second = derive_code(URL, 8).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_derive_code_is_prefix_monotonic() {
        let full = derive_code(URL, MAX_CODE_LENGTH).unwrap();
        for length in 1..MAX_CODE_LENGTH {
            let shorter = derive_code(URL, length).unwrap();
            let longer = derive_code(URL, length + 1).unwrap();
            assert!(longer.starts_with(&shorter));
            assert!(full.starts_with(&shorter));
        }
    }

    #[test]
    fn test_derive_code_known_digest() {
        // SHA-256("") = e3b0c442...b855
        assert_eq!(
            derive_code("", MAX_CODE_LENGTH).unwrap(),
            "47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU"
        );
    }

    #[test]
    fn test_derive_code_url_safe_characters() {
        let code = derive_code("https://example.com/?q=a+b&c=d", MAX_CODE_LENGTH).unwrap();
        assert!(
            code.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert!(!code.contains('='));
    }

    #[test]
    fn test_derive_code_differs_between_urls() {
        assert_ne!(
            derive_code("https://a.example", 8).unwrap(),
            derive_code("https://b.example", 8).unwrap()
        );
    }

    #[test]
    fn test_derive_code_rejects_zero_length() {
        let err = derive_code(URL, 0).unwrap_err();
        assert!(matches!(err, ShortenError::InvalidLength { length: 0, .. }));
    }

    #[test]
    fn test_derive_code_rejects_too_long() {
        let err = derive_code(URL, MAX_CODE_LENGTH + 1).unwrap_err();
        assert!(matches!(err, ShortenError::InvalidLength { length: 44, .. }));
    }

    #[test]
    fn test_candidates_grow_by_one() {
        let codes: Vec<String> = CandidateCodes::new(URL, 9..=12).unwrap().collect();

        assert_eq!(codes.len(), 4);
        for (offset, code) in codes.iter().enumerate() {
            assert_eq!(code.len(), 9 + offset);
            assert_eq!(*code, derive_code(URL, 9 + offset).unwrap());
        }
    }

    #[test]
    fn test_candidates_are_replayable() {
        let candidates = CandidateCodes::new(URL, 5..=7).unwrap();
        let first: Vec<String> = candidates.clone().collect();
        let second: Vec<String> = candidates.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_candidates_empty_range() {
        let mut candidates = CandidateCodes::new(URL, 9..=8).unwrap();
        assert_eq!(candidates.len(), 0);
        assert!(candidates.next().is_none());
    }

    #[test]
    fn test_candidates_reject_out_of_range() {
        assert!(CandidateCodes::new(URL, 40..=44).is_err());
        assert!(CandidateCodes::new(URL, 0..=3).is_err());
    }
}
