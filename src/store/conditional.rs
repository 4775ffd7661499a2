//! Precondition evaluation for conditional reads and writes.
//!
//! Two independent semantics are supported:
//!
//! * **If-None-Match** (safe reads): when the caller's cached token still
//!   equals the current fingerprint, the read short-circuits to a
//!   "not modified" result with no body.
//! * **If-Match** (unsafe writes): when the caller supplies a token that no
//!   longer equals the record's fingerprint, the write is rejected with
//!   [`FingerprintMismatch`] and the store is left unchanged. No token
//!   means the precondition is skipped — last writer wins.
//!
//! The store evaluates write preconditions inside its exclusive section,
//! so no other writer can slip between the comparison and the apply.

use crate::catalog::fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A caller-supplied condition on the current fingerprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precondition<'a> {
    /// No token supplied; proceed unconditionally.
    Unconditional,
    /// Proceed only when the token still matches (write guard).
    IfMatch(&'a Fingerprint),
    /// Short-circuit when the token still matches (read cache guard).
    IfNoneMatch(&'a Fingerprint),
}

impl<'a> Precondition<'a> {
    /// The write-side precondition for an optional caller token.
    pub fn for_write(expected: Option<&'a Fingerprint>) -> Self {
        expected.map_or(Precondition::Unconditional, Precondition::IfMatch)
    }

    /// The read-side precondition for an optional cached token.
    pub fn for_read(cached: Option<&'a Fingerprint>) -> Self {
        cached.map_or(Precondition::Unconditional, Precondition::IfNoneMatch)
    }

    /// Evaluate against the current fingerprint.
    pub fn check(&self, current: &Fingerprint) -> Verdict {
        match self {
            Precondition::Unconditional => Verdict::Proceed,
            Precondition::IfMatch(expected) => {
                if *expected == current {
                    Verdict::Proceed
                } else {
                    Verdict::Failed
                }
            }
            Precondition::IfNoneMatch(cached) => {
                if *cached == current {
                    Verdict::NotModified
                } else {
                    Verdict::Proceed
                }
            }
        }
    }
}

/// Outcome of a precondition check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Condition holds (or none was supplied); perform the operation.
    Proceed,
    /// The caller's cache is still current; skip the body.
    NotModified,
    /// The caller's token is stale; reject the write.
    Failed,
}

/// Result of a cache-validating read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValidation<T> {
    /// The caller's cached representation is still current.
    NotModified,
    /// The cache was stale (or absent); here is the fresh representation.
    Refreshed(T),
}

impl<T> CacheValidation<T> {
    pub fn is_not_modified(&self) -> bool {
        matches!(self, CacheValidation::NotModified)
    }

    /// The fresh value, if the read produced one.
    pub fn into_refreshed(self) -> Option<T> {
        match self {
            CacheValidation::Refreshed(value) => Some(value),
            CacheValidation::NotModified => None,
        }
    }
}

/// Details of a failed write precondition: the token the caller expected
/// to still be current, and the one actually stored.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("expected fingerprint '{expected}', found '{current}'")]
pub struct FingerprintMismatch {
    pub expected: Fingerprint,
    pub current: Fingerprint,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> Fingerprint {
        Fingerprint::from_opaque(s)
    }

    #[test]
    fn unconditional_always_proceeds() {
        assert_eq!(
            Precondition::Unconditional.check(&token("a")),
            Verdict::Proceed
        );
        assert_eq!(Precondition::for_write(None).check(&token("a")), Verdict::Proceed);
        assert_eq!(Precondition::for_read(None).check(&token("a")), Verdict::Proceed);
    }

    #[test]
    fn if_match_rejects_stale_tokens() {
        let current = token("fresh");
        let stale = token("stale");
        assert_eq!(
            Precondition::IfMatch(&current).check(&current),
            Verdict::Proceed
        );
        assert_eq!(Precondition::IfMatch(&stale).check(&current), Verdict::Failed);
    }

    #[test]
    fn if_none_match_short_circuits_current_caches() {
        let current = token("fresh");
        let stale = token("stale");
        assert_eq!(
            Precondition::IfNoneMatch(&current).check(&current),
            Verdict::NotModified
        );
        assert_eq!(
            Precondition::IfNoneMatch(&stale).check(&current),
            Verdict::Proceed
        );
    }

    #[test]
    fn mismatch_message_names_both_tokens() {
        let mismatch = FingerprintMismatch {
            expected: token("old"),
            current: token("new"),
        };
        let text = mismatch.to_string();
        assert!(text.contains("'old'"));
        assert!(text.contains("'new'"));
    }

    #[test]
    fn cache_validation_accessors() {
        let refreshed = CacheValidation::Refreshed(5);
        assert!(!refreshed.is_not_modified());
        assert_eq!(refreshed.into_refreshed(), Some(5));

        let unchanged: CacheValidation<i32> = CacheValidation::NotModified;
        assert!(unchanged.is_not_modified());
        assert_eq!(unchanged.into_refreshed(), None);
    }
}
