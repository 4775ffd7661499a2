//! Error types for catalog operations.
//!
//! Every component in this crate returns typed outcomes rather than raising
//! through unrelated layers. Adapters translate each variant into a
//! protocol-appropriate signal (HTTP status, GraphQL error, ...) without
//! altering its semantic kind.

use crate::store::conditional::FingerprintMismatch;

/// Main error type for catalog operations.
///
/// Each variant carries enough context for a caller to act on it: the
/// offending id, the conflicting record's id, or the fingerprint pair that
/// failed to match.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No destination exists with the given id.
    #[error("destination not found: {id}")]
    NotFound { id: u64 },

    /// Create input failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A live destination already holds the same natural key.
    #[error("destination '{name}' already exists in '{country}' (id {existing_id})")]
    Conflict {
        name: String,
        country: String,
        existing_id: u64,
    },

    /// A supplied concurrency token no longer matches the stored record.
    #[error("precondition failed: {0}")]
    PreconditionFailed(#[from] FingerprintMismatch),

    /// Unexpected failure in any component.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl CatalogError {
    /// The id of the pre-existing record a [`CatalogError::Conflict`] points at.
    pub fn conflicting_id(&self) -> Option<u64> {
        match self {
            CatalogError::Conflict { existing_id, .. } => Some(*existing_id),
            _ => None,
        }
    }
}

/// Validation errors for create input.
///
/// The draft type keeps required fields optional so that "present vs.
/// absent" is checkable before a record is built; these are the failures
/// that check can produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was absent from the create input.
    #[error("missing field: {field}")]
    MissingRequiredField { field: &'static str },

    /// A required field was present but empty.
    #[error("field '{field}' must not be empty")]
    EmptyField { field: &'static str },
}

/// Convenience alias used throughout the crate.
pub type CatalogResult<T> = Result<T, CatalogError>;
