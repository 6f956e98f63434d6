//! Error types for the reconciliation core.

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for reconcile operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for reconcile operations
#[derive(Debug, Error)]
pub enum Error {
    /// Object store failure, propagated unmodified
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Fetched object does not expose the expected metadata capability,
    /// or the desired object carries no usable key
    #[error("invalid object {kind}")]
    InvalidObject {
        /// Kind of the offending object
        kind: String,
    },

    /// Object model document failed to round-trip through JSON
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Invalid-object error for the given kind
    pub fn invalid_object(kind: impl Into<String>) -> Self {
        Error::InvalidObject { kind: kind.into() }
    }

    /// True when the underlying store reported a missing object
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(StoreError::NotFound { .. }))
    }
}
