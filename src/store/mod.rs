//! Object store abstraction.
//!
//! The reconciler is transport-agnostic: it drives whatever backend is
//! injected through [`ObjectStore`]. Documents cross the boundary as raw
//! JSON values keyed by kind plus [`ResourceKey`], so one store handle
//! serves every resource type.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::object::ResourceKey;

/// Errors surfaced by an object store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// No object with this kind and key
    #[error("{kind} {key} not found")]
    NotFound {
        /// Kind of the missing object
        kind: String,
        /// Key of the missing object
        key: ResourceKey,
    },

    /// Optimistic concurrency check failed on update
    #[error("version conflict: expected {expected}, found {actual}")]
    Conflict {
        /// Version presented by the writer
        expected: String,
        /// Version currently held by the store
        actual: String,
    },

    /// Create raced an existing object with the same key
    #[error("{kind} {key} already exists")]
    AlreadyExists {
        /// Kind of the existing object
        kind: String,
        /// Key of the existing object
        key: ResourceKey,
    },

    /// Backend failure (transport, storage, authorization, ...)
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Not-found error for the given kind and key
    pub fn not_found(kind: impl Into<String>, key: ResourceKey) -> Self {
        StoreError::NotFound {
            kind: kind.into(),
            key,
        }
    }

    /// True for the not-found variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Store surface the reconciler drives.
///
/// Contract: `get` distinguishes not-found from other failures,
/// `create` rejects an existing key, and `update` rejects a document
/// whose `metadata.resourceVersion` is stale.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Point lookup by kind and key
    async fn get(&self, kind: &str, key: &ResourceKey) -> Result<Value, StoreError>;

    /// Insert a new object
    async fn create(&self, kind: &str, key: &ResourceKey, doc: &Value)
        -> Result<(), StoreError>;

    /// Replace an existing object, subject to the version check
    async fn update(&self, kind: &str, key: &ResourceKey, doc: &Value)
        -> Result<(), StoreError>;
}
