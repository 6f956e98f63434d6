//! # reconcile-rs
//!
//! Idempotent apply semantics for declarative resources against a
//! cluster-managed object store: ensure the store's actual object
//! matches a desired one, creating it when absent and updating it only
//! when a meaningful difference exists. Fields the store itself owns
//! (identity, versioning, timestamps, provenance) are excluded from the
//! convergence check, so reconcile loops neither spin on false deltas
//! nor clobber server-assigned state.
//!
//! ```
//! use std::sync::Arc;
//!
//! use reconcile_rs::{MemoryStore, Object, ObjectMeta, Outcome, Reconciler};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Widget {
//!     metadata: ObjectMeta,
//!     spec: u32,
//! }
//!
//! impl Object for Widget {
//!     const KIND: &'static str = "Widget";
//!
//!     fn meta(&self) -> &ObjectMeta {
//!         &self.metadata
//!     }
//!
//!     fn meta_mut(&mut self) -> &mut ObjectMeta {
//!         &mut self.metadata
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> reconcile_rs::Result<()> {
//! let reconciler = Reconciler::new(Arc::new(MemoryStore::new()));
//!
//! let mut widget = Widget {
//!     metadata: ObjectMeta::new("ns", "w"),
//!     spec: 3,
//! };
//! assert_eq!(reconciler.apply(&mut widget).await?, Outcome::Created);
//! assert_eq!(reconciler.apply(&mut widget).await?, Outcome::Unchanged);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod object;
pub mod reconciler;
pub mod store;

pub use config::ReconcilerConfig;
pub use error::{Error, Result};
pub use object::{Object, ObjectMeta, ResourceKey};
pub use reconciler::{Outcome, Reconciler};
pub use store::{MemoryStore, ObjectStore, StoreError};
