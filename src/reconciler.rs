//! Convergence of desired objects against the store.
//!
//! One linear decision per call: fetch, then create, update, or leave
//! alone. Updates are only issued when the filtered structural diff is
//! non-empty, so a reconcile loop that is already converged performs no
//! writes and triggers no further watch events.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::config::ReconcilerConfig;
use crate::diff;
use crate::error::{Error, Result};
use crate::object::{Object, ResourceKey};
use crate::store::ObjectStore;

/// What a successful apply did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Object was absent and has been created
    Created,
    /// Object differed and has been updated
    Updated,
    /// Object already matched; no write was issued
    Unchanged,
}

/// Stateless facade converging desired objects against an injected store.
///
/// Holds no mutable state across calls: concurrent applies on different
/// keys need no coordination, and same-key races are resolved by the
/// store's version check (the loser re-invokes [`Reconciler::apply`],
/// which re-fetches current state).
pub struct Reconciler {
    store: Arc<dyn ObjectStore>,
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Reconciler with the default configuration
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_config(store, ReconcilerConfig::default())
    }

    /// Reconciler with explicit tunables
    pub fn with_config(store: Arc<dyn ObjectStore>, config: ReconcilerConfig) -> Self {
        Self { store, config }
    }

    /// Point lookup, deserialized into the caller's concrete type.
    ///
    /// Store errors surface verbatim, including the distinguishable
    /// not-found.
    pub async fn get<R: Object>(&self, key: &ResourceKey) -> Result<R> {
        let doc = self.store.get(R::KIND, key).await?;
        Ok(serde_json::from_value(doc)?)
    }

    /// Ensure the store holds `desired`, writing only when needed.
    ///
    /// Absent objects are created as-is. Present objects first receive
    /// the stored `resourceVersion` (the store's optimistic-concurrency
    /// contract), then an update is issued only if the structural diff,
    /// with every server-managed path excluded, is non-empty. A version
    /// conflict on update is an ordinary store error; the caller
    /// re-invokes apply to resolve the race against fresh state.
    pub async fn apply<R: Object>(&self, desired: &mut R) -> Result<Outcome> {
        let kind = R::KIND;
        let key = desired.key();
        if key.name.is_empty() {
            return Err(Error::invalid_object(kind));
        }

        let current = match self.store.get(kind, &key).await {
            Ok(doc) => doc,
            Err(err) if err.is_not_found() => {
                let doc = serde_json::to_value(&*desired)?;
                self.store.create(kind, &key, &doc).await?;
                info!(kind, namespace = %key.namespace, name = %key.name, "resource created");
                return Ok(Outcome::Created);
            }
            Err(err) => return Err(err.into()),
        };

        let current_meta = current
            .as_object()
            .and_then(|root| root.get("metadata"))
            .and_then(Value::as_object)
            .ok_or_else(|| Error::invalid_object(kind))?;

        desired.meta_mut().resource_version = current_meta
            .get("resourceVersion")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let desired_doc = serde_json::to_value(&*desired)?;
        let changes = diff::diff_with(&current, &desired_doc, &self.config.extra_ignored_paths);

        if changes.is_empty() {
            info!(kind, namespace = %key.namespace, name = %key.name, "resource unchanged");
            return Ok(Outcome::Unchanged);
        }

        if self.config.log_diffs {
            info!(kind, namespace = %key.namespace, name = %key.name, diff = %changes, "resource changes");
        }
        self.store.update(kind, &key, &desired_doc).await?;
        info!(kind, namespace = %key.namespace, name = %key.name, "resource updated");
        Ok(Outcome::Updated)
    }
}
