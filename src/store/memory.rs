//! In-memory object store.
//!
//! Backs the integration tests and single-process embeddings. Honors
//! the full store contract: duplicate creates are rejected, updates are
//! subject to the resource-version check, and the server-managed
//! metadata (uid, resourceVersion, creationTimestamp, generation) is
//! assigned here, never taken from the caller.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ObjectStore, StoreError};
use crate::object::ResourceKey;

/// HashMap-backed store keyed by kind plus ResourceKey
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<(String, ResourceKey), Value>>,
    version: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_version(&self) -> String {
        (self.version.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

fn metadata_mut(doc: &mut Value) -> Result<&mut Map<String, Value>, StoreError> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| StoreError::Backend("document is not a JSON object".to_string()))?;
    root.entry("metadata")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| StoreError::Backend("metadata is not a JSON object".to_string()))
}

fn metadata_field<'a>(doc: &'a Value, field: &str) -> Option<&'a Value> {
    doc.get("metadata")?.get(field)
}

fn resource_version(doc: &Value) -> &str {
    metadata_field(doc, "resourceVersion")
        .and_then(Value::as_str)
        .unwrap_or("")
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, kind: &str, key: &ResourceKey) -> Result<Value, StoreError> {
        let objects = self.objects.read().await;
        objects
            .get(&(kind.to_string(), key.clone()))
            .cloned()
            .ok_or_else(|| StoreError::not_found(kind, key.clone()))
    }

    async fn create(
        &self,
        kind: &str,
        key: &ResourceKey,
        doc: &Value,
    ) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        let slot = (kind.to_string(), key.clone());
        if objects.contains_key(&slot) {
            return Err(StoreError::AlreadyExists {
                kind: kind.to_string(),
                key: key.clone(),
            });
        }

        let mut stored = doc.clone();
        let meta = metadata_mut(&mut stored)?;
        meta.insert("uid".to_string(), json!(Uuid::new_v4().to_string()));
        meta.insert("resourceVersion".to_string(), json!(self.next_version()));
        meta.insert(
            "creationTimestamp".to_string(),
            json!(Utc::now().to_rfc3339()),
        );
        meta.insert("generation".to_string(), json!(1));

        objects.insert(slot, stored);
        Ok(())
    }

    async fn update(
        &self,
        kind: &str,
        key: &ResourceKey,
        doc: &Value,
    ) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        let slot = (kind.to_string(), key.clone());
        let existing = objects
            .get(&slot)
            .ok_or_else(|| StoreError::not_found(kind, key.clone()))?;

        let actual = resource_version(existing).to_string();
        let presented = resource_version(doc).to_string();
        if presented != actual {
            return Err(StoreError::Conflict {
                expected: presented,
                actual,
            });
        }

        // server-assigned identity survives the write
        let uid = metadata_field(existing, "uid").cloned();
        let created = metadata_field(existing, "creationTimestamp").cloned();
        let generation = metadata_field(existing, "generation")
            .and_then(Value::as_i64)
            .unwrap_or(0);

        let mut stored = doc.clone();
        let meta = metadata_mut(&mut stored)?;
        if let Some(uid) = uid {
            meta.insert("uid".to_string(), uid);
        }
        if let Some(created) = created {
            meta.insert("creationTimestamp".to_string(), created);
        }
        meta.insert("resourceVersion".to_string(), json!(self.next_version()));
        meta.insert("generation".to_string(), json!(generation + 1));

        objects.insert(slot, stored);
        Ok(())
    }
}
