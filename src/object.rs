//! Object model for reconcilable resources.
//!
//! A resource is anything the store can hold: it has a kind, a
//! namespace/name key, caller-owned metadata and a serializable body.
//! Server-managed bookkeeping (uid, resource version, timestamps) lives
//! in [`ObjectMeta`] next to the caller-owned fields but is assigned by
//! the store, never by the caller.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ==================== ResourceKey ====================

/// Namespace/name pair identifying an object of a given kind.
///
/// `name` must be non-empty; `namespace` may be empty for
/// cluster-scoped kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub namespace: String,
    pub name: String,
}

impl ResourceKey {
    /// Key for a namespaced object
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Key for a cluster-scoped object
    pub fn cluster_scoped(name: impl Into<String>) -> Self {
        Self {
            namespace: String::new(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

// ==================== ObjectMeta ====================

/// Object metadata: caller-owned identity plus server-managed bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    /// Object name, unique within a namespace for a given kind
    pub name: String,

    /// Namespace; empty for cluster-scoped kinds
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    /// Caller-owned labels
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Caller-owned annotations
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Server-assigned unique identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Opaque version consumed by the store's optimistic concurrency check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    /// Server-maintained generation counter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,

    /// Set by the store when the object is first created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,

    /// Server-assigned canonical link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    /// Pending finalizers, managed by the store
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,

    /// Field provenance records, managed by the store
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub managed_fields: Vec<serde_json::Value>,
}

impl ObjectMeta {
    /// Metadata for a namespaced object
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Metadata for a cluster-scoped object
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The store key this metadata identifies
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.namespace.clone(), self.name.clone())
    }
}

// ==================== Object trait ====================

/// Capability set required of any reconcilable resource.
///
/// Deep copies come from `Clone`; the store boundary speaks raw JSON,
/// so the object must serialize losslessly in both directions.
pub trait Object: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Schema/type identifier, stable per concrete type
    const KIND: &'static str;

    /// Read access to the object's metadata
    fn meta(&self) -> &ObjectMeta;

    /// Mutable access to the object's metadata
    fn meta_mut(&mut self) -> &mut ObjectMeta;

    /// The store key identifying this object
    fn key(&self) -> ResourceKey {
        self.meta().key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(ResourceKey::new("ns", "a").to_string(), "ns/a");
        assert_eq!(ResourceKey::cluster_scoped("node-1").to_string(), "node-1");
    }

    #[test]
    fn test_meta_serialization_skips_empty_fields() {
        let meta = ObjectMeta::new("ns", "a");
        let value = serde_json::to_value(&meta).unwrap();
        let map = value.as_object().unwrap();

        assert_eq!(map.get("name").unwrap(), "a");
        assert_eq!(map.get("namespace").unwrap(), "ns");
        assert!(!map.contains_key("uid"));
        assert!(!map.contains_key("resourceVersion"));
        assert!(!map.contains_key("finalizers"));
    }

    #[test]
    fn test_meta_round_trip() {
        let mut meta = ObjectMeta::new("ns", "a");
        meta.resource_version = Some("7".to_string());
        meta.labels
            .insert("app".to_string(), "frontend".to_string());

        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["resourceVersion"], "7");

        let back: ObjectMeta = serde_json::from_value(value).unwrap();
        assert_eq!(back, meta);
    }
}
