//! Structural field-path diff between two JSON documents.
//!
//! The reconciler decides whether an update is needed by diffing the
//! stored document against the desired one while skipping every field
//! the store itself owns. Traversal is depth-first with object keys in
//! lexicographic order, so two diffs over the same inputs always agree
//! on their result.

use std::fmt;

use serde_json::Value;

/// Field paths owned by the store. Never compared during convergence
/// checks; the caller's value for them is irrelevant.
pub const SERVER_MANAGED_FIELDS: [&str; 8] = [
    "apiVersion",
    "metadata.creationTimestamp",
    "metadata.finalizers",
    "metadata.generation",
    "metadata.managedFields",
    "metadata.resourceVersion",
    "metadata.selfLink",
    "metadata.uid",
];

/// One differing leaf between the current and desired documents
#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry {
    /// Dotted field path, with bracketed indices for array elements
    pub path: String,
    /// Value held by the store; `None` when the field is being added
    pub current: Option<Value>,
    /// Value the caller wants; `None` when the field is being removed
    pub desired: Option<Value>,
}

/// Ordered set of differences between two documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diff {
    entries: Vec<DiffEntry>,
}

impl Diff {
    /// True when the documents agree on every compared field
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of differing fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The differing fields, in traversal order
    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match (&entry.current, &entry.desired) {
                (Some(current), Some(desired)) => {
                    write!(f, "{}: {} -> {}", entry.path, current, desired)?
                }
                (Some(current), None) => write!(f, "{}: -{}", entry.path, current)?,
                (None, Some(desired)) => write!(f, "{}: +{}", entry.path, desired)?,
                (None, None) => {}
            }
        }
        Ok(())
    }
}

/// Per-path exclusion predicate: the constant server-managed table plus
/// any caller-configured extras
struct PathFilter<'a> {
    extra: &'a [String],
}

impl PathFilter<'_> {
    fn ignores(&self, path: &str) -> bool {
        SERVER_MANAGED_FIELDS.contains(&path) || self.extra.iter().any(|p| p == path)
    }
}

/// Diff `current` against `desired` with the server-managed fields excluded
pub fn diff(current: &Value, desired: &Value) -> Diff {
    diff_with(current, desired, &[])
}

/// Diff with additional excluded paths on top of the server-managed table
pub fn diff_with(current: &Value, desired: &Value, extra_ignored: &[String]) -> Diff {
    let filter = PathFilter {
        extra: extra_ignored,
    };
    let mut entries = Vec::new();
    visit("", Some(current), Some(desired), &filter, &mut entries);
    Diff { entries }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn visit(
    path: &str,
    current: Option<&Value>,
    desired: Option<&Value>,
    filter: &PathFilter<'_>,
    out: &mut Vec<DiffEntry>,
) {
    if !path.is_empty() && filter.ignores(path) {
        return;
    }

    match (current, desired) {
        (None, None) => {}
        (Some(Value::Object(current)), Some(Value::Object(desired))) => {
            let mut keys: Vec<&str> = current.keys().map(String::as_str).collect();
            keys.extend(desired.keys().map(String::as_str));
            keys.sort_unstable();
            keys.dedup();
            for key in keys {
                visit(
                    &child_path(path, key),
                    current.get(key),
                    desired.get(key),
                    filter,
                    out,
                );
            }
        }
        (Some(Value::Array(current)), Some(Value::Array(desired))) => {
            for i in 0..current.len().max(desired.len()) {
                visit(
                    &format!("{path}[{i}]"),
                    current.get(i),
                    desired.get(i),
                    filter,
                    out,
                );
            }
        }
        (Some(current), Some(desired)) => {
            if current != desired {
                out.push(DiffEntry {
                    path: path.to_string(),
                    current: Some(current.clone()),
                    desired: Some(desired.clone()),
                });
            }
        }
        (Some(Value::Object(current)), None) => {
            let mut keys: Vec<&str> = current.keys().map(String::as_str).collect();
            keys.sort_unstable();
            for key in keys {
                visit(&child_path(path, key), current.get(key), None, filter, out);
            }
        }
        (None, Some(Value::Object(desired))) => {
            let mut keys: Vec<&str> = desired.keys().map(String::as_str).collect();
            keys.sort_unstable();
            for key in keys {
                visit(&child_path(path, key), None, desired.get(key), filter, out);
            }
        }
        (Some(current), None) => out.push(DiffEntry {
            path: path.to_string(),
            current: Some(current.clone()),
            desired: None,
        }),
        (None, Some(desired)) => out.push(DiffEntry {
            path: path.to_string(),
            current: None,
            desired: Some(desired.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored() -> Value {
        json!({
            "apiVersion": "v1",
            "metadata": {
                "name": "a",
                "namespace": "ns",
                "uid": "0c6bd50e-6e8e-4a4a-9e39-3f0dcb4b2c2f",
                "resourceVersion": "5",
                "creationTimestamp": "2026-08-01T09:00:00Z",
            },
            "spec": { "replicas": 3, "image": "frontend:1.2" },
        })
    }

    /// Sets a dotted path, creating intermediate objects as needed
    fn set_path(doc: &mut Value, path: &str, value: Value) {
        let mut target = doc;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let map = target.as_object_mut().unwrap();
            if segments.peek().is_none() {
                map.insert(segment.to_string(), value);
                return;
            }
            target = map
                .entry(segment.to_string())
                .or_insert_with(|| json!({}));
        }
    }

    #[test]
    fn test_equal_documents_produce_empty_diff() {
        let d = diff(&stored(), &stored());
        assert!(d.is_empty());
        assert_eq!(d.to_string(), "");
    }

    #[test]
    fn test_scalar_change_is_reported_with_path() {
        let mut desired = stored();
        set_path(&mut desired, "spec.replicas", json!(5));

        let d = diff(&stored(), &desired);
        assert_eq!(d.len(), 1);
        assert_eq!(d.entries()[0].path, "spec.replicas");
        assert_eq!(d.to_string(), "spec.replicas: 3 -> 5");
    }

    #[test]
    fn test_each_server_managed_path_is_ignored_alone() {
        for path in SERVER_MANAGED_FIELDS {
            let mut desired = stored();
            let replacement = if path == "metadata.finalizers" || path == "metadata.managedFields"
            {
                json!(["something-else"])
            } else {
                json!("something-else")
            };
            set_path(&mut desired, path, replacement);

            let d = diff(&stored(), &desired);
            assert!(d.is_empty(), "path {path} leaked into the diff: {d}");
        }
    }

    #[test]
    fn test_extra_ignored_paths_extend_the_table() {
        let mut desired = stored();
        set_path(&mut desired, "status.phase", json!("Ready"));

        let d = diff(&stored(), &desired);
        assert_eq!(d.len(), 1);

        let extra = vec!["status".to_string()];
        let d = diff_with(&stored(), &desired, &extra);
        assert!(d.is_empty());
    }

    #[test]
    fn test_addition_and_removal_render_one_sided() {
        let mut current = stored();
        let mut desired = stored();
        set_path(&mut current, "spec.pullPolicy", json!("Always"));
        set_path(&mut desired, "spec.minReady", json!(2));

        let d = diff(&current, &desired);
        let text = d.to_string();
        assert!(text.contains("spec.minReady: +2"));
        assert!(text.contains("spec.pullPolicy: -\"Always\""));
    }

    #[test]
    fn test_array_elements_diff_by_index() {
        let current = json!({ "spec": { "ports": [{ "port": 80 }, { "port": 443 }] } });
        let desired = json!({ "spec": { "ports": [{ "port": 80 }, { "port": 8443 }] } });

        let d = diff(&current, &desired);
        assert_eq!(d.len(), 1);
        assert_eq!(d.entries()[0].path, "spec.ports[1].port");
    }

    #[test]
    fn test_type_mismatch_is_a_single_entry() {
        let current = json!({ "spec": { "replicas": 3 } });
        let desired = json!({ "spec": { "replicas": "three" } });

        let d = diff(&current, &desired);
        assert_eq!(d.len(), 1);
        assert_eq!(d.to_string(), "spec.replicas: 3 -> \"three\"");
    }

    #[test]
    fn test_traversal_order_is_deterministic() {
        let mut desired = stored();
        set_path(&mut desired, "spec.replicas", json!(5));
        set_path(&mut desired, "metadata.labels", json!({ "app": "frontend" }));
        set_path(&mut desired, "spec.image", json!("frontend:1.3"));

        let first = diff(&stored(), &desired);
        let second = diff(&stored(), &desired);
        assert_eq!(first, second);

        let paths: Vec<&str> = first.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            ["metadata.labels.app", "spec.image", "spec.replicas"]
        );
    }
}
