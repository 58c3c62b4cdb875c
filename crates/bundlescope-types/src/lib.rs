//! Shared types for bundlescope
//!
//! This crate contains data structures used across multiple bundlescope crates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Resource Types
// ============================================================================

/// One Kubernetes-style object kept as a generic document rather than a
/// statically typed struct. API version and kind may be absent; it is up to
/// the caller to assign GVK metadata before further processing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRecord {
    object: Value,
}

impl ResourceRecord {
    pub fn new(object: Value) -> Self {
        Self { object }
    }

    /// The full document.
    pub fn as_value(&self) -> &Value {
        &self.object
    }

    pub fn into_value(self) -> Value {
        self.object
    }

    fn metadata(&self) -> Option<&Value> {
        self.object.get("metadata")
    }

    fn metadata_str(&self, key: &str) -> &str {
        self.metadata()
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// Object name, or `""` when missing.
    pub fn name(&self) -> &str {
        self.metadata_str("name")
    }

    /// Object namespace, or `""` when missing.
    pub fn namespace(&self) -> &str {
        self.metadata_str("namespace")
    }

    /// Controller-assigned UID, or `""` when missing.
    pub fn uid(&self) -> &str {
        self.metadata_str("uid")
    }

    /// API version of the object, or `""` when the record carries no type
    /// metadata.
    pub fn api_version(&self) -> &str {
        self.object
            .get("apiVersion")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// Kind of the object, or `""` when the record carries no type metadata.
    pub fn kind(&self) -> &str {
        self.object.get("kind").and_then(Value::as_str).unwrap_or("")
    }

    /// Look up a single annotation value.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata()
            .and_then(|m| m.get("annotations"))
            .and_then(|a| a.get(key))
            .and_then(Value::as_str)
    }

    /// Look up a single label value.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.metadata()
            .and_then(|m| m.get("labels"))
            .and_then(|l| l.get(key))
            .and_then(Value::as_str)
    }

    /// Restart count of the named container from `status.containerStatuses`,
    /// first match by name. Zero when the status list is absent or has no
    /// entry for that name.
    pub fn container_restart_count(&self, container: &str) -> i32 {
        let statuses = self
            .object
            .get("status")
            .and_then(|s| s.get("containerStatuses"))
            .and_then(Value::as_array);

        let Some(statuses) = statuses else {
            return 0;
        };

        for status in statuses {
            if status.get("name").and_then(Value::as_str) == Some(container) {
                return status
                    .get("restartCount")
                    .and_then(Value::as_i64)
                    .unwrap_or(0) as i32;
            }
        }

        0
    }
}

/// An ordered sequence of [`ResourceRecord`]s loaded from one bundle file.
/// Item order is preserved as encountered in the source; callers may depend
/// on first-match semantics.
#[derive(Clone, Debug, Default)]
pub struct ResourceList {
    pub items: Vec<ResourceRecord>,

    /// Bundle-relative path the list was loaded from, for diagnostics.
    pub source: String,
}

impl ResourceList {
    pub fn new(source: impl Into<String>, items: Vec<ResourceRecord>) -> Self {
        Self {
            items,
            source: source.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First record with the given name, or `None`. First match wins.
    pub fn find_by_name(&self, name: &str) -> Option<&ResourceRecord> {
        self.items.iter().find(|item| item.name() == name)
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// A request for one container's log output within a bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodLogRequest {
    pub namespace: String,
    pub pod: String,
    pub container: String,

    /// Serve the previous instance's logs instead of the current ones.
    pub previous: bool,
}

impl PodLogRequest {
    pub fn new(
        namespace: impl Into<String>,
        pod: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            pod: pod.into(),
            container: container.into(),
            previous: false,
        }
    }

    pub fn previous(mut self) -> Self {
        self.previous = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_metadata_accessors() {
        let record = ResourceRecord::new(json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {
                "name": "etcd-control-plane",
                "namespace": "kube-system",
                "uid": "abc-123",
                "annotations": {"kubernetes.io/config.hash": "deadbeef"},
                "labels": {"component": "etcd"},
            },
        }));

        assert_eq!(record.name(), "etcd-control-plane");
        assert_eq!(record.namespace(), "kube-system");
        assert_eq!(record.uid(), "abc-123");
        assert_eq!(record.api_version(), "v1");
        assert_eq!(record.kind(), "Pod");
        assert_eq!(
            record.annotation("kubernetes.io/config.hash"),
            Some("deadbeef")
        );
        assert_eq!(record.label("component"), Some("etcd"));
        assert_eq!(record.annotation("missing"), None);
    }

    #[test]
    fn test_record_without_type_metadata() {
        let record = ResourceRecord::new(json!({
            "metadata": {"name": "web"},
        }));

        assert_eq!(record.name(), "web");
        assert_eq!(record.api_version(), "");
        assert_eq!(record.kind(), "");
        assert_eq!(record.namespace(), "");
        assert_eq!(record.uid(), "");
    }

    #[test]
    fn test_container_restart_count() {
        let record = ResourceRecord::new(json!({
            "metadata": {"name": "web-1"},
            "status": {
                "containerStatuses": [
                    {"name": "app", "restartCount": 2},
                    {"name": "sidecar", "restartCount": 7},
                ],
            },
        }));

        assert_eq!(record.container_restart_count("app"), 2);
        assert_eq!(record.container_restart_count("sidecar"), 7);
        assert_eq!(record.container_restart_count("missing"), 0);
    }

    #[test]
    fn test_restart_count_without_status() {
        let record = ResourceRecord::new(json!({"metadata": {"name": "web-1"}}));
        assert_eq!(record.container_restart_count("app"), 0);
    }

    #[test]
    fn test_find_by_name_first_match_wins() {
        let list = ResourceList::new(
            "k8s/cluster-resources/pods/default.yaml",
            vec![
                ResourceRecord::new(json!({"metadata": {"name": "web", "uid": "first"}})),
                ResourceRecord::new(json!({"metadata": {"name": "web", "uid": "second"}})),
            ],
        );

        assert_eq!(list.find_by_name("web").unwrap().uid(), "first");
        assert!(list.find_by_name("db").is_none());
    }
}
