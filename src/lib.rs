//! bundlescope - serve Kubernetes support bundles as resources and pod logs
//!
//! A support bundle is a static directory tree exported from a live cluster
//! by a diagnostic-collection tool. This library opens such a bundle and
//! exposes two services over it: normalized access to the resources it
//! stores, tolerant of the inconsistent on-disk encodings different
//! collectors produce, and reconstruction of a specific container's log
//! output from the several log layouts in the wild.
//!
//! All operations are synchronous, stateless reads over the bundle; a
//! [`Bundle`] is safe to share across unlimited concurrent callers.

mod bundle;
mod subnet;
mod version;

pub use bundle::Bundle;
pub use subnet::detect_service_subnet_range;
pub use version::{K8sVersion, detect_k8s_version};

pub use bundlescope_bundle::{
    BundleError, BundleFs, DirFs, Layout, LayoutConfig, MemoryFs, load_resources,
};
pub use bundlescope_logs::{LogsError, normalize_timestamps};
pub use bundlescope_types::{PodLogRequest, ResourceList, ResourceRecord};
