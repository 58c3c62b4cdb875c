//! Support bundle access for bundlescope
//!
//! This crate turns a directory-of-files snapshot of a Kubernetes cluster
//! (a "support bundle") into normalized resource access: a read-only virtual
//! filesystem, the logical-to-physical path layout, and loaders that accept
//! the several inconsistent on-disk encodings produced by different collector
//! tools.

mod error;
mod fs;
mod layout;
mod objects;
mod resources;

pub use error::BundleError;
pub use fs::{BundleFs, DirFs, MemoryFs};
pub use layout::{
    DEFAULT_CLUSTER_INFO, DEFAULT_CLUSTER_RESOURCES, DEFAULT_CONFIG_MAPS, DEFAULT_POD_LOGS,
    DEFAULT_PREVIOUS_POD_LOGS, DEFAULT_SECRETS, Layout, LayoutConfig, PathsConfig, SkipConfig,
};
pub use objects::{load_config_map, load_secret};
pub use resources::load_resources;

// Re-export types used in our public API
pub use bundlescope_types::{ResourceList, ResourceRecord};
