//! Pod log resolution for bundlescope
//!
//! This crate reconstructs a container's log output from the several on-disk
//! layouts used by different collection tools and runtimes, and backfills
//! timestamps for display tools that expect them.

mod resolve;
mod timestamps;

pub use resolve::{
    CONFIG_HASH_ANNOTATION, LogsError, PodLogContext, fetch_pod_logs, log_candidates,
    pod_log_context,
};
pub use timestamps::normalize_timestamps;

// Re-export types used in our public API
pub use bundlescope_types::PodLogRequest;
