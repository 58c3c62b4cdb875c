use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::BundleError;

pub const DEFAULT_CLUSTER_INFO: &str = "k8s/cluster-info";
pub const DEFAULT_CLUSTER_RESOURCES: &str = "k8s/cluster-resources";
pub const DEFAULT_POD_LOGS: &str = "k8s/pod-logs";
pub const DEFAULT_PREVIOUS_POD_LOGS: &str = "k8s/previous-pod-logs";
pub const DEFAULT_CONFIG_MAPS: &str = "k8s/cluster-resources/configmaps";
pub const DEFAULT_SECRETS: &str = "k8s/cluster-resources/secrets";

/// Resource files excluded from bulk import by default. These hold collector
/// metadata or aggregates rather than importable objects.
const DEFAULT_SKIP_RESOURCES: &[&str] = &[
    "custom-resource-definitions.json",
    "pod-disruption-budgets-info.json",
    "resources.json",
    "groups.json",
    "namespaces.json",
    "mutatingwebhookconfigurations.yaml",
    "validatingwebhookconfigurations.yaml",
];

/// Directories excluded from bulk import by default.
const DEFAULT_SKIP_DIRS: &[&str] = &["apiservices", "auth-cani-list", "pod-disruption-budgets"];

/// Config file name looked up at the bundle root.
const BUNDLE_CONFIG_FILE: &str = "bundlescope.yaml";

/// Config file path looked up under the user's home directory.
const HOME_CONFIG_FILE: &str = ".bundlescope/layout.yaml";

/// Logical-to-physical path mapping inside a bundle.
///
/// Resolved once per bundle open and immutable afterward; safe to share
/// across concurrent callers. Every field is non-empty: fields not supplied
/// by configuration are substituted with the built-in default, field by
/// field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub cluster_info: String,
    pub cluster_resources: String,
    pub pod_logs: String,
    pub previous_pod_logs: String,
    pub config_maps: String,
    pub secrets: String,

    /// File names to exclude from bulk resource import.
    pub skip_resources: Vec<String>,

    /// Directory names to exclude from bulk resource import.
    pub skip_dirs: Vec<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::resolve(LayoutConfig::default())
    }
}

impl Layout {
    /// Resolve a layout from a configuration document. Every field falls
    /// back to its built-in default independently.
    pub fn resolve(config: LayoutConfig) -> Self {
        Self {
            cluster_info: or_default(config.paths.cluster_info, DEFAULT_CLUSTER_INFO),
            cluster_resources: or_default(config.paths.cluster_resources, DEFAULT_CLUSTER_RESOURCES),
            pod_logs: or_default(config.paths.pod_logs, DEFAULT_POD_LOGS),
            previous_pod_logs: or_default(
                config.paths.previous_pod_logs,
                DEFAULT_PREVIOUS_POD_LOGS,
            ),
            config_maps: or_default(config.paths.config_maps, DEFAULT_CONFIG_MAPS),
            secrets: or_default(config.paths.secrets, DEFAULT_SECRETS),
            skip_resources: or_default_list(config.skip.resources, DEFAULT_SKIP_RESOURCES),
            skip_dirs: or_default_list(config.skip.dirs, DEFAULT_SKIP_DIRS),
        }
    }

    /// Load a layout from a configuration file on disk.
    ///
    /// A missing file is not an error and yields the all-defaults layout; a
    /// present but malformed file fails with [`BundleError::ConfigParse`].
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no layout config, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(BundleError::io(&path.display().to_string(), e)),
        };

        let config: LayoutConfig =
            serde_yaml::from_slice(&data).map_err(|source| BundleError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::resolve(config))
    }

    /// Load a layout from the user-home configuration path
    /// (`~/.bundlescope/layout.yaml`), falling back to defaults when the
    /// home directory cannot be determined.
    pub fn from_home() -> Result<Self, BundleError> {
        match dirs::home_dir() {
            Some(home) => Self::from_config_file(home.join(HOME_CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Discover the layout for a bundle rooted at `bundle_root`: the
    /// bundle-local `bundlescope.yaml` wins, then the user-home config, then
    /// the built-in defaults. A level that fails to parse is logged and
    /// skipped; discovery itself never fails.
    pub fn discover(bundle_root: impl AsRef<Path>) -> Self {
        let local = bundle_root.as_ref().join(BUNDLE_CONFIG_FILE);
        if local.is_file() {
            match Self::from_config_file(&local) {
                Ok(layout) => return layout,
                Err(e) => {
                    warn!(path = %local.display(), error = %e, "ignoring bundle-local layout config")
                }
            }
        }

        match Self::from_home() {
            Ok(layout) => layout,
            Err(e) => {
                warn!(error = %e, "ignoring home layout config");
                Self::default()
            }
        }
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn or_default_list(values: Vec<String>, defaults: &[&str]) -> Vec<String> {
    if values.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        values
    }
}

/// On-disk layout configuration document. All fields optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub paths: PathsConfig,
    pub skip: SkipConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathsConfig {
    pub cluster_info: String,
    pub cluster_resources: String,
    pub pod_logs: String,
    pub previous_pod_logs: String,
    pub config_maps: String,
    pub secrets: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SkipConfig {
    pub resources: Vec<String>,
    pub dirs: Vec<String>,
}
