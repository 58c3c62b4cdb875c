use serde::Deserialize;

use bundlescope_bundle::BundleError;

use crate::bundle::Bundle;

/// File under the cluster-info directory holding the `kubectl version`
/// output captured at collection time.
const CLUSTER_VERSION_FILE: &str = "cluster-version.yaml";

/// Kubernetes server version the bundle was collected from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct K8sVersion {
    pub major: u32,
    pub minor: u32,
    pub git_version: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterVersion {
    server_version: VersionInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VersionInfo {
    major: String,
    minor: String,
    git_version: String,
}

/// Detect the Kubernetes server version the bundle was collected from, by
/// reading `<cluster-info>/cluster-version.yaml`.
pub fn detect_k8s_version(bundle: &Bundle) -> Result<K8sVersion, BundleError> {
    let path = format!("{}/{}", bundle.layout().cluster_info, CLUSTER_VERSION_FILE);
    let data = bundle.read(&path)?;

    let info: ClusterVersion =
        serde_yaml::from_slice(&data).map_err(|source| BundleError::Yaml { path, source })?;

    Ok(K8sVersion {
        major: parse_version_component(&info.server_version.major),
        minor: parse_version_component(&info.server_version.minor),
        git_version: info.server_version.git_version,
    })
}

/// Parse a version component such as `"26"` or `"26+"`; some distributions
/// append a suffix to the minor version.
fn parse_version_component(value: &str) -> u32 {
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundlescope_bundle::{Layout, MemoryFs};

    fn bundle_with_version(content: &str) -> Bundle {
        let fs = MemoryFs::new().with_file("k8s/cluster-info/cluster-version.yaml", content);
        Bundle::new(Box::new(fs), Layout::default())
    }

    #[test]
    fn test_detect_k8s_version() {
        let bundle = bundle_with_version(
            r#"
clientVersion:
  major: "1"
  minor: "26"
  gitVersion: v1.26.4
serverVersion:
  major: "1"
  minor: "26"
  gitVersion: v1.26.15
kustomizeVersion: v4.5.7
"#,
        );

        let version = detect_k8s_version(&bundle).unwrap();
        assert_eq!(
            version,
            K8sVersion {
                major: 1,
                minor: 26,
                git_version: "v1.26.15".to_string(),
            }
        );
    }

    #[test]
    fn test_minor_version_with_suffix() {
        let bundle = bundle_with_version(
            "serverVersion:\n  major: \"1\"\n  minor: \"28+\"\n  gitVersion: v1.28.9-eks\n",
        );

        let version = detect_k8s_version(&bundle).unwrap();
        assert_eq!(version.major, 1);
        assert_eq!(version.minor, 28);
    }

    #[test]
    fn test_missing_version_file() {
        let bundle = Bundle::new(Box::new(MemoryFs::new()), Layout::default());
        let err = detect_k8s_version(&bundle).unwrap_err();
        assert!(err.is_not_found());
    }
}
