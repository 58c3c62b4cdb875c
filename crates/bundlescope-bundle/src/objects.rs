use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;

use bundlescope_types::ResourceRecord;

use crate::error::BundleError;
use crate::fs::BundleFs;

/// Compact representation some collectors use for ConfigMaps and Secrets in
/// place of the full object. ConfigMaps include data; Secret data is
/// intentionally excluded from the bundle.
#[derive(Debug, Deserialize)]
struct CompactObject {
    name: String,
    namespace: String,
    #[serde(default)]
    data: Option<BTreeMap<String, String>>,
}

impl CompactObject {
    /// Decode from YAML or JSON, selected by file extension. The compact
    /// format is fixed, so decode failures propagate as-is with no fallback
    /// shapes.
    fn load(fs: &dyn BundleFs, path: &str) -> Result<Self, BundleError> {
        let data = fs.read(path)?;

        if path.ends_with(".yaml") || path.ends_with(".yml") {
            serde_yaml::from_slice(&data).map_err(|source| BundleError::Yaml {
                path: path.to_string(),
                source,
            })
        } else {
            serde_json::from_slice(&data).map_err(|source| BundleError::Json {
                path: path.to_string(),
                source,
            })
        }
    }
}

/// Load a ConfigMap stored in the compact bundle representation, projected
/// into a minimal well-formed `v1/ConfigMap` object.
pub fn load_config_map(fs: &dyn BundleFs, path: &str) -> Result<ResourceRecord, BundleError> {
    let compact = CompactObject::load(fs, path)?;

    let mut object = json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": {
            "name": compact.name,
            "namespace": compact.namespace,
        },
    });
    if let Some(data) = compact.data {
        object["data"] = json!(data);
    }

    Ok(ResourceRecord::new(object))
}

/// Load a Secret stored in the compact bundle representation, projected into
/// a minimal well-formed `v1/Secret` object. The data field is always left
/// empty.
pub fn load_secret(fs: &dyn BundleFs, path: &str) -> Result<ResourceRecord, BundleError> {
    let compact = CompactObject::load(fs, path)?;

    Ok(ResourceRecord::new(json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {
            "name": compact.name,
            "namespace": compact.namespace,
        },
    })))
}
