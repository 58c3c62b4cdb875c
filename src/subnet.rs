use serde_json::Value;

use bundlescope_bundle::BundleError;
use bundlescope_types::ResourceRecord;

use crate::bundle::Bundle;

const IP_RANGE_ARG: &str = "--service-cluster-ip-range=";

/// Detect the service cluster IP range from the kube-apiserver command line
/// recorded in the bundle's kube-system pods. Returns `Ok(None)` when no
/// apiserver pod or argument is present.
pub fn detect_service_subnet_range(bundle: &Bundle) -> Result<Option<String>, BundleError> {
    let path = format!(
        "{}/pods/kube-system.json",
        bundle.layout().cluster_resources
    );
    let list = bundle.load_resources(&path)?;

    for item in &list.items {
        if !is_kube_apiserver_pod(item) {
            continue;
        }
        return Ok(parse_ip_range_arg(item));
    }

    Ok(None)
}

fn is_kube_apiserver_pod(record: &ResourceRecord) -> bool {
    record.name().starts_with("kube-apiserver-")
        && record.label("component") == Some("kube-apiserver")
}

fn parse_ip_range_arg(record: &ResourceRecord) -> Option<String> {
    let containers = record
        .as_value()
        .get("spec")
        .and_then(|s| s.get("containers"))
        .and_then(Value::as_array)?;

    let apiserver = containers
        .iter()
        .find(|c| c.get("name").and_then(Value::as_str) == Some("kube-apiserver"))?;

    let command = apiserver.get("command").and_then(Value::as_array)?;
    command
        .iter()
        .filter_map(Value::as_str)
        .find_map(|arg| arg.strip_prefix(IP_RANGE_ARG).map(str::to_string))
}
