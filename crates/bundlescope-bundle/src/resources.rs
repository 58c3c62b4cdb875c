use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use bundlescope_types::{ResourceList, ResourceRecord};

use crate::error::BundleError;
use crate::fs::BundleFs;

/// Each attempted parse error is truncated to this many characters before it
/// is surfaced in an aggregate error.
const MAX_ERROR_CHARS: usize = 200;

/// Untyped list shape: a single document whose top-level `items` field holds
/// a sequence of objects without type metadata.
#[derive(Deserialize)]
struct UntypedList {
    items: Vec<Map<String, Value>>,
}

/// Load Kubernetes-style resources from a bundle file.
///
/// Different collector tools persist the same logical concept (a sequence of
/// resources scraped at one point in time) using different serialization
/// conventions: a `kind: List` wrapper with typed items, a bare array of
/// untyped objects, or a wrapper with an `items` field and no type metadata.
/// The known shapes for the file's extension are attempted in order and the
/// first success wins; when all fail, every attempt's error is surfaced
/// together in a [`BundleError::AggregateParse`].
///
/// Returned items may be missing GVK information. It is up to the caller to
/// assign GVK to each item before further processing.
pub fn load_resources(fs: &dyn BundleFs, path: &str) -> Result<ResourceList, BundleError> {
    let data = fs.read(path)?;

    if path.ends_with(".json") {
        return parse_json_resources(&data, path);
    }

    if path.ends_with(".yaml") || path.ends_with(".yml") {
        return parse_yaml_resources(&data, path);
    }

    Err(BundleError::UnsupportedFormat {
        path: path.to_string(),
    })
}

/// JSON shapes, in priority order: typed list wrapper, bare array of untyped
/// objects, untyped list wrapper.
fn parse_json_resources(data: &[u8], path: &str) -> Result<ResourceList, BundleError> {
    let mut errors = Vec::new();

    match serde_json::from_slice::<Value>(data)
        .map_err(|e| e.to_string())
        .and_then(|doc| typed_list_items(&doc))
    {
        Ok(items) => return Ok(ResourceList::new(path, items)),
        Err(e) => errors.push(e),
    }

    match serde_json::from_slice::<Vec<Map<String, Value>>>(data) {
        Ok(items) => {
            debug!(path, "loaded resources from bare JSON array");
            return Ok(ResourceList::new(path, untyped_records(items)));
        }
        Err(e) => errors.push(e.to_string()),
    }

    match serde_json::from_slice::<UntypedList>(data) {
        Ok(list) => {
            debug!(path, "loaded resources from untyped JSON item list");
            return Ok(ResourceList::new(path, untyped_records(list.items)));
        }
        Err(e) => errors.push(e.to_string()),
    }

    Err(aggregate(path, errors))
}

/// YAML shapes, in priority order: typed list wrapper, bare sequence of
/// untyped documents.
fn parse_yaml_resources(data: &[u8], path: &str) -> Result<ResourceList, BundleError> {
    let mut errors = Vec::new();

    match serde_yaml::from_slice::<Value>(data)
        .map_err(|e| e.to_string())
        .and_then(|doc| typed_list_items(&doc))
    {
        Ok(items) => return Ok(ResourceList::new(path, items)),
        Err(e) => errors.push(e),
    }

    match serde_yaml::from_slice::<Vec<Map<String, Value>>>(data) {
        Ok(items) => {
            debug!(path, "loaded resources from bare YAML sequence");
            return Ok(ResourceList::new(path, untyped_records(items)));
        }
        Err(e) => errors.push(e.to_string()),
    }

    Err(aggregate(path, errors))
}

/// Decode a typed list wrapper: the document must carry a `kind` ending in
/// `List`, an `items` array, and every item must be an object with a
/// non-empty `kind` of its own.
fn typed_list_items(doc: &Value) -> Result<Vec<ResourceRecord>, String> {
    let obj = doc.as_object().ok_or("document is not an object")?;

    let kind = obj
        .get("kind")
        .and_then(Value::as_str)
        .ok_or("object 'kind' is missing")?;
    if !kind.ends_with("List") {
        return Err(format!("kind {kind:?} is not a list"));
    }

    let items = obj
        .get("items")
        .and_then(Value::as_array)
        .ok_or("object 'items' is missing")?;

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_object() {
            return Err("list item is not an object".to_string());
        }
        match item.get("kind").and_then(Value::as_str) {
            Some(kind) if !kind.is_empty() => {}
            _ => return Err("list item 'kind' is missing".to_string()),
        }
        records.push(ResourceRecord::new(item.clone()));
    }

    Ok(records)
}

fn untyped_records(items: Vec<Map<String, Value>>) -> Vec<ResourceRecord> {
    items
        .into_iter()
        .map(|item| ResourceRecord::new(Value::Object(item)))
        .collect()
}

fn aggregate(path: &str, errors: Vec<String>) -> BundleError {
    BundleError::AggregateParse {
        path: path.to_string(),
        errors: errors.iter().map(|e| truncated(e, MAX_ERROR_CHARS)).collect(),
    }
}

/// Cap an error message at `max` characters, marking the cut.
fn truncated(message: &str, max: usize) -> String {
    if message.chars().count() <= max {
        return message.to_string();
    }
    let mut out: String = message.chars().take(max).collect();
    out.push_str("...");
    out
}
