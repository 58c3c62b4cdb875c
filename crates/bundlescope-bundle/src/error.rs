use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while reading a bundle.
///
/// Absence of a file is the only locally-absorbed condition in this crate
/// (layout resolution treats a missing config as "use defaults"); everything
/// else surfaces through one of these variants.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Reading a file from the bundle filesystem failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A layout configuration document was present but malformed.
    #[error("failed to parse layout config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A JSON file with a fixed format failed to decode.
    #[error("failed to parse JSON file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A YAML file with a fixed format failed to decode.
    #[error("failed to parse YAML file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The resource loader does not recognize the file extension.
    #[error("unsupported data format for {path}")]
    UnsupportedFormat { path: String },

    /// Every known shape for the file's extension failed to parse. Carries
    /// each attempt's error, truncated for readability.
    #[error("failed to load resources from file {path} with errors: {}", .errors.join("; "))]
    AggregateParse { path: String, errors: Vec<String> },
}

impl BundleError {
    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }

    /// Whether this error is a missing-file condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
