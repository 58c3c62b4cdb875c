use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::BundleError;

/// Read-only virtual filesystem rooted at a bundle's contents.
///
/// Paths are bundle-relative, `/`-separated strings. `read` fails with a
/// not-found condition on missing files; `exists` never fails and reports
/// `false` on any error.
pub trait BundleFs: Send + Sync {
    /// Read the entire file at the given path.
    fn read(&self, path: &str) -> Result<Vec<u8>, BundleError>;

    /// Whether the given path exists.
    fn exists(&self, path: &str) -> bool;
}

/// Bundle filesystem backed by a real directory on disk.
#[derive(Clone, Debug)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BundleFs for DirFs {
    fn read(&self, path: &str) -> Result<Vec<u8>, BundleError> {
        std::fs::read(self.root.join(path)).map_err(|e| BundleError::io(path, e))
    }

    fn exists(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }
}

/// In-memory bundle filesystem, for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct MemoryFs {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), data.into());
    }

    /// Builder-style variant of [`MemoryFs::insert`].
    pub fn with_file(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }
}

impl BundleFs for MemoryFs {
    fn read(&self, path: &str) -> Result<Vec<u8>, BundleError> {
        self.files.get(path).cloned().ok_or_else(|| {
            BundleError::io(path, io::Error::new(io::ErrorKind::NotFound, "file not found"))
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_fs_read_and_exists() {
        let fs = MemoryFs::new().with_file("k8s/pod-logs/default/web-app.log", "hello\n");

        assert!(fs.exists("k8s/pod-logs/default/web-app.log"));
        assert!(!fs.exists("k8s/pod-logs/default/missing.log"));
        assert_eq!(
            fs.read("k8s/pod-logs/default/web-app.log").unwrap(),
            b"hello\n"
        );
    }

    #[test]
    fn test_memory_fs_missing_file_is_not_found() {
        let fs = MemoryFs::new();
        let err = fs.read("missing.yaml").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_dir_fs_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("k8s")).unwrap();
        std::fs::write(dir.path().join("k8s/cluster-version.yaml"), "major: 1\n").unwrap();

        let fs = DirFs::new(dir.path());
        assert!(fs.exists("k8s/cluster-version.yaml"));
        assert!(!fs.exists("k8s"));
        assert!(!fs.exists("k8s/other.yaml"));
        assert_eq!(fs.read("k8s/cluster-version.yaml").unwrap(), b"major: 1\n");
        assert!(fs.read("k8s/other.yaml").unwrap_err().is_not_found());
    }
}
