use std::path::Path;

use bundlescope_bundle::{
    BundleError, BundleFs, DirFs, Layout, load_config_map, load_resources, load_secret,
};
use bundlescope_logs::{LogsError, fetch_pod_logs, normalize_timestamps};
use bundlescope_types::{PodLogRequest, ResourceList, ResourceRecord};

/// An opened support bundle: a read-only filesystem plus the resolved path
/// layout. Construction happens once per bundle; afterwards the value is
/// immutable and safe to share across concurrent callers.
pub struct Bundle {
    fs: Box<dyn BundleFs>,
    layout: Layout,
}

impl Bundle {
    /// Open a bundle rooted at a directory on disk, discovering the layout
    /// from the bundle-local config, the user-home config, or the built-in
    /// defaults.
    pub fn open(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let layout = Layout::discover(root);
        Self::new(Box::new(DirFs::new(root)), layout)
    }

    /// Build a bundle from an injected filesystem and layout.
    pub fn new(fs: Box<dyn BundleFs>, layout: Layout) -> Self {
        Self { fs, layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn fs(&self) -> &dyn BundleFs {
        self.fs.as_ref()
    }

    /// Read an entire file from the bundle.
    pub fn read(&self, path: &str) -> Result<Vec<u8>, BundleError> {
        self.fs.read(path)
    }

    /// Load resources from a bundle-relative path. See
    /// [`bundlescope_bundle::load_resources`] for the accepted encodings.
    pub fn load_resources(&self, path: &str) -> Result<ResourceList, BundleError> {
        load_resources(self.fs.as_ref(), path)
    }

    /// Load a ConfigMap stored in the compact bundle representation.
    pub fn load_config_map(&self, path: &str) -> Result<ResourceRecord, BundleError> {
        load_config_map(self.fs.as_ref(), path)
    }

    /// Load a Secret stored in the compact bundle representation.
    pub fn load_secret(&self, path: &str) -> Result<ResourceRecord, BundleError> {
        load_secret(self.fs.as_ref(), path)
    }

    /// Serve a container's log output. Candidate paths reflecting the known
    /// collector conventions are probed in order and the first existing one
    /// wins; `timestamps` backfills a zero timestamp per line when the log
    /// carries none.
    pub fn pod_logs(
        &self,
        request: &PodLogRequest,
        timestamps: bool,
    ) -> Result<Vec<u8>, LogsError> {
        let data = fetch_pod_logs(self.fs.as_ref(), &self.layout, request)?;
        Ok(normalize_timestamps(data, timestamps))
    }
}
