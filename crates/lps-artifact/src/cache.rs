//! Load-once holder for a bundle.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::bundle::{ArtifactBundle, LoadOptions, load_bundle};
use crate::error::Result;

/// Owns a bundle path and loads it at most once.
///
/// The cache is an ordinary value: construct one at startup and pass it (or
/// the bundle it yields) to whatever needs predictions. Concurrent first calls
/// serialize on an init lock; once filled, reads go through the `OnceLock`
/// without locking. A failed load leaves the cache empty.
#[derive(Debug)]
pub struct BundleCache {
    path: PathBuf,
    options: LoadOptions,
    cell: OnceLock<Arc<ArtifactBundle>>,
    init: Mutex<()>,
    loads: AtomicUsize,
}

impl BundleCache {
    pub fn new(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: path.into(),
            options,
            cell: OnceLock::new(),
            init: Mutex::new(()),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The bundle, if it has been loaded.
    pub fn get(&self) -> Option<Arc<ArtifactBundle>> {
        self.cell.get().cloned()
    }

    /// Returns the cached bundle, loading it on first use.
    pub fn get_or_load(&self) -> Result<Arc<ArtifactBundle>> {
        if let Some(bundle) = self.cell.get() {
            return Ok(Arc::clone(bundle));
        }
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bundle) = self.cell.get() {
            return Ok(Arc::clone(bundle));
        }
        self.loads.fetch_add(1, Ordering::Relaxed);
        let bundle = Arc::new(load_bundle(&self.path, &self.options)?);
        Ok(Arc::clone(self.cell.get_or_init(|| bundle)))
    }

    /// Number of times the file has been read.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}
