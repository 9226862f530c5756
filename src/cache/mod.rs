//! Local download cache for dataset files
//!
//! Files are keyed by their catalog file name under a per-dataset directory.
//! Presence of the file is the only validity check: once fetched, a cache
//! entry is never re-downloaded or modified.

use crate::core::{DatasetFileDescriptor, Downloader, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Environment variable overriding the cache root
pub const CACHE_DIR_ENV: &str = "LIBSVM_DATASETS_CACHE_DIR";

const CACHE_SUBDIR: &str = "libsvm-datasets";

/// Cache root: `$LIBSVM_DATASETS_CACHE_DIR`, else the platform cache dir
pub fn default_cache_root() -> PathBuf {
    if let Some(dir) = std::env::var_os(CACHE_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join(CACHE_SUBDIR)
}

/// Ensures dataset files exist locally, downloading each missing file once
pub struct CacheFetcher<D: Downloader> {
    dir: PathBuf,
    downloader: D,
}

impl<D: Downloader> CacheFetcher<D> {
    /// Create a fetcher storing files directly under `dir`
    pub fn new(dir: impl Into<PathBuf>, downloader: D) -> Self {
        Self {
            dir: dir.into(),
            downloader,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `descriptor` lives in the cache, whether or not it has been fetched
    pub fn local_path(&self, descriptor: &DatasetFileDescriptor) -> PathBuf {
        self.dir.join(&descriptor.name)
    }

    /// Return the local path of `descriptor`, downloading it first if absent
    pub fn ensure_local(&self, descriptor: &DatasetFileDescriptor) -> Result<PathBuf> {
        let path = self.local_path(descriptor);
        if path.exists() {
            debug!("Cache hit: {}", path.display());
            return Ok(path);
        }

        info!("Downloading {} to {}", descriptor.url, path.display());
        self.downloader.fetch(&path, &descriptor.url)?;
        Ok(path)
    }
}
