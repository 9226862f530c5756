//! Collaborator traits: where dataset metadata and file bytes come from

use crate::core::{DatasetInfo, Result};
use std::path::Path;

/// Source of dataset metadata entries
pub trait Catalog {
    /// Entries in the catalog's natural order
    fn entries(&self) -> Box<dyn Iterator<Item = DatasetInfo> + '_>;
}

/// Retrieves a remote file into the local cache
pub trait Downloader {
    /// Fetch `url` into `destination`.
    ///
    /// Implementations own partial-download handling; after a successful
    /// return the file at `destination` is treated as complete.
    fn fetch(&self, destination: &Path, url: &str) -> Result<()>;
}

impl<D: Downloader + ?Sized> Downloader for std::sync::Arc<D> {
    fn fetch(&self, destination: &Path, url: &str) -> Result<()> {
        (**self).fetch(destination, url)
    }
}

impl<D: Downloader + ?Sized> Downloader for Box<D> {
    fn fetch(&self, destination: &Path, url: &str) -> Result<()> {
        (**self).fetch(destination, url)
    }
}
