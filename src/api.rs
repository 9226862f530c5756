//! High-level API for streaming LIBSVM datasets
//!
//! A [`LibSvmDataset`] is resolved once against a catalog and can then be
//! traversed any number of times. Every call to [`LibSvmDataset::records`]
//! makes sure the file is cached, opens a fresh stream and parses lazily.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use libsvm_datasets::api::LibSvmDataset;
//! use libsvm_datasets::catalog::StaticCatalog;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = StaticCatalog::from_json_file("catalog.json")?;
//! let dataset = LibSvmDataset::builder("a1a")
//!     .note("testing")
//!     .build(&catalog)?;
//!
//! for record in dataset.records()?.take(5) {
//!     let record = record?;
//!     println!("{} {:?}", record.label(), record.features());
//! }
//! # Ok(())
//! # }
//! ```

use crate::cache::{default_cache_root, CacheFetcher};
use crate::catalog::{choose_file, resolve};
use crate::core::{
    Catalog, DatasetFileDescriptor, DatasetInfo, Downloader, Metadata, Result, Value,
};
use crate::data::decode::{self, DecodeConfig};
use crate::data::{RecordBuilder, Records};
use crate::download::HttpDownloader;
use log::debug;
use std::path::{Path, PathBuf};

/// Options for opening a dataset
pub struct LibSvmDatasetBuilder {
    name: String,
    note: Option<String>,
    default_value: Value,
    cache_dir: Option<PathBuf>,
    downloader: Option<Box<dyn Downloader>>,
    decode: DecodeConfig,
}

impl LibSvmDatasetBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: None,
            default_value: Value::default(),
            cache_dir: None,
            downloader: None,
            decode: DecodeConfig::default(),
        }
    }

    /// Select a file variant by its note (e.g. `"testing"`)
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Value for features absent from a line (integer 0 by default)
    pub fn default_feature_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Cache root; the dataset's files go in a subdirectory named after its id
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Replace the HTTP downloader
    pub fn downloader<D: Downloader + 'static>(mut self, downloader: D) -> Self {
        self.downloader = Some(Box::new(downloader));
        self
    }

    /// Replace the decompression settings
    pub fn decode_config(mut self, config: DecodeConfig) -> Self {
        self.decode = config;
        self
    }

    /// Resolve the dataset and its file variant against `catalog`
    pub fn build<C: Catalog + ?Sized>(self, catalog: &C) -> Result<LibSvmDataset> {
        let info = resolve(catalog, &self.name)?;
        let file = choose_file(&info, self.note.as_deref())?.clone();
        let metadata = Metadata::for_dataset(&self.name);

        let root = self.cache_dir.unwrap_or_else(default_cache_root);
        let downloader = self
            .downloader
            .unwrap_or_else(|| Box::new(HttpDownloader::new()) as Box<dyn Downloader>);
        let fetcher = CacheFetcher::new(root.join(&metadata.id), downloader);
        debug!(
            "Opened {} using {} from {}",
            metadata.name,
            file.name,
            fetcher.dir().display()
        );

        Ok(LibSvmDataset {
            builder: RecordBuilder::new(info.n_features, self.default_value),
            info,
            file,
            metadata,
            fetcher,
            decode: self.decode,
        })
    }
}

/// A resolved LIBSVM dataset, traversable any number of times
pub struct LibSvmDataset {
    info: DatasetInfo,
    file: DatasetFileDescriptor,
    metadata: Metadata,
    builder: RecordBuilder,
    fetcher: CacheFetcher<Box<dyn Downloader>>,
    decode: DecodeConfig,
}

impl LibSvmDataset {
    pub fn builder(name: impl Into<String>) -> LibSvmDatasetBuilder {
        LibSvmDatasetBuilder::new(name)
    }

    /// Open `name` with default options
    pub fn open<C: Catalog + ?Sized>(catalog: &C, name: &str) -> Result<Self> {
        Self::builder(name).build(catalog)
    }

    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    /// The file variant this dataset streams
    pub fn file(&self) -> &DatasetFileDescriptor {
        &self.file
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn n_features(&self) -> usize {
        self.builder.n_features()
    }

    pub fn default_feature_value(&self) -> Value {
        self.builder.default_value()
    }

    /// Where the file is (or will be) cached
    pub fn local_path(&self) -> PathBuf {
        self.fetcher.local_path(&self.file)
    }

    pub fn cache_dir(&self) -> &Path {
        self.fetcher.dir()
    }

    /// Start a fresh traversal, downloading the file first if needed
    pub fn records(&self) -> Result<Records> {
        let path = self.fetcher.ensure_local(&self.file)?;
        let stream = decode::open(&path, &self.decode)?;
        Ok(Records::new(stream, self.builder))
    }
}

/// Convenience functions for local files
pub mod quick {
    use super::*;

    /// Stream records from a local LIBSVM file (`.bz2` goes through `bzcat`)
    pub fn records_from_file<P: AsRef<Path>>(path: P, n_features: usize) -> Result<Records> {
        records_from_file_with(path, n_features, Value::default(), &DecodeConfig::default())
    }

    /// Same as [`records_from_file`] with explicit default value and decoding
    pub fn records_from_file_with<P: AsRef<Path>>(
        path: P,
        n_features: usize,
        default_value: Value,
        config: &DecodeConfig,
    ) -> Result<Records> {
        let stream = decode::open(path.as_ref(), config)?;
        Ok(Records::new(
            stream,
            RecordBuilder::new(n_features, default_value),
        ))
    }
}
