//! Streaming reader for LIBSVM-format datasets
//!
//! Resolves a dataset name (and optional variant note) against a catalog,
//! keeps a local copy of the file in a download cache, and yields dense
//! records lazily from the sparse `label index:value ...` text format.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod core;
pub mod data;
pub mod download;

// Re-export main types for convenience
pub use crate::api::{LibSvmDataset, LibSvmDatasetBuilder};
pub use crate::cache::CacheFetcher;
pub use crate::catalog::StaticCatalog;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{DatasetError, Result};
pub use crate::data::{DecodeConfig, RecordBuilder, RecordReader, Records};
pub use crate::download::HttpDownloader;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
