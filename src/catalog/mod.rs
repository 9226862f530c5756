//! Dataset lookup: from a dataset name and optional note to a concrete file
//!
//! Resolution is a single pass over the catalog. The names seen along the way
//! are what an [`DatasetError::UnknownDataset`] reports back.

use crate::core::{Catalog, DatasetError, DatasetFileDescriptor, DatasetInfo, Result};
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Find the first catalog entry named exactly `name`
pub fn resolve<C: Catalog + ?Sized>(catalog: &C, name: &str) -> Result<DatasetInfo> {
    let mut available = Vec::new();
    for entry in catalog.entries() {
        if entry.name == name {
            debug!(
                "Resolved LIBSVM dataset {name:?}: {} features, {} file(s)",
                entry.n_features,
                entry.files.len()
            );
            return Ok(entry);
        }
        available.push(entry.name);
    }

    Err(DatasetError::UnknownDataset {
        name: name.to_string(),
        available,
    })
}

/// Pick the file variant for `note`, or the first declared file when `note` is `None`
pub fn choose_file<'a>(
    info: &'a DatasetInfo,
    note: Option<&str>,
) -> Result<&'a DatasetFileDescriptor> {
    let Some(note) = note else {
        return info.files.first().ok_or_else(|| {
            DatasetError::CatalogError(format!("dataset {:?} declares no files", info.name))
        });
    };

    let mut available = Vec::new();
    for file in &info.files {
        match file.note.as_deref() {
            Some(candidate) if candidate == note => return Ok(file),
            Some(candidate) if !candidate.is_empty() => available.push(candidate.to_string()),
            _ => {}
        }
    }

    Err(DatasetError::UnknownVariant {
        dataset: info.name.clone(),
        note: note.to_string(),
        available,
    })
}

/// In-memory catalog, optionally loaded from a JSON array of dataset entries
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<DatasetInfo>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<DatasetInfo>) -> Self {
        Self { entries }
    }

    /// Load a catalog from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(DatasetError::IoError)?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Load a catalog from any JSON reader
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let entries: Vec<DatasetInfo> = serde_json::from_reader(reader)
            .map_err(|e| DatasetError::CatalogError(e.to_string()))?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Catalog for StaticCatalog {
    fn entries(&self) -> Box<dyn Iterator<Item = DatasetInfo> + '_> {
        Box::new(self.entries.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            DatasetInfo {
                name: "a1a".to_string(),
                n_features: 123,
                files: vec![
                    DatasetFileDescriptor::new("a1a", "http://example.com/a1a", None),
                    DatasetFileDescriptor::new("a1a.t", "http://example.com/a1a.t", Some("testing")),
                ],
            },
            DatasetInfo {
                name: "mnist".to_string(),
                n_features: 780,
                files: vec![
                    DatasetFileDescriptor::new("mnist.bz2", "http://example.com/mnist.bz2", None),
                    DatasetFileDescriptor::new("mnist.t.bz2", "http://example.com/mnist.t.bz2", Some("testing")),
                    DatasetFileDescriptor::new("mnist.scale.bz2", "http://example.com/mnist.scale.bz2", Some("scaled")),
                    DatasetFileDescriptor::new("mnist.other.bz2", "http://example.com/mnist.other.bz2", Some("")),
                ],
            },
            DatasetInfo {
                name: "iris".to_string(),
                n_features: 4,
                files: vec![DatasetFileDescriptor::new("iris.scale", "http://example.com/iris.scale", None)],
            },
        ])
    }

    #[test]
    fn test_resolve_exact_match() {
        let info = resolve(&catalog(), "mnist").unwrap();
        assert_eq!(info.name, "mnist");
        assert_eq!(info.n_features, 780);
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let result = resolve(&catalog(), "MNIST");
        assert!(matches!(result, Err(DatasetError::UnknownDataset { .. })));
    }

    #[test]
    fn test_resolve_unknown_lists_all_names_in_order() {
        match resolve(&catalog(), "nope") {
            Err(DatasetError::UnknownDataset { name, available }) => {
                assert_eq!(name, "nope");
                assert_eq!(available, vec!["a1a", "mnist", "iris"]);
            }
            other => panic!("expected UnknownDataset, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let mut entries = catalog().entries;
        let mut duplicate = entries[2].clone();
        duplicate.n_features = 99;
        entries.push(duplicate);
        let info = resolve(&StaticCatalog::new(entries), "iris").unwrap();
        assert_eq!(info.n_features, 4);
    }

    #[test]
    fn test_choose_file_without_note_returns_first() {
        let info = resolve(&catalog(), "mnist").unwrap();
        let file = choose_file(&info, None).unwrap();
        assert_eq!(file.name, "mnist.bz2");
    }

    #[test]
    fn test_choose_file_with_note() {
        let info = resolve(&catalog(), "mnist").unwrap();
        for note in ["testing", "scaled"] {
            let file = choose_file(&info, Some(note)).unwrap();
            assert_eq!(file.note.as_deref(), Some(note));
        }
    }

    #[test]
    fn test_choose_file_unknown_note_lists_present_notes() {
        let info = resolve(&catalog(), "mnist").unwrap();
        match choose_file(&info, Some("validation")) {
            Err(DatasetError::UnknownVariant {
                dataset,
                note,
                available,
            }) => {
                assert_eq!(dataset, "mnist");
                assert_eq!(note, "validation");
                // descriptors without a note, or with an empty one, are not listed
                assert_eq!(available, vec!["testing", "scaled"]);
            }
            other => panic!("expected UnknownVariant, got {other:?}"),
        }
    }

    #[test]
    fn test_choose_file_no_files() {
        let info = DatasetInfo {
            name: "empty".to_string(),
            n_features: 1,
            files: Vec::new(),
        };
        assert!(matches!(
            choose_file(&info, None),
            Err(DatasetError::CatalogError(_))
        ));
    }

    #[test]
    fn test_catalog_from_json_reader() {
        let json = r#"[
            {"name": "iris", "n_features": 4,
             "files": [{"name": "iris.scale", "url": "http://example.com/iris.scale"}]}
        ]"#;
        let catalog = StaticCatalog::from_json_reader(Cursor::new(json)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(resolve(&catalog, "iris").unwrap().files[0].name, "iris.scale");
    }

    #[test]
    fn test_catalog_from_invalid_json() {
        let result = StaticCatalog::from_json_reader(Cursor::new("{not json"));
        assert!(matches!(result, Err(DatasetError::CatalogError(_))));
    }

    #[test]
    fn test_catalog_from_missing_file() {
        let result = StaticCatalog::from_json_file("/non/existent/catalog.json");
        assert!(matches!(result, Err(DatasetError::IoError(_))));
    }
}
