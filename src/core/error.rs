//! Error types for dataset resolution, caching and parsing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("unavailable LIBSVM data: {name:?}: [{}]", .available.join(", "))]
    UnknownDataset { name: String, available: Vec<String> },

    #[error("unavailable note: {dataset}: {note:?}: [{}]", .available.join(", "))]
    UnknownVariant {
        dataset: String,
        note: String,
        available: Vec<String>,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Decompression failed: {0}")]
    DecodeFailure(String),

    #[error("Malformed record at line {line}: {reason}: {token:?}")]
    MalformedRecord {
        line: usize,
        token: String,
        reason: String,
    },

    #[error("Feature index out of range at line {line}: {index} (expected 1..={n_features})")]
    FeatureIndexOutOfRange {
        line: usize,
        index: i64,
        n_features: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid catalog: {0}")]
    CatalogError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DatasetError {
    pub(crate) fn malformed(line: usize, token: &str, reason: impl Into<String>) -> Self {
        DatasetError::MalformedRecord {
            line,
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_dataset_message_lists_alternatives() {
        let err = DatasetError::UnknownDataset {
            name: "missing".to_string(),
            available: vec!["a1a".to_string(), "iris".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unavailable LIBSVM data: \"missing\": [a1a, iris]"
        );
    }

    #[test]
    fn test_unknown_variant_message() {
        let err = DatasetError::UnknownVariant {
            dataset: "a1a".to_string(),
            note: "validation".to_string(),
            available: vec!["testing".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unavailable note: a1a: \"validation\": [testing]"
        );
    }
}
