//! Core type definitions for LIBSVM datasets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Base URL of the LIBSVM dataset collection
pub const LIBSVM_DATASETS_URL: &str = "https://www.csie.ntu.edu.tw/~cjlin/libsvmtools/datasets/";

/// A numeric token from a LIBSVM file.
///
/// The kind is decided syntactically: a token containing `.` is a float,
/// anything else is an integer. `1` and `1.0` stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Numeric value widened to f64
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int(v) => v as f64,
            Value::Float(v) => v,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Int(i) => serde_json::Value::from(i),
            Value::Float(x) => serde_json::Number::from_f64(x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Record label: one value, or several for multi-label rows (`1,2,5`)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Label {
    Scalar(Value),
    Vector(Vec<Value>),
}

impl Label {
    /// Label components in order (a scalar yields one element)
    pub fn as_slice(&self) -> &[Value] {
        match self {
            Label::Scalar(v) => std::slice::from_ref(v),
            Label::Vector(vs) => vs,
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Label::Vector(_))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Scalar(v) => write!(f, "{v}"),
            Label::Vector(vs) => {
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&Label> for serde_json::Value {
    fn from(label: &Label) -> Self {
        match label {
            Label::Scalar(v) => (*v).into(),
            Label::Vector(vs) => {
                serde_json::Value::Array(vs.iter().map(|&v| serde_json::Value::from(v)).collect())
            }
        }
    }
}

/// One parsed row: a label and a dense feature vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    label: Label,
    features: Vec<Value>,
}

impl Record {
    pub fn new(label: Label, features: Vec<Value>) -> Self {
        Self { label, features }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Dense features; position `i` holds sparse index `i + 1`
    pub fn features(&self) -> &[Value] {
        &self.features
    }

    /// Feature at 0-based position, `None` past the end
    pub fn get(&self, index: usize) -> Option<Value> {
        self.features.get(index).copied()
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Mapping with a `"label"` key plus one key per feature position (`"0"`, `"1"`, ...)
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::with_capacity(self.features.len() + 1);
        map.insert("label".to_string(), (&self.label).into());
        for (i, &feature) in self.features.iter().enumerate() {
            map.insert(i.to_string(), serde_json::Value::from(feature));
        }
        map
    }

    /// Flat sequence `[label, feature_0, feature_1, ...]`
    pub fn values(&self) -> Vec<serde_json::Value> {
        std::iter::once(serde_json::Value::from(&self.label))
            .chain(self.features.iter().map(|&v| serde_json::Value::from(v)))
            .collect()
    }
}

impl Index<usize> for Record {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.features[index]
    }
}

/// One downloadable file of a dataset (e.g. the train or test split)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFileDescriptor {
    /// File name; also the cache key
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DatasetFileDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>, note: Option<&str>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            note: note.map(str::to_string),
        }
    }
}

/// Catalog entry for a named dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub name: String,
    pub n_features: usize,
    pub files: Vec<DatasetFileDescriptor>,
}

/// Descriptive metadata attached to an opened dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Stable identifier, also the per-dataset cache subdirectory
    pub id: String,
    pub name: String,
    pub url: String,
}

impl Metadata {
    pub fn for_dataset(name: &str) -> Self {
        Self {
            id: format!("libsvm-{}", normalize_name(name)),
            name: format!("LIBSVM data: {name}"),
            url: LIBSVM_DATASETS_URL.to_string(),
        }
    }
}

/// Drops parentheses, collapses runs of space/underscore/semicolon to `-`, lowercases.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars().filter(|&c| c != '(' && c != ')') {
        if matches!(c, ' ' | '_' | ';') {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
        } else {
            in_separator = false;
            out.extend(c.to_lowercase());
        }
    }
    out
}
