//! Format compatibility tests
//!
//! Feeds the kinds of lines found in real LIBSVM collection files through the
//! reader and checks the dense output.

use libsvm_datasets::api::quick;
use libsvm_datasets::{DatasetError, Label, Record, RecordBuilder, RecordReader, Result, Value};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

fn read(data: &str, n_features: usize) -> Result<Vec<Record>> {
    RecordReader::new(Cursor::new(data), RecordBuilder::new(n_features, Value::Int(0))).collect()
}

/// Test LibSVM format variations
#[test]
fn test_libsvm_format_variations() {
    let test_cases = vec![
        ("+1 1:0.5 3:1.2 7:0.8\n-1 2:0.3 5:2.1\n", 7, "basic format"),
        ("1 1:0.5 2:1.0\n-1 1:-0.5 2:-1.0\n", 2, "explicit +/-1 labels"),
        ("3 1:1.0 10:2.0 100:3.0\n7 5:1.5 50:2.5\n", 100, "multiclass sparse indices"),
        ("0,4 1:1\n2,3,9 2:1\n", 2, "multi-label"),
        ("1.5 1:2\n-0.25 2:3\n", 2, "regression targets"),
        ("+1 1:2.0\r\n-1 1:-2.0\r\n", 1, "windows line endings"),
        ("+1\t1:2.0\t2:1\n-1  2:3\n", 2, "tabs and repeated spaces"),
        ("+1 1:2.0\n\n\n-1 1:-2.0", 1, "blank lines and no trailing newline"),
    ];

    for (data, n_features, description) in test_cases {
        let records = read(data, n_features)
            .unwrap_or_else(|e| panic!("failed to read {description}: {e}"));
        assert_eq!(records.len(), 2, "{description}");
        for record in &records {
            assert_eq!(record.len(), n_features, "{description}");
        }
    }
}

#[test]
fn test_integer_and_float_values_stay_distinct() {
    let records = read("1 1:1 2:1.0 3:-2 4:-2.5\n", 4).unwrap();
    assert_eq!(
        records[0].features(),
        &[Value::Int(1), Value::Float(1.0), Value::Int(-2), Value::Float(-2.5)]
    );
}

#[test]
fn test_regression_label_is_float() {
    let records = read("0.75 1:1\n", 1).unwrap();
    assert_eq!(records[0].label(), &Label::Scalar(Value::Float(0.75)));
}

#[test]
fn test_invalid_lines_abort() {
    let invalid = vec![
        ("+1 1\n", "missing colon"),
        ("+1 x:1\n", "non-numeric index"),
        ("+1 1:x\n", "non-numeric value"),
        ("x 1:1\n", "non-numeric label"),
        ("+1 1:1e3\n", "exponent without dot"),
    ];
    for (data, description) in invalid {
        assert!(
            matches!(read(data, 2), Err(DatasetError::MalformedRecord { .. })),
            "{description}"
        );
    }

    assert!(matches!(
        read("+1 3:1\n", 2),
        Err(DatasetError::FeatureIndexOutOfRange { .. })
    ));
}

#[test]
fn test_local_file_roundtrip_through_quick_api() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(temp_file, "+1 1:3 3:1.5").expect("Failed to write");
    writeln!(temp_file, "1,2 1:5").expect("Failed to write");
    temp_file.flush().expect("Failed to flush");

    let records: Vec<Record> = quick::records_from_file(temp_file.path(), 4)
        .expect("Failed to open")
        .collect::<Result<_>>()
        .expect("Failed to read");

    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].features(),
        &[Value::Int(3), Value::Int(0), Value::Float(1.5), Value::Int(0)]
    );
    assert_eq!(
        records[1].label(),
        &Label::Vector(vec![Value::Int(1), Value::Int(2)])
    );
}
