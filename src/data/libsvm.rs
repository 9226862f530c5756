//! LibSVM format line parsing and record building
//!
//! Each line has the form:
//! label index:value index:value ...
//!
//! Example:
//! +1 1:0.5 3:1.2 7:0.8
//! 1,3 2:1 5:2.5
//!
//! Indices are 1-based. Features not listed take the configured default value.
//! A label may be a comma-separated list for multi-label data.

use crate::core::{DatasetError, Label, Record, Result, Value};
use log::debug;
use std::io::BufRead;

/// Tokens of one non-blank line, borrowed from the line text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub label: &'a str,
    /// `(index, value)` token pairs in line order
    pub features: Vec<(&'a str, &'a str)>,
}

fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Split a line into its label token and `index:value` token pairs.
///
/// Returns `None` for blank lines. `line_num` is only used for error reporting.
pub fn parse_line(line: &str, line_num: usize) -> Result<Option<ParsedLine<'_>>> {
    let mut tokens = line
        .trim_end_matches(|c: char| c == '\r' || c == '\n')
        .split(is_separator)
        .filter(|token| !token.is_empty());

    let Some(label) = tokens.next() else {
        return Ok(None);
    };

    let features = tokens
        .map(|token| {
            token
                .split_once(':')
                .ok_or_else(|| DatasetError::malformed(line_num, token, "missing ':' in feature"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(ParsedLine { label, features }))
}

/// Parse a numeric token: float if it contains `.`, base-10 integer otherwise
pub fn parse_value(token: &str, line_num: usize) -> Result<Value> {
    if token.contains('.') {
        token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| DatasetError::malformed(line_num, token, "invalid float"))
    } else {
        token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| DatasetError::malformed(line_num, token, "invalid integer"))
    }
}

/// Parse a label token; `a,b,...` becomes a multi-label vector
pub fn parse_label(token: &str, line_num: usize) -> Result<Label> {
    let mut pieces: Vec<&str> = token.split(',').collect();
    while pieces.len() > 1 && pieces.last().map_or(false, |p| p.is_empty()) {
        pieces.pop();
    }
    if pieces.iter().all(|p| p.is_empty()) {
        return Err(DatasetError::malformed(line_num, token, "empty label"));
    }

    let mut values = pieces
        .into_iter()
        .map(|piece| parse_value(piece, line_num))
        .collect::<Result<Vec<_>>>()?;

    if values.len() == 1 {
        Ok(Label::Scalar(values.remove(0)))
    } else {
        Ok(Label::Vector(values))
    }
}

/// Expands sparse lines into dense records of a fixed width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordBuilder {
    n_features: usize,
    default_value: Value,
}

impl RecordBuilder {
    pub fn new(n_features: usize, default_value: Value) -> Self {
        Self {
            n_features,
            default_value,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn default_value(&self) -> Value {
        self.default_value
    }

    /// Build a record from parsed tokens.
    ///
    /// A repeated index overwrites the earlier value on the same line.
    pub fn build(&self, parsed: &ParsedLine<'_>, line_num: usize) -> Result<Record> {
        let label = parse_label(parsed.label, line_num)?;

        let mut features = vec![self.default_value; self.n_features];
        let mut seen = vec![false; self.n_features];
        for &(index_token, value_token) in &parsed.features {
            let index = index_token.parse::<i64>().map_err(|_| {
                DatasetError::malformed(line_num, index_token, "invalid feature index")
            })?;
            if index < 1 || index as u64 > self.n_features as u64 {
                return Err(DatasetError::FeatureIndexOutOfRange {
                    line: line_num,
                    index,
                    n_features: self.n_features,
                });
            }

            let position = (index - 1) as usize;
            if seen[position] {
                debug!("Line {line_num}: feature index {index} repeated, keeping the last value");
            }
            seen[position] = true;
            features[position] = parse_value(value_token, line_num)?;
        }

        Ok(Record::new(label, features))
    }

    /// Parse and build one line; `None` for blank lines
    pub fn build_line(&self, line: &str, line_num: usize) -> Result<Option<Record>> {
        match parse_line(line, line_num)? {
            Some(parsed) => self.build(&parsed, line_num).map(Some),
            None => Ok(None),
        }
    }
}

/// Read the next record from `reader`, skipping blank lines.
///
/// `buf` is reused between calls and `line_num` counts every physical line.
/// A line that is not valid UTF-8 is a malformed record at that line.
pub(crate) fn next_record<R: BufRead>(
    reader: &mut R,
    builder: &RecordBuilder,
    buf: &mut Vec<u8>,
    line_num: &mut usize,
) -> Result<Option<Record>> {
    loop {
        buf.clear();
        if reader.read_until(b'\n', buf).map_err(DatasetError::IoError)? == 0 {
            return Ok(None);
        }
        *line_num += 1;
        let line = std::str::from_utf8(buf).map_err(|_| {
            let text = String::from_utf8_lossy(buf);
            DatasetError::malformed(*line_num, text.trim_end(), "invalid UTF-8")
        })?;
        if let Some(record) = builder.build_line(line, *line_num)? {
            return Ok(Some(record));
        }
    }
}

/// Lazily parses records from any buffered reader.
///
/// Stops after the first error.
pub struct RecordReader<R> {
    reader: Option<R>,
    builder: RecordBuilder,
    buf: Vec<u8>,
    line_num: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R, builder: RecordBuilder) -> Self {
        Self {
            reader: Some(reader),
            builder,
            buf: Vec::new(),
            line_num: 0,
        }
    }

    /// Number of lines consumed so far
    pub fn line_num(&self) -> usize {
        self.line_num
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        match next_record(reader, &self.builder, &mut self.buf, &mut self.line_num) {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.reader = None;
                None
            }
            Err(e) => {
                self.reader = None;
                Some(Err(e))
            }
        }
    }
}
