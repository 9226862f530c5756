//! Reading dataset files: decoding, line parsing and record iteration

pub mod decode;
pub mod libsvm;
pub mod records;

pub use self::decode::{DecodeConfig, DecodedStream};
pub use self::libsvm::{parse_label, parse_line, parse_value, ParsedLine, RecordBuilder, RecordReader};
pub use self::records::Records;
