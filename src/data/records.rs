//! One traversal of a dataset file
//!
//! [`Records`] owns its [`DecodedStream`] exclusively. Reaching end of stream
//! finishes the stream (reporting a failed decompression stage as the last
//! item). An error closes the stream at once; if the stage had failed on its
//! own, its `DecodeFailure` replaces the parse error it caused. Dropping the
//! iterator early releases the stream through `DecodedStream`'s own cleanup.

use crate::core::{Record, Result};
use crate::data::decode::DecodedStream;
use crate::data::libsvm::{next_record, RecordBuilder};
use log::debug;

/// Lazy, single-pass iterator over the records of one opened file
pub struct Records {
    stream: Option<DecodedStream>,
    builder: RecordBuilder,
    buf: Vec<u8>,
    line_num: usize,
}

impl Records {
    pub fn new(stream: DecodedStream, builder: RecordBuilder) -> Self {
        Self {
            stream: Some(stream),
            builder,
            buf: Vec::new(),
            line_num: 0,
        }
    }

    /// Number of lines consumed so far
    pub fn line_num(&self) -> usize {
        self.line_num
    }

    /// Process id of the decompression stage while it is still owned
    pub fn stage_pid(&self) -> Option<u32> {
        self.stream.as_ref().and_then(DecodedStream::stage_pid)
    }
}

impl Iterator for Records {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let stream = self.stream.as_mut()?;
        match next_record(stream, &self.builder, &mut self.buf, &mut self.line_num) {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                let stream = self.stream.take()?;
                stream.finish().err().map(Err)
            }
            Err(e) => {
                let stream = self.stream.take()?;
                match stream.close() {
                    Ok(()) => Some(Err(e)),
                    Err(failure) => {
                        debug!("Line {}: {e} (after failed decompression)", self.line_num);
                        Some(Err(failure))
                    }
                }
            }
        }
    }
}

impl std::iter::FusedIterator for Records {}
