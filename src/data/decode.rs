//! Byte stream over a cached dataset file
//!
//! Plain files are read directly. `.bz2` files are piped through an external
//! decompression stage (`bzcat` by default). The stage and the pipe are owned
//! by [`DecodedStream`] as one unit: [`DecodedStream::finish`] reaps the stage
//! and reports a nonzero exit, [`DecodedStream::close`] does the same before
//! end of stream, and dropping the stream early closes the pipe and still
//! reaps the stage.

use crate::core::{DatasetError, Result};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

/// File suffix routed through the decompression stage
pub const BZ2_EXTENSION: &str = "bz2";

/// External decompression settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Program and leading arguments; the compressed path is appended
    pub bz2_command: Vec<String>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            bz2_command: vec!["bzcat".to_string()],
        }
    }
}

impl DecodeConfig {
    pub fn with_bz2_command<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bz2_command: command.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(unix)]
const SIGPIPE: i32 = 13;

/// Whether the stage died writing into a pipe this process already closed
#[cfg(unix)]
fn killed_by_closed_pipe(status: ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(SIGPIPE)
}

#[cfg(not(unix))]
fn killed_by_closed_pipe(_status: ExitStatus) -> bool {
    false
}

/// Whether `path` is dispatched to the decompression stage
pub fn is_compressed(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == BZ2_EXTENSION)
}

/// Open `path` as a buffered byte stream, decompressing by suffix
pub fn open(path: &Path, config: &DecodeConfig) -> Result<DecodedStream> {
    if !is_compressed(path) {
        debug!("Opening {}", path.display());
        let file = File::open(path).map_err(DatasetError::IoError)?;
        return Ok(DecodedStream {
            source: Source::Plain(BufReader::new(file)),
        });
    }

    let (program, args) = config.bz2_command.split_first().ok_or_else(|| {
        DatasetError::DecodeFailure("empty decompression command".to_string())
    })?;

    // Stdio::piped() leaves only the read end in this process; the write end
    // belongs to the child alone, so EOF arrives as soon as the stage exits.
    let mut child = Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| DatasetError::DecodeFailure(format!("failed to spawn {program}: {e}")))?;
    info!(
        "Decompressing {} with {program} (pid {})",
        path.display(),
        child.id()
    );

    let stdout = child.stdout.take().ok_or_else(|| {
        DatasetError::DecodeFailure(format!("{program} has no stdout pipe"))
    })?;

    Ok(DecodedStream {
        source: Source::Piped(Stage {
            program: program.clone(),
            output: Some(BufReader::new(stdout)),
            child: Some(child),
        }),
    })
}

enum Source {
    Plain(BufReader<File>),
    Piped(Stage),
}

struct Stage {
    program: String,
    output: Option<BufReader<ChildStdout>>,
    child: Option<Child>,
}

impl Stage {
    /// Close the pipe and wait for the stage to exit
    fn reap(&mut self) -> Result<Option<ExitStatus>> {
        self.output = None;
        let Some(mut child) = self.child.take() else {
            return Ok(None);
        };
        let status = child.wait()?;
        debug!("{} (pid {}) exited with {status}", self.program, child.id());
        Ok(Some(status))
    }

    fn failure(&self, status: ExitStatus) -> DatasetError {
        DatasetError::DecodeFailure(format!("{} exited with {status}", self.program))
    }

    fn output(&mut self) -> io::Result<&mut BufReader<ChildStdout>> {
        self.output
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "decompression stage closed"))
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        if self.child.is_none() {
            return;
        }
        match self.reap() {
            Ok(Some(status)) if killed_by_closed_pipe(status) => {
                debug!("{} stopped by early close", self.program);
            }
            Ok(Some(status)) if !status.success() => {
                warn!("Decompression stage after early close: {}", self.failure(status));
            }
            Ok(_) => {}
            Err(e) => warn!("Decompression stage after early close: {e}"),
        }
    }
}

/// Readable dataset bytes plus whatever process produces them
pub struct DecodedStream {
    source: Source,
}

impl DecodedStream {
    /// Process id of the decompression stage, if one is running
    pub fn stage_pid(&self) -> Option<u32> {
        match &self.source {
            Source::Plain(_) => None,
            Source::Piped(stage) => stage.child.as_ref().map(Child::id),
        }
    }

    /// Release the stream at end of input, surfacing a failed decompression stage
    pub fn finish(mut self) -> Result<()> {
        match &mut self.source {
            Source::Plain(_) => Ok(()),
            Source::Piped(stage) => match stage.reap()? {
                Some(status) if !status.success() => Err(stage.failure(status)),
                _ => Ok(()),
            },
        }
    }

    /// Release the stream before end of input.
    ///
    /// A stage that exited nonzero on its own is a `DecodeFailure`; one killed
    /// by the pipe this call closes is not.
    pub fn close(mut self) -> Result<()> {
        match &mut self.source {
            Source::Plain(_) => Ok(()),
            Source::Piped(stage) => match stage.reap()? {
                Some(status) if !status.success() && !killed_by_closed_pipe(status) => {
                    Err(stage.failure(status))
                }
                _ => Ok(()),
            },
        }
    }
}

impl Read for DecodedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.source {
            Source::Plain(reader) => reader.read(buf),
            Source::Piped(stage) => stage.output()?.read(buf),
        }
    }
}

impl BufRead for DecodedStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match &mut self.source {
            Source::Plain(reader) => reader.fill_buf(),
            Source::Piped(stage) => stage.output()?.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match &mut self.source {
            Source::Plain(reader) => reader.consume(amt),
            Source::Piped(stage) => {
                if let Some(output) = stage.output.as_mut() {
                    output.consume(amt);
                }
            }
        }
    }
}
