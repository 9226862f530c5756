//! HTTP downloader backed by `ureq`
//!
//! Bytes are streamed into `<destination>.partial` and renamed into place only
//! after the transfer completes, so an interrupted download never looks like
//! a valid cache entry.

use crate::core::{DatasetError, Downloader, Result};
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Plain HTTP(S) GET downloader
#[derive(Debug, Clone, Default)]
pub struct HttpDownloader {
    user_agent: Option<String>,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the `User-Agent` header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn copy_to(&self, url: &str, partial: &Path) -> Result<u64> {
        let mut request = ureq::get(url);
        if let Some(agent) = &self.user_agent {
            request = request.set("User-Agent", agent);
        }
        let response = request
            .call()
            .map_err(|e| DatasetError::NetworkError(format!("Download failed: {url}: {e}")))?;

        let mut reader = response.into_reader();
        let mut writer = BufWriter::new(File::create(partial)?);
        let bytes = io::copy(&mut reader, &mut writer)
            .map_err(|e| DatasetError::NetworkError(format!("Read failed: {url}: {e}")))?;
        writer.flush()?;
        Ok(bytes)
    }
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

impl Downloader for HttpDownloader {
    fn fetch(&self, destination: &Path, url: &str) -> Result<()> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        let partial = partial_path(destination);
        match self.copy_to(url, &partial) {
            Ok(bytes) => {
                fs::rename(&partial, destination)?;
                debug!("Downloaded {bytes} bytes to {}", destination.display());
                Ok(())
            }
            Err(e) => {
                if partial.exists() {
                    if let Err(remove_err) = fs::remove_file(&partial) {
                        warn!("Failed to remove {}: {remove_err}", partial.display());
                    }
                }
                Err(e)
            }
        }
    }
}
