//! HTTP download functionality
//!
//! Streams a file to disk while computing its SHA-256 digest.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::DownloadError;

/// Progress callback type for download progress reporting
pub type ProgressCallback = Box<dyn Fn(u64, u64)>;

const CHUNK_SIZE: usize = 4096;

/// Download result containing file path and metadata
#[derive(Debug)]
pub struct DownloadResult {
    /// Path to the downloaded file
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// SHA256 checksum of the downloaded content
    pub checksum: String,
}

/// Anything that can retrieve a URL into a local file
pub trait Fetcher {
    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<DownloadResult, DownloadError>;
}

/// Blocking HTTP downloader
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::blocking::Client,
}

impl Downloader {
    /// Create a new downloader
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(300))
                .connect_timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
        }
    }

    fn fetch_once(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressCallback>,
    ) -> Result<DownloadResult, DownloadError> {
        let network_error = |e: &dyn std::fmt::Display| DownloadError::NetworkError {
            url: url.to_string(),
            error: e.to_string(),
        };

        let mut response = self.client.get(url).send().map_err(|e| network_error(&e))?;

        if !response.status().is_success() {
            return Err(network_error(&format!("HTTP {}", response.status())));
        }

        let total_size = response.content_length().unwrap_or(0);

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DownloadError::IoError {
                path: parent.to_path_buf(),
                error: e.to_string(),
            })?;
        }

        let mut file = File::create(dest).map_err(|e| DownloadError::IoError {
            path: dest.to_path_buf(),
            error: e.to_string(),
        })?;

        let mut hasher = Sha256::new();
        let mut downloaded: u64 = 0;
        let mut buf = [0u8; CHUNK_SIZE];

        loop {
            let n = response.read(&mut buf).map_err(|e| network_error(&e))?;
            if n == 0 {
                break;
            }

            file.write_all(&buf[..n])
                .map_err(|e| DownloadError::IoError {
                    path: dest.to_path_buf(),
                    error: e.to_string(),
                })?;

            hasher.update(&buf[..n]);
            downloaded += n as u64;

            if let Some(cb) = progress {
                cb(downloaded, total_size);
            }
        }

        file.flush().map_err(|e| DownloadError::IoError {
            path: dest.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(DownloadResult {
            path: dest.to_path_buf(),
            size: downloaded,
            checksum: hex::encode(hasher.finalize()),
        })
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for Downloader {
    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<DownloadResult, DownloadError> {
        let result = self.fetch_once(url, dest, progress.as_ref());

        if result.is_err() {
            // Clean up partial download on failure
            let _ = std::fs::remove_file(dest);
        }

        result
    }
}

/// Compute the SHA256 checksum of a file, reading it in chunks
pub fn file_checksum(path: &Path) -> Result<String, DownloadError> {
    let io_error = |e: std::io::Error| DownloadError::IoError {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    let mut file = File::open(path).map_err(io_error)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf).map_err(io_error)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
