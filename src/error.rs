//! Error types for bolt-pack
//!
//! Every failure that leaves a component is folded into [`BoltError`], which
//! carries one of the two user-visible classifications (or the interrupt
//! marker). Lower layers keep their own domain-specific enums and convert.

use std::path::PathBuf;
use thiserror::Error;

use crate::exit_codes;

/// Release metadata errors
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Release metadata file exists but cannot be read
    #[error("failed to read release metadata '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Release metadata file is not valid JSON of the expected shape
    #[error("failed to parse release metadata '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// No explicit release and no supported release to fall back on
    #[error("unable to determine the release to build for.")]
    Undetermined,

    /// Release not listed in the metadata
    #[error("unknown release '{release}'.")]
    UnknownRelease { release: String },

    /// No mirror configured for a repository of a release
    #[error("no mirror configured for repository '{repo}' of release '{release}'.")]
    NoMirror { release: String, repo: String },
}

/// Specification file errors
#[derive(Error, Debug)]
pub enum SpecFileError {
    /// Specification file does not exist
    #[error("unable to find specification file '{path}'.")]
    NotFound { path: PathBuf },

    /// Specification file cannot be read
    #[error("failed to read specification file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Specification file is malformed
    #[error("failed to parse specification file '{path}': {error}")]
    Parse { path: PathBuf, error: String },
}

/// Download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Network error
    #[error("failed to retrieve {url}: {error}")]
    NetworkError { url: String, error: String },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

/// Source cache errors
#[derive(Error, Debug)]
pub enum SourceCacheError {
    /// Download of a source archive failed
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Downloaded file does not match the expected digest
    #[error("file {path} has invalid checksum!")]
    ChecksumMismatch { path: PathBuf },

    /// Source not cached and network access was not allowed
    #[error("source '{filename}' of '{package}' not found in local cache.")]
    NotCached { package: String, filename: String },

    /// Mirror lookup failed
    #[error(transparent)]
    Release(#[from] ReleaseError),
}

/// Top-level bolt-pack error type
///
/// The variant decides the process exit code; see [`BoltError::exit_code`].
#[derive(Error, Debug)]
pub enum BoltError {
    /// Malformed or contradictory command-line input
    #[error("{0}")]
    Invocation(String),

    /// Failure while performing an accepted request
    #[error("{0}")]
    Runtime(String),

    /// Cancelled by the user
    #[error("caught keyboard interrupt, exiting.")]
    Interrupted,
}

impl BoltError {
    /// Create an invocation-class error
    pub fn invocation(message: impl Into<String>) -> Self {
        Self::Invocation(message.into())
    }

    /// Create a runtime-class error
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BoltError::Invocation(_) => exit_codes::INVOCATION_ERROR,
            BoltError::Runtime(_) => exit_codes::RUNTIME_ERROR,
            BoltError::Interrupted => exit_codes::SUCCESS,
        }
    }
}

impl From<ReleaseError> for BoltError {
    fn from(err: ReleaseError) -> Self {
        BoltError::Runtime(err.to_string())
    }
}

impl From<SourceCacheError> for BoltError {
    fn from(err: SourceCacheError) -> Self {
        BoltError::Runtime(err.to_string())
    }
}

impl From<DownloadError> for BoltError {
    fn from(err: DownloadError) -> Self {
        BoltError::Runtime(err.to_string())
    }
}

impl From<SpecFileError> for BoltError {
    fn from(err: SpecFileError) -> Self {
        match err {
            SpecFileError::NotFound { .. } => BoltError::Invocation(err.to_string()),
            SpecFileError::Read { .. } | SpecFileError::Parse { .. } => {
                BoltError::Runtime(err.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for BoltError {
    fn from(err: anyhow::Error) -> Self {
        BoltError::Runtime(format!("{err:#}"))
    }
}

/// Result type alias for bolt-pack operations.
pub type Result<T> = std::result::Result<T, BoltError>;
