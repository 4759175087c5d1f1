//! Release metadata provider
//!
//! Reads `releases.json` from the config directory. The file is a JSON
//! object keyed by release identifier, oldest release first:
//!
//! ```json
//! {
//!   "2022.1": { "status": "supported", "mirrors": { "main": "https://…" } },
//!   "2023.1": { "status": "supported", "mirrors": { "main": "https://…" } }
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::core::release::{ReleaseInfo, ReleaseProvider, SupportedReleases};
use crate::error::ReleaseError;

/// Release metadata loaded from disk
#[derive(Debug, Clone)]
pub struct DistroInfo {
    path: PathBuf,
}

impl DistroInfo {
    /// Create a provider reading the given metadata file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the metadata file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all releases. A missing file yields an empty list.
    pub fn list(&self) -> Result<SupportedReleases, ReleaseError> {
        if !self.path.exists() {
            tracing::debug!("No release metadata at {}", self.path.display());
            return Ok(SupportedReleases::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| ReleaseError::Read {
            path: self.path.clone(),
            error: e.to_string(),
        })?;

        parse_releases(&content).map_err(|e| ReleaseError::Parse {
            path: self.path.clone(),
            error: e.to_string(),
        })
    }

    /// Mirror URL for a repository of a release
    pub fn pick_mirror(&self, release: &str, repo: &str) -> Result<String, ReleaseError> {
        let releases = self.list()?;
        let info = releases
            .get(release)
            .ok_or_else(|| ReleaseError::UnknownRelease {
                release: release.to_string(),
            })?;

        info.mirrors
            .get(repo)
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or_else(|| ReleaseError::NoMirror {
                release: release.to_string(),
                repo: repo.to_string(),
            })
    }
}

impl ReleaseProvider for DistroInfo {
    fn supported_releases(&self) -> Result<SupportedReleases, ReleaseError> {
        self.list()
    }
}

/// Parse release metadata, keeping the key order of the document
fn parse_releases(content: &str) -> Result<SupportedReleases, serde_json::Error> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;

    let entries = map
        .into_iter()
        .map(|(name, value)| Ok((name, serde_json::from_value::<ReleaseInfo>(value)?)))
        .collect::<Result<Vec<_>, serde_json::Error>>()?;

    Ok(SupportedReleases::new(entries))
}
