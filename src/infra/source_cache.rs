//! Source archive cache
//!
//! Upstream source archives are kept below
//! `<cache>/bolt/dists/<release>/sources/<repo>/<letter>/<pkg>/<version>/<file>`
//! and fetched from the release's repository mirror on a miss.

use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::error::SourceCacheError;
use crate::infra::distro_info::DistroInfo;
use crate::infra::download::{file_checksum, Fetcher, ProgressCallback};

/// One source archive to look up
#[derive(Debug, Clone, Copy)]
pub struct SourceRef<'a> {
    pub repo: &'a str,
    pub package: &'a str,
    pub version: &'a str,
    pub filename: &'a str,
    pub sha256: Option<&'a str>,
}

/// Where a source archive was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieved {
    Cached(PathBuf),
    Downloaded(PathBuf),
}

impl Retrieved {
    pub fn path(&self) -> &Path {
        match self {
            Retrieved::Cached(p) | Retrieved::Downloaded(p) => p,
        }
    }
}

/// Resolves mirror base URLs
pub trait MirrorSource {
    fn pick_mirror(&self, release: &str, repo: &str) -> Result<String, SourceCacheError>;
}

impl MirrorSource for DistroInfo {
    fn pick_mirror(&self, release: &str, repo: &str) -> Result<String, SourceCacheError> {
        Ok(DistroInfo::pick_mirror(self, release, repo)?)
    }
}

/// Source cache for one release
pub struct SourceCache<F: Fetcher, M: MirrorSource> {
    cache_dir: PathBuf,
    release: String,
    fetcher: F,
    mirrors: M,
    verbose: bool,
}

impl<F: Fetcher, M: MirrorSource> SourceCache<F, M> {
    pub fn new(cache_dir: PathBuf, release: &str, fetcher: F, mirrors: M) -> Self {
        Self {
            cache_dir,
            release: release.to_string(),
            fetcher,
            mirrors,
            verbose: true,
        }
    }

    /// Disable the download progress bar
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    /// Look in the cache first, then download from the mirror
    pub fn find_and_retrieve(&self, source: &SourceRef<'_>) -> Result<Retrieved, SourceCacheError> {
        if let Some(path) = self.fetch_from_cache(source)? {
            return Ok(Retrieved::Cached(path));
        }
        self.fetch_from_repo(source).map(Retrieved::Downloaded)
    }

    /// Cached path of a source, if present and matching its checksum
    pub fn fetch_from_cache(&self, source: &SourceRef<'_>) -> Result<Option<PathBuf>, SourceCacheError> {
        let abs_path = self.cache_path(source);

        if !abs_path.exists() {
            return Ok(None);
        }
        let Some(expected) = source.sha256 else {
            return Ok(Some(abs_path));
        };

        if file_checksum(&abs_path)?.eq_ignore_ascii_case(expected) {
            Ok(Some(abs_path))
        } else {
            tracing::debug!("Cached {} has a stale checksum", abs_path.display());
            Ok(None)
        }
    }

    /// Download a source from the release mirror into the cache
    pub fn fetch_from_repo(&self, source: &SourceRef<'_>) -> Result<PathBuf, SourceCacheError> {
        let mirror_url = self.mirrors.pick_mirror(&self.release, source.repo)?;
        let source_url = format!(
            "{mirror_url}/{}/{}/sources/{}",
            self.release,
            source.repo,
            relative_url(source)
        );
        let target = self.cache_path(source);

        tracing::info!("retrieving {source_url}");

        let progress: Option<ProgressCallback> = if self.verbose {
            let bar = output::create_download_bar(0);
            Some(Box::new(move |done, total| {
                if total > 0 && bar.length() != Some(total) {
                    bar.set_length(total);
                }
                bar.set_position(done);
                if total > 0 && done >= total {
                    bar.finish_and_clear();
                }
            }))
        } else {
            None
        };

        let result = self.fetcher.fetch(&source_url, &target, progress)?;

        if let Some(expected) = source.sha256 {
            if !result.checksum.eq_ignore_ascii_case(expected) {
                return Err(SourceCacheError::ChecksumMismatch { path: target });
            }
        }

        Ok(target)
    }

    /// Absolute cache location of a source
    pub fn cache_path(&self, source: &SourceRef<'_>) -> PathBuf {
        let mut path = self
            .cache_dir
            .join("bolt")
            .join("dists")
            .join(&self.release)
            .join("sources")
            .join(source.repo);
        for part in relative_parts(source) {
            path.push(part);
        }
        path
    }
}

/// Pool directory letter: `lib` packages are grouped by their fourth character
fn first_letter(package: &str) -> String {
    let key = match package.strip_prefix("lib") {
        Some(rest) if !rest.is_empty() => rest,
        _ => package,
    };
    key.chars().next().map(String::from).unwrap_or_default()
}

fn relative_parts(source: &SourceRef<'_>) -> [String; 4] {
    [
        first_letter(source.package),
        source.package.to_string(),
        source.version.to_string(),
        source.filename.to_string(),
    ]
}

fn relative_url(source: &SourceRef<'_>) -> String {
    relative_parts(source).join("/")
}
