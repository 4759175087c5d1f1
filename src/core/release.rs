//! Release resolution
//!
//! Decides which distribution release a build targets. An explicit
//! `--release` wins verbatim; otherwise the most recent supported release
//! reported by the metadata provider is used.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::ReleaseError;

/// Metadata attached to one release
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Support status, e.g. "supported" or "eol"
    #[serde(default)]
    pub status: Option<String>,

    /// Mirror base URL per repository name
    #[serde(default)]
    pub mirrors: BTreeMap<String, String>,
}

/// Supported releases in recency order (oldest first)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedReleases {
    entries: Vec<(String, ReleaseInfo)>,
}

impl SupportedReleases {
    /// Build from (identifier, metadata) pairs, preserving order
    pub fn new(entries: Vec<(String, ReleaseInfo)>) -> Self {
        Self { entries }
    }

    /// The most recent release, if any
    pub fn latest(&self) -> Option<&str> {
        self.entries.last().map(|(name, _)| name.as_str())
    }

    /// Metadata of a named release
    pub fn get(&self, release: &str) -> Option<&ReleaseInfo> {
        self.entries
            .iter()
            .find(|(name, _)| name == release)
            .map(|(_, info)| info)
    }

    /// Release identifiers in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Source of release metadata
pub trait ReleaseProvider {
    /// List supported releases, most recent last
    fn supported_releases(&self) -> Result<SupportedReleases, ReleaseError>;
}

/// Determine the effective release.
///
/// The provider is only consulted when no release was requested.
pub fn resolve_release(
    requested: Option<&str>,
    provider: &dyn ReleaseProvider,
) -> Result<String, ReleaseError> {
    if let Some(release) = requested {
        return Ok(release.to_string());
    }

    let releases = provider.supported_releases()?;
    let release = releases.latest().ok_or(ReleaseError::Undetermined)?;

    tracing::debug!("No release requested, defaulting to {release}");
    Ok(release.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedProvider {
        releases: Vec<&'static str>,
        calls: Cell<usize>,
    }

    impl FixedProvider {
        fn new(releases: Vec<&'static str>) -> Self {
            Self {
                releases,
                calls: Cell::new(0),
            }
        }
    }

    impl ReleaseProvider for FixedProvider {
        fn supported_releases(&self) -> Result<SupportedReleases, ReleaseError> {
            self.calls.set(self.calls.get() + 1);
            Ok(SupportedReleases::new(
                self.releases
                    .iter()
                    .map(|r| ((*r).to_string(), ReleaseInfo::default()))
                    .collect(),
            ))
        }
    }

    struct BrokenProvider;

    impl ReleaseProvider for BrokenProvider {
        fn supported_releases(&self) -> Result<SupportedReleases, ReleaseError> {
            Err(ReleaseError::Parse {
                path: "releases.json".into(),
                error: "expected value".to_string(),
            })
        }
    }

    #[test]
    fn test_defaults_to_last_supported_release() {
        let provider = FixedProvider::new(vec!["2022.1", "2023.1"]);
        assert_eq!(resolve_release(None, &provider).unwrap(), "2023.1");
    }

    #[test]
    fn test_order_not_lexical() {
        let provider = FixedProvider::new(vec!["2023.1", "2022.1"]);
        assert_eq!(resolve_release(None, &provider).unwrap(), "2022.1");
    }

    #[test]
    fn test_no_supported_releases_fails() {
        let provider = FixedProvider::new(vec![]);
        let err = resolve_release(None, &provider).unwrap_err();
        assert!(matches!(err, ReleaseError::Undetermined));
    }

    #[test]
    fn test_explicit_release_used_verbatim() {
        let provider = FixedProvider::new(vec!["2022.1"]);
        assert_eq!(
            resolve_release(Some("2099.9"), &provider).unwrap(),
            "2099.9"
        );
        assert_eq!(provider.calls.get(), 0);
    }

    #[test]
    fn test_explicit_release_skips_broken_provider() {
        assert_eq!(
            resolve_release(Some("2023.1"), &BrokenProvider).unwrap(),
            "2023.1"
        );
    }

    #[test]
    fn test_provider_error_propagates() {
        let err = resolve_release(None, &BrokenProvider).unwrap_err();
        assert!(matches!(err, ReleaseError::Parse { .. }));
    }

    #[test]
    fn test_supported_releases_lookup() {
        let mut info = ReleaseInfo::default();
        info.mirrors
            .insert("main".to_string(), "https://mirror.example".to_string());
        let releases = SupportedReleases::new(vec![("2023.1".to_string(), info.clone())]);

        assert_eq!(releases.get("2023.1"), Some(&info));
        assert!(releases.get("2022.1").is_none());
        assert_eq!(releases.keys().collect::<Vec<_>>(), vec!["2023.1"]);
        assert!(!releases.is_empty());
    }
}
