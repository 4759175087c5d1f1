//! User directory management
//!
//! Provides the cache and config directories used by bolt-pack, following
//! the XDG Base Directory Specification.
//!
//! Environment variables can override default directories:
//! - `BOLT_CACHE_DIR` - Override cache directory
//! - `BOLT_CONFIG_DIR` - Override config directory

use std::env;
use std::path::PathBuf;

use crate::config::defaults;
use crate::core::dispatch::UserEnvironment;

/// Environment variable names for directory overrides
pub const ENV_CACHE_DIR: &str = "BOLT_CACHE_DIR";
pub const ENV_CONFIG_DIR: &str = "BOLT_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "bolt";

/// Directory provider for bolt-pack
#[derive(Debug, Clone)]
pub struct BoltDirs {
    cache_dir: PathBuf,
    config_dir: PathBuf,
}

impl BoltDirs {
    /// Create a new `BoltDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache_dir: Self::resolve(ENV_CACHE_DIR, dirs::cache_dir, ".cache"),
            config_dir: Self::resolve(ENV_CONFIG_DIR, dirs::config_dir, ".config"),
        }
    }

    /// Create an instance rooted at explicit paths
    #[must_use]
    pub fn with_paths(cache_dir: PathBuf, config_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            config_dir,
        }
    }

    /// Get the cache directory path
    ///
    /// - Linux: `$XDG_CACHE_HOME/bolt` or `~/.cache/bolt`
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone()
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/bolt` or `~/.config/bolt`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Path of the release metadata file
    #[must_use]
    pub fn releases_file(&self) -> PathBuf {
        self.config_dir.join(defaults::RELEASES_FILE)
    }

    fn resolve(var: &str, platform: fn() -> Option<PathBuf>, hidden: &str) -> PathBuf {
        if let Ok(path) = env::var(var) {
            return PathBuf::from(path);
        }

        platform().map(|p| p.join(APP_NAME)).unwrap_or_else(|| {
            // Fallback to home directory
            dirs::home_dir()
                .map(|h| h.join(hidden).join(APP_NAME))
                .unwrap_or_else(|| PathBuf::from(".").join(hidden).join(APP_NAME))
        })
    }
}

impl Default for BoltDirs {
    fn default() -> Self {
        Self::new()
    }
}

impl UserEnvironment for BoltDirs {
    fn cache_dir(&self) -> PathBuf {
        BoltDirs::cache_dir(self)
    }
}
