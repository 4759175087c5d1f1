//! Specification file handling
//!
//! A specification file describes one source package: where its sources come
//! from, which host tools it needs, the scripts that build it, and how the
//! install tree is split into binary packages.

use serde::Deserialize;
use std::path::Path;

use crate::error::SpecFileError;

/// Parsed specification file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SpecFile {
    /// Source package metadata
    pub package: PackageMetadata,

    /// Upstream source archives
    #[serde(default)]
    pub source: Vec<SourceEntry>,

    /// Build scripts
    #[serde(default)]
    pub scripts: Scripts,

    /// Binary packages cut from the install tree
    #[serde(default)]
    pub binary: Vec<BinaryPackage>,
}

/// Source package metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PackageMetadata {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Package description
    #[serde(default)]
    pub description: String,

    /// Maintainer for the generated control files
    #[serde(default)]
    pub maintainer: Option<String>,

    /// Architecture of the produced packages
    #[serde(default = "default_arch")]
    pub architecture: String,

    /// Host tools needed at build time
    #[serde(default)]
    pub build_depends: Vec<String>,
}

/// Individual source archive
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourceEntry {
    /// Repository the archive is published in
    #[serde(default = "default_repo")]
    pub repo: String,

    /// Archive file name
    pub filename: String,

    /// SHA256 checksum
    #[serde(default)]
    pub sha256: Option<String>,
}

/// Shell scripts for the build stages
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Scripts {
    #[serde(default)]
    pub prepare: Option<String>,
    #[serde(default)]
    pub build: Option<String>,
    #[serde(default)]
    pub install: Option<String>,
}

/// Binary package definition
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BinaryPackage {
    /// Package name
    pub name: String,

    /// Paths inside the install tree that belong to this package
    #[serde(default)]
    pub contents: Vec<String>,

    /// Runtime dependencies for the control file
    #[serde(default)]
    pub depends: Vec<String>,

    /// Package description (defaults to the source description)
    #[serde(default)]
    pub description: Option<String>,
}

fn default_arch() -> String {
    std::env::consts::ARCH.replace("x86_64", "amd64").replace("aarch64", "arm64")
}

fn default_repo() -> String {
    "main".to_string()
}

impl SpecFile {
    /// Parse a specification from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a specification file from disk
    pub fn load(path: &Path) -> Result<Self, SpecFileError> {
        if !path.is_file() {
            return Err(SpecFileError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SpecFileError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|e| SpecFileError::Parse {
            path: path.to_path_buf(),
            error: e.message().to_string(),
        })
    }
}
