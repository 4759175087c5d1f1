//! Build configuration
//!
//! The [`Configuration`] is assembled once from the command line, filled in
//! by the release resolver, and read-only afterwards.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::defaults;
use crate::error::BoltError;

/// Build lifecycle operation requested for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Run every stage up to and including packaging
    #[default]
    Default,
    /// Print build dependencies
    ListDeps,
    /// Retrieve sources
    Unpack,
    /// Unpack and run the prepare step
    Prepare,
    /// Prepare and compile
    Build,
    /// Build and install into the install tree
    Install,
    /// Package an existing install tree
    Repackage,
}

impl Action {
    /// Name the build engine knows this action by
    pub fn name(self) -> &'static str {
        match self {
            Action::Default => "default",
            Action::ListDeps => "list_deps",
            Action::Unpack => "unpack",
            Action::Prepare => "prepare",
            Action::Build => "build",
            Action::Install => "install",
            Action::Repackage => "repackage",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the build output is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildFor {
    #[default]
    Target,
    Tools,
    CrossTools,
}

impl BuildFor {
    /// Command-line token for this value
    pub fn as_str(self) -> &'static str {
        match self {
            BuildFor::Target => "target",
            BuildFor::Tools => "tools",
            BuildFor::CrossTools => "cross-tools",
        }
    }

    /// Install prefix the build scripts should use
    pub fn prefix(self) -> &'static str {
        match self {
            BuildFor::Target => defaults::TARGET_PREFIX,
            BuildFor::Tools | BuildFor::CrossTools => defaults::TOOLS_PREFIX,
        }
    }
}

impl fmt::Display for BuildFor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildFor {
    type Err = BoltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "target" => Ok(BuildFor::Target),
            "tools" => Ok(BuildFor::Tools),
            "cross-tools" => Ok(BuildFor::CrossTools),
            other => Err(BoltError::invocation(format!(
                "cannot build for '{other}'."
            ))),
        }
    }
}

/// Validated build configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub action: Action,
    pub build_for: BuildFor,
    pub debug_pkgs: bool,
    pub disable_packages: Vec<String>,
    pub enable_packages: Vec<String>,
    pub force_local: bool,
    pub ignore_deps: bool,
    pub outdir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub release: Option<String>,
    pub format: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            action: Action::Default,
            build_for: BuildFor::Target,
            debug_pkgs: true,
            disable_packages: Vec::new(),
            enable_packages: Vec::new(),
            force_local: false,
            ignore_deps: false,
            outdir: None,
            work_dir: None,
            release: None,
            format: defaults::DEFAULT_FORMAT.to_string(),
        }
    }
}

impl Configuration {
    /// Whether a binary package survives the enable/disable filters
    pub fn wants_package(&self, name: &str) -> bool {
        if !self.enable_packages.is_empty() && !self.enable_packages.iter().any(|p| p == name) {
            return false;
        }
        !self.disable_packages.iter().any(|p| p == name)
    }
}

/// Split a comma-separated package list, trimming each element.
///
/// Empty elements from consecutive or trailing commas are kept.
pub fn parse_package_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).collect()
}
