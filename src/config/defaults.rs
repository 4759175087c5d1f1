//! Default configuration values

/// Name the tool reports itself as in usage text and log lines
pub const TOOL_NAME: &str = "bolt-pack";

/// Package format produced by the packaging stage
pub const DEFAULT_FORMAT: &str = "deb";

/// Release metadata file inside the config directory
pub const RELEASES_FILE: &str = "releases.json";

/// Scratch directory created below the work directory
pub const BUILD_SUBDIR: &str = "bolt-build";

/// Install prefix for target builds
pub const TARGET_PREFIX: &str = "/usr";

/// Install prefix for tools and cross-tools builds
pub const TOOLS_PREFIX: &str = "/tools";

/// Maintainer written to control files when the specification names none
pub const DEFAULT_MAINTAINER: &str = "Bolt Linux Packagers <packagers@localhost>";
