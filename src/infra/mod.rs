//! Infrastructure layer
//!
//! Handles all I/O operations: network, filesystem, and external processes.

pub mod dirs;
pub mod distro_info;
pub mod download;
pub mod process;
pub mod source_cache;
