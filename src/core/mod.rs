//! Core build logic
//!
//! # Submodules
//!
//! - [`config`] - Build configuration and its enums
//! - [`release`] - Release selection
//! - [`dispatch`] - Work directory resolution and engine dispatch
//! - [`specfile`] - Package specification file parsing
//! - [`package_control`] - The build engine driving the stages

pub mod config;
pub mod dispatch;
pub mod package_control;
pub mod release;
pub mod specfile;
