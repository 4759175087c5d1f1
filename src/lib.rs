//! bolt-pack - package build front end for Bolt Linux
//!
//! Turns a command line into a build [`core::config::Configuration`] and hands
//! it, along with a package specification file, to the build engine.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Argument parsing, usage text and error reporting
//! - [`core`] - Configuration, release resolution, dispatch and the build engine
//! - [`infra`] - Infrastructure layer (network, filesystem, processes)
//! - [`config`] - Constants
//! - [`error`] - Error types and handling
//! - [`exit_codes`] - Process exit codes

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod infra;
