//! Configuration constants
//!
//! Compile-time defaults shared across the crate.

pub mod defaults;
