//! Exit code constants for the bolt-pack CLI.
//!
//! - 0: Success, help requested, or interrupted by the user
//! - 1: Invocation error (bad arguments, bad paths, wrong positional count)
//! - 2: Runtime error (unresolvable release, build failure)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Invocation error: the command line could not be accepted.
pub const INVOCATION_ERROR: i32 = 1;

/// Runtime error: the requested action failed after arguments were accepted.
pub const RUNTIME_ERROR: i32 = 2;
