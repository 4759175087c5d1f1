//! Error reporting
//!
//! Turns the final result of an invocation into a log line and an exit code.

use crate::error::{BoltError, Result};
use crate::exit_codes;

/// Logs the outcome of an invocation on behalf of a named tool
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    tool: &'static str,
}

impl Reporter {
    pub fn new(tool: &'static str) -> Self {
        Self { tool }
    }

    /// Log a failure (if any) and return the exit code for it
    pub fn report(&self, result: &Result<()>) -> i32 {
        match result {
            Ok(()) => exit_codes::SUCCESS,
            Err(err @ BoltError::Interrupted) => {
                tracing::warn!(tool = self.tool, "{err}");
                err.exit_code()
            }
            Err(err) => {
                tracing::error!(tool = self.tool, "{err}");
                err.exit_code()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reporter() -> Reporter {
        Reporter::new("bolt-pack")
    }

    #[test]
    fn test_success_exits_zero() {
        assert_eq!(reporter().report(&Ok(())), 0);
    }

    #[test]
    fn test_invocation_error_exits_one() {
        let result = Err(BoltError::invocation("no such directory '/nope'."));
        assert_eq!(reporter().report(&result), 1);
    }

    #[test]
    fn test_runtime_error_exits_two() {
        let result = Err(BoltError::runtime("unable to determine the release to build for."));
        assert_eq!(reporter().report(&result), 2);
    }

    #[test]
    fn test_interrupt_exits_zero() {
        assert_eq!(reporter().report(&Err(BoltError::Interrupted)), 0);
    }
}
