//! External process execution
//!
//! Build scripts run through `sh -e -c` with a prepared environment.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Run a shell script in `cwd` with extra environment variables
pub fn run_script(name: &str, script: &str, cwd: &Path, env: &[(String, String)]) -> Result<()> {
    tracing::info!("Running {name} script");
    tracing::debug!("{name}: {script}");

    let status = Command::new("sh")
        .arg("-e")
        .arg("-c")
        .arg(script)
        .current_dir(cwd)
        .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .status()
        .with_context(|| format!("failed to run {name} script"))?;

    if !status.success() {
        bail!("{name} script failed with {status}");
    }

    Ok(())
}

/// Run a program and fail with its stderr on non-zero exit
pub fn run_tool(program: &str, args: &[&str], cwd: &Path) -> Result<()> {
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("failed to run {program}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{program} failed: {}", stderr.trim());
    }

    Ok(())
}
