//! Command-line interface module
//!
//! Parses arguments, resolves the release and hands the configuration to the
//! build engine. Nothing here terminates the process; [`run`] returns a typed
//! result and `main` maps it to an exit code through [`report::Reporter`].

pub mod args;
pub mod output;
pub mod report;
pub mod usage;

use std::ffi::OsString;
use std::path::Path;

use crate::core::dispatch::{self, BuildContext, BuildEngine, InterruptFlag, UserEnvironment};
use crate::core::package_control::PackageControl;
use crate::core::release::{resolve_release, ReleaseProvider};
use crate::error::{BoltError, Result};
use crate::infra::dirs::BoltDirs;
use crate::infra::distro_info::DistroInfo;

use args::ParseOutcome;

/// Run one invocation against the given collaborators
pub fn run<I, T, E, F>(
    argv: I,
    env: &dyn UserEnvironment,
    releases: &dyn ReleaseProvider,
    interrupt: &InterruptFlag,
    make_engine: F,
) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    E: BuildEngine,
    F: FnOnce(BuildContext) -> Result<E>,
{
    let invocation = match args::parse_args(argv)? {
        ParseOutcome::Help => {
            print!("{}", usage::render());
            return Ok(());
        }
        ParseOutcome::Run(invocation) => invocation,
    };

    let [specfile] = invocation.args.as_slice() else {
        eprint!("{}", usage::render());
        return Err(BoltError::invocation(format!(
            "expected exactly one specification file, got {}.",
            invocation.args.len()
        )));
    };

    let mut config = invocation.config;
    config.work_dir = Some(dispatch::resolve_work_dir(config.work_dir.as_deref())?);
    config.release = Some(resolve_release(config.release.as_deref(), releases)?);

    interrupt.check()?;
    dispatch::dispatch(Path::new(specfile), config, env, interrupt, make_engine)
}

/// Run one invocation with the user's directories and the bundled engine
pub fn run_default<I, T>(argv: I, interrupt: &InterruptFlag) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let dirs = BoltDirs::new();
    let distro = DistroInfo::new(dirs.releases_file());

    run(argv, &dirs, &distro, interrupt, |context| {
        PackageControl::new(context, distro.clone())
    })
}
