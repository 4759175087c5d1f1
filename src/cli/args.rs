//! Command-line argument parsing
//!
//! clap tokenizes the command line (short/long forms, `--opt=value` and
//! `--opt value`, unknown-flag diagnostics). Each recognized flag then maps to
//! a handler that returns an updated [`Configuration`]. Handlers run in the
//! order the flags appeared, so later action flags override earlier ones and
//! `--help` short-circuits everything after it.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::defaults::TOOL_NAME;
use crate::core::config::{parse_package_list, Action, Configuration};
use crate::error::{BoltError, Result};

const SPECFILE: &str = "specfile";

/// Updates the configuration for one occurrence of a flag
type FlagHandler = fn(Configuration, &str) -> Result<Configuration>;

/// What a flag does once recognized
#[derive(Clone, Copy)]
enum FlagEffect {
    ShowHelp,
    Update(FlagHandler),
}

/// Declaration of one command-line flag
struct FlagSpec {
    id: &'static str,
    short: Option<char>,
    long: &'static str,
    value_name: Option<&'static str>,
    effect: FlagEffect,
}

static FLAGS: &[FlagSpec] = &[
    FlagSpec {
        id: "help",
        short: Some('h'),
        long: "help",
        value_name: None,
        effect: FlagEffect::ShowHelp,
    },
    FlagSpec {
        id: "list_deps",
        short: None,
        long: "list-deps",
        value_name: None,
        effect: FlagEffect::Update(on_list_deps),
    },
    FlagSpec {
        id: "work_dir",
        short: None,
        long: "work-dir",
        value_name: Some("dir"),
        effect: FlagEffect::Update(on_work_dir),
    },
    FlagSpec {
        id: "release",
        short: None,
        long: "release",
        value_name: Some("release"),
        effect: FlagEffect::Update(on_release),
    },
    FlagSpec {
        id: "ignore_deps",
        short: None,
        long: "ignore-deps",
        value_name: None,
        effect: FlagEffect::Update(on_ignore_deps),
    },
    FlagSpec {
        id: "no_debug_pkgs",
        short: None,
        long: "no-debug-pkgs",
        value_name: None,
        effect: FlagEffect::Update(on_no_debug_pkgs),
    },
    FlagSpec {
        id: "force_local",
        short: None,
        long: "force-local",
        value_name: None,
        effect: FlagEffect::Update(on_force_local),
    },
    FlagSpec {
        id: "outdir",
        short: Some('o'),
        long: "outdir",
        value_name: Some("dir"),
        effect: FlagEffect::Update(on_outdir),
    },
    FlagSpec {
        id: "unpack",
        short: Some('u'),
        long: "unpack",
        value_name: None,
        effect: FlagEffect::Update(on_unpack),
    },
    FlagSpec {
        id: "prepare",
        short: Some('p'),
        long: "prepare",
        value_name: None,
        effect: FlagEffect::Update(on_prepare),
    },
    FlagSpec {
        id: "build",
        short: Some('b'),
        long: "build",
        value_name: None,
        effect: FlagEffect::Update(on_build),
    },
    FlagSpec {
        id: "install",
        short: Some('i'),
        long: "install",
        value_name: None,
        effect: FlagEffect::Update(on_install),
    },
    FlagSpec {
        id: "repackage",
        short: Some('r'),
        long: "repackage",
        value_name: None,
        effect: FlagEffect::Update(on_repackage),
    },
    FlagSpec {
        id: "enable_packages",
        short: None,
        long: "enable-packages",
        value_name: Some("list"),
        effect: FlagEffect::Update(on_enable_packages),
    },
    FlagSpec {
        id: "disable_packages",
        short: None,
        long: "disable-packages",
        value_name: Some("list"),
        effect: FlagEffect::Update(on_disable_packages),
    },
    FlagSpec {
        id: "build_for",
        short: None,
        long: "build-for",
        value_name: Some("what"),
        effect: FlagEffect::Update(on_build_for),
    },
];

fn with_action(config: Configuration, action: Action) -> Configuration {
    Configuration { action, ..config }
}

fn on_list_deps(config: Configuration, _: &str) -> Result<Configuration> {
    Ok(with_action(config, Action::ListDeps))
}

fn on_unpack(config: Configuration, _: &str) -> Result<Configuration> {
    Ok(with_action(config, Action::Unpack))
}

fn on_prepare(config: Configuration, _: &str) -> Result<Configuration> {
    Ok(with_action(config, Action::Prepare))
}

fn on_build(config: Configuration, _: &str) -> Result<Configuration> {
    Ok(with_action(config, Action::Build))
}

fn on_install(config: Configuration, _: &str) -> Result<Configuration> {
    Ok(with_action(config, Action::Install))
}

fn on_repackage(config: Configuration, _: &str) -> Result<Configuration> {
    Ok(with_action(config, Action::Repackage))
}

fn on_ignore_deps(config: Configuration, _: &str) -> Result<Configuration> {
    Ok(Configuration {
        ignore_deps: true,
        ..config
    })
}

fn on_no_debug_pkgs(config: Configuration, _: &str) -> Result<Configuration> {
    Ok(Configuration {
        debug_pkgs: false,
        ..config
    })
}

fn on_force_local(config: Configuration, _: &str) -> Result<Configuration> {
    Ok(Configuration {
        force_local: true,
        ..config
    })
}

fn on_release(config: Configuration, value: &str) -> Result<Configuration> {
    Ok(Configuration {
        release: Some(value.to_string()),
        ..config
    })
}

fn on_outdir(config: Configuration, value: &str) -> Result<Configuration> {
    Ok(Configuration {
        outdir: Some(existing_dir(value)?),
        ..config
    })
}

fn on_work_dir(config: Configuration, value: &str) -> Result<Configuration> {
    Ok(Configuration {
        work_dir: Some(existing_dir(value)?),
        ..config
    })
}

fn on_enable_packages(config: Configuration, value: &str) -> Result<Configuration> {
    Ok(Configuration {
        enable_packages: parse_package_list(value),
        ..config
    })
}

fn on_disable_packages(config: Configuration, value: &str) -> Result<Configuration> {
    Ok(Configuration {
        disable_packages: parse_package_list(value),
        ..config
    })
}

fn on_build_for(config: Configuration, value: &str) -> Result<Configuration> {
    Ok(Configuration {
        build_for: value.parse()?,
        ..config
    })
}

/// Absolute form of a directory named on the command line
fn existing_dir(value: &str) -> Result<PathBuf> {
    let missing = || BoltError::invocation(format!("no such directory '{value}'."));

    let path = PathBuf::from(value);
    if !path.is_dir() {
        return Err(missing());
    }
    path.canonicalize().map_err(|_| missing())
}

/// Result of parsing the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// `-h`/`--help` was given
    Help,
    /// Configuration plus positional arguments
    Run(Invocation),
}

/// Parsed configuration and positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config: Configuration,
    pub args: Vec<String>,
}

/// Build the clap command from the flag table
fn command() -> Command {
    let cmd = Command::new(TOOL_NAME)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .arg(
            Arg::new(SPECFILE)
                .num_args(1..)
                .action(ArgAction::Append),
        );

    FLAGS.iter().fold(cmd, |cmd, flag| {
        let mut arg = Arg::new(flag.id).long(flag.long);
        if let Some(short) = flag.short {
            arg = arg.short(short);
        }
        arg = match flag.value_name {
            Some(name) => arg.value_name(name).num_args(1).action(ArgAction::Set),
            None => arg.action(ArgAction::SetTrue),
        };
        cmd.arg(arg)
    })
}

/// Parse an argument vector (program name first)
pub fn parse_args<I, T>(args: I) -> Result<ParseOutcome>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command()
        .try_get_matches_from(args)
        .map_err(|e| BoltError::invocation(clap_diagnostic(&e)))?;

    let mut given: Vec<(usize, &FlagSpec)> = FLAGS
        .iter()
        .filter(|flag| matches.value_source(flag.id) == Some(ValueSource::CommandLine))
        .map(|flag| (matches.index_of(flag.id).unwrap_or(0), flag))
        .collect();
    given.sort_by_key(|(index, _)| *index);

    let mut config = Configuration::default();
    for (_, flag) in given {
        match flag.effect {
            FlagEffect::ShowHelp => return Ok(ParseOutcome::Help),
            FlagEffect::Update(handler) => {
                config = handler(config, flag_value(&matches, flag))?;
            }
        }
    }

    let args = matches
        .get_many::<String>(SPECFILE)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();

    Ok(ParseOutcome::Run(Invocation { config, args }))
}

fn flag_value<'a>(matches: &'a ArgMatches, flag: &FlagSpec) -> &'a str {
    if flag.value_name.is_none() {
        return "";
    }
    matches
        .get_one::<String>(flag.id)
        .map_or("", String::as_str)
}

/// First line of a clap error without its `error: ` prefix
fn clap_diagnostic(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let line = rendered.lines().next().unwrap_or_default().trim();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
