//! Action dispatch
//!
//! Builds the [`BuildContext`] handed to the build engine and invokes the
//! configured action on it. The dispatcher has no business logic of its own:
//! it resolves paths, makes the single engine call, and folds an interrupt
//! raised during that call into [`BoltError::Interrupted`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::config::{Action, Configuration};
use crate::error::{BoltError, Result};

/// Provides user-specific locations
pub trait UserEnvironment {
    /// Directory for cached downloads and build state
    fn cache_dir(&self) -> PathBuf;
}

/// Shared cancellation marker, raised by the signal handler
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fail with `Interrupted` if the flag is raised
    pub fn check(&self) -> Result<()> {
        if self.is_raised() {
            Err(BoltError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Everything the build engine needs for one invocation
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Specification file, absolute
    pub specfile: PathBuf,
    /// User cache directory
    pub cache_dir: PathBuf,
    /// Fully resolved configuration
    pub config: Configuration,
    /// Directory the build runs in, absolute
    pub work_dir: PathBuf,
    /// Cancellation marker
    pub interrupt: InterruptFlag,
}

impl BuildContext {
    /// Resolve the work directory and specification path.
    ///
    /// The work directory is `config.work_dir` when given, else the current
    /// directory. A relative specification path is taken relative to it.
    pub fn new(
        specfile: &Path,
        env: &dyn UserEnvironment,
        config: Configuration,
        interrupt: InterruptFlag,
    ) -> Result<Self> {
        let work_dir = resolve_work_dir(config.work_dir.as_deref())?;

        Ok(Self {
            specfile: work_dir.join(specfile),
            cache_dir: env.cache_dir(),
            config,
            work_dir,
            interrupt,
        })
    }
}

/// Resolve the directory a build runs in to an absolute path.
///
/// `None` means the current directory.
pub fn resolve_work_dir(requested: Option<&Path>) -> Result<PathBuf> {
    let requested = match requested {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().map_err(|e| {
            BoltError::runtime(format!("failed to determine current directory: {e}"))
        })?,
    };

    let work_dir = requested.canonicalize().map_err(|e| {
        BoltError::runtime(format!(
            "failed to change into work directory '{}': {e}",
            requested.display()
        ))
    })?;

    if !work_dir.is_dir() {
        return Err(BoltError::runtime(format!(
            "failed to change into work directory '{}': not a directory",
            requested.display()
        )));
    }

    Ok(work_dir)
}

/// The engine that performs the build steps
pub trait BuildEngine {
    /// Perform the named action
    fn invoke(&mut self, action: Action) -> Result<()>;
}

/// Construct the build context, create the engine and run the configured action
pub fn dispatch<E, F>(
    specfile: &Path,
    config: Configuration,
    env: &dyn UserEnvironment,
    interrupt: &InterruptFlag,
    make_engine: F,
) -> Result<()>
where
    E: BuildEngine,
    F: FnOnce(BuildContext) -> Result<E>,
{
    let action = config.action;
    let context = BuildContext::new(specfile, env, config, interrupt.clone())?;

    tracing::debug!(
        "Dispatching '{action}' for {} in {}",
        context.specfile.display(),
        context.work_dir.display()
    );

    let result = make_engine(context).and_then(|mut engine| engine.invoke(action));

    if interrupt.is_raised() {
        return Err(BoltError::Interrupted);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct FixedEnv;

    impl UserEnvironment for FixedEnv {
        fn cache_dir(&self) -> PathBuf {
            PathBuf::from("/var/cache/bolt")
        }
    }

    type Calls = Rc<RefCell<Vec<(Action, BuildContext)>>>;

    struct RecordingEngine {
        context: BuildContext,
        calls: Calls,
        outcome: fn(&BuildContext) -> Result<()>,
    }

    impl BuildEngine for RecordingEngine {
        fn invoke(&mut self, action: Action) -> Result<()> {
            self.calls.borrow_mut().push((action, self.context.clone()));
            (self.outcome)(&self.context)
        }
    }

    fn run(
        config: Configuration,
        interrupt: &InterruptFlag,
        outcome: fn(&BuildContext) -> Result<()>,
    ) -> (Result<()>, Calls) {
        let calls: Calls = Rc::default();
        let recorded = calls.clone();
        let result = dispatch(Path::new("pkg.toml"), config, &FixedEnv, interrupt, |context| {
            Ok(RecordingEngine {
                context,
                calls: recorded,
                outcome,
            })
        });
        (result, calls)
    }

    fn in_dir(dir: &TempDir, action: Action) -> Configuration {
        Configuration {
            action,
            work_dir: Some(dir.path().to_path_buf()),
            release: Some("2023.1".to_string()),
            ..Configuration::default()
        }
    }

    #[test]
    fn test_invokes_configured_action_once() {
        let dir = TempDir::new().unwrap();
        let (result, calls) = run(in_dir(&dir, Action::Build), &InterruptFlag::new(), |_| Ok(()));

        result.unwrap();
        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Action::Build);
    }

    #[test]
    fn test_context_carries_paths_and_config() {
        let dir = TempDir::new().unwrap();
        let (result, calls) = run(in_dir(&dir, Action::Unpack), &InterruptFlag::new(), |_| Ok(()));
        result.unwrap();

        let calls = calls.borrow();
        let context = &calls[0].1;
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(context.work_dir, root);
        assert_eq!(context.specfile, root.join("pkg.toml"));
        assert_eq!(context.cache_dir, PathBuf::from("/var/cache/bolt"));
        assert_eq!(context.config.release.as_deref(), Some("2023.1"));
    }

    #[test]
    fn test_absolute_specfile_is_kept() {
        let dir = TempDir::new().unwrap();
        let context = BuildContext::new(
            Path::new("/srv/specs/pkg.toml"),
            &FixedEnv,
            in_dir(&dir, Action::Default),
            InterruptFlag::new(),
        )
        .unwrap();
        assert_eq!(context.specfile, PathBuf::from("/srv/specs/pkg.toml"));
    }

    #[test]
    fn test_vanished_work_dir_is_runtime_error() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone");
        let config = Configuration {
            work_dir: Some(gone),
            ..Configuration::default()
        };

        let (result, calls) = run(config, &InterruptFlag::new(), |_| Ok(()));
        let err = result.unwrap_err();
        assert!(matches!(err, BoltError::Runtime(_)));
        assert!(err.to_string().starts_with("failed to change into work directory"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_engine_errors_propagate_unchanged() {
        let dir = TempDir::new().unwrap();
        let (result, _) = run(in_dir(&dir, Action::Build), &InterruptFlag::new(), |_| {
            Err(BoltError::invocation("unable to find specification file"))
        });
        assert!(matches!(result.unwrap_err(), BoltError::Invocation(_)));

        let (result, _) = run(in_dir(&dir, Action::Build), &InterruptFlag::new(), |_| {
            Err(BoltError::runtime("build script failed"))
        });
        assert!(matches!(result.unwrap_err(), BoltError::Runtime(_)));
    }

    #[test]
    fn test_interrupt_during_action_wins_over_failure() {
        let dir = TempDir::new().unwrap();
        let interrupt = InterruptFlag::new();
        let raised = interrupt.clone();
        let recorded: Calls = Rc::default();
        let result = dispatch(
            Path::new("pkg.toml"),
            in_dir(&dir, Action::Build),
            &FixedEnv,
            &interrupt,
            move |context| {
                raised.raise();
                Ok(RecordingEngine {
                    context,
                    calls: recorded,
                    outcome: |_| Err(BoltError::runtime("make: *** [all] Interrupt")),
                })
            },
        );

        let err = result.unwrap_err();
        assert!(matches!(err, BoltError::Interrupted));
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_interrupt_flag_check() {
        let flag = InterruptFlag::new();
        assert!(flag.check().is_ok());
        flag.clone().raise();
        assert!(matches!(flag.check(), Err(BoltError::Interrupted)));
    }
}
