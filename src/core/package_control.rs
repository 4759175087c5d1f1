//! Package control
//!
//! The bundled build engine. Runs the stages of a source package build:
//! retrieve sources, run the prepare/build/install scripts, and cut the
//! install tree into `.deb` packages.

use anyhow::{bail, Context};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::config::{Action, BuildFor};
use crate::core::dispatch::{BuildContext, BuildEngine};
use crate::core::specfile::{BinaryPackage, SpecFile};
use crate::error::{BoltError, Result, SourceCacheError};
use crate::infra::distro_info::DistroInfo;
use crate::infra::download::Downloader;
use crate::infra::process;
use crate::infra::source_cache::{Retrieved, SourceCache, SourceRef};

/// One step of the build pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unpack,
    Prepare,
    Build,
    Install,
    Package,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Unpack => "unpack",
            Stage::Prepare => "prepare",
            Stage::Build => "build",
            Stage::Install => "install",
            Stage::Package => "package",
        }
    }
}

/// Stages an action runs, in order
pub fn stages_for(action: Action) -> &'static [Stage] {
    use Stage::{Build, Install, Package, Prepare, Unpack};

    match action {
        Action::ListDeps => &[],
        Action::Unpack => &[Unpack],
        Action::Prepare => &[Unpack, Prepare],
        Action::Build => &[Unpack, Prepare, Build],
        Action::Install => &[Unpack, Prepare, Build, Install],
        Action::Repackage => &[Package],
        Action::Default => &[Unpack, Prepare, Build, Install, Package],
    }
}

/// Scratch directories below the work directory
#[derive(Debug, Clone)]
struct BuildDirs {
    sources: PathBuf,
    build: PathBuf,
    install: PathBuf,
    staging: PathBuf,
}

impl BuildDirs {
    fn new(work_dir: &Path) -> Self {
        let root = work_dir.join(defaults::BUILD_SUBDIR);
        Self {
            sources: root.join("sources"),
            build: root.join("build"),
            install: root.join("install"),
            staging: root.join("staging"),
        }
    }
}

/// Build engine for one specification file
pub struct PackageControl {
    context: BuildContext,
    spec: SpecFile,
    distro: DistroInfo,
    dirs: BuildDirs,
    release: String,
}

impl PackageControl {
    /// Load the specification file named by the context
    pub fn new(context: BuildContext, distro: DistroInfo) -> Result<Self> {
        let spec = SpecFile::load(&context.specfile)?;
        let release = context
            .config
            .release
            .clone()
            .ok_or_else(|| BoltError::runtime("no release set for build."))?;
        let dirs = BuildDirs::new(&context.work_dir);

        Ok(Self {
            context,
            spec,
            distro,
            dirs,
            release,
        })
    }

    /// Build dependency names as listed in the specification
    pub fn build_depends(&self) -> &[String] {
        &self.spec.package.build_depends
    }

    /// Binary packages that pass the enable/disable filters
    pub fn selected_packages(&self) -> Vec<&BinaryPackage> {
        self.spec
            .binary
            .iter()
            .filter(|pkg| self.context.config.wants_package(&pkg.name))
            .collect()
    }

    /// Verify every build dependency is available on the host
    fn check_build_deps(&self) -> Result<()> {
        let missing: Vec<&str> = self
            .build_depends()
            .iter()
            .filter_map(|dep| dep.split(|c: char| c.is_whitespace() || c == '(').next())
            .filter(|tool| !tool.is_empty() && which::which(tool).is_err())
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        let list = missing.join(", ");
        if self.context.config.ignore_deps {
            tracing::warn!("Ignoring missing build dependencies: {list}");
            Ok(())
        } else {
            Err(BoltError::runtime(format!(
                "missing build dependencies: {list}."
            )))
        }
    }

    /// Retrieve all sources into the sources directory
    fn unpack(&self) -> Result<()> {
        self.check_build_deps()?;

        fs::create_dir_all(&self.dirs.sources)
            .with_context(|| format!("failed to create {}", self.dirs.sources.display()))?;

        let cache = SourceCache::new(
            self.context.cache_dir.clone(),
            &self.release,
            Downloader::new(),
            self.distro.clone(),
        );
        let package = &self.spec.package;

        for entry in &self.spec.source {
            let source = SourceRef {
                repo: &entry.repo,
                package: &package.name,
                version: &package.version,
                filename: &entry.filename,
                sha256: entry.sha256.as_deref(),
            };

            let retrieved = if self.context.config.force_local {
                cache
                    .fetch_from_cache(&source)?
                    .map(Retrieved::Cached)
                    .ok_or_else(|| SourceCacheError::NotCached {
                        package: package.name.clone(),
                        filename: entry.filename.clone(),
                    })?
            } else {
                cache.find_and_retrieve(&source)?
            };

            let dest = self.dirs.sources.join(&entry.filename);
            fs::copy(retrieved.path(), &dest).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    retrieved.path().display(),
                    dest.display()
                )
            })?;
            tracing::info!("Unpacked {}", entry.filename);
        }

        Ok(())
    }

    /// Environment handed to build scripts
    fn script_env(&self) -> Vec<(String, String)> {
        let config = &self.context.config;
        let path = |p: &Path| p.display().to_string();

        vec![
            ("BOLT_SOURCE_DIR".into(), path(&self.dirs.sources)),
            ("BOLT_BUILD_DIR".into(), path(&self.dirs.build)),
            ("BOLT_INSTALL_DIR".into(), path(&self.dirs.install)),
            ("BOLT_PREFIX".into(), config.build_for.prefix().into()),
            ("BOLT_BUILD_FOR".into(), config.build_for.as_str().into()),
            ("BOLT_RELEASE".into(), self.release.clone()),
            ("BOLT_PARALLEL".into(), num_cpus::get().to_string()),
        ]
    }

    fn run_script(&self, stage: Stage, script: Option<&str>) -> Result<()> {
        let Some(script) = script else {
            tracing::debug!("No {} script, skipping", stage.name());
            return Ok(());
        };

        fs::create_dir_all(&self.dirs.build)
            .with_context(|| format!("failed to create {}", self.dirs.build.display()))?;
        if stage == Stage::Install {
            fs::create_dir_all(&self.dirs.install)
                .with_context(|| format!("failed to create {}", self.dirs.install.display()))?;
        }

        process::run_script(stage.name(), script, &self.dirs.build, &self.script_env())?;
        Ok(())
    }

    /// Turn the install tree into binary packages
    fn package(&self) -> Result<()> {
        let config = &self.context.config;

        if config.build_for != BuildFor::Target {
            tracing::info!("Not packaging a {} build", config.build_for);
            return Ok(());
        }
        if config.format != defaults::DEFAULT_FORMAT {
            return Err(BoltError::runtime(format!(
                "unsupported package format '{}'.",
                config.format
            )));
        }
        if !self.dirs.install.is_dir() {
            return Err(BoltError::runtime(format!(
                "install tree {} not found, run the install step first.",
                self.dirs.install.display()
            )));
        }

        let outdir = config
            .outdir
            .clone()
            .unwrap_or_else(|| self.context.work_dir.clone());

        for pkg in self.selected_packages() {
            self.context.interrupt.check()?;
            let staged = self.stage_package(pkg)?;
            self.build_deb(&pkg.name, &staged, &outdir)?;
        }

        if let Some(debug) = self.debug_package() {
            self.context.interrupt.check()?;
            let staged = self.stage_package(&debug)?;
            self.build_deb(&debug.name, &staged, &outdir)?;
        }

        Ok(())
    }

    /// The `<source>-dbg` package, when one should be built
    fn debug_package(&self) -> Option<BinaryPackage> {
        let config = &self.context.config;
        let name = format!("{}-dbg", self.spec.package.name);

        if !config.debug_pkgs
            || !config.wants_package(&name)
            || !self.dirs.install.join("usr/lib/debug").is_dir()
        {
            return None;
        }

        Some(BinaryPackage {
            description: Some(format!("debug symbols for {}", self.spec.package.name)),
            name,
            contents: vec!["usr/lib/debug".to_string()],
            depends: Vec::new(),
        })
    }

    /// Copy a package's contents into its staging tree and write the control file
    fn stage_package(&self, pkg: &BinaryPackage) -> Result<PathBuf> {
        let root = self.dirs.staging.join(&pkg.name);
        if root.exists() {
            fs::remove_dir_all(&root)
                .with_context(|| format!("failed to clear {}", root.display()))?;
        }

        for entry in &pkg.contents {
            let src = self.dirs.install.join(entry.trim_start_matches('/'));
            if !src.exists() {
                tracing::warn!("{}: '{entry}' not found in install tree", pkg.name);
                continue;
            }
            copy_tree(&self.dirs.install, &src, &root)?;
        }

        let control_dir = root.join("DEBIAN");
        fs::create_dir_all(&control_dir)
            .with_context(|| format!("failed to create {}", control_dir.display()))?;
        fs::write(control_dir.join("control"), self.control_file(pkg))
            .with_context(|| format!("failed to write control file for {}", pkg.name))?;

        Ok(root)
    }

    fn control_file(&self, pkg: &BinaryPackage) -> String {
        let meta = &self.spec.package;
        let maintainer = meta.maintainer.as_deref().unwrap_or(defaults::DEFAULT_MAINTAINER);
        let description = match pkg.description.as_deref().unwrap_or(&meta.description) {
            "" => meta.name.as_str(),
            text => text,
        };

        let mut control = String::new();
        control.push_str(&format!("Package: {}\n", pkg.name));
        control.push_str(&format!("Version: {}\n", meta.version));
        control.push_str(&format!("Architecture: {}\n", meta.architecture));
        control.push_str(&format!("Maintainer: {maintainer}\n"));
        control.push_str(&format!("Source: {}\n", meta.name));
        if !pkg.depends.is_empty() {
            control.push_str(&format!("Depends: {}\n", pkg.depends.join(", ")));
        }
        control.push_str(&format!("Description: {description}\n"));

        control
    }

    fn build_deb(&self, name: &str, staged: &Path, outdir: &Path) -> Result<()> {
        let meta = &self.spec.package;
        let target = outdir.join(format!(
            "{name}_{}_{}.deb",
            meta.version, meta.architecture
        ));

        tracing::info!("Creating {}", target.display());

        let staged = staged.display().to_string();
        let target_str = target.display().to_string();
        process::run_tool(
            "dpkg-deb",
            &["--root-owner-group", "--build", &staged, &target_str],
            &self.context.work_dir,
        )?;
        Ok(())
    }

    fn run_stage(&self, stage: Stage) -> Result<()> {
        let scripts = &self.spec.scripts;
        match stage {
            Stage::Unpack => self.unpack(),
            Stage::Prepare => self.run_script(stage, scripts.prepare.as_deref()),
            Stage::Build => self.run_script(stage, scripts.build.as_deref()),
            Stage::Install => self.run_script(stage, scripts.install.as_deref()),
            Stage::Package => self.package(),
        }
    }
}

impl BuildEngine for PackageControl {
    fn invoke(&mut self, action: Action) -> Result<()> {
        if action == Action::ListDeps {
            for dep in self.build_depends() {
                println!("{dep}");
            }
            return Ok(());
        }

        let meta = &self.spec.package;
        tracing::info!(
            "{} {} {} for release {}",
            action,
            meta.name,
            meta.version,
            self.release
        );

        for &stage in stages_for(action) {
            self.context.interrupt.check()?;
            self.run_stage(stage)?;
        }

        Ok(())
    }
}

/// Copy `src` (a file or directory under `base`) to the same relative location under `dest`
fn copy_tree(base: &Path, src: &Path, dest: &Path) -> anyhow::Result<()> {
    for entry in walkdir::WalkDir::new(src) {
        let entry = entry.with_context(|| format!("failed to walk {}", src.display()))?;
        let rel = entry.path().strip_prefix(base)?;
        let target = dest.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("failed to create {}", target.display()))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        if file_type.is_symlink() {
            let link = fs::read_link(entry.path())?;
            std::os::unix::fs::symlink(&link, &target)
                .with_context(|| format!("failed to link {}", target.display()))?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("failed to copy {}", entry.path().display()))?;
        } else {
            bail!("unsupported file type at {}", entry.path().display());
        }
    }

    Ok(())
}
