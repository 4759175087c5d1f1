//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Isolated environment for one bolt-pack invocation
///
/// Holds a work directory plus private cache and config directories so
/// tests never see the user's real releases or source cache.
pub struct TestProject {
    /// Directory the build runs in
    pub dir: TempDir,
    cache: TempDir,
    config: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            cache: TempDir::new().expect("Failed to create cache directory"),
            config: TempDir::new().expect("Failed to create config directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn cache_path(&self) -> &Path {
        self.cache.path()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        write_file(&self.dir.path().join(name), content.as_bytes());
    }

    /// Place a source archive in the local source cache
    pub fn cache_source(&self, release: &str, repo: &str, package: &str, version: &str, filename: &str, content: &[u8]) {
        let letter = &package[..1];
        let path = self
            .cache
            .path()
            .join("bolt/dists")
            .join(release)
            .join("sources")
            .join(repo)
            .join(letter)
            .join(package)
            .join(version)
            .join(filename);
        write_file(&path, content);
    }

    /// Write `releases.json` into the config directory
    pub fn write_releases(&self, json: &str) {
        write_file(&self.config.path().join("releases.json"), json.as_bytes());
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Run bolt-pack from inside the project directory
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_bolt-pack"))
            .args(args)
            .current_dir(self.dir.path())
            .env("BOLT_CACHE_DIR", self.cache.path())
            .env("BOLT_CONFIG_DIR", self.config.path())
            .env("RUST_LOG", "info")
            .output()
            .expect("Failed to run bolt-pack")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Two releases, newest last
pub const SAMPLE_RELEASES: &str = r#"{
  "2022.1": { "status": "supported", "mirrors": { "main": "http://127.0.0.1:9/bolt" } },
  "2023.1": { "status": "supported", "mirrors": { "main": "http://127.0.0.1:9/bolt/" } }
}"#;

/// Package specification building a single shell-scripted package
pub const SAMPLE_SPEC: &str = r#"
[package]
name = "hello"
version = "2.12"
description = "greeting tool"
architecture = "amd64"
build_depends = ["sh", "cp (>= 8.0)"]

[[source]]
filename = "hello-2.12.tar"

[scripts]
prepare = "cp $BOLT_SOURCE_DIR/hello-2.12.tar prepared.tar"
build = "echo \"$BOLT_BUILD_FOR $BOLT_PREFIX $BOLT_RELEASE\" > built.txt"
install = "mkdir -p $BOLT_INSTALL_DIR/usr/bin && cp built.txt $BOLT_INSTALL_DIR/usr/bin/hello"

[[binary]]
name = "hello"
contents = ["usr/bin"]
"#;
