//! Integration tests for argument handling and exit codes
//!
//! **Validates: exit code 0 on success or help, 1 on invocation errors,
//! 2 on runtime errors**

mod common;

use common::{stderr, stdout, TestProject, SAMPLE_RELEASES, SAMPLE_SPEC};

fn project_with_spec() -> TestProject {
    let project = TestProject::new();
    project.create_file("hello.toml", SAMPLE_SPEC);
    project
}

#[test]
fn test_no_arguments_prints_usage_and_fails() {
    let project = TestProject::new();
    let output = project.run(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("USAGE:"));
}

#[test]
fn test_two_specfiles_rejected() {
    let project = project_with_spec();
    let output = project.run(&["hello.toml", "other.toml"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("USAGE:"));
}

#[test]
fn test_help_prints_usage_and_succeeds() {
    let project = TestProject::new();

    for flag in ["-h", "--help"] {
        let output = project.run(&[flag]);
        assert_eq!(output.status.code(), Some(0), "{flag} should exit 0");
        let out = stdout(&output);
        assert!(out.contains("USAGE:"));
        assert!(out.contains("FILTER OPTIONS:"));
    }
}

#[test]
fn test_help_ignores_positional_count() {
    let project = TestProject::new();
    let output = project.run(&["a.toml", "b.toml", "--help"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_unknown_build_for_is_invocation_error() {
    let project = project_with_spec();
    let output = project.run(&["--build-for=bogus", "hello.toml"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot build for 'bogus'."));
}

#[test]
fn test_missing_outdir_is_invocation_error() {
    let project = project_with_spec();
    let output = project.run(&["--outdir", "/nonexistent/bolt-out", "hello.toml"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("no such directory '/nonexistent/bolt-out'."));
}

#[test]
fn test_missing_work_dir_is_invocation_error() {
    let project = project_with_spec();
    let output = project.run(&["--work-dir=/nonexistent/bolt-work", "hello.toml"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unknown_flag_is_invocation_error() {
    let project = project_with_spec();
    let output = project.run(&["--frobnicate", "hello.toml"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_without_releases_is_runtime_error() {
    let project = project_with_spec();
    let output = project.run(&["--list-deps", "hello.toml"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("unable to determine the release to build for."));
}

#[test]
fn test_explicit_release_skips_release_lookup() {
    let project = project_with_spec();
    let output = project.run(&["--release=2023.1", "--list-deps", "hello.toml"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "sh\ncp (>= 8.0)\n");
}

#[test]
fn test_list_deps_with_latest_release() {
    let project = project_with_spec();
    project.write_releases(SAMPLE_RELEASES);

    let output = project.run(&["--list-deps", "hello.toml"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("sh"));
}

#[test]
fn test_missing_specfile_is_invocation_error() {
    let project = TestProject::new();
    let output = project.run(&["--release=2023.1", "missing.toml"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unable to find specification file"));
}

#[test]
fn test_malformed_releases_is_runtime_error() {
    let project = project_with_spec();
    project.write_releases("{ not json");

    let output = project.run(&["--list-deps", "hello.toml"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_piped_stderr_has_no_colour_codes() {
    let project = project_with_spec();
    let output = project.run(&["--build-for=bogus", "hello.toml"]);

    let err = stderr(&output);
    assert!(err.contains("cannot build for 'bogus'."));
    assert!(!err.contains('\u{1b}'), "unexpected escape codes in {err:?}");
}
