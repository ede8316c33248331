//! CLI contract tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

fn main_source() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/main.rs");
    match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => panic!("main source should load from {}: {err}", path.display()),
    }
}

/// The binary with `HOME` pointed at a scratch directory and no key in the
/// environment.
fn geomentor(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("geomentor").expect("binary should build");
    cmd.env("HOME", home)
        .env_remove("GOOGLE_API_KEY")
        .env_remove("GEOMENTOR_CONFIG_PATH")
        .env_remove("GEOMENTOR_MODEL")
        .env_remove("GEOMENTOR_BASE_URL")
        .env_remove("GEOMENTOR_TIMEOUT_SECS")
        .env_remove("GEOMENTOR_LOG_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn main_defines_primary_subcommands() {
    let source = main_source();
    assert!(source.contains("Start"));
    assert!(source.contains("Status"));
    assert!(source.contains("Evaluate"));
}

#[test]
fn help_lists_subcommands() {
    let home = tempfile::tempdir().expect("should create temp dir");
    let output = geomentor(home.path())
        .arg("--help")
        .output()
        .expect("binary should run");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("start"));
    assert!(stdout.contains("status"));
    assert!(stdout.contains("evaluate"));
}

#[test]
fn status_reports_missing_key_without_failing() {
    let home = tempfile::tempdir().expect("should create temp dir");
    let output = geomentor(home.path())
        .arg("status")
        .output()
        .expect("binary should run");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("gemini-1.5-pro"));
    assert!(stdout.contains("missing"));
    assert!(stdout.contains("GOOGLE_API_KEY"));
}

#[test]
fn status_never_prints_the_key() {
    let home = tempfile::tempdir().expect("should create temp dir");
    let output = geomentor(home.path())
        .env("GOOGLE_API_KEY", "AIza-status-secret")
        .arg("status")
        .output()
        .expect("binary should run");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("present"));
    assert!(!stdout.contains("AIza-status-secret"));
}

#[test]
fn start_without_key_explains_configuration() {
    let home = tempfile::tempdir().expect("should create temp dir");
    let output = geomentor(home.path())
        .arg("start")
        .write_stdin("student\n123\n")
        .output()
        .expect("binary should run");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Configuration required."));
    assert!(stdout.contains("GOOGLE_API_KEY"));
    assert!(!stdout.contains("username:"));
}

#[test]
fn start_signs_in_and_greets_student() {
    let home = tempfile::tempdir().expect("should create temp dir");
    let output = geomentor(home.path())
        .env("GOOGLE_API_KEY", "AIza-test")
        .arg("start")
        .write_stdin("student\nwrong\nstudent\n123\n/mode lab\n/quit\n")
        .output()
        .expect("binary should run");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Login failed"));
    assert!(stdout.contains("Mode A Active: Syllabus Decoder"));
    assert!(stdout.contains("(Fresher Mode)"));
    assert!(stdout.contains("not available"));
}

#[test]
fn evaluate_requires_the_answer_flags() {
    let home = tempfile::tempdir().expect("should create temp dir");
    let output = geomentor(home.path())
        .args(["evaluate", "--topic", "Monsoon"])
        .output()
        .expect("binary should run");
    assert!(!output.status.success());
}
