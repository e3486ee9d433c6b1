// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Runs the `escalier` binary against temporary projects.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn escalier(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_escalier"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("ESCALIER_PARSE_TIMEOUT_MS")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run escalier")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn check_clean_project_succeeds() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::write(temp.path().join("src/main.esc"), "val x = 1\nfn f(a) { return a }\n").unwrap();

    let output = escalier(&["check"], temp.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn check_reports_diagnostics_and_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.esc"), "foo(a,").unwrap();

    let output = escalier(&["check", "bad.esc"], temp.path());
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Expected ')' but got end of file"), "stderr: {err}");
    assert!(err.contains("1 diagnostic found in 1 file(s)"), "stderr: {err}");
}

#[test]
fn module_mode_from_manifest_and_flag() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("main.esc"), "val a = 1\nprint(a)\n").unwrap();

    let output = escalier(&["check"], temp.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    fs::write(temp.path().join("escalier.toml"), "[parser]\nmode = \"module\"\n").unwrap();
    let output = escalier(&["check"], temp.path());
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Expected a declaration at module top level"));

    let output = escalier(&["check", "--script"], temp.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn lib_files_are_checked_too() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::create_dir_all(temp.path().join("lib")).unwrap();
    fs::write(temp.path().join("src/main.esc"), "val a = 1\n").unwrap();
    fs::write(temp.path().join("lib/core.d.esc"), "declare val b: \n").unwrap();
    fs::write(
        temp.path().join("escalier.toml"),
        "[parser]\nlib = [\"lib/core.d.esc\"]\n",
    )
    .unwrap();

    let output = escalier(&["check"], temp.path());
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("core.d.esc"), "stderr: {err}");
    assert!(err.contains("in 2 file(s)"), "stderr: {err}");
}

#[test]
fn parse_prints_the_tree() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("main.esc"), "val answer = 42\n").unwrap();

    let output = escalier(&["parse", "main.esc"], temp.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Script"));
    assert!(out.contains("\"answer\""));
}

#[test]
fn parse_type_annotation_text() {
    let temp = TempDir::new().unwrap();
    let output = escalier(&["parse", "--type-ann", "A | B | C"], temp.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Union"));

    let output = escalier(&["parse", "--type-ann", "A |"], temp.path());
    assert!(!output.status.success());
    assert!(stderr(&output).contains("<type-ann>"));
}

#[test]
fn malformed_timeout_environment_is_an_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("main.esc"), "val a = 1\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_escalier"))
        .args(["check"])
        .current_dir(temp.path())
        .env("ESCALIER_PARSE_TIMEOUT_MS", "soon")
        .output()
        .expect("failed to run escalier");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("ESCALIER_PARSE_TIMEOUT_MS"));
}

#[test]
fn missing_path_is_an_error() {
    let temp = TempDir::new().unwrap();
    let output = escalier(&["check", "nowhere"], temp.path());
    assert!(!output.status.success());
    assert!(stderr(&output).contains("does not exist"));
}
