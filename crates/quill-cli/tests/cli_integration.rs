//! Integration tests for the `quill` binary.
//!
//! Drives the built executable the way a user would and checks exit
//! codes and output.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

fn quill(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quill"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch quill")
}

fn script(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".js").tempfile().expect("temp file");
    file.write_all(source.as_bytes()).expect("write script");
    file
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ────────────────────────────────────────────────────────────────────────────
// run
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_run_prints_output() {
    let file = script("var greet = name => 'hello ' + name;\nprint(greet('quill'));\n");
    let output = quill(&["run", path_arg(file.path())]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "hello quill\n");
}

#[test]
fn test_run_uncaught_error_exits_1() {
    let file = script("var f = () => missing;\nf();\n");
    let output = quill(&["run", path_arg(file.path())]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("ReferenceError: missing is not defined"));
}

#[test]
fn test_run_syntax_error_exits_2_with_location() {
    let file = script("var ok = 1;\nvar f = ((a)) => a;\n");
    let output = quill(&["run", path_arg(file.path())]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("SyntaxError"), "{}", err);
    assert!(err.contains(":2:"), "expected a line 2 label in:\n{}", err);
}

#[test]
fn test_run_missing_file() {
    let output = quill(&["run", "definitely/not/here.js"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("failed to read"));
}

#[test]
fn test_max_call_depth_flag() {
    let file = script("var depth = n => n === 0 ? 0 : 1 + depth(n - 1);\nprint(depth(100));\n");
    let output = quill(&["run", "--max-call-depth", "50", path_arg(file.path())]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("RangeError"));

    let output = quill(&["run", "--max-call-depth", "500", path_arg(file.path())]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "100\n");
}

// ────────────────────────────────────────────────────────────────────────────
// eval
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_eval_prints_completion_value() {
    let output = quill(&["eval", "(a => b => a + b)(2)(3)"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "5\n");
}

#[test]
fn test_eval_no_print() {
    let output = quill(&["eval", "--no-print", "1 + 1"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_strict_flag() {
    let output = quill(&["eval", "var f = () => { leaked = 1; }; f(); leaked"]);
    assert_eq!(stdout(&output), "1\n");

    let output = quill(&["eval", "--strict", "var f = () => { leaked = 1; }; f(); leaked"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("leaked is not defined"));
}

#[test]
fn test_json_format() {
    let output = quill(&["eval", "--format", "json", "var f = (a, a) => a;"]);
    assert_eq!(output.status.code(), Some(2));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON diagnostic");
    assert_eq!(report["severity"], "error");
    assert!(report["message"].as_str().unwrap().starts_with("SyntaxError"));
    assert_eq!(report["labels"][0]["start_line"], 1);
}

// ────────────────────────────────────────────────────────────────────────────
// check
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_check_accepts_valid_files() {
    let file = script("var f = (a, b) => { return a + b; };\n");
    let output = quill(&["check", path_arg(file.path())]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("ok "));
}

#[test]
fn test_check_does_not_run_code() {
    let file = script("print('side effect');\nthrow 'never';\n");
    let output = quill(&["check", path_arg(file.path())]);
    assert!(output.status.success());
    assert!(!stdout(&output).contains("side effect"));
}

#[test]
fn test_check_reports_every_bad_file() {
    let good = script("var ok = x => x;\n");
    let bad = script("var f = a\n=> a;\n");
    let output = quill(&["check", path_arg(good.path()), path_arg(bad.path())]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("ok "));
    assert!(stderr(&output).contains("line break before '=>'"));
}
