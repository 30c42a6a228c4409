//! Test harness for end-to-end evaluation
//!
//! Each script runs on its own large-stack thread with a fresh
//! interpreter; only the rendered outcome crosses back.

use quill_engine::{run_with_large_stack, Interpreter, InterpreterOptions};

/// Outcome of a script run: the rendered result, or the error report
pub type E2EResult = Result<String, String>;

/// Evaluate a script with the given options
pub fn run_with(source: &str, options: InterpreterOptions) -> E2EResult {
    run_with_large_stack(|| {
        let mut interp = Interpreter::new(options).with_printer(|_| {});
        match interp.evaluate_program(source) {
            Ok(value) => Ok(interp.render(&value)),
            Err(err) => Err(err.report()),
        }
    })
    .expect("failed to spawn interpreter thread")
}

/// Evaluate a sloppy-mode script
pub fn run(source: &str) -> E2EResult {
    run_with(source, InterpreterOptions::default())
}

/// Evaluate a script as strict-mode code
pub fn run_strict(source: &str) -> E2EResult {
    run_with(
        source,
        InterpreterOptions {
            strict: true,
            ..InterpreterOptions::default()
        },
    )
}

/// Expect the script's completion value to render as `expected`
pub fn expect_value(source: &str, expected: &str) {
    match run(source) {
        Ok(actual) => assert_eq!(actual, expected, "Wrong result for:\n{}", source),
        Err(report) => panic!("Evaluation failed: {}\nSource:\n{}", report, source),
    }
}

/// Expect the script to evaluate to `true`
pub fn expect_true(source: &str) {
    expect_value(source, "true");
}

/// Expect the script to run to completion (its assertions all passing)
pub fn expect_ok(source: &str) {
    if let Err(report) = run(source) {
        panic!("Evaluation failed: {}\nSource:\n{}", report, source);
    }
}

/// Expect the script to fail with a report starting with `kind`
/// (e.g. "TypeError") and containing `pattern`
pub fn expect_error(source: &str, kind: &str, pattern: &str) {
    match run(source) {
        Ok(value) => panic!("Expected {} but got {}\nSource:\n{}", kind, value, source),
        Err(report) => {
            assert!(
                report.starts_with(kind),
                "Expected {}, got '{}'\nSource:\n{}",
                kind,
                report,
                source
            );
            assert!(
                report.contains(pattern),
                "Expected error containing '{}', got '{}'\nSource:\n{}",
                pattern,
                report,
                source
            );
        }
    }
}

/// Expect the script to be rejected before running
pub fn expect_syntax_error(source: &str) {
    expect_error(source, "SyntaxError", "");
}
