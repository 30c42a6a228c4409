//! Runs the whole-program conformance scripts under `tests/fixtures/`

use quill_engine::{run_with_large_stack, Interpreter, InterpreterOptions};

fn run_fixture(source: &str) -> Result<String, String> {
    run_with_large_stack(|| {
        let mut interp = Interpreter::new(InterpreterOptions::default()).with_printer(|_| {});
        interp
            .evaluate_program(source)
            .map(|value| interp.render(&value))
            .map_err(|err| err.report())
    })
    .expect("failed to spawn interpreter thread")
}

#[test]
fn test_arrow_functions_fixture() {
    let source = include_str!("fixtures/arrow_functions.js");
    match run_fixture(source) {
        Ok(result) => assert_eq!(result, "success"),
        Err(report) => panic!("arrow_functions.js failed: {}", report),
    }
}

/// The complete regression script, covering Church numerals, `this` inside
/// eval in a constructor, and near-miss heads rejected through `Function`.
#[test]
fn test_arrow_functions_full_fixture() {
    let source = include_str!("fixtures/arrow_functions_full.js");
    match run_fixture(source) {
        Ok(result) => assert_eq!(result, "success"),
        Err(report) => panic!("arrow_functions_full.js failed: {}", report),
    }
}

#[test]
fn test_fixture_fails_loudly() {
    let report = run_fixture("assertEquals((() => 1)(), 2); 'success';").unwrap_err();
    assert!(report.contains("assertEquals: expected 2, got 1"), "{}", report);
}
