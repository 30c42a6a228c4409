//! Error kinds, host assertions, and uncaught signals

use super::harness::*;

// ============================================================================
// Host Assertions
// ============================================================================

#[test]
fn test_assert_equals_passes_and_fails() {
    expect_ok("assertEquals((a => a + 1)(1), 2); assertEquals(NaN, 0 / 0);");
    expect_error("assertEquals(1, 2);", "Error", "assertEquals: expected 2, got 1");
    expect_error("assertEquals('1', 1);", "Error", "expected 1, got \"1\"");
}

#[test]
fn test_assert_equals_compares_references() {
    expect_ok("var o = {}; var f = () => o; assertEquals(f(), o);");
    expect_error("assertEquals({}, {});", "Error", "assertEquals");
}

#[test]
fn test_assert_throws_matches_kind() {
    expect_ok("assertThrows(() => { new (() => 1)(); }, TypeError);");
    expect_ok("assertThrows(() => missing, ReferenceError);");
    expect_ok("assertThrows(() => eval('a => yield'), SyntaxError);");
    expect_ok("assertThrows(() => { throw new RangeError('r'); }, RangeError);");
}

#[test]
fn test_assert_throws_reports_mismatch() {
    expect_error("assertThrows(() => 1, TypeError);", "Error", "nothing was thrown");
    expect_error(
        "assertThrows(() => missing, TypeError);",
        "Error",
        "expected TypeError, got ReferenceError: missing is not defined",
    );
}

// ============================================================================
// Runtime Errors
// ============================================================================

#[test]
fn test_unresolved_reference() {
    expect_error("var f = () => nowhere; f();", "ReferenceError", "nowhere is not defined");
}

#[test]
fn test_temporal_dead_zone() {
    expect_error("var f = () => x; f(); let x = 1;", "ReferenceError", "before initialization");
    expect_value("var f = () => x; let x = 1; f()", "1");
}

#[test]
fn test_lexical_redeclaration() {
    expect_syntax_error("let a = 1; let a = 2;");
}

#[test]
fn test_calling_non_function() {
    expect_error("var o = {}; o.missing();", "TypeError", "o.missing is not a function");
    expect_error("var n = 1; n();", "TypeError", "is not a function");
}

#[test]
fn test_property_of_undefined() {
    expect_error("var f = () => undefined; f().x;", "TypeError", "");
}

#[test]
fn test_runaway_recursion_is_range_error() {
    expect_error("var f = () => f(); f();", "RangeError", "Maximum call stack size exceeded");
    expect_ok("var f = () => f(); assertThrows(f, RangeError);");
}

// ============================================================================
// throw / catch
// ============================================================================

#[test]
fn test_uncaught_primitive() {
    expect_error("var f = () => { throw 'FAIL'; }; f();", "uncaught exception", "FAIL");
}

#[test]
fn test_uncaught_error_object() {
    expect_error("throw new TypeError('bad thing');", "TypeError", "bad thing");
}

#[test]
fn test_caught_core_error_is_an_error_object() {
    expect_value(
        "var e; try { null.x; } catch (err) { e = err; }
         (e instanceof TypeError) + ':' + e.name",
        "true:TypeError",
    );
    expect_value("try { nope; } catch (e) { e.message }", "nope is not defined");
}

#[test]
fn test_finally_runs_and_overrides() {
    expect_value(
        "var log = [];
         var f = () => { try { return 'try'; } finally { log.push('finally'); } };
         f() + ':' + log.join()",
        "try:finally",
    );
    expect_value("var f = () => { try { return 1; } finally { return 2; } }; f()", "2");
}

#[test]
fn test_error_to_string() {
    expect_value("String(new Error('plain'))", "Error: plain");
    expect_value("new SyntaxError('x').toString()", "SyntaxError: x");
    expect_value("String(new RangeError())", "RangeError");
}

#[test]
fn test_syntax_error_stops_whole_script() {
    // Nothing runs when any part of the script is malformed
    expect_syntax_error("print('ran'); var f = a + b => a;");
    expect_syntax_error("var f = 1 || a => a;");
    expect_syntax_error("for (;;) a => { break; };");
}
