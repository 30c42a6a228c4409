//! Direct and indirect eval, and the Function constructor

use super::harness::*;

// ============================================================================
// Direct Eval
// ============================================================================

#[test]
fn test_eval_returns_closure_over_caller_scope() {
    expect_value(
        "var outer = () => { var a = 2; return eval('k => a + k'); };
         outer()(40)",
        "42",
    );
}

#[test]
fn test_eval_sees_inherited_receiver() {
    expect_value(
        "var o = { v: 'o', m: function () { return (() => eval('this.v'))(); } };
         o.m()",
        "o",
    );
    expect_true("var f = () => eval('this'); f() === globalThis");
}

#[test]
fn test_eval_sees_inherited_arguments() {
    expect_value("function f() { return (() => eval('arguments[1]'))(); } f('a', 'b')", "b");
}

#[test]
fn test_eval_writes_caller_bindings() {
    expect_value("var f = () => { var x = 1; eval('x = 5'); return x; }; f()", "5");
}

#[test]
fn test_eval_declarations_stay_in_eval_frame() {
    expect_value(
        "var f = () => { eval('var hidden = 1; let alsoHidden = 2'); return typeof hidden + typeof alsoHidden; };
         f()",
        "undefinedundefined",
    );
    expect_value("eval('var top = 1'); typeof top", "undefined");
}

#[test]
fn test_eval_completion_value() {
    expect_value("eval('1; 2; 3')", "3");
    expect_value("eval('if (true) { \"yes\" } else { \"no\" }')", "yes");
    expect_value("typeof eval('')", "undefined");
}

#[test]
fn test_eval_inherits_strictness() {
    expect_error(
        "'use strict'; var f = () => eval('undeclared = 1'); f();",
        "ReferenceError",
        "undeclared is not defined",
    );
    expect_value("var f = () => { eval('implicit = 1'); return implicit; }; f()", "1");
}

#[test]
fn test_eval_parse_errors_are_syntax_errors() {
    expect_error("eval('(a, a) => a');", "SyntaxError", "");
    expect_error("eval('a\\n=> a');", "SyntaxError", "line break");
    expect_true("try { eval('((a)) => a'); false } catch (e) { e instanceof SyntaxError }");
}

#[test]
fn test_eval_strict_parameter_names() {
    expect_value("eval('var f = eval => 1; f.length')", "1");
    expect_error("'use strict'; eval('var f = arguments => 1;');", "SyntaxError", "arguments");
}

// ============================================================================
// Indirect Eval
// ============================================================================

#[test]
fn test_indirect_eval_is_global() {
    expect_value(
        "var x = 'global';
         var f = () => { var x = 'local'; var e = eval; return e('x'); };
         f()",
        "global",
    );
    expect_value("var f = () => { var x = 'local'; return (0, eval)('typeof x'); }; f()", "undefined");
}

#[test]
fn test_indirect_eval_declares_globals() {
    expect_value("var f = () => (0, eval)('var made = 3'); f(); made", "3");
}

#[test]
fn test_eval_through_call_is_indirect() {
    expect_value("var x = 'g'; var f = () => { var x = 'l'; return eval.call(null, 'x'); }; f()", "g");
}

// ============================================================================
// Function Constructor
// ============================================================================

#[test]
fn test_function_constructor_builds_global_closure() {
    expect_value("var f = Function('a', 'b', 'return a * b'); f(6, 7)", "42");
    expect_value("var f = new Function('return typeof x'); (() => { var x = 1; return f(); })()", "undefined");
}

#[test]
fn test_function_constructor_with_arrow_body() {
    expect_value("var f = Function('return (n => n + 1)'); f()(1)", "2");
}

#[test]
fn test_function_constructor_syntax_errors() {
    expect_error("Function('a', 'return (a => yield)');", "SyntaxError", "");
    expect_error("Function('}, function () {');", "SyntaxError", "");
}
