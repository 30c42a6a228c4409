//! Arrow closure tests
//!
//! Parameters, bodies, capture, and the function-object surface of
//! lexical closures.

use super::harness::*;

// ============================================================================
// Parameters and Bodies
// ============================================================================

#[test]
fn test_expression_body_returns_value() {
    expect_value("var double = x => x * 2; double(21)", "42");
    expect_value("(a => a + 1)(0)", "1");
}

#[test]
fn test_block_body_needs_return() {
    expect_value("(a => { a + 1; })(0)", "undefined");
    expect_value("(a => { return a + 1; })(0)", "1");
}

#[test]
fn test_empty_block_body() {
    expect_value("var f = () => {}; typeof f()", "undefined");
}

#[test]
fn test_labeled_statement_body_is_not_an_object() {
    expect_value("var f = () => { a: 1 }; f()", "undefined");
}

#[test]
fn test_parenthesized_object_body() {
    expect_value("var f = () => ({ a: 1, b: 2 }); f().a + f().b", "3");
}

#[test]
fn test_missing_and_extra_arguments() {
    expect_value("var f = (a, b) => typeof b; f(1)", "undefined");
    expect_value("var f = (a, b) => a + b; f(1, 2, 3, 4)", "3");
}

#[test]
fn test_length_counts_declared_parameters() {
    expect_value("(() => 0).length", "0");
    expect_value("(a => a).length", "1");
    expect_value("var f = (a, b, c) => a; f(1); f.length", "3");
    expect_true("var f = (a, b) => a; f.hasOwnProperty('length')");
}

#[test]
fn test_length_is_read_only() {
    expect_value("var f = (a, b) => a; f.length = 10; f.length", "2");
    expect_error("'use strict'; var f = (a, b) => a; f.length = 10;", "TypeError", "read-only");
}

#[test]
fn test_logical_or_belongs_to_body() {
    expect_value("var f = a => a || 'x'; f(0) + f('y')", "xy");
}

#[test]
fn test_conditional_body() {
    expect_value("var sign = n => n < 0 ? -1 : n > 0 ? 1 : 0; '' + sign(-5) + sign(0) + sign(3)", "-101");
}

// ============================================================================
// Disambiguation and Associativity
// ============================================================================

#[test]
fn test_sequence_with_trailing_arrow() {
    expect_value("var f; var g = (f, h => h + 1); g.length", "1");
    expect_value("var f; var g = (f, h => h + 1); g(37)", "38");
}

#[test]
fn test_arrow_then_comma_evaluates_last() {
    expect_value("(a => a, 13)", "13");
}

#[test]
fn test_curried_arrows() {
    expect_value("(a => b => a)('A')('B')", "A");
    expect_value("var add = a => b => c => a + b + c; add(1)(2)(3)", "6");
}

#[test]
fn test_arrow_as_argument() {
    expect_value("[1, 2, 3].map(x => x * 2)", "2,4,6");
    expect_value("[1, 2, 3, 4].reduce((sum, x) => sum + x, 0)", "10");
}

// ============================================================================
// Capture
// ============================================================================

#[test]
fn test_mutation_after_capture_is_visible() {
    expect_value("var a = 1; var f = () => a; a = 2; f()", "2");
}

#[test]
fn test_closure_writes_captured_binding() {
    expect_value(
        "var count = 0;
         var bump = () => { count += 1; };
         bump(); bump(); bump();
         count",
        "3",
    );
}

#[test]
fn test_counter_factory() {
    expect_value(
        "var make = () => { var n = 0; return () => ++n; };
         var a = make(); var b = make();
         a(); a();
         '' + a() + b()",
        "31",
    );
}

#[test]
fn test_each_call_gets_its_own_frame() {
    expect_value(
        "var fact = n => n <= 1 ? 1 : n * fact(n - 1);
         fact(10)",
        "3628800",
    );
}

#[test]
fn test_let_in_loop_is_captured_per_iteration() {
    expect_value(
        "var fs = [];
         for (let i = 0; i < 3; i++) { fs.push(() => i); }
         fs.map(f => f()).join('')",
        "012",
    );
    expect_value(
        "var fs = [];
         for (var i = 0; i < 3; i++) { fs.push(() => i); }
         fs.map(f => f()).join('')",
        "333",
    );
}

#[test]
fn test_const_capture_is_immutable() {
    expect_error(
        "const k = 1; var f = () => { k = 2; }; f();",
        "TypeError",
        "constant",
    );
}

#[test]
fn test_parameter_shadows_outer_binding() {
    expect_value("var x = 'outer'; var f = x => x; f('inner') + x", "innerouter");
}

// ============================================================================
// Function Object Surface
// ============================================================================

#[test]
fn test_typeof_and_prototype_chain() {
    expect_value("typeof (() => 1)", "function");
    expect_true("Object.getPrototypeOf(() => 1) === Function.prototype");
}

#[test]
fn test_arrow_has_no_prototype_property() {
    expect_true("var f = () => 1; f.prototype === undefined && !f.hasOwnProperty('prototype')");
    expect_true("function g() {} g.hasOwnProperty('prototype')");
}

#[test]
fn test_new_on_arrow_is_type_error() {
    expect_error("var f = () => 1; new f();", "TypeError", "not a constructor");
    expect_error("var f = (a, b) => a; new f(1, 2);", "TypeError", "not a constructor");
    expect_error("new (() => {});", "TypeError", "not a constructor");
}

#[test]
fn test_to_string_is_exact_source() {
    expect_value("var f = (a,  b)=>a+b; f.toString()", "(a,  b)=>a+b");
    expect_value("var f = x => { return x; }; '' + f", "x => { return x; }");
}

#[test]
fn test_name_is_inferred_from_binding() {
    expect_value("var f = () => 1; f.name", "f");
    expect_value("var o = { m: x => x }; o.m.name", "m");
    expect_value("(() => 1).name", "");
}

#[test]
fn test_with_statement_in_sloppy_arrow() {
    expect_value("var f = o => { with (o) { return x + y; } }; f({ x: 1, y: 2 })", "3");
    expect_syntax_error("var f = o => { 'use strict'; with (o) { return x; } };");
}

#[test]
fn test_arrows_are_not_implicitly_strict() {
    // Sloppy assignment to an undeclared name creates a global
    expect_value("var f = () => { leaked = 5; }; f(); leaked", "5");
    expect_error(
        "var f = () => { 'use strict'; leaked = 5; }; f();",
        "ReferenceError",
        "leaked is not defined",
    );
}
