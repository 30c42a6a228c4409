//! Statement semantics inside and around arrow bodies

use super::harness::*;

// ============================================================================
// Declarations and Hoisting
// ============================================================================

#[test]
fn test_var_hoists_to_arrow_frame() {
    expect_value(
        "var f = () => { if (true) { var inner = 'hoisted'; } return inner; };
         f() + typeof inner",
        "hoistedundefined",
    );
}

#[test]
fn test_function_declaration_hoists() {
    expect_value("var f = () => { return g(); function g() { return 'g'; } }; f()", "g");
}

#[test]
fn test_let_is_block_scoped() {
    expect_value(
        "var f = () => { let x = 'outer'; { let x = 'inner'; } return x; };
         f()",
        "outer",
    );
}

#[test]
fn test_block_function_sees_block_bindings() {
    expect_value(
        "var r; { let hidden = 4; function peek() { return hidden; } r = peek(); } r",
        "4",
    );
}

// ============================================================================
// Loops and Labels
// ============================================================================

#[test]
fn test_loops_inside_arrow() {
    expect_value(
        "var sum = n => { var total = 0; for (var i = 1; i <= n; i++) total += i; return total; };
         sum(100)",
        "5050",
    );
    expect_value("var f = () => { var i = 0; do { i++; } while (i < 5); return i; }; f()", "5");
    expect_value("var f = () => { var i = 0; while (true) { if (++i > 3) break; } return i; }; f()", "4");
}

#[test]
fn test_labeled_continue() {
    expect_value(
        "var f = () => {
             var hits = 0;
             outer: for (var i = 0; i < 3; i++) {
                 for (var j = 0; j < 3; j++) {
                     if (j == 1) continue outer;
                     hits++;
                 }
             }
             return hits;
         };
         f()",
        "3",
    );
}

#[test]
fn test_return_from_inside_loop_exits_only_the_arrow() {
    expect_value(
        "var find = (xs, x) => { for (var i = 0; i < xs.length; i++) { if (xs[i] === x) return i; } return -1; };
         var r = []; for (var k = 0; k < 2; k++) { r.push(find([5, 6, 7], 7)); }
         r.join()",
        "2,2",
    );
}

#[test]
fn test_for_in_over_object_keys() {
    expect_value(
        "var o = { a: 1, b: 2, c: 3 };
         var keys = () => { var out = []; for (var k in o) out.push(k); return out.join(''); };
         keys()",
        "abc",
    );
    expect_value(
        "var fs = []; for (let k in { x: 1, y: 2 }) fs.push(() => k); fs.map(f => f()).join('')",
        "xy",
    );
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_typeof_and_delete() {
    expect_value("typeof undeclaredName", "undefined");
    expect_value("var o = { a: 1 }; delete o.a; typeof o.a", "undefined");
}

#[test]
fn test_comparison_and_equality() {
    expect_true("null == undefined && null !== undefined");
    expect_true("'10' == 10 && '10' !== 10");
    expect_true("'a' < 'b' && 2 < 10 && '2' > '10'");
}

#[test]
fn test_string_concatenation() {
    expect_value("var greet = name => 'hello, ' + name; greet('quill')", "hello, quill");
    expect_value("'' + 1 / 3", "0.3333333333333333");
    expect_value("'' + 1e21 + ' ' + 0.000001", "1e+21 0.000001");
}

#[test]
fn test_math_atan2_through_arrow() {
    expect_value("var angle = (y, x) => Math.atan2(y, x); angle(0, 1)", "0");
}

#[test]
fn test_in_and_instanceof() {
    expect_true("'a' in { a: 1 } && !('b' in { a: 1 })");
    expect_true("function P() {} var p = new P(); p instanceof P && p instanceof Object");
    expect_error("var f = () => 1; ({}) instanceof f;", "TypeError", "");
}
