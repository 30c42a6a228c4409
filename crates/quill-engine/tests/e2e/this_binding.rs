//! `this` and `arguments` inheritance tests

use super::harness::*;

// ============================================================================
// Lexical `this`
// ============================================================================

#[test]
fn test_top_level_this_is_global_object() {
    expect_true("var f = () => this; f() === globalThis");
    expect_true("var f = () => () => this; f()() === this");
}

#[test]
fn test_this_from_enclosing_method() {
    expect_value(
        "var obj = {
             name: 'obj',
             later: function () { return () => this.name; }
         };
         obj.later()()",
        "obj",
    );
}

#[test]
fn test_method_call_does_not_rebind() {
    expect_true("var o = { f: () => this }; o.f() === globalThis");
    expect_value(
        "var outer = { v: 1, make: function () { return { v: 2, get: () => this.v }; } };
         outer.make().get()",
        "1",
    );
}

#[test]
fn test_constructor_captures_instance() {
    expect_value(
        "function Counter() { this.n = 0; this.inc = () => ++this.n; }
         var c = new Counter();
         var inc = c.inc;
         inc(); inc();
         c.n",
        "2",
    );
}

#[test]
fn test_call_apply_bind_discard_receiver() {
    expect_true(
        "var self = this;
         var f = () => this;
         var other = {};
         f.call(other) === self && f.apply(other, []) === self && f.bind(other)() === self",
    );
    // Arguments still flow through
    expect_value("var f = (a, b) => a + b; f.call({}, 1, 2) + f.apply(null, [3, 4])", "10");
    expect_value("var f = (a, b) => a + b; f.bind(null, 10)(5)", "15");
}

#[test]
fn test_strict_function_receiver_is_inherited() {
    expect_true(
        "'use strict';
         function f() { return (() => this)(); }
         f() === undefined",
    );
    expect_true(
        "function g() { return (() => this)(); }
         g() === globalThis",
    );
}

#[test]
fn test_nested_arrows_share_receiver() {
    expect_true(
        "var o = {
             m: function () { var self = this; return (() => (() => this === self)())(); }
         };
         o.m()",
    );
}

#[test]
fn test_this_in_callback() {
    expect_value(
        "var o = {
             factor: 3,
             scale: function (xs) { return xs.map(x => x * this.factor); }
         };
         o.scale([1, 2])",
        "3,6",
    );
}

// ============================================================================
// Inherited `arguments`
// ============================================================================

#[test]
fn test_arguments_from_enclosing_function() {
    expect_value("function f() { return (() => arguments[0])(); } f('a')", "a");
    expect_value("function f() { return (() => arguments.length)(1, 2, 3); } f(1)", "1");
}

#[test]
fn test_arguments_at_top_level() {
    expect_value("(() => typeof arguments)()", "undefined");
    expect_value("var arguments = 'outer'; (() => arguments)()", "outer");
}

#[test]
fn test_arguments_local_variable_in_enclosing_scope() {
    expect_value(
        "function f() { var arguments = 'local'; return (() => arguments)(); }
         f(1, 2)",
        "local",
    );
}

#[test]
fn test_arguments_callee_is_enclosing_function() {
    expect_true("function f() { return (() => arguments.callee)(); } f() === f");
}

#[test]
fn test_arrow_reads_arguments_after_mutation() {
    expect_value(
        "function f(a) { var g = () => arguments[0]; arguments[0] = 'changed'; return g(); }
         f('orig')",
        "changed",
    );
}
