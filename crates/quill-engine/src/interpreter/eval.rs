//! Runtime code evaluation: `eval` and the `Function` constructor
//!
//! Both re-enter the parser with the interpreter's shared interner. A
//! direct call `eval(src)` runs in a fresh frame chained to the caller's
//! environment, so the evaluated code sees the caller's bindings, `this`
//! and `arguments`; an arrow body calling `eval` therefore sees the
//! arrow's lexical receiver. Any other route to `eval` runs the code in
//! the global scope.

use crate::interpreter::environment::{EnvRef, Environment, ScopeKind};
use crate::interpreter::error::{EvalResult, RuntimeError};
use crate::interpreter::value::Value;
use crate::interpreter::Interpreter;
use crate::parser::ast::{Expression, Program, Statement};
use crate::parser::parse_program;
use std::rc::Rc;
use tracing::trace;

impl Interpreter {
    /// Whether `value` is this realm's own `eval` function.
    pub(crate) fn is_eval_intrinsic(&self, value: &Value) -> bool {
        matches!(value, Value::Object(object) if Rc::ptr_eq(object, &self.realm.eval))
    }

    /// `eval(src)` written directly in code running in `env`.
    ///
    /// Strict callers evaluate strict code; `var` declarations stay inside
    /// the eval frame either way.
    pub(crate) fn eval_direct(&mut self, source: Option<&Value>, env: &EnvRef) -> EvalResult<Value> {
        let source = match source {
            Some(Value::String(source)) => source.clone(),
            Some(other) => return Ok(other.clone()),
            None => return Ok(Value::Undefined),
        };
        trace!(bytes = source.len(), strict = self.strict, "direct eval");

        let program = self.parse_nested(&source, self.strict)?;
        let frame = Environment::new_frame(env, ScopeKind::Eval);
        self.run_nested(&program, &frame)
    }

    /// `eval` reached any other way: global scope, global receiver.
    pub(crate) fn eval_indirect(&mut self, source: &Value) -> EvalResult<Value> {
        let Value::String(source) = source else {
            return Ok(source.clone());
        };
        trace!(bytes = source.len(), "indirect eval");

        let program = self.parse_nested(source, false)?;
        let global = self.global_env.clone();
        if program.strict {
            // Strict eval code never adds globals
            let frame = Environment::new_frame(&global, ScopeKind::Eval);
            self.run_nested(&program, &frame)
        } else {
            self.run_nested(&program, &global)
        }
    }

    /// `Function(p1, ..., pn, body)`: a sloppy function closed over the
    /// global scope. Parameters and body are stringified and spliced into
    /// a function expression.
    pub(crate) fn create_dynamic_function(&mut self, args: &[Value]) -> EvalResult<Value> {
        let (params, body) = match args.split_last() {
            Some((body, params)) => (params, self.to_string(body)?),
            None => (args, Rc::from("")),
        };
        let mut param_list = Vec::with_capacity(params.len());
        for param in params {
            param_list.push(self.to_string(param)?.to_string());
        }

        let source = format!("(function anonymous({}\n) {{\n{}\n}})", param_list.join(","), body);
        trace!(params = param_list.len(), "dynamic function");

        let program = self.parse_nested(&source, false)?;
        if !is_single_function_expression(&program) {
            return Err(RuntimeError::Syntax {
                message: "malformed Function constructor arguments".to_string(),
                span: None,
            });
        }

        let global = self.global_env.clone();
        self.run_nested(&program, &global)
    }

    fn parse_nested(&mut self, source: &str, strict: bool) -> EvalResult<Program> {
        parse_program(source, &mut self.interner, strict).map_err(|err| RuntimeError::from_nested_parse(&err))
    }

    fn run_nested(&mut self, program: &Program, env: &EnvRef) -> EvalResult<Value> {
        let saved_strict = std::mem::replace(&mut self.strict, program.strict);
        let result = self.run_program(program, env);
        self.strict = saved_strict;
        result
    }
}

/// Splicing the body into a template must not let it close the function early.
fn is_single_function_expression(program: &Program) -> bool {
    match program.statements.as_slice() {
        [Statement::Expression(stmt)] => matches!(
            &stmt.expression,
            Expression::Parenthesized(paren) if matches!(&*paren.expression, Expression::Function(_))
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::{Interpreter, InterpreterOptions};

    fn eval(source: &str) -> String {
        let mut interp = Interpreter::new(InterpreterOptions::default());
        match interp.evaluate_program(source) {
            Ok(value) => interp.render(&value),
            Err(err) => err.report(),
        }
    }

    #[test]
    fn test_direct_eval_sees_local_bindings() {
        assert_eq!(eval("var f = (a) => eval('a * 2'); f(21)"), "42");
    }

    #[test]
    fn test_indirect_eval_uses_global_scope() {
        assert_eq!(eval("var a = 'global'; var f = (a) => (0, eval)('a'); f('local')"), "global");
    }

    #[test]
    fn test_eval_declarations_do_not_leak() {
        assert_eq!(
            eval("var f = () => { eval('var inner = 1'); return typeof inner; }; f() + typeof inner"),
            "undefinedundefined"
        );
        assert_eq!(eval("var g = () => eval('var inner = 7; inner'); g()"), "7");
    }

    #[test]
    fn test_eval_non_string_is_returned() {
        assert_eq!(eval("eval(5)"), "5");
    }

    #[test]
    fn test_function_constructor() {
        assert_eq!(eval("Function('a', 'b', 'return a + b')(2, 3)"), "5");
        assert_eq!(eval("Function('return 1')"), "function anonymous(\n) {\nreturn 1\n}");
    }

    #[test]
    fn test_function_constructor_rejects_breakout() {
        let report = eval("Function('}); (function () {')");
        assert!(report.starts_with("SyntaxError"), "{}", report);
    }

    #[test]
    fn test_eval_syntax_error_is_catchable() {
        assert_eq!(
            eval("var r; try { eval('a\\n=> 1'); } catch (e) { r = e instanceof SyntaxError; } r"),
            "true"
        );
    }

    #[test]
    fn test_line_break_after_arrow_is_allowed() {
        assert_eq!(eval("eval('a =>\\n 1')"), "1");
    }
}
