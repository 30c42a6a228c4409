//! Tree-walking interpreter
//!
//! Evaluates a parsed [`Program`] directly against a chain of
//! [`environment`] frames. Statement execution produces a [`Completion`];
//! thrown signals travel in the `Err` arm of [`EvalResult`].
//!
//! The interpreter recurses on the native stack once per nested call, so
//! hosts should run it on a thread with a large stack (see
//! [`run_with_large_stack`]). The call depth limit in
//! [`InterpreterOptions`] turns runaway recursion into a `RangeError` long
//! before a 32 MiB stack runs out.

pub mod builtins;
pub mod closure;
mod convert;
pub mod diagnostic;
pub mod environment;
pub mod error;
mod eval;
mod expr;
pub mod object;
mod stmt;
pub mod value;

pub use builtins::Realm;
pub use closure::{Closure, ClosureBody, ThisMode};
pub use diagnostic::{create_files, Diagnostic, ErrorCode, JsonDiagnostic, SourceFiles};
pub use environment::{BindingError, BindingKind, EnvRef, Environment, ScopeKind};
pub use error::{ErrorKind, EvalResult, RuntimeError};
pub use object::{Object, ObjectKind, ObjectRef, PropertyKey};
pub use value::Value;

use crate::parser::ast::Program;
use crate::parser::interner::{sym, Interner, Symbol};
use crate::parser::{parse_program, ParseError};
use std::io::Write;
use tracing::debug;

/// Stack size for interpreter threads.
pub const INTERPRETER_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Interpreter configuration.
#[derive(Debug, Clone)]
pub struct InterpreterOptions {
    /// Deepest allowed closure call nesting
    pub max_call_depth: usize,
    /// Treat the top-level script as strict-mode code
    pub strict: bool,
    /// Emit a `debug` event for every closure call
    pub trace_calls: bool,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            max_call_depth: 512,
            strict: false,
            trace_calls: false,
        }
    }
}

/// How a statement finished.
#[derive(Debug, Clone)]
pub enum Completion {
    /// Ran to the end; carries the statement's value, if it has one
    Normal(Option<Value>),
    Return(Value),
    Break(Option<Symbol>),
    Continue(Option<Symbol>),
}

impl Completion {
    pub fn is_abrupt(&self) -> bool {
        !matches!(self, Completion::Normal(_))
    }
}

type Printer = Box<dyn FnMut(&str)>;

/// Interpreter state: intrinsics, the global scope, and the shared interner.
pub struct Interpreter {
    pub(crate) interner: Interner,
    pub(crate) options: InterpreterOptions,
    pub(crate) realm: Realm,
    pub(crate) global_env: EnvRef,
    /// Strictness of the code currently running
    pub(crate) strict: bool,
    pub(crate) call_depth: usize,
    printer: Printer,
}

impl Interpreter {
    pub fn new(options: InterpreterOptions) -> Self {
        let mut interner = Interner::new();
        let realm = builtins::create_realm(&mut interner);
        let global_env = Environment::new_global(realm.global_object.clone());

        Self {
            interner,
            strict: options.strict,
            options,
            realm,
            global_env,
            call_depth: 0,
            printer: Box::new(|line| {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                let _ = writeln!(handle, "{}", line);
            }),
        }
    }

    /// Send `print(...)` output somewhere other than stdout.
    pub fn with_printer(mut self, printer: impl FnMut(&str) + 'static) -> Self {
        self.printer = Box::new(printer);
        self
    }

    pub fn options(&self) -> &InterpreterOptions {
        &self.options
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn global_object(&self) -> &ObjectRef {
        &self.realm.global_object
    }

    /// Parse and run a script in the global scope.
    ///
    /// The result is the value of the last value-producing statement.
    pub fn evaluate_program(&mut self, source: &str) -> EvalResult<Value> {
        let program = parse_program(source, &mut self.interner, self.options.strict)
            .map_err(|err| RuntimeError::from_script_parse(&err))?;

        debug!(statements = program.len(), strict = program.strict, "evaluating program");

        let env = self.global_env.clone();
        let saved_strict = std::mem::replace(&mut self.strict, program.strict);
        let result = self.run_program(&program, &env);
        self.strict = saved_strict;
        result
    }

    /// Parse without running, for syntax checks.
    pub fn check_syntax(&mut self, source: &str) -> Result<(), ParseError> {
        parse_program(source, &mut self.interner, self.options.strict).map(|_| ())
    }

    /// Run a parsed program whose declarations belong to `env`.
    pub(crate) fn run_program(&mut self, program: &Program, env: &EnvRef) -> EvalResult<Value> {
        self.instantiate_var_scope(&program.statements, env)?;
        self.instantiate_block(&program.statements, env)?;
        match self.exec_statements(&program.statements, env)? {
            Completion::Normal(value) => Ok(value.unwrap_or(Value::Undefined)),
            Completion::Return(value) => Ok(value),
            Completion::Break(_) | Completion::Continue(_) => Ok(Value::Undefined),
        }
    }

    /// Turn an environment failure into the error a script sees.
    pub(crate) fn binding_error(&self, err: BindingError) -> RuntimeError {
        let name = |symbol: Symbol| self.interner.resolve(symbol).to_string();
        match err {
            BindingError::Unresolved(symbol) => RuntimeError::UnresolvedReference { name: name(symbol) },
            BindingError::Uninitialized(symbol) => RuntimeError::Uninitialized { name: name(symbol) },
            BindingError::Immutable(symbol) => RuntimeError::ImmutableBinding { name: name(symbol) },
            BindingError::Duplicate(symbol) => RuntimeError::DuplicateDeclaration { name: name(symbol) },
            BindingError::ReadOnly(symbol) => {
                RuntimeError::type_error(format!("cannot assign to read-only property '{}'", name(symbol)))
            }
        }
    }

    /// Raise `value` as a script exception.
    pub(crate) fn throw(&self, value: Value) -> RuntimeError {
        let kind = match &value {
            Value::Object(obj) => match obj.borrow().kind {
                ObjectKind::Error(kind) => kind,
                _ => ErrorKind::Thrown,
            },
            _ => ErrorKind::Thrown,
        };
        RuntimeError::Thrown {
            rendered: self.render(&value),
            value,
            kind,
        }
    }

    /// The value a `catch` clause sees for an error.
    pub(crate) fn error_value(&mut self, err: RuntimeError) -> Value {
        match err {
            RuntimeError::Thrown { value, .. } => value,
            other => Value::Object(self.new_error(other.kind(), &other.to_string())),
        }
    }

    /// Allocate an error object of the given kind.
    pub(crate) fn new_error(&mut self, kind: ErrorKind, message: &str) -> ObjectRef {
        let prototype = self.realm.error_prototype(kind);
        let error = Object::new_ref(ObjectKind::Error(kind), Some(prototype));
        error.borrow_mut().define(
            PropertyKey::Name(sym::MESSAGE),
            Value::string(message),
            object::Attributes::HIDDEN,
        );
        error
    }

    pub(crate) fn print(&mut self, line: &str) {
        (self.printer)(line);
    }
}

/// Evaluate a script with default options and a fresh global scope.
pub fn evaluate_program(source: &str) -> EvalResult<Value> {
    Interpreter::new(InterpreterOptions::default()).evaluate_program(source)
}

/// Run `f` on a thread with an [`INTERPRETER_STACK_SIZE`] stack.
///
/// Values are not `Send`, so build the interpreter inside `f` and return
/// only owned results. A panic in `f` resumes on the calling thread.
pub fn run_with_large_stack<T, F>(f: F) -> std::io::Result<T>
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    std::thread::scope(|scope| {
        let handle = std::thread::Builder::new()
            .name("quill-eval".to_string())
            .stack_size(INTERPRETER_STACK_SIZE)
            .spawn_scoped(scope, f)?;
        match handle.join() {
            Ok(result) => Ok(result),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(source: &str) -> EvalResult<String> {
        let mut interp = Interpreter::new(InterpreterOptions::default());
        interp.evaluate_program(source).map(|value| interp.render(&value))
    }

    fn run(source: &'static str) -> EvalResult<String> {
        run_with_large_stack(move || eval(source).map_err(|err| err.report()))
            .expect("spawn interpreter thread")
            .map_err(|report| RuntimeError::error(report))
    }

    #[test]
    fn test_program_value_is_last_expression() {
        assert_eq!(run("var a = 1; a + 1;").unwrap(), "2");
        assert_eq!(run("var a = 1;").unwrap(), "undefined");
    }

    #[test]
    fn test_syntax_error_keeps_span() {
        let err = eval("var = 1;").unwrap_err();
        assert!(matches!(err, RuntimeError::Syntax { span: Some(_), .. }));
    }

    #[test]
    fn test_call_depth_limit() {
        let err = run("function f() { return f(); } f();").unwrap_err();
        assert!(err.to_string().contains("RangeError"));
    }

    #[test]
    fn test_printer_capture() {
        let lines = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = lines.clone();
        let mut interp = Interpreter::new(InterpreterOptions::default())
            .with_printer(move |line| sink.borrow_mut().push(line.to_string()));

        interp.evaluate_program("print('a', 1, [2, 3]);").unwrap();
        assert_eq!(*lines.borrow(), vec!["a 1 2,3".to_string()]);
    }
}
