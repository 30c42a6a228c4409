//! Quill Engine
//!
//! A small interpreter core for a JavaScript subset centred on arrow
//! functions: lexing and parsing (including the parenthesized-parameter
//! disambiguation), lexical environments, closure values, a tree-walking
//! evaluator and a direct-eval adapter.
//!
//! ```ignore
//! use quill_engine::{Interpreter, InterpreterOptions};
//!
//! let mut interp = Interpreter::new(InterpreterOptions::default());
//! let value = interp.evaluate_program("var add = (a, b) => a + b; add(2, 3)")?;
//! assert_eq!(interp.render(&value), "5");
//! ```

pub mod interpreter;
pub mod parser;

pub use interpreter::{
    create_files, evaluate_program, run_with_large_stack, Completion, Diagnostic, ErrorKind, EvalResult,
    Interpreter, InterpreterOptions, RuntimeError, SourceFiles, Value, INTERPRETER_STACK_SIZE,
};
pub use parser::{parse_program, Interner, ParseError, Span};
