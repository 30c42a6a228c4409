//! Runtime error types.

use crate::interpreter::value::Value;
use crate::parser::{ParseError, Span};
use std::fmt;

/// Result type for everything the evaluator does.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The script-visible category of an error.
///
/// `assertThrows` compares these, and error objects created for caught
/// runtime errors carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Error,
    SyntaxError,
    ReferenceError,
    TypeError,
    RangeError,
    /// A thrown value that is not an error object (`throw "FAIL"`)
    Thrown,
}

impl ErrorKind {
    /// Kinds that have a constructor on the global object.
    pub const CONSTRUCTIBLE: [ErrorKind; 5] = [
        ErrorKind::Error,
        ErrorKind::SyntaxError,
        ErrorKind::ReferenceError,
        ErrorKind::TypeError,
        ErrorKind::RangeError,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::Thrown => "uncaught exception",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while evaluating a program.
///
/// Messages carry no kind prefix; render with [`RuntimeError::report`] for
/// the `Kind: message` form.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Source text rejected by the parser (script, eval, or `Function(...)`)
    #[error("{message}")]
    Syntax {
        message: String,
        /// Only set for the top-level script, whose text diagnostics can show
        span: Option<Span>,
    },

    /// Identifier not bound anywhere in the scope chain
    #[error("{name} is not defined")]
    UnresolvedReference { name: String },

    /// `let`/`const` binding read before its declaration ran
    #[error("cannot access '{name}' before initialization")]
    Uninitialized { name: String },

    /// Operation applied to a value of the wrong type
    #[error("{message}")]
    Type { message: String },

    /// `new` applied to something that is not a constructor
    #[error("{callee} is not a constructor")]
    NotConstructible { callee: String },

    /// Assignment to a `const` binding
    #[error("assignment to constant variable '{name}'")]
    ImmutableBinding { name: String },

    /// Lexical redeclaration in the same scope
    #[error("redeclaration of '{name}'")]
    DuplicateDeclaration { name: String },

    /// Resource limit exceeded
    #[error("{message}")]
    Range { message: String },

    /// Host assertion failure and other plain errors
    #[error("{message}")]
    Error { message: String },

    /// A value raised by `throw` (or an error object rethrown after a catch)
    #[error("{rendered}")]
    Thrown {
        value: Value,
        /// Rendering captured at throw time, for reports
        rendered: String,
        kind: ErrorKind,
    },
}

impl RuntimeError {
    /// The script-visible category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::Syntax { .. } | RuntimeError::DuplicateDeclaration { .. } => ErrorKind::SyntaxError,
            RuntimeError::UnresolvedReference { .. } | RuntimeError::Uninitialized { .. } => {
                ErrorKind::ReferenceError
            }
            RuntimeError::Type { .. }
            | RuntimeError::NotConstructible { .. }
            | RuntimeError::ImmutableBinding { .. } => ErrorKind::TypeError,
            RuntimeError::Range { .. } => ErrorKind::RangeError,
            RuntimeError::Error { .. } => ErrorKind::Error,
            RuntimeError::Thrown { kind, .. } => *kind,
        }
    }

    /// `Kind: message`, the way an uncaught error is reported.
    pub fn report(&self) -> String {
        match self {
            RuntimeError::Thrown { kind: ErrorKind::Thrown, rendered, .. } => {
                format!("uncaught exception: {}", rendered)
            }
            // Error objects already render as `Name: message`
            RuntimeError::Thrown { rendered, .. } => rendered.clone(),
            _ => format!("{}: {}", self.kind(), self),
        }
    }

    /// Whether the error came from the parser rather than from running code.
    pub fn is_syntax_error(&self) -> bool {
        self.kind() == ErrorKind::SyntaxError
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        RuntimeError::Type { message: message.into() }
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        RuntimeError::Range { message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        RuntimeError::Error { message: message.into() }
    }

    /// Wrap a parse error from nested source (eval, `Function(...)`).
    pub fn from_nested_parse(error: &ParseError) -> Self {
        RuntimeError::Syntax {
            message: error.message.clone(),
            span: None,
        }
    }

    /// Wrap a parse error from the top-level script, keeping its location.
    pub fn from_script_parse(error: &ParseError) -> Self {
        RuntimeError::Syntax {
            message: error.message.clone(),
            span: Some(error.span),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let err = RuntimeError::UnresolvedReference { name: "x".to_string() };
        assert_eq!(err.kind(), ErrorKind::ReferenceError);
        assert_eq!(err.report(), "ReferenceError: x is not defined");

        let err = RuntimeError::NotConstructible { callee: "f".to_string() };
        assert_eq!(err.kind(), ErrorKind::TypeError);

        let err = RuntimeError::DuplicateDeclaration { name: "x".to_string() };
        assert!(err.is_syntax_error());
    }

    #[test]
    fn test_thrown_report() {
        let err = RuntimeError::Thrown {
            value: Value::Undefined,
            rendered: "FAIL".to_string(),
            kind: ErrorKind::Thrown,
        };
        assert_eq!(err.report(), "uncaught exception: FAIL");
    }
}
