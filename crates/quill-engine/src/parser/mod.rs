//! Lexer and parser for Quill source text.
//!
//! # Example
//!
//! ```ignore
//! use quill_engine::parser::{Interner, Lexer};
//!
//! let mut interner = Interner::new();
//! match Lexer::new("var f = (a, b) => a + b;", &mut interner).tokenize() {
//!     Ok(tokens) => {
//!         for (token, span) in tokens {
//!             println!("{} at {}:{}", token, span.line, span.column);
//!         }
//!     }
//!     Err(errors) => {
//!         for err in errors {
//!             eprintln!("{}", err);
//!         }
//!     }
//! }
//! ```

pub mod ast;
pub mod interner;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod token;

pub use interner::{sym, Interner, Symbol};
pub use lexer::{LexError, Lexer};
pub use parser::{ParseContext, ParseError, ParseErrorKind, Parser};
pub use token::{Span, Token};

/// Parse a whole program, stopping at the first error.
///
/// This is the entry point the interpreter uses for scripts, direct eval and
/// `Function(...)` bodies. Tools that want every error should drive
/// [`Parser::parse`] directly.
pub fn parse_program(source: &str, interner: &mut Interner, strict: bool) -> Result<ast::Program, ParseError> {
    let parser = Parser::new(source, interner).map_err(|mut errors| ParseError::from(errors.remove(0)))?;
    parser.with_strict(strict).parse().map_err(|mut errors| errors.remove(0))
}
