//! Parser for Quill source text
//!
//! This module implements a recursive descent parser that transforms
//! a token stream from the lexer into an Abstract Syntax Tree (AST).
//!
//! Strictness, function/arrow nesting, and loop/label state travel in an
//! explicit [`ParseContext`] value that is saved and restored at every
//! function boundary, so nested parses (direct eval, `Function(...)`) can be
//! started with whatever strictness their caller dictates.

pub mod arrow;
pub mod error;
pub mod expr;
pub mod guards;
pub mod precedence;
pub mod recovery;
pub mod stmt;

use crate::parser::ast::*;
use crate::parser::interner::{sym, Interner, Symbol, STRICT_RESERVED};
use crate::parser::lexer::{LexError, Lexer};
use crate::parser::token::{Span, Token};

pub use error::{ParseError, ParseErrorKind};

/// A label visible to `break`/`continue` inside its statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelInfo {
    pub name: Symbol,
    /// Labels an iteration statement (valid `continue` target)
    pub is_loop: bool,
}

/// Syntactic context of the code being parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    /// Strict-mode code
    pub strict: bool,

    /// Inside a function or arrow body (`return` is legal)
    pub in_function: bool,

    /// Inside an arrow body, not counting nested ordinary functions
    pub in_arrow: bool,

    /// Number of enclosing loops within the current function boundary
    pub loop_depth: usize,

    /// Labels within the current function boundary, innermost last
    pub labels: Vec<LabelInfo>,
}

impl ParseContext {
    /// Context for a new function or arrow body. Only strictness carries over.
    pub fn function_body(&self, is_arrow: bool) -> Self {
        Self {
            strict: self.strict,
            in_function: true,
            in_arrow: is_arrow,
            loop_depth: 0,
            labels: Vec::new(),
        }
    }
}

/// Parser state.
///
/// This is a recursive descent parser with arbitrary lookahead over a
/// pre-tokenized stream; the lookahead is only used to recognize arrow
/// parameter lists before committing to a parse.
pub struct Parser<'a> {
    /// Pre-tokenized input
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Accumulated parse errors (allows continuing after errors)
    errors: Vec<ParseError>,

    /// Source text, for function source strings and line-break checks
    source: &'a str,

    /// Shared interner (keywords used as property names get interned here)
    pub(crate) interner: &'a mut Interner,

    /// Current syntactic context
    pub(crate) context: ParseContext,

    /// `in` is not a binary operator inside a `for (...;` initializer
    pub(crate) no_in: bool,

    /// Current nesting, bounded by `guards::MAX_PARSE_DEPTH`
    pub(crate) depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser from source code.
    pub fn new(source: &'a str, interner: &'a mut Interner) -> Result<Self, Vec<LexError>> {
        let tokens = Lexer::new(source, &mut *interner).tokenize()?;

        Ok(Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            source,
            interner,
            context: ParseContext::default(),
            no_in: false,
            depth: 0,
        })
    }

    /// Start in strict-mode code (strict caller of direct eval, `--strict`).
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.context.strict = strict;
        self
    }

    /// Parse the entire source into a Program.
    ///
    /// Returns the Program on success, or all accumulated errors on failure.
    pub fn parse(mut self) -> Result<Program, Vec<ParseError>> {
        let start_span = self.current_span();
        let mut statements = Vec::new();

        stmt::parse_directives(&mut self);

        while !self.at_eof() {
            match stmt::parse_statement(&mut self) {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    // A failed body can leave us inside its context
                    let strict = self.context.strict;
                    self.context = ParseContext {
                        strict,
                        ..ParseContext::default()
                    };
                    self.no_in = false;
                    self.skip_to_statement_boundary();
                }
            }
        }

        let span = self.combine_spans(&start_span, &self.current_span());

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        Ok(Program::new(statements, self.context.strict, span))
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    /// Peek at the next token (lookahead).
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.peek_nth(1)
    }

    /// Peek `n` tokens ahead of the current one.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(tok, _)| tok)
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos == 0 {
            self.current_span()
        } else {
            self.tokens[self.pos - 1].1
        }
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0;
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    /// Check if we've reached EOF.
    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    /// Consume the current token if it matches the expected kind.
    pub fn expect(&mut self, expected: Token) -> Result<Token, ParseError> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected_token(&[expected]))
        }
    }

    /// Consume the current token if it matches; report whether it did.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Whether a line terminator separates the token at `index` from the one before it.
    pub fn newline_before_index(&self, index: usize) -> bool {
        if index == 0 || index >= self.tokens.len() {
            return false;
        }
        let prev_end = self.tokens[index - 1].1.end;
        let start = self.tokens[index].1.start;
        self.source
            .get(prev_end..start)
            .is_some_and(|gap| gap.contains('\n'))
    }

    /// Whether a line terminator precedes the current token.
    #[inline]
    pub fn newline_before(&self) -> bool {
        self.newline_before_index(self.pos)
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn token_at(&self, index: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)].0
    }

    pub(crate) fn span_at(&self, index: usize) -> Span {
        let last = self.tokens.len() - 1;
        self.tokens[index.min(last)].1
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Create an "unexpected token" error at the current position.
    pub fn unexpected_token(&self, expected: &[Token]) -> ParseError {
        let span = self.current_span();
        if self.at_eof() {
            ParseError::unexpected_eof(expected.to_vec(), span)
        } else {
            ParseError::unexpected_token(expected.to_vec(), *self.current(), span)
        }
    }

    // ========================================================================
    // Utilities
    // ========================================================================

    /// Combine two spans into a single span.
    pub fn combine_spans(&self, start: &Span, end: &Span) -> Span {
        Span {
            start: start.start,
            end: end.end.max(start.start),
            line: start.line,
            column: start.column,
        }
    }

    /// Span from `start` through the last consumed token.
    pub fn span_from(&self, start: &Span) -> Span {
        self.combine_spans(start, &self.previous_span())
    }

    /// Exact source text covered by a span.
    pub fn source_text(&self, span: &Span) -> &'a str {
        self.source.get(span.start..span.end).unwrap_or("")
    }

    /// Resolve a symbol for diagnostics.
    pub fn name_of(&self, symbol: Symbol) -> &str {
        self.interner.resolve(symbol)
    }

    /// Reject names that the current code cannot bind.
    pub fn check_strict_binding(&self, id: &Identifier) -> Result<(), ParseError> {
        self.check_binding_name(id, self.context.strict)
    }

    /// Reject names that strict-mode code cannot bind.
    ///
    /// Parameter lists are checked after their body has been parsed, since a
    /// directive in the body makes the whole function strict.
    pub fn check_binding_name(&self, id: &Identifier, strict: bool) -> Result<(), ParseError> {
        if !strict {
            return Ok(());
        }
        if id.name == sym::EVAL || id.name == sym::ARGUMENTS {
            return Err(ParseError::strict_mode(
                format!("'{}' cannot be used as a binding name", self.name_of(id.name)),
                id.span,
            ));
        }
        if STRICT_RESERVED.contains(&id.name) {
            return Err(ParseError::strict_mode(
                format!("'{}' is a reserved word", self.name_of(id.name)),
                id.span,
            ));
        }
        Ok(())
    }

    /// Run `f` with a replacement context, restoring the old one afterwards
    /// whether or not `f` succeeds.
    pub(crate) fn with_context<T>(
        &mut self,
        context: ParseContext,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = std::mem::replace(&mut self.context, context);
        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        let result = f(self);
        self.context = saved;
        self.no_in = saved_no_in;
        result
    }

    /// Run `f` with `in` re-enabled as an operator (inside brackets).
    pub(crate) fn allowing_in<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = f(self);
        self.no_in = saved;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_new() {
        let mut interner = Interner::new();
        let parser = Parser::new("var x = 42;", &mut interner).unwrap();

        assert!(matches!(parser.current(), Token::Var));
    }

    #[test]
    fn test_parser_advance() {
        let mut interner = Interner::new();
        let mut parser = Parser::new("let x", &mut interner).unwrap();

        let tok = parser.advance();
        assert!(matches!(tok, Token::Let));
        assert!(matches!(parser.current(), Token::Identifier(_)));
    }

    #[test]
    fn test_parser_at_eof() {
        let mut interner = Interner::new();
        let parser = Parser::new("", &mut interner).unwrap();

        assert!(parser.at_eof());
    }

    #[test]
    fn test_newline_detection_sees_comments() {
        let mut interner = Interner::new();
        let mut parser = Parser::new("a /* x\n */ b c", &mut interner).unwrap();

        parser.advance();
        assert!(parser.newline_before());
        parser.advance();
        assert!(!parser.newline_before());
    }

    #[test]
    fn test_context_restored_after_failure() {
        let mut interner = Interner::new();
        let mut parser = Parser::new("x", &mut interner).unwrap();

        let inner = parser.context.function_body(true);
        let result: Result<(), ParseError> = parser.with_context(inner, |p| {
            assert!(p.context.in_arrow);
            Err(ParseError::invalid_syntax("boom", Span::default()))
        });

        assert!(result.is_err());
        assert_eq!(parser.context, ParseContext::default());
    }
}
