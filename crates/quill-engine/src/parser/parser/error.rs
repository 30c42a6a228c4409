//! Syntax errors.
//!
//! The message of every error is the `Display` of its [`ParseErrorKind`];
//! a [`ParseError`] adds the location and an optional fix-it hint.

use crate::parser::lexer::LexError;
use crate::parser::token::{Span, Token};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    /// Rendered `kind`, kept alongside it for reporting
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("{}", describe_unexpected(.expected, .found))]
    UnexpectedToken { expected: Vec<Token>, found: Token },

    #[error("unexpected end of input{}", describe_expected(.expected))]
    UnexpectedEof { expected: Vec<Token> },

    #[error("{reason}")]
    InvalidSyntax { reason: String },

    /// The left side of `=>` is not a parameter list
    #[error("invalid arrow function parameters: {reason}")]
    InvalidArrowParameters { reason: String },

    #[error("duplicate parameter name '{name}'")]
    DuplicateParameter { name: String },

    #[error("{reason} in strict mode code")]
    StrictModeViolation { reason: String },

    /// `break`, `continue`, `return` or `yield` with no legal target
    #[error("illegal '{keyword}' {context}")]
    IllegalJump { keyword: String, context: String },

    #[error("invalid number literal '{value}'")]
    InvalidNumber { value: String },

    #[error("{reason}")]
    InvalidString { reason: String },

    /// Input nested deeper than the parser allows
    #[error("parser limit exceeded: {message}")]
    ParserLimitExceeded { message: String },
}

fn quoted(tokens: &[Token]) -> String {
    tokens.iter().map(|t| format!("'{}'", t)).collect::<Vec<_>>().join(", ")
}

fn describe_unexpected(expected: &[Token], found: &Token) -> String {
    match expected {
        [] => format!("unexpected token '{}'", found),
        [one] => format!("expected '{}', found '{}'", one, found),
        many => format!("expected one of {}, found '{}'", quoted(many), found),
    }
}

fn describe_expected(expected: &[Token]) -> String {
    match expected {
        [] => String::new(),
        [one] => format!(", expected '{}'", one),
        many => format!(", expected one of {}", quoted(many)),
    }
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            message: kind.to_string(),
            kind,
            span,
            suggestion: None,
        }
    }

    pub fn unexpected_token(expected: Vec<Token>, found: Token, span: Span) -> Self {
        Self::new(ParseErrorKind::UnexpectedToken { expected, found }, span)
    }

    pub fn unexpected_eof(expected: Vec<Token>, span: Span) -> Self {
        Self::new(ParseErrorKind::UnexpectedEof { expected }, span)
    }

    pub fn invalid_syntax(reason: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::InvalidSyntax { reason: reason.into() }, span)
    }

    pub fn invalid_arrow_parameters(reason: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::InvalidArrowParameters { reason: reason.into() }, span)
    }

    pub fn duplicate_parameter(name: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::DuplicateParameter { name: name.into() }, span)
    }

    pub fn strict_mode(reason: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::StrictModeViolation { reason: reason.into() }, span)
    }

    /// `context` finishes the sentence, e.g. "outside of a loop".
    pub fn illegal_jump(keyword: impl Into<String>, context: &str, span: Span) -> Self {
        let kind = ParseErrorKind::IllegalJump {
            keyword: keyword.into(),
            context: context.to_string(),
        };
        Self::new(kind, span)
    }

    pub fn parser_limit_exceeded(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::ParserLimitExceeded { message: message.into() }, span)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.span.line, self.span.column, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (help: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        let kind = match &err {
            LexError::UnterminatedString { .. } => ParseErrorKind::InvalidString {
                reason: err.description(),
            },
            LexError::InvalidNumber { text, .. } => ParseErrorKind::InvalidNumber { value: text.clone() },
            LexError::UnexpectedCharacter { .. } => ParseErrorKind::InvalidSyntax {
                reason: err.description(),
            },
        };
        let error = Self::new(kind, err.span());
        match err.hint() {
            Some(hint) => error.with_suggestion(hint),
            None => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_messages() {
        let span = Span::default();
        let one = ParseError::unexpected_token(vec![Token::RightParen], Token::Arrow, span);
        assert_eq!(one.message, "expected ')', found '=>'");

        let many = ParseError::unexpected_token(vec![Token::Catch, Token::Finally], Token::Eof, span);
        assert_eq!(many.message, "expected one of 'catch', 'finally', found 'end of input'");
    }

    #[test]
    fn test_display_includes_position_and_help() {
        let err = ParseError::invalid_arrow_parameters("line break before '=>'", Span::new(4, 6, 2, 1))
            .with_suggestion("put '=>' on the same line as the parameter list");
        assert_eq!(
            err.to_string(),
            "2:1: invalid arrow function parameters: line break before '=>' \
             (help: put '=>' on the same line as the parameter list)"
        );
    }

    #[test]
    fn test_lex_errors_keep_their_hint() {
        let lex = LexError::UnterminatedString { span: Span::default() };
        let err = ParseError::from(lex);
        assert!(matches!(err.kind, ParseErrorKind::InvalidString { .. }));
        assert!(err.suggestion.is_some());
    }
}
