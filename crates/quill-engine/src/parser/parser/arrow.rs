//! Arrow closure recognition
//!
//! An arrow head is either a lone identifier or a parenthesized list of
//! identifiers, followed on the same line by `=>`. Before committing, the
//! parser scans ahead over the tokens without consuming them; anything that
//! does not match falls back to an ordinary parenthesized expression. If a
//! `=>` then turns up after that expression, the head was malformed and
//! [`invalid_arrow_head`] explains why.

use super::expr::parse_assignment;
use super::stmt::{parse_binding_identifier, parse_formal_parameters, parse_function_body, validate_parameters};
use super::{ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::token::{Span, Token};
use std::rc::Rc;

/// Parse an arrow closure if one starts at the current token.
///
/// Returns `Ok(None)` without consuming anything when the upcoming tokens
/// are not an arrow head.
pub fn try_parse_arrow(parser: &mut Parser<'_>) -> Result<Option<ArrowFunction>, ParseError> {
    let start_span = parser.current_span();
    let here = parser.position();

    let params = match parser.current() {
        Token::Identifier(_) | Token::Yield if is_arrow_at(parser, here + 1) => {
            vec![parse_binding_identifier(parser)?]
        }
        Token::LeftParen => match scan_parameter_list(parser) {
            Some(after_paren) if is_arrow_at(parser, after_paren) => {
                parser.advance();
                parse_formal_parameters(parser)?
            }
            _ => return Ok(None),
        },
        _ => return Ok(None),
    };

    parser.expect(Token::Arrow)?;
    parse_arrow_body(parser, start_span, params).map(Some)
}

/// `=>` at `index`, on the same line as the token before it.
fn is_arrow_at(parser: &Parser<'_>, index: usize) -> bool {
    matches!(parser.token_at(index), Token::Arrow) && !parser.newline_before_index(index)
}

/// From a `(`, return the index just past its `)` if the group holds
/// nothing but a comma-separated identifier list.
fn scan_parameter_list(parser: &Parser<'_>) -> Option<usize> {
    let mut index = parser.position() + 1;

    if matches!(parser.token_at(index), Token::RightParen) {
        return Some(index + 1);
    }

    loop {
        if !matches!(parser.token_at(index), Token::Identifier(_) | Token::Yield) {
            return None;
        }
        index += 1;

        match parser.token_at(index) {
            Token::Comma => index += 1,
            Token::RightParen => return Some(index + 1),
            _ => return None,
        }
    }
}

/// Parse the body after `=>` and finish the closure node.
fn parse_arrow_body(
    parser: &mut Parser<'_>,
    start_span: Span,
    params: Vec<Identifier>,
) -> Result<ArrowFunction, ParseError> {
    // `{` always opens a block body; an object literal body needs parentheses
    let (body, strict) = if parser.check(&Token::LeftBrace) {
        let (block, strict) = parse_function_body(parser, true)?;
        (ArrowBody::Block(Rc::new(block)), strict)
    } else {
        let strict = parser.context.strict;
        let context = parser.context.function_body(true);
        let expr = parser.with_context(context, parse_assignment)?;
        (ArrowBody::Expression(Rc::new(expr)), strict)
    };

    validate_parameters(parser, &params, strict, true)?;

    let span = parser.span_from(&start_span);
    Ok(ArrowFunction {
        params: params.into(),
        body,
        strict,
        source: parser.source_text(&span).into(),
        span,
    })
}

/// Build the error for a `=>` that follows something other than a parameter list.
pub fn invalid_arrow_head(parser: &Parser<'_>, left: &Expression) -> ParseError {
    let arrow_span = parser.current_span();

    if parser.newline_before() {
        return ParseError::invalid_syntax("line break before '=>'", arrow_span)
            .with_suggestion("put '=>' on the same line as the parameter list");
    }

    match left {
        Expression::Parenthesized(group) if matches!(*group.expression, Expression::Parenthesized(_)) => {
            ParseError::invalid_arrow_parameters("parameter list is wrapped in extra parentheses", group.span)
        }
        Expression::Parenthesized(group) => {
            let error = ParseError::invalid_arrow_parameters(
                "parameters must be plain identifiers",
                group.span,
            );
            if contains_default(&group.expression) {
                error.with_suggestion("default parameter values are not supported")
            } else {
                error
            }
        }
        Expression::StringLiteral(_) | Expression::NumberLiteral(_) => {
            ParseError::invalid_arrow_parameters("a literal cannot be a parameter", left.span())
        }
        _ => ParseError::invalid_arrow_parameters(
            "left side of '=>' is not a parameter list",
            left.span(),
        ),
    }
}

fn contains_default(expr: &Expression) -> bool {
    match expr {
        Expression::Assignment(_) => true,
        Expression::Sequence(seq) => seq.expressions.iter().any(contains_default),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::interner::Interner;
    use crate::parser::parser::ParseErrorKind;

    fn first_error(source: &str) -> ParseError {
        let mut interner = Interner::new();
        let parser = Parser::new(source, &mut interner).expect("lexes");
        parser.parse().expect_err("should be rejected").remove(0)
    }

    #[test]
    fn test_scan_accepts_identifier_lists() {
        let mut interner = Interner::new();
        let parser = Parser::new("(a, b) => a", &mut interner).unwrap();
        assert_eq!(scan_parameter_list(&parser), Some(5));

        let parser = Parser::new("(a + b)", &mut interner).unwrap();
        assert_eq!(scan_parameter_list(&parser), None);
    }

    #[test]
    fn test_double_parens_are_rejected() {
        let err = first_error("((a)) => a");
        assert!(matches!(err.kind, ParseErrorKind::InvalidArrowParameters { .. }));
        assert!(err.message.contains("extra parentheses"));
    }

    #[test]
    fn test_line_break_before_arrow() {
        let err = first_error("var f = (a)\n=> a;");
        assert!(err.message.contains("line break before '=>'"));
    }

    #[test]
    fn test_default_value_hint() {
        let err = first_error("(a = 1) => a");
        assert_eq!(
            err.suggestion.as_deref(),
            Some("default parameter values are not supported")
        );
    }
}
