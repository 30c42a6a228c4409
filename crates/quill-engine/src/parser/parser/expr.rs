//! Expression parsing
//!
//! Precedence, loosest first: comma sequence, assignment (and arrow
//! closures), conditional, the binary table in [`super::precedence`],
//! unary, postfix, call/member, primary.

use super::precedence::{get_precedence, infix_operator, is_right_associative, InfixOperator, Precedence};
use super::stmt::{check_yield_as_identifier, parse_function, parse_formal_parameters, parse_function_body, validate_parameters};
use super::{ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::interner::sym;
use crate::parser::token::{Span, Token};
use std::rc::Rc;

/// Parse a full expression, including comma sequences.
pub fn parse_expression(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let first = parse_assignment(parser)?;

    if !parser.check(&Token::Comma) {
        return Ok(first);
    }

    let mut expressions = vec![first];
    while parser.eat(&Token::Comma) {
        expressions.push(parse_assignment(parser)?);
    }

    Ok(Expression::Sequence(SequenceExpression {
        expressions,
        span: parser.span_from(&start_span),
    }))
}

/// Parse an assignment-level expression (this is where arrows live).
pub fn parse_assignment(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    parser.nested("expressions", parse_assignment_inner)
}

fn parse_assignment_inner(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    if let Some(arrow) = super::arrow::try_parse_arrow(parser)? {
        return Ok(Expression::Arrow(arrow));
    }

    let start_span = parser.current_span();
    let left = parse_conditional(parser)?;

    if parser.check(&Token::Arrow) {
        return Err(super::arrow::invalid_arrow_head(parser, &left));
    }

    let Some(operator) = assignment_operator(parser.current()) else {
        return Ok(left);
    };

    check_assignment_target(parser, &left)?;
    parser.advance();

    // Right-associative: a = b = c => a = b = c
    let right = parse_assignment(parser)?;

    Ok(Expression::Assignment(AssignmentExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        span: parser.span_from(&start_span),
    }))
}

/// `Some(None)` for `=`, `Some(Some(op))` for a compound `op=`.
///
/// Compound spellings are the binary operator's spelling plus `=`, which
/// also matches comparisons such as `<=`, so those levels are excluded.
fn assignment_operator(token: &Token) -> Option<Option<BinaryOperator>> {
    if *token == Token::Equal {
        return Some(None);
    }
    let base = Token::punctuator(token.spelling()?.strip_suffix('=')?)?;
    match (get_precedence(&base, true), infix_operator(&base)?) {
        (Precedence::Equality | Precedence::Relational, _) => None,
        (_, InfixOperator::Binary(op)) => Some(Some(op)),
        (_, InfixOperator::Logical(_)) => None,
    }
}

/// Reject targets that cannot be assigned or updated.
fn check_assignment_target(parser: &Parser<'_>, target: &Expression) -> Result<(), ParseError> {
    if !target.is_assignment_target() {
        return Err(ParseError::invalid_syntax(
            "invalid assignment target",
            target.span(),
        ));
    }

    if let Expression::Identifier(id) = target.unparenthesized() {
        if parser.context.strict && (id.name == sym::EVAL || id.name == sym::ARGUMENTS) {
            return Err(ParseError::strict_mode(
                format!("cannot assign to '{}'", parser.name_of(id.name)),
                id.span,
            ));
        }
    }
    Ok(())
}

fn parse_conditional(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let test = parse_binary(parser, Precedence::NullCoalescing)?;

    if !parser.eat(&Token::Question) {
        return Ok(test);
    }

    let consequent = parser.allowing_in(parse_assignment)?;
    parser.expect(Token::Colon)?;
    let alternate = parse_assignment(parser)?;

    Ok(Expression::Conditional(ConditionalExpression {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
        span: parser.span_from(&start_span),
    }))
}

/// Precedence climbing over the binary operator table.
fn parse_binary(parser: &mut Parser<'_>, min: Precedence) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let mut left = parse_unary(parser)?;

    loop {
        let token = *parser.current();
        let precedence = get_precedence(&token, !parser.no_in);
        if precedence == Precedence::None || precedence < min {
            break;
        }
        let Some(operator) = infix_operator(&token) else {
            break;
        };
        parser.advance();

        let next_min = if is_right_associative(&token) {
            precedence
        } else {
            precedence.next()
        };
        let right = Box::new(parse_binary(parser, next_min)?);
        let left_box = Box::new(left);
        let span = parser.span_from(&start_span);

        left = match operator {
            InfixOperator::Binary(operator) => Expression::Binary(BinaryExpression {
                operator,
                left: left_box,
                right,
                span,
            }),
            InfixOperator::Logical(operator) => Expression::Logical(LogicalExpression {
                operator,
                left: left_box,
                right,
                span,
            }),
        };
    }

    Ok(left)
}

fn parse_unary(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let operator = match parser.current() {
        Token::Bang => UnaryOperator::Not,
        Token::Minus => UnaryOperator::Minus,
        Token::Plus => UnaryOperator::Plus,
        Token::Tilde => UnaryOperator::BitwiseNot,
        Token::Typeof => UnaryOperator::Typeof,
        Token::Void => UnaryOperator::Void,
        Token::Delete => UnaryOperator::Delete,
        Token::PlusPlus | Token::MinusMinus => return parse_prefix_update(parser),
        _ => return parse_postfix(parser),
    };
    parser.advance();

    let operand = parse_unary(parser)?;

    if operator == UnaryOperator::Delete && parser.context.strict && operand.is_bare_identifier() {
        return Err(ParseError::strict_mode(
            "deleting an unqualified identifier is not allowed",
            operand.span(),
        ));
    }

    Ok(Expression::Unary(UnaryExpression {
        operator,
        operand: Box::new(operand),
        span: parser.span_from(&start_span),
    }))
}

fn parse_prefix_update(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let operator = match parser.advance() {
        Token::PlusPlus => UpdateOperator::Increment,
        _ => UpdateOperator::Decrement,
    };

    let argument = parse_unary(parser)?;
    check_assignment_target(parser, &argument)?;

    Ok(Expression::Update(UpdateExpression {
        operator,
        prefix: true,
        argument: Box::new(argument),
        span: parser.span_from(&start_span),
    }))
}

fn parse_postfix(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let expr = parse_left_hand_side(parser)?;

    let operator = match parser.current() {
        Token::PlusPlus if !parser.newline_before() => UpdateOperator::Increment,
        Token::MinusMinus if !parser.newline_before() => UpdateOperator::Decrement,
        _ => return Ok(expr),
    };
    check_assignment_target(parser, &expr)?;
    parser.advance();

    Ok(Expression::Update(UpdateExpression {
        operator,
        prefix: false,
        argument: Box::new(expr),
        span: parser.span_from(&start_span),
    }))
}

/// Parse calls, member accesses and `new` chains.
fn parse_left_hand_side(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    let mut expr = if parser.check(&Token::New) {
        parse_new(parser)?
    } else {
        parse_primary(parser)?
    };

    loop {
        expr = match parser.current() {
            Token::Dot | Token::LeftBracket => parse_member_suffix(parser, expr, &start_span)?,
            Token::LeftParen => {
                parser.advance();
                let arguments = parse_arguments(parser)?;
                Expression::Call(CallExpression {
                    callee: Box::new(expr),
                    arguments,
                    span: parser.span_from(&start_span),
                })
            }
            _ => return Ok(expr),
        };
    }
}

/// Parse one `.name` or `[index]` suffix.
fn parse_member_suffix(
    parser: &mut Parser<'_>,
    object: Expression,
    start_span: &Span,
) -> Result<Expression, ParseError> {
    if parser.eat(&Token::Dot) {
        let property = parse_property_name(parser)?;
        return Ok(Expression::Member(MemberExpression {
            object: Box::new(object),
            property,
            span: parser.span_from(start_span),
        }));
    }

    parser.expect(Token::LeftBracket)?;
    let index = parser.allowing_in(parse_expression)?;
    parser.expect(Token::RightBracket)?;

    Ok(Expression::Index(IndexExpression {
        object: Box::new(object),
        index: Box::new(index),
        span: parser.span_from(start_span),
    }))
}

/// Parse `new Callee`, `new Callee(args)`, `new new X()()`.
fn parse_new(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::New)?;

    let mut callee = if parser.check(&Token::New) {
        parse_new(parser)?
    } else {
        parse_primary(parser)?
    };
    while matches!(parser.current(), Token::Dot | Token::LeftBracket) {
        callee = parse_member_suffix(parser, callee, &start_span)?;
    }

    let arguments = if parser.eat(&Token::LeftParen) {
        parse_arguments(parser)?
    } else {
        Vec::new()
    };

    Ok(Expression::New(NewExpression {
        callee: Box::new(callee),
        arguments,
        span: parser.span_from(&start_span),
    }))
}

/// Parse call arguments after the opening `(`, through the closing `)`.
fn parse_arguments(parser: &mut Parser<'_>) -> Result<Vec<Expression>, ParseError> {
    parser.allowing_in(|parser| {
        let mut arguments = Vec::new();
        while !parser.check(&Token::RightParen) {
            if parser.check(&Token::DotDotDot) {
                return Err(ParseError::invalid_syntax(
                    "spread arguments are not supported",
                    parser.current_span(),
                ));
            }
            arguments.push(parse_assignment(parser)?);
            if !parser.check(&Token::RightParen) {
                parser.expect(Token::Comma)?;
            }
        }
        parser.expect(Token::RightParen)?;
        Ok(arguments)
    })
}

/// Parse a property name after `.`; keywords are allowed.
fn parse_property_name(parser: &mut Parser<'_>) -> Result<Identifier, ParseError> {
    let span = parser.current_span();
    let name = match *parser.current() {
        Token::Identifier(name) => name,
        token if token.is_keyword() => parser.interner.intern(&token.to_string()),
        _ => return Err(parser.unexpected_token(&[Token::Identifier(sym::EMPTY)])),
    };
    parser.advance();
    Ok(Identifier::new(name, span))
}

fn parse_primary(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    let span = parser.current_span();

    let expr = match *parser.current() {
        Token::NumberLiteral(value) => Expression::NumberLiteral(NumberLiteral { value, span }),
        Token::StringLiteral(value) => Expression::StringLiteral(StringLiteral { value, span }),
        Token::True => Expression::BooleanLiteral(BooleanLiteral { value: true, span }),
        Token::False => Expression::BooleanLiteral(BooleanLiteral { value: false, span }),
        Token::Null => Expression::NullLiteral(span),
        Token::This => Expression::This(span),
        Token::Identifier(name) => Expression::Identifier(Identifier::new(name, span)),
        Token::Yield => {
            check_yield_as_identifier(parser)?;
            Expression::Identifier(Identifier::new(sym::YIELD, span))
        }
        Token::LeftParen => return parse_parenthesized(parser),
        Token::LeftBracket => return parse_array(parser),
        Token::LeftBrace => return parse_object(parser),
        Token::Function => return Ok(Expression::Function(parse_function(parser, false)?)),
        Token::DotDotDot => {
            return Err(ParseError::invalid_syntax(
                "rest parameters and spread elements are not supported",
                span,
            ))
        }
        _ => return Err(parser.unexpected_token(&[])),
    };

    parser.advance();
    Ok(expr)
}

/// Parse `( expr )`; only reached once the group is known not to be arrow parameters.
fn parse_parenthesized(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::LeftParen)?;

    if parser.check(&Token::RightParen) {
        return Err(ParseError::invalid_syntax("empty parentheses", parser.current_span())
            .with_suggestion("'()' is only valid as the parameter list of an arrow function"));
    }

    let expression = parser.allowing_in(parse_expression)?;
    parser.expect(Token::RightParen)?;

    Ok(Expression::Parenthesized(ParenthesizedExpression {
        expression: Box::new(expression),
        span: parser.span_from(&start_span),
    }))
}

fn parse_array(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::LeftBracket)?;

    let elements = parser.allowing_in(|parser| {
        let mut elements = Vec::new();
        while !parser.check(&Token::RightBracket) {
            if parser.eat(&Token::Comma) {
                elements.push(None);
                continue;
            }
            elements.push(Some(parse_assignment(parser)?));
            if !parser.check(&Token::RightBracket) {
                parser.expect(Token::Comma)?;
            }
        }
        Ok(elements)
    })?;

    parser.expect(Token::RightBracket)?;
    Ok(Expression::Array(ArrayExpression {
        elements,
        span: parser.span_from(&start_span),
    }))
}

fn parse_object(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::LeftBrace)?;

    let properties = parser.allowing_in(|parser| {
        let mut properties = Vec::new();
        while !parser.check(&Token::RightBrace) {
            properties.push(parse_object_property(parser)?);
            if !parser.check(&Token::RightBrace) {
                parser.expect(Token::Comma)?;
            }
        }
        Ok(properties)
    })?;

    parser.expect(Token::RightBrace)?;
    Ok(Expression::Object(ObjectExpression {
        properties,
        span: parser.span_from(&start_span),
    }))
}

/// Parse `key: value`, shorthand `key`, or method `key(params) { body }`.
fn parse_object_property(parser: &mut Parser<'_>) -> Result<Property, ParseError> {
    let start_span = parser.current_span();
    let is_plain_identifier = matches!(parser.current(), Token::Identifier(_));

    let key = match *parser.current() {
        Token::StringLiteral(value) => {
            parser.advance();
            PropertyKey::StringLiteral(StringLiteral {
                value,
                span: start_span,
            })
        }
        Token::NumberLiteral(value) => {
            parser.advance();
            PropertyKey::NumberLiteral(NumberLiteral {
                value,
                span: start_span,
            })
        }
        _ => PropertyKey::Identifier(parse_property_name(parser)?),
    };

    let value = if parser.eat(&Token::Colon) {
        parse_assignment(parser)?
    } else if parser.check(&Token::LeftParen) {
        Expression::Function(parse_method(parser, &start_span)?)
    } else {
        match key {
            PropertyKey::Identifier(id) if is_plain_identifier => Expression::Identifier(id),
            _ => return Err(parser.unexpected_token(&[Token::Colon])),
        }
    };

    Ok(Property {
        key,
        value,
        span: parser.span_from(&start_span),
    })
}

/// Parse the `(params) { body }` tail of a method shorthand.
///
/// Methods are anonymous: unlike a named function expression, the key is
/// not bound inside the body.
fn parse_method(parser: &mut Parser<'_>, start_span: &Span) -> Result<FunctionExpression, ParseError> {
    parser.expect(Token::LeftParen)?;
    let params = parse_formal_parameters(parser)?;
    let (body, strict) = parse_function_body(parser, false)?;
    validate_parameters(parser, &params, strict, false)?;

    let span = parser.span_from(start_span);

    Ok(FunctionExpression {
        name: None,
        params: params.into(),
        body: Rc::new(body),
        strict,
        source: parser.source_text(&span).into(),
        span,
    })
}
