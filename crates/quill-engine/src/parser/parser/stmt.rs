//! Statement parsing

use super::{LabelInfo, ParseError, Parser};
use crate::parser::ast::*;
use crate::parser::interner::sym;
use crate::parser::token::Token;
use std::rc::Rc;

/// Scan the directive prologue at the current position.
///
/// Directives are ordinary expression statements and are parsed as such
/// afterwards; this only switches the context to strict when one of them is
/// exactly `'use strict'` or `"use strict"`.
pub fn parse_directives(parser: &mut Parser<'_>) {
    let mut index = parser.position();

    while let Token::StringLiteral(_) = parser.token_at(index) {
        let next = index + 1;
        let ends_statement = matches!(
            parser.token_at(next),
            Token::Semicolon | Token::RightBrace | Token::Eof
        ) || parser.newline_before_index(next);
        if !ends_statement {
            return;
        }

        let raw = parser.source_text(&parser.span_at(index));
        if raw.len() >= 2 && &raw[1..raw.len() - 1] == "use strict" {
            parser.context.strict = true;
        }

        index = next;
        if matches!(parser.token_at(index), Token::Semicolon) {
            index += 1;
        }
    }
}

/// Parse a statement.
pub fn parse_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    parser.nested("statements", parse_statement_inner)
}

fn parse_statement_inner(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    match parser.current() {
        Token::Var | Token::Let | Token::Const => {
            let decl = parse_variable_declaration(parser)?;
            consume_semicolon(parser)?;
            Ok(Statement::VariableDecl(decl))
        }
        Token::Function => parse_function_declaration(parser),
        Token::LeftBrace => Ok(Statement::Block(parse_block_statement(parser)?)),
        Token::If => parse_if_statement(parser),
        Token::While => parse_while_statement(parser),
        Token::Do => parse_do_while_statement(parser),
        Token::For => parse_for_statement(parser),
        Token::Return => parse_return_statement(parser),
        Token::Break => parse_break_statement(parser),
        Token::Continue => parse_continue_statement(parser),
        Token::Throw => parse_throw_statement(parser),
        Token::Try => parse_try_statement(parser),
        Token::With => parse_with_statement(parser),
        Token::Identifier(_) if matches!(parser.peek(), Some(Token::Colon)) => {
            parse_labeled_statement(parser)
        }
        Token::Debugger => {
            let span = parser.current_span();
            parser.advance();
            consume_semicolon(parser)?;
            Ok(Statement::Debugger(span))
        }
        Token::Semicolon => {
            let span = parser.current_span();
            parser.advance();
            Ok(Statement::Empty(span))
        }
        _ => {
            let start_span = parser.current_span();
            let expression = super::expr::parse_expression(parser)?;
            consume_semicolon(parser)?;
            let span = parser.span_from(&start_span);

            Ok(Statement::Expression(ExpressionStatement { expression, span }))
        }
    }
}

/// Consume a statement terminator, applying automatic semicolon insertion.
pub fn consume_semicolon(parser: &mut Parser<'_>) -> Result<(), ParseError> {
    if parser.eat(&Token::Semicolon) {
        return Ok(());
    }
    if parser.check(&Token::RightBrace) || parser.at_eof() || parser.newline_before() {
        return Ok(());
    }
    Err(parser.unexpected_token(&[Token::Semicolon]))
}

/// Parse a binding name. `yield` is a plain identifier only in sloppy code
/// outside arrow bodies.
pub fn parse_binding_identifier(parser: &mut Parser<'_>) -> Result<Identifier, ParseError> {
    let span = parser.current_span();
    match *parser.current() {
        Token::Identifier(name) => {
            parser.advance();
            Ok(Identifier::new(name, span))
        }
        Token::Yield => {
            check_yield_as_identifier(parser)?;
            parser.advance();
            Ok(Identifier::new(sym::YIELD, span))
        }
        _ => Err(parser.unexpected_token(&[Token::Identifier(sym::EMPTY)])),
    }
}

/// `yield` is never legal inside an arrow body and is reserved in strict code.
pub fn check_yield_as_identifier(parser: &Parser<'_>) -> Result<(), ParseError> {
    let span = parser.current_span();
    if parser.context.in_arrow {
        return Err(ParseError::illegal_jump(
            "yield",
            "inside an arrow function body",
            span,
        ));
    }
    if parser.context.strict {
        return Err(ParseError::strict_mode("'yield' is a reserved word", span));
    }
    Ok(())
}

// ============================================================================
// Declarations
// ============================================================================

/// Parse `var`/`let`/`const` declarators (without the terminator).
pub fn parse_variable_declaration(parser: &mut Parser<'_>) -> Result<VariableDecl, ParseError> {
    let start_span = parser.current_span();
    let kind = match parser.advance() {
        Token::Var => VariableKind::Var,
        Token::Let => VariableKind::Let,
        _ => VariableKind::Const,
    };

    let mut declarations = Vec::new();
    loop {
        let id = parse_binding_identifier(parser)?;
        parser.check_strict_binding(&id)?;

        let init = if parser.eat(&Token::Equal) {
            Some(super::expr::parse_assignment(parser)?)
        } else {
            None
        };

        // `for (const k in o)` binds without an initializer
        if kind == VariableKind::Const && init.is_none() && !(parser.no_in && parser.check(&Token::In)) {
            return Err(ParseError::invalid_syntax(
                "missing initializer in const declaration",
                id.span,
            ));
        }

        let span = parser.span_from(&id.span);
        declarations.push(VariableDeclarator { id, init, span });

        if !parser.eat(&Token::Comma) {
            break;
        }
    }

    Ok(VariableDecl {
        kind,
        declarations,
        span: parser.span_from(&start_span),
    })
}

fn parse_function_declaration(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    let function = parse_function(parser, true)?;
    let name = function
        .name
        .ok_or_else(|| ParseError::invalid_syntax("function declaration requires a name", start_span))?;

    Ok(Statement::FunctionDecl(FunctionDecl {
        name,
        span: function.span,
        function,
    }))
}

/// Parse `function name?(params) { body }`.
pub fn parse_function(parser: &mut Parser<'_>, require_name: bool) -> Result<FunctionExpression, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Function)?;

    let name = if matches!(parser.current(), Token::Identifier(_) | Token::Yield) {
        Some(parse_binding_identifier(parser)?)
    } else if require_name {
        return Err(parser.unexpected_token(&[Token::Identifier(sym::EMPTY)]));
    } else {
        None
    };

    parser.expect(Token::LeftParen)?;
    let params = parse_formal_parameters(parser)?;

    let (body, strict) = parse_function_body(parser, false)?;

    validate_parameters(parser, &params, strict, false)?;
    if let Some(name) = &name {
        parser.check_binding_name(name, strict)?;
    }

    let span = parser.span_from(&start_span);
    Ok(FunctionExpression {
        name,
        params: params.into(),
        body: Rc::new(body),
        strict,
        source: parser.source_text(&span).into(),
        span,
    })
}

/// Parse identifiers up to and including the closing `)`.
pub fn parse_formal_parameters(parser: &mut Parser<'_>) -> Result<Vec<Identifier>, ParseError> {
    let mut params = Vec::new();

    if parser.eat(&Token::RightParen) {
        return Ok(params);
    }

    loop {
        if parser.check(&Token::DotDotDot) {
            return Err(ParseError::invalid_syntax(
                "rest parameters are not supported",
                parser.current_span(),
            ));
        }

        params.push(parse_binding_identifier(parser)?);

        if parser.check(&Token::Equal) {
            return Err(ParseError::invalid_syntax(
                "default parameter values are not supported",
                parser.current_span(),
            ));
        }

        if parser.eat(&Token::RightParen) {
            return Ok(params);
        }
        parser.expect(Token::Comma)?;
    }
}

/// Parse a `{ ... }` function body in a fresh context.
///
/// Returns the body and whether it is strict-mode code.
pub fn parse_function_body(
    parser: &mut Parser<'_>,
    is_arrow: bool,
) -> Result<(BlockStatement, bool), ParseError> {
    let context = parser.context.function_body(is_arrow);
    parser.with_context(context, |parser| {
        let start_span = parser.current_span();
        parser.expect(Token::LeftBrace)?;

        parse_directives(parser);
        let statements = parse_statement_list(parser)?;

        parser.expect(Token::RightBrace)?;
        let body = BlockStatement {
            statements,
            span: parser.span_from(&start_span),
        };
        Ok((body, parser.context.strict))
    })
}

/// Check a parameter list once the strictness of its body is known.
///
/// Arrow parameters may never repeat; ordinary ones only in sloppy code.
pub fn validate_parameters(
    parser: &Parser<'_>,
    params: &[Identifier],
    strict: bool,
    is_arrow: bool,
) -> Result<(), ParseError> {
    for (i, param) in params.iter().enumerate() {
        parser.check_binding_name(param, strict)?;

        if (strict || is_arrow) && params[..i].iter().any(|p| p.name == param.name) {
            return Err(ParseError::duplicate_parameter(
                parser.name_of(param.name),
                param.span,
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Blocks
// ============================================================================

/// Parse statements until a closing brace or end of input.
pub fn parse_statement_list(parser: &mut Parser<'_>) -> Result<Vec<Statement>, ParseError> {
    let mut statements = Vec::new();
    while !parser.check(&Token::RightBrace) && !parser.at_eof() {
        statements.push(parse_statement(parser)?);
    }
    Ok(statements)
}

/// Parse `{ statements }`.
pub fn parse_block_statement(parser: &mut Parser<'_>) -> Result<BlockStatement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::LeftBrace)?;

    let statements = parse_statement_list(parser)?;

    parser.expect(Token::RightBrace)?;
    Ok(BlockStatement {
        statements,
        span: parser.span_from(&start_span),
    })
}

// ============================================================================
// Control Flow Statements
// ============================================================================

/// Parse a parenthesized condition: `( expr )`.
fn parse_condition(parser: &mut Parser<'_>) -> Result<Expression, ParseError> {
    parser.expect(Token::LeftParen)?;
    let condition = parser.allowing_in(super::expr::parse_expression)?;
    parser.expect(Token::RightParen)?;
    Ok(condition)
}

/// Parse a loop body with one more enclosing loop in scope.
fn parse_loop_body(parser: &mut Parser<'_>) -> Result<Box<Statement>, ParseError> {
    parser.context.loop_depth += 1;
    let result = parse_statement(parser);
    parser.context.loop_depth -= 1;
    Ok(Box::new(result?))
}

fn parse_if_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::If)?;

    let test = parse_condition(parser)?;
    let consequent = Box::new(parse_statement(parser)?);

    let alternate = if parser.eat(&Token::Else) {
        Some(Box::new(parse_statement(parser)?))
    } else {
        None
    };

    Ok(Statement::If(IfStatement {
        test,
        consequent,
        alternate,
        span: parser.span_from(&start_span),
    }))
}

fn parse_while_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::While)?;

    let test = parse_condition(parser)?;
    let body = parse_loop_body(parser)?;

    Ok(Statement::While(WhileStatement {
        test,
        body,
        span: parser.span_from(&start_span),
    }))
}

/// `do body while (test)`, with an always-optional trailing semicolon.
fn parse_do_while_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Do)?;

    let body = parse_loop_body(parser)?;

    parser.expect(Token::While)?;
    let test = parse_condition(parser)?;
    parser.eat(&Token::Semicolon);

    Ok(Statement::DoWhile(DoWhileStatement {
        body,
        test,
        span: parser.span_from(&start_span),
    }))
}

/// Parse `for (init; test; update)` and `for (target in object)`.
fn parse_for_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::For)?;
    parser.expect(Token::LeftParen)?;

    let saved_no_in = std::mem::replace(&mut parser.no_in, true);
    let init = parse_for_init(parser);
    parser.no_in = saved_no_in;
    let init = init?;

    if parser.check(&Token::In) {
        let target = match init {
            Some(ForInit::VariableDecl(mut decl))
                if decl.declarations.len() == 1 && decl.declarations[0].init.is_none() =>
            {
                let declarator = decl.declarations.remove(0);
                ForInTarget::Declaration(decl.kind, declarator.id)
            }
            Some(ForInit::Expression(expr)) if expr.is_assignment_target() => {
                ForInTarget::Expression(expr)
            }
            _ => {
                return Err(ParseError::invalid_syntax(
                    "invalid left-hand side in for-in loop",
                    parser.current_span(),
                ))
            }
        };
        parser.advance();

        let object = super::expr::parse_expression(parser)?;
        parser.expect(Token::RightParen)?;
        let body = parse_loop_body(parser)?;

        return Ok(Statement::ForIn(ForInStatement {
            target,
            object,
            body,
            span: parser.span_from(&start_span),
        }));
    }

    parser.expect(Token::Semicolon)?;
    let test = if parser.check(&Token::Semicolon) {
        None
    } else {
        Some(super::expr::parse_expression(parser)?)
    };

    parser.expect(Token::Semicolon)?;
    let update = if parser.check(&Token::RightParen) {
        None
    } else {
        Some(super::expr::parse_expression(parser)?)
    };

    parser.expect(Token::RightParen)?;
    let body = parse_loop_body(parser)?;

    Ok(Statement::For(ForStatement {
        init,
        test,
        update,
        body,
        span: parser.span_from(&start_span),
    }))
}

fn parse_for_init(parser: &mut Parser<'_>) -> Result<Option<ForInit>, ParseError> {
    match parser.current() {
        Token::Semicolon => Ok(None),
        Token::Var | Token::Let | Token::Const => Ok(Some(ForInit::VariableDecl(
            parse_variable_declaration(parser)?,
        ))),
        _ => Ok(Some(ForInit::Expression(super::expr::parse_expression(parser)?))),
    }
}

fn parse_return_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Return)?;

    if !parser.context.in_function {
        return Err(ParseError::illegal_jump("return", "outside of a function", start_span));
    }

    let value = if parser.check(&Token::Semicolon)
        || parser.check(&Token::RightBrace)
        || parser.at_eof()
        || parser.newline_before()
    {
        None
    } else {
        Some(super::expr::parse_expression(parser)?)
    };

    consume_semicolon(parser)?;

    Ok(Statement::Return(ReturnStatement {
        value,
        span: parser.span_from(&start_span),
    }))
}

/// Parse an optional jump label on the same line.
fn parse_jump_label(parser: &mut Parser<'_>) -> Option<Identifier> {
    match parser.current() {
        Token::Identifier(name) if !parser.newline_before() => {
            let id = Identifier::new(*name, parser.current_span());
            parser.advance();
            Some(id)
        }
        _ => None,
    }
}

fn parse_break_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Break)?;

    let label = parse_jump_label(parser);
    match &label {
        Some(label) => {
            if !parser.context.labels.iter().any(|l| l.name == label.name) {
                return Err(ParseError::illegal_jump(
                    "break",
                    &format!("to undefined label '{}'", parser.name_of(label.name)),
                    label.span,
                ));
            }
        }
        None if parser.context.loop_depth == 0 => {
            return Err(ParseError::illegal_jump(
                "break",
                "outside of a loop",
                start_span,
            ));
        }
        None => {}
    }

    consume_semicolon(parser)?;
    Ok(Statement::Break(BreakStatement {
        label,
        span: parser.span_from(&start_span),
    }))
}

fn parse_continue_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Continue)?;

    if parser.context.loop_depth == 0 {
        return Err(ParseError::illegal_jump(
            "continue",
            "outside of a loop",
            start_span,
        ));
    }

    let label = parse_jump_label(parser);
    if let Some(label) = &label {
        if !parser
            .context
            .labels
            .iter()
            .any(|l| l.name == label.name && l.is_loop)
        {
            return Err(ParseError::illegal_jump(
                "continue",
                &format!("to non-loop label '{}'", parser.name_of(label.name)),
                label.span,
            ));
        }
    }

    consume_semicolon(parser)?;
    Ok(Statement::Continue(ContinueStatement {
        label,
        span: parser.span_from(&start_span),
    }))
}

fn parse_throw_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Throw)?;

    if parser.newline_before() {
        return Err(ParseError::invalid_syntax(
            "line break after 'throw'",
            parser.current_span(),
        ));
    }

    let value = super::expr::parse_expression(parser)?;
    consume_semicolon(parser)?;

    Ok(Statement::Throw(ThrowStatement {
        value,
        span: parser.span_from(&start_span),
    }))
}

fn parse_try_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    parser.expect(Token::Try)?;

    let block = parse_block_statement(parser)?;

    let handler = if parser.check(&Token::Catch) {
        let catch_span = parser.current_span();
        parser.advance();

        let param = if parser.eat(&Token::LeftParen) {
            let id = parse_binding_identifier(parser)?;
            parser.check_strict_binding(&id)?;
            parser.expect(Token::RightParen)?;
            Some(id)
        } else {
            None
        };

        let body = parse_block_statement(parser)?;
        Some(CatchClause {
            param,
            body,
            span: parser.span_from(&catch_span),
        })
    } else {
        None
    };

    let finalizer = if parser.eat(&Token::Finally) {
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    if handler.is_none() && finalizer.is_none() {
        return Err(parser.unexpected_token(&[Token::Catch, Token::Finally]));
    }

    Ok(Statement::Try(TryStatement {
        block,
        handler,
        finalizer,
        span: parser.span_from(&start_span),
    }))
}

fn parse_with_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    if parser.context.strict {
        return Err(ParseError::strict_mode("'with' statement is not allowed", start_span));
    }
    parser.expect(Token::With)?;

    let object = parse_condition(parser)?;
    let body = Box::new(parse_statement(parser)?);

    Ok(Statement::With(WithStatement {
        object,
        body,
        span: parser.span_from(&start_span),
    }))
}

fn parse_labeled_statement(parser: &mut Parser<'_>) -> Result<Statement, ParseError> {
    let start_span = parser.current_span();
    let label = parse_binding_identifier(parser)?;
    parser.expect(Token::Colon)?;

    if parser.context.labels.iter().any(|l| l.name == label.name) {
        return Err(ParseError::invalid_syntax(
            format!("label '{}' has already been declared", parser.name_of(label.name)),
            label.span,
        ));
    }

    let is_loop = matches!(parser.current(), Token::For | Token::While | Token::Do);
    parser.context.labels.push(LabelInfo {
        name: label.name,
        is_loop,
    });
    let body = parse_statement(parser);
    parser.context.labels.pop();

    Ok(Statement::Labeled(LabeledStatement {
        label,
        body: Box::new(body?),
        span: parser.span_from(&start_span),
    }))
}

