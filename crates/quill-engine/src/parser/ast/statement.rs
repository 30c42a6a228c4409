//! Statement nodes.

use super::*;
use crate::parser::token::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDecl(VariableDecl),
    /// Hoisted to the top of the enclosing function or block
    FunctionDecl(FunctionDecl),
    Expression(ExpressionStatement),
    Block(BlockStatement),
    If(IfStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    For(ForStatement),
    ForIn(ForInStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    Return(ReturnStatement),
    Throw(ThrowStatement),
    Try(TryStatement),
    With(WithStatement),
    Labeled(LabeledStatement),
    /// No-op
    Debugger(Span),
    Empty(Span),
}

impl_span!(Statement {
    nodes: [
        VariableDecl, FunctionDecl, Expression, Block, If, While, DoWhile, For, ForIn,
        Break, Continue, Return, Throw, Try, With, Labeled,
    ],
    bare: [Debugger, Empty],
});

/// `var a = 1, b;`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Function scoped and hoisted
    Var,
    Let,
    /// Rejects assignment after initialization
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub id: Identifier,
    pub init: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub function: FunctionExpression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub span: Span,
}

/// `break` or `break label`
#[derive(Debug, Clone, PartialEq)]
pub struct BreakStatement {
    pub label: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStatement {
    pub label: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Box<Statement>,
    pub alternate: Option<Box<Statement>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub test: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

/// `do body while (test)`; the body always runs once
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    pub body: Box<Statement>,
    pub test: Expression,
    pub span: Span,
}

/// `for (init; test; update) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: Option<ForInit>,
    pub test: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    VariableDecl(VariableDecl),
    Expression(Expression),
}

/// `for (target in object) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForInStatement {
    pub target: ForInTarget,
    pub object: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInTarget {
    /// `var k`, `let k` or `const k`
    Declaration(VariableKind, Identifier),
    /// Any assignable expression: `k`, `o.k`
    Expression(Expression),
}

/// At least one of `handler` and `finalizer` is present.
#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub block: BlockStatement,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStatement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// `None` for `catch { ... }`
    pub param: Option<Identifier>,
    pub body: BlockStatement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithStatement {
    pub object: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStatement {
    pub label: Identifier,
    pub body: Box<Statement>,
    pub span: Span,
}
