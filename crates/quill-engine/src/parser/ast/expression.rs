//! Expression nodes.

use super::*;
use crate::parser::interner::sym;
use crate::parser::token::Span;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    NumberLiteral(NumberLiteral),
    StringLiteral(StringLiteral),
    BooleanLiteral(BooleanLiteral),
    NullLiteral(Span),
    Identifier(Identifier),
    This(Span),
    Array(ArrayExpression),
    Object(ObjectExpression),
    Function(FunctionExpression),
    Arrow(ArrowFunction),
    /// `!x`, `-x`, `typeof x`, `delete o.p`
    Unary(UnaryExpression),
    /// `++x`, `x--`
    Update(UpdateExpression),
    Binary(BinaryExpression),
    /// Short-circuiting `&&`, `||` and `??`
    Logical(LogicalExpression),
    Assignment(AssignmentExpression),
    Conditional(ConditionalExpression),
    Call(CallExpression),
    /// `object.name`
    Member(MemberExpression),
    /// `object[index]`
    Index(IndexExpression),
    New(NewExpression),
    Sequence(SequenceExpression),
    /// Kept as a node so the arrow check can tell `((a)) => a` from `(a) => a`
    Parenthesized(ParenthesizedExpression),
}

impl_span!(Expression {
    nodes: [
        NumberLiteral, StringLiteral, BooleanLiteral, Identifier, Array, Object, Function,
        Arrow, Unary, Update, Binary, Logical, Assignment, Conditional, Call, Member, Index,
        New, Sequence, Parenthesized,
    ],
    bare: [NullLiteral, This],
});

impl Expression {
    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expression {
        match self {
            Expression::Parenthesized(group) => group.expression.unparenthesized(),
            other => other,
        }
    }

    /// A name, a property access, or one of those in parentheses.
    pub fn is_assignment_target(&self) -> bool {
        matches!(
            self.unparenthesized(),
            Expression::Identifier(_) | Expression::Member(_) | Expression::Index(_)
        )
    }

    /// A plain (possibly parenthesized) identifier reference.
    pub fn is_bare_identifier(&self) -> bool {
        matches!(self.unparenthesized(), Expression::Identifier(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: f64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: Symbol,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpression {
    /// `None` is a hole: `[a, , b]`
    pub elements: Vec<Option<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpression {
    pub properties: Vec<Property>,
    pub span: Span,
}

/// `key: value` inside an object literal
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Identifier(Identifier),
    StringLiteral(StringLiteral),
    NumberLiteral(NumberLiteral),
}

/// `function name(a, b) { ... }`, as an expression or inside a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    pub name: Option<Identifier>,
    pub params: Rc<[Identifier]>,
    pub body: Rc<BlockStatement>,
    pub strict: bool,
    /// Source text from `function` to the closing brace
    pub source: Rc<str>,
    pub span: Span,
}

/// `(a, b) => a + b`, `x => { ... }`
///
/// Produced only once the parser has seen `=>` and validated the head as a
/// parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    pub params: Rc<[Identifier]>,
    pub body: ArrowBody,
    /// Inherited from the enclosing code or set by a directive in a block body
    pub strict: bool,
    /// Source text from the first parameter token to the end of the body
    pub source: Rc<str>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// Concise body; its value is the call's result
    Expression(Rc<Expression>),
    /// Braced body; the result is `undefined` unless it returns
    Block(Rc<BlockStatement>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    BitwiseNot,
    Typeof,
    Void,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub operator: UpdateOperator,
    pub prefix: bool,
    pub argument: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    In,
    InstanceOf,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LeftShift,
    RightShift,
    UnsignedRightShift,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpression {
    pub operator: LogicalOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    NullishCoalescing,
}

/// `target = value` or a compound form such as `target += value`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    /// `None` for plain `=`, otherwise the operator applied before storing
    pub operator: Option<BinaryOperator>,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

/// `test ? consequent : alternate`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

impl CallExpression {
    /// `eval(...)` with the bare identifier as callee. Whether the call is
    /// actually a direct eval is decided at runtime by what `eval` resolves to.
    pub fn is_direct_eval_candidate(&self) -> bool {
        matches!(&*self.callee, Expression::Identifier(id) if id.name == sym::EVAL)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub object: Box<Expression>,
    pub index: Box<Expression>,
    pub span: Span,
}

/// `new Callee(args)`; `arguments` is empty for `new Callee`
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

/// `a, b, c`; evaluates to the last element
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceExpression {
    pub expressions: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesizedExpression {
    pub expression: Box<Expression>,
    pub span: Span,
}
