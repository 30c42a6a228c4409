//! Operator precedence table for expression parsing.
//!
//! Binary operators are parsed by precedence climbing over this table.
//! Assignment, conditional and arrow closures sit above it and are handled
//! by dedicated recursive-descent functions.

use crate::parser::ast::{BinaryOperator, LogicalOperator};
use crate::parser::token::Token;

/// Operator precedence level (higher = tighter binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None = 0,
    NullCoalescing = 1,  // ??
    LogicalOr = 2,       // ||
    LogicalAnd = 3,      // &&
    BitwiseOr = 4,       // |
    BitwiseXor = 5,      // ^
    BitwiseAnd = 6,      // &
    Equality = 7,        // ==, !=, ===, !==
    Relational = 8,      // <, >, <=, >=, instanceof, in
    Shift = 9,           // <<, >>, >>>
    Additive = 10,       // +, -
    Multiplicative = 11, // *, /, %
    Exponentiation = 12, // **
}

impl Precedence {
    /// The next-tighter level, used for left-associative operands.
    pub fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::NullCoalescing,
            Precedence::NullCoalescing => Precedence::LogicalOr,
            Precedence::LogicalOr => Precedence::LogicalAnd,
            Precedence::LogicalAnd => Precedence::BitwiseOr,
            Precedence::BitwiseOr => Precedence::BitwiseXor,
            Precedence::BitwiseXor => Precedence::BitwiseAnd,
            Precedence::BitwiseAnd => Precedence::Equality,
            Precedence::Equality => Precedence::Relational,
            Precedence::Relational => Precedence::Shift,
            Precedence::Shift => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative | Precedence::Exponentiation => Precedence::Exponentiation,
        }
    }
}

/// Get the precedence of a binary operator token.
///
/// `allow_in` is false inside a `for (...)` head, where `in` ends the
/// initializer instead of acting as an operator.
pub fn get_precedence(token: &Token, allow_in: bool) -> Precedence {
    match token {
        Token::QuestionQuestion => Precedence::NullCoalescing,
        Token::PipePipe => Precedence::LogicalOr,
        Token::AmpAmp => Precedence::LogicalAnd,
        Token::Pipe => Precedence::BitwiseOr,
        Token::Caret => Precedence::BitwiseXor,
        Token::Amp => Precedence::BitwiseAnd,

        Token::EqualEqual | Token::BangEqual | Token::EqualEqualEqual | Token::BangEqualEqual => {
            Precedence::Equality
        }

        Token::In if !allow_in => Precedence::None,
        Token::Less
        | Token::LessEqual
        | Token::Greater
        | Token::GreaterEqual
        | Token::Instanceof
        | Token::In => Precedence::Relational,

        Token::LessLess | Token::GreaterGreater | Token::GreaterGreaterGreater => Precedence::Shift,

        Token::Plus | Token::Minus => Precedence::Additive,

        Token::Star | Token::Slash | Token::Percent => Precedence::Multiplicative,

        // Exponentiation (right-associative)
        Token::StarStar => Precedence::Exponentiation,

        _ => Precedence::None,
    }
}

/// Check if a binary operator is right-associative.
pub fn is_right_associative(token: &Token) -> bool {
    matches!(token, Token::StarStar)
}

/// Operator produced by a binary-level token.
pub enum InfixOperator {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

/// Map a binary-level token to its AST operator.
pub fn infix_operator(token: &Token) -> Option<InfixOperator> {
    use InfixOperator::{Binary, Logical};
    let op = match token {
        Token::QuestionQuestion => Logical(LogicalOperator::NullishCoalescing),
        Token::PipePipe => Logical(LogicalOperator::Or),
        Token::AmpAmp => Logical(LogicalOperator::And),
        Token::Pipe => Binary(BinaryOperator::BitwiseOr),
        Token::Caret => Binary(BinaryOperator::BitwiseXor),
        Token::Amp => Binary(BinaryOperator::BitwiseAnd),
        Token::EqualEqual => Binary(BinaryOperator::Equal),
        Token::BangEqual => Binary(BinaryOperator::NotEqual),
        Token::EqualEqualEqual => Binary(BinaryOperator::StrictEqual),
        Token::BangEqualEqual => Binary(BinaryOperator::StrictNotEqual),
        Token::Less => Binary(BinaryOperator::LessThan),
        Token::LessEqual => Binary(BinaryOperator::LessEqual),
        Token::Greater => Binary(BinaryOperator::GreaterThan),
        Token::GreaterEqual => Binary(BinaryOperator::GreaterEqual),
        Token::Instanceof => Binary(BinaryOperator::InstanceOf),
        Token::In => Binary(BinaryOperator::In),
        Token::LessLess => Binary(BinaryOperator::LeftShift),
        Token::GreaterGreater => Binary(BinaryOperator::RightShift),
        Token::GreaterGreaterGreater => Binary(BinaryOperator::UnsignedRightShift),
        Token::Plus => Binary(BinaryOperator::Add),
        Token::Minus => Binary(BinaryOperator::Subtract),
        Token::Star => Binary(BinaryOperator::Multiply),
        Token::Slash => Binary(BinaryOperator::Divide),
        Token::Percent => Binary(BinaryOperator::Modulo),
        Token::StarStar => Binary(BinaryOperator::Exponent),
        _ => return None,
    };
    Some(op)
}
