//! Syntax tree produced by the parser.
//!
//! Every node carries the `Span` it was parsed from. Function and arrow
//! bodies sit behind `Rc` so closure values share them with the tree.

use crate::parser::interner::Symbol;
use crate::parser::token::Span;

/// Implements `span()` for a node enum. `nodes` variants wrap a struct with
/// a `span` field; `bare` variants wrap the `Span` itself.
macro_rules! impl_span {
    ($ty:ident { nodes: [$($node:ident),* $(,)?], bare: [$($bare:ident),* $(,)?] $(,)? }) => {
        impl $ty {
            pub fn span(&self) -> Span {
                match self {
                    $($ty::$node(node) => node.span,)*
                    $($ty::$bare(span) => *span,)*
                }
            }
        }
    };
}

pub mod expression;
pub mod statement;

pub use expression::*;
pub use statement::*;

/// A parsed script, eval source, or `Function(...)` body.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    /// Strict because the caller was strict or because of a directive prologue
    pub strict: bool,
    pub span: Span,
}

impl Program {
    pub fn new(statements: Vec<Statement>, strict: bool, span: Span) -> Self {
        Self { statements, strict, span }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// A name at a particular place in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: Symbol,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: Symbol, span: Span) -> Self {
        Self { name, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_of_node_and_bare_variants() {
        let span = Span::new(3, 7, 1, 4);
        assert_eq!(Expression::NullLiteral(span).span(), span);
        assert_eq!(Statement::Debugger(span).span(), span);

        let number = Expression::NumberLiteral(NumberLiteral { value: 1.0, span });
        assert_eq!(number.span(), span);
    }
}
