//! Nesting limit for the recursive-descent parser.

use super::{ParseError, Parser};

/// Deepest nesting of statements and assignment-level expressions.
///
/// Each level costs several native frames, so this bounds the parser's
/// stack use on inputs like `((((...))))` or `a => a => a => ...`.
pub const MAX_PARSE_DEPTH: usize = 96;

impl Parser<'_> {
    /// Run `f` one nesting level deeper. `what` names the construct in the
    /// error raised once the limit is reached.
    pub(crate) fn nested<T>(
        &mut self,
        what: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(ParseError::parser_limit_exceeded(
                format!("{} nested more than {} levels deep", what, MAX_PARSE_DEPTH),
                self.current_span(),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::interner::Interner;
    use crate::parser::parser::ParseErrorKind;

    fn parse(source: &str) -> Result<(), Vec<ParseError>> {
        let mut interner = Interner::new();
        Parser::new(source, &mut interner).expect("should lex").parse().map(|_| ())
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let source = format!("{}1{};", "(".repeat(40), ")".repeat(40));
        let result = crate::interpreter::run_with_large_stack(|| parse(&source)).expect("spawn parser thread");
        assert!(result.is_ok());
    }

    #[test]
    fn test_deep_nesting_is_a_limit_error() {
        let source = format!("{}1{};", "[".repeat(MAX_PARSE_DEPTH + 10), "]".repeat(MAX_PARSE_DEPTH + 10));
        let errors = crate::interpreter::run_with_large_stack(|| parse(&source))
            .expect("spawn parser thread")
            .unwrap_err();
        assert!(matches!(errors[0].kind, ParseErrorKind::ParserLimitExceeded { .. }));
    }

    #[test]
    fn test_depth_is_restored_after_errors() {
        let mut interner = Interner::new();
        let mut parser = Parser::new("x", &mut interner).expect("should lex");
        let result: Result<(), ParseError> = parser.nested("test", |p| {
            Err(ParseError::invalid_syntax("boom", p.current_span()))
        });
        assert!(result.is_err());
        assert_eq!(parser.depth, 0);
    }
}
