//! Resynchronization after a syntax error.
//!
//! `quill check` reports every statement-level error in a file, so after a
//! failed statement the parser skips ahead to where another can start.

use super::Parser;
use crate::parser::token::Token;

fn starts_statement(token: &Token) -> bool {
    matches!(
        token,
        Token::Function
            | Token::Var
            | Token::Let
            | Token::Const
            | Token::If
            | Token::While
            | Token::Do
            | Token::For
            | Token::Try
            | Token::With
            | Token::Return
            | Token::Break
            | Token::Continue
            | Token::Throw
    )
}

impl Parser<'_> {
    /// Skip to the next statement keyword, or just past the next `;` or `}`.
    pub(super) fn skip_to_statement_boundary(&mut self) {
        while !self.at_eof() && !starts_statement(self.current()) {
            let ends_statement = matches!(self.current(), Token::Semicolon | Token::RightBrace);
            self.advance();
            if ends_statement {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::interner::Interner;
    use crate::parser::parser::Parser;
    use crate::parser::token::Token;

    #[test]
    fn test_stops_at_statement_keyword() {
        let mut interner = Interner::new();
        let mut parser = Parser::new("oops oops var x = 42;", &mut interner).expect("should lex");
        parser.skip_to_statement_boundary();
        assert_eq!(*parser.current(), Token::Var);
    }

    #[test]
    fn test_consumes_the_semicolon() {
        let mut interner = Interner::new();
        let mut parser = Parser::new("a b c; d", &mut interner).expect("should lex");
        parser.skip_to_statement_boundary();
        assert_eq!(parser.current_span().start, 7);
    }

    #[test]
    fn test_every_bad_statement_is_reported() {
        let mut interner = Interner::new();
        let errors = Parser::new("var a = ;\nvar ok = 1;\nvar b = (1 +;", &mut interner)
            .expect("should lex")
            .parse()
            .unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
