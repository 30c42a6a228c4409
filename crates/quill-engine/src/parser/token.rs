//! Tokens and source spans.
//!
//! Every token with a fixed spelling is listed once in the table passed to
//! `token_table!`; the enum, the keyword and punctuator lookups, and the
//! `Display` spelling are all generated from it.

use crate::parser::interner::Symbol;
use std::fmt;

/// Longest punctuator spelling (`>>>=`).
pub const MAX_PUNCTUATOR_LEN: usize = 4;

macro_rules! token_table {
    (
        keywords { $($kw:ident = $kw_text:literal,)* }
        punctuators { $($punct:ident = $punct_text:literal,)* }
    ) => {
        /// A token of Quill source text.
        ///
        /// Names and string contents are interned, so tokens are `Copy`.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum Token {
            $($kw,)*
            $($punct,)*
            NumberLiteral(f64),
            StringLiteral(Symbol),
            Identifier(Symbol),
            Eof,
        }

        impl Token {
            /// The keyword spelled `word`, if it is one.
            pub fn keyword(word: &str) -> Option<Token> {
                match word {
                    $($kw_text => Some(Token::$kw),)*
                    _ => None,
                }
            }

            /// The punctuator spelled exactly `text`, if it is one.
            pub fn punctuator(text: &str) -> Option<Token> {
                match text {
                    $($punct_text => Some(Token::$punct),)*
                    _ => None,
                }
            }

            /// Source spelling of keywords and punctuators.
            pub fn spelling(&self) -> Option<&'static str> {
                match self {
                    $(Token::$kw => Some($kw_text),)*
                    $(Token::$punct => Some($punct_text),)*
                    _ => None,
                }
            }

            /// Reserved words, including `true`, `false` and `null`.
            pub fn is_keyword(&self) -> bool {
                matches!(self, $(Token::$kw)|*)
            }
        }
    };
}

token_table! {
    keywords {
        Var = "var",
        Let = "let",
        Const = "const",
        Function = "function",
        If = "if",
        Else = "else",
        For = "for",
        While = "while",
        Do = "do",
        Break = "break",
        Continue = "continue",
        Return = "return",
        With = "with",
        Try = "try",
        Catch = "catch",
        Finally = "finally",
        Throw = "throw",
        New = "new",
        This = "this",
        Typeof = "typeof",
        Instanceof = "instanceof",
        In = "in",
        Delete = "delete",
        Void = "void",
        Yield = "yield",
        Debugger = "debugger",
        True = "true",
        False = "false",
        Null = "null",
    }
    punctuators {
        GreaterGreaterGreaterEqual = ">>>=",
        EqualEqualEqual = "===",
        BangEqualEqual = "!==",
        GreaterGreaterGreater = ">>>",
        StarStarEqual = "**=",
        LessLessEqual = "<<=",
        GreaterGreaterEqual = ">>=",
        DotDotDot = "...",
        Arrow = "=>",
        EqualEqual = "==",
        BangEqual = "!=",
        LessEqual = "<=",
        GreaterEqual = ">=",
        AmpAmp = "&&",
        PipePipe = "||",
        QuestionQuestion = "??",
        PlusPlus = "++",
        MinusMinus = "--",
        StarStar = "**",
        LessLess = "<<",
        GreaterGreater = ">>",
        PlusEqual = "+=",
        MinusEqual = "-=",
        StarEqual = "*=",
        SlashEqual = "/=",
        PercentEqual = "%=",
        AmpEqual = "&=",
        PipeEqual = "|=",
        CaretEqual = "^=",
        Plus = "+",
        Minus = "-",
        Star = "*",
        Slash = "/",
        Percent = "%",
        Bang = "!",
        Tilde = "~",
        Less = "<",
        Greater = ">",
        Amp = "&",
        Pipe = "|",
        Caret = "^",
        Equal = "=",
        Question = "?",
        Dot = ".",
        Colon = ":",
        LeftParen = "(",
        RightParen = ")",
        LeftBrace = "{",
        RightBrace = "}",
        LeftBracket = "[",
        RightBracket = "]",
        Semicolon = ";",
        Comma = ",",
    }
}

impl Token {
    /// Longest punctuator at the start of `text`, with its byte length.
    pub fn longest_punctuator(text: &str) -> Option<(Token, usize)> {
        (1..=MAX_PUNCTUATOR_LEN.min(text.len()))
            .rev()
            .filter_map(|len| text.get(..len))
            .find_map(|candidate| Token::punctuator(candidate).map(|token| (token, candidate.len())))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::NumberLiteral(n) => write!(f, "{}", n),
            Token::StringLiteral(_) => f.write_str("string literal"),
            Token::Identifier(_) => f.write_str("identifier"),
            Token::Eof => f.write_str("end of input"),
            other => f.write_str(other.spelling().unwrap_or("?")),
        }
    }
}

/// Source location of a token: byte range plus 1-based line and column
/// (columns count characters) of its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self { start, end, line, column }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(Token::keyword("yield"), Some(Token::Yield));
        assert_eq!(Token::keyword("null"), Some(Token::Null));
        assert_eq!(Token::keyword("arguments"), None);
    }

    #[test]
    fn test_longest_punctuator_wins() {
        assert_eq!(Token::longest_punctuator(">>>= x"), Some((Token::GreaterGreaterGreaterEqual, 4)));
        assert_eq!(Token::longest_punctuator("=>a"), Some((Token::Arrow, 2)));
        assert_eq!(Token::longest_punctuator("..x"), Some((Token::Dot, 1)));
        assert_eq!(Token::longest_punctuator("#"), None);
    }

    #[test]
    fn test_display_uses_spelling() {
        assert_eq!(Token::LeftBrace.to_string(), "{");
        assert_eq!(Token::Instanceof.to_string(), "instanceof");
        assert_eq!(Token::Eof.to_string(), "end of input");
    }
}
