//! Lexer for Quill source text.
//!
//! A single `logos` pass classifies the input into raw lexemes; the lexer
//! then resolves words against the keyword table, interns names and string
//! contents, and attaches line/column positions. Line tracking lives in the
//! `logos` extras so newlines inside comments and string continuations are
//! counted without a second scan.

use crate::parser::interner::Interner;
use crate::parser::token::{Span, Token};
use logos::Logos;

/// Line bookkeeping carried through the `logos` pass.
#[derive(Debug, Clone, Copy)]
struct LineTracker {
    /// 1-based line of the current position
    line: u32,
    /// Byte offset where that line starts
    line_start: usize,
}

impl Default for LineTracker {
    fn default() -> Self {
        Self { line: 1, line_start: 0 }
    }
}

impl LineTracker {
    /// Account for the newlines in `text`, which starts at byte `offset`.
    fn advance_over(&mut self, text: &str, offset: usize) {
        for (index, _) in text.match_indices('\n') {
            self.line += 1;
            self.line_start = offset + index + 1;
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(extras = LineTracker)]
#[logos(skip r"[ \t\r\f\u{000B}\u{00A0}\u{FEFF}]+")]
enum Lexeme {
    #[token("\n", newline)]
    Newline,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    /// Identifier or keyword
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,

    #[regex(r"0[xXbBoO][0-9a-zA-Z_]+", prefixed_number)]
    #[regex(r"([0-9][0-9_]*(\.[0-9_]*)?|\.[0-9][0-9_]*)([eE][+-]?[0-9_]+)?", decimal_number)]
    Number(f64),

    #[regex(r#""([^"\\\n]|\\.|\\\n)*""#)]
    #[regex(r"'([^'\\\n]|\\.|\\\n)*'")]
    Str,

    /// First character of a punctuator; the callback extends it to the
    /// longest spelling in the token table
    #[regex(r"[-+*/%!~<>&|^=?.:(){}\[\];,]", punctuator)]
    Punct(Token),
}

fn newline(lex: &mut logos::Lexer<Lexeme>) -> logos::Skip {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
    logos::Skip
}

fn block_comment(lex: &mut logos::Lexer<Lexeme>) -> logos::Skip {
    let body_start = lex.span().end;
    let rest = lex.remainder();
    // An unterminated comment runs to the end of input
    let len = rest.find("*/").map_or(rest.len(), |end| end + 2);
    lex.bump(len);
    let source = lex.source();
    lex.extras.advance_over(&source[body_start..body_start + len], body_start);
    logos::Skip
}

fn punctuator(lex: &mut logos::Lexer<Lexeme>) -> Option<Token> {
    let start = lex.span().start;
    let (token, len) = Token::longest_punctuator(&lex.source()[start..])?;
    lex.bump(len - 1);
    Some(token)
}

/// `0x`, `0b` and `0o` literals. Digits are accumulated as f64 so long
/// literals round the way script numbers do.
fn prefixed_number(lex: &mut logos::Lexer<Lexeme>) -> Option<f64> {
    let text = lex.slice();
    let radix = match text.as_bytes().get(1)? {
        b'x' | b'X' => 16,
        b'b' | b'B' => 2,
        _ => 8,
    };
    let digits = text[2..].replace('_', "");
    if digits.is_empty() {
        return None;
    }
    digits
        .chars()
        .try_fold(0.0, |acc: f64, c| c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d)))
}

fn decimal_number(lex: &mut logos::Lexer<Lexeme>) -> Option<f64> {
    let text = lex.slice();
    if text.contains("__") || text.ends_with('_') || text.contains("_.") || text.contains("._") {
        return None;
    }
    text.replace('_', "").parse().ok()
}

/// Decode the escapes in a string literal body (quotes already removed).
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else { break };
        match escaped {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            '\n' => {}
            'x' => push_code_point(&mut out, 'x', take_hex(&mut chars, 2, 2)),
            'u' if chars.peek() == Some(&'{') => {
                chars.next();
                let digits: String = chars.by_ref().take_while(|&ch| ch != '}').collect();
                push_code_point(&mut out, 'u', Some(digits));
            }
            'u' => push_code_point(&mut out, 'u', take_hex(&mut chars, 4, 4)),
            other => out.push(other),
        }
    }

    out
}

/// Up to `max` hex digits, or `None` if fewer than `min` were present.
fn take_hex(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, min: usize, max: usize) -> Option<String> {
    let mut digits = String::new();
    while digits.len() < max {
        match chars.peek() {
            Some(&ch) if ch.is_ascii_hexdigit() => {
                digits.push(ch);
                chars.next();
            }
            _ => break,
        }
    }
    (digits.len() >= min).then_some(digits)
}

/// Push the code point written in hex, or the escape letter itself when
/// the digits are unusable. Lone surrogates become U+FFFD.
fn push_code_point(out: &mut String, letter: char, digits: Option<String>) {
    match digits.as_deref().map(|hex| u32::from_str_radix(hex, 16)) {
        Some(Ok(code)) => out.push(char::from_u32(code).unwrap_or('\u{FFFD}')),
        _ => {
            out.push(letter);
            out.push_str(digits.as_deref().unwrap_or(""));
        }
    }
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnexpectedCharacter { char: char, span: Span },
    UnterminatedString { span: Span },
    InvalidNumber { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::InvalidNumber { span, .. } => *span,
        }
    }

    pub fn description(&self) -> String {
        match self {
            LexError::UnexpectedCharacter { char, .. } => format!("unexpected character '{}'", char),
            LexError::UnterminatedString { .. } => "unterminated string literal".to_string(),
            LexError::InvalidNumber { text, .. } => format!("invalid number literal '{}'", text),
        }
    }

    /// A suggestion for fixing the error, when there is an obvious one
    pub fn hint(&self) -> Option<String> {
        match self {
            LexError::UnterminatedString { .. } => {
                Some("close the string on the same line, or end the line with '\\'".to_string())
            }
            LexError::UnexpectedCharacter { char: '`', .. } => {
                Some("template literals are not supported; use string concatenation".to_string())
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let span = self.span();
        write!(f, "{} at {}:{}", self.description(), span.line, span.column)
    }
}

impl std::error::Error for LexError {}

/// Turns source text into `(Token, Span)` pairs ending with `Token::Eof`.
pub struct Lexer<'a> {
    source: &'a str,
    interner: &'a mut Interner,
}

impl<'a> Lexer<'a> {
    /// Create a lexer that interns names into `interner`.
    ///
    /// The interner is shared with the interpreter so that symbols produced
    /// by separate parses (the main program, direct eval, `Function(...)`)
    /// stay comparable.
    pub fn new(source: &'a str, interner: &'a mut Interner) -> Self {
        Self { source, interner }
    }

    /// Lex the whole input, collecting every error rather than stopping at
    /// the first.
    pub fn tokenize(self) -> Result<Vec<(Token, Span)>, Vec<LexError>> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        let mut lexemes = Lexeme::lexer(self.source);

        while let Some(result) = lexemes.next() {
            let range = lexemes.span();
            let span = self.span_at(range.start, range.end, lexemes.extras);
            let text = &self.source[range.clone()];

            match result {
                Ok(Lexeme::Word) => {
                    let token = Token::keyword(text).unwrap_or_else(|| Token::Identifier(self.interner.intern(text)));
                    tokens.push((token, span));
                }
                Ok(Lexeme::Number(value)) => tokens.push((Token::NumberLiteral(value), span)),
                Ok(Lexeme::Str) => {
                    let value = unescape(&text[1..text.len() - 1]);
                    tokens.push((Token::StringLiteral(self.interner.intern(&value)), span));
                    lexemes.extras.advance_over(text, range.start);
                }
                Ok(Lexeme::Punct(token)) => tokens.push((token, span)),
                // Skipped by their callbacks
                Ok(Lexeme::Newline | Lexeme::LineComment | Lexeme::BlockComment) => {}
                Err(()) => errors.push(self.classify_error(text, span)),
            }
        }

        let end = self.source.len();
        tokens.push((Token::Eof, self.span_at(end, end, lexemes.extras)));

        if errors.is_empty() {
            Ok(tokens)
        } else {
            Err(errors)
        }
    }

    fn span_at(&self, start: usize, end: usize, lines: LineTracker) -> Span {
        let column = self.source[lines.line_start..start].chars().count() as u32 + 1;
        Span::new(start, end, lines.line, column)
    }

    fn classify_error(&self, text: &str, span: Span) -> LexError {
        match text.chars().next() {
            Some('"' | '\'') => LexError::UnterminatedString { span },
            Some(c) if c.is_ascii_digit() || c == '.' => LexError::InvalidNumber {
                text: text.to_string(),
                span,
            },
            Some(c) => LexError::UnexpectedCharacter { char: c, span },
            None => LexError::UnexpectedCharacter { char: '\0', span },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        let mut interner = Interner::new();
        Lexer::new(source, &mut interner)
            .tokenize()
            .expect("should lex")
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_arrow_is_single_token() {
        assert_eq!(lex("=> = >"), vec![Token::Arrow, Token::Equal, Token::Greater, Token::Eof]);
        assert_eq!(lex("a=>a"), lex("a => a"));
    }

    #[test]
    fn test_keywords_are_not_identifiers() {
        assert_eq!(lex("yield")[0], Token::Yield);
        assert!(matches!(lex("yields")[0], Token::Identifier(_)));
        assert!(matches!(lex("arguments")[0], Token::Identifier(_)));
    }

    #[test]
    fn test_line_numbers_track_comments() {
        let source = "/* one\n two */ a\n// three\nb";
        let mut interner = Interner::new();
        let tokens = Lexer::new(source, &mut interner).tokenize().expect("should lex");
        assert_eq!((tokens[0].1.line, tokens[0].1.column), (2, 9));
        assert_eq!((tokens[1].1.line, tokens[1].1.column), (4, 1));
    }

    #[test]
    fn test_string_continuation_advances_lines() {
        let source = "'a\\\nb' c";
        let mut interner = Interner::new();
        let tokens = Lexer::new(source, &mut interner).tokenize().expect("should lex");
        assert!(matches!(tokens[0].0, Token::StringLiteral(sym) if interner.resolve(sym) == "ab"));
        assert_eq!((tokens[1].1.line, tokens[1].1.column), (2, 4));
    }

    #[test]
    fn test_string_escapes() {
        let mut interner = Interner::new();
        let tokens = Lexer::new(r#"'a\nb' "\x41B\u{43}D" '\q'"#, &mut interner)
            .tokenize()
            .expect("should lex");
        let strings: Vec<_> = tokens
            .iter()
            .filter_map(|(t, _)| match t {
                Token::StringLiteral(sym) => Some(interner.resolve(*sym).to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(strings, vec!["a\nb".to_string(), "ABCD".to_string(), "q".to_string()]);
    }

    #[test]
    fn test_numbers_are_f64() {
        assert_eq!(
            lex("0x1F 0b11 0o17 1_000 2.5 .5 1e3 5."),
            vec![
                Token::NumberLiteral(31.0),
                Token::NumberLiteral(3.0),
                Token::NumberLiteral(15.0),
                Token::NumberLiteral(1000.0),
                Token::NumberLiteral(2.5),
                Token::NumberLiteral(0.5),
                Token::NumberLiteral(1000.0),
                Token::NumberLiteral(5.0),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_bad_digits_are_invalid_numbers() {
        let mut interner = Interner::new();
        let errors = Lexer::new("0b102 1__0", &mut interner).tokenize().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, LexError::InvalidNumber { .. })));
    }

    #[test]
    fn test_unterminated_string_is_reported() {
        let mut interner = Interner::new();
        let errors = Lexer::new("'abc", &mut interner).tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
    }

    #[test]
    fn test_unexpected_character_reports_position() {
        let mut interner = Interner::new();
        let errors = Lexer::new("a\n  #", &mut interner).tokenize().unwrap_err();
        let span = errors[0].span();
        assert_eq!((span.line, span.column), (2, 3));
        assert_eq!(errors[0].to_string(), "unexpected character '#' at 2:3");
    }
}
