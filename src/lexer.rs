use std::fmt;

use crate::config::Config;
use crate::token::{Span, Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// End of input reached before the closing `"`.
    UnterminatedString,
    /// Identifier, string, or number spelling longer than the limit.
    TextTooLong { limit: usize },
    /// Token stream reached its configured capacity.
    TooManyTokens { limit: usize },
    /// Character that cannot start any token.
    UnexpectedCharacter(char),
    /// Numeric literal that does not fit its value type.
    NumberOutOfRange(String),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => {
                write!(f, "end of file while in string")
            }
            Self::TextTooLong { limit } => {
                write!(f, "text longer than {limit} characters")
            }
            Self::TooManyTokens { limit } => {
                write!(f, "too many tokens (limit {limit})")
            }
            Self::UnexpectedCharacter(ch) => {
                write!(f, "invalid char: {ch} ({})", u32::from(*ch))
            }
            Self::NumberOutOfRange(text) => {
                write!(f, "numeric literal out of range: {text}")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("error in line {}: {kind}", span.line)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize a source string with the default limits.
///
/// The returned stream always ends with a single [`TokenKind::Finish`].
///
/// # Errors
///
/// Returns `LexError` on unterminated strings, over-long text tokens,
/// token-stream overflow, or characters that start no token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with(input, &Config::default())
}

/// Tokenize a source string with explicit limits.
pub fn tokenize_with(input: &str, config: &Config) -> Result<Vec<Token>, LexError> {
    Lexer::new(input, config).tokenize()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    config: &'a Config,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str, config: &'a Config) -> Self {
        let start = if input.as_bytes().starts_with(&[0xEF, 0xBB, 0xBF]) {
            3
        } else {
            0
        };
        Self {
            input,
            pos: start,
            line: 1,
            col: 1,
            config,
            tokens: Vec::new(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        loop {
            let start = self.span();

            // NUL ends the input the same way the end of the buffer does.
            let Some(ch) = self.peek().filter(|&b| b != 0) else {
                self.push(TokenKind::Finish, start)?;
                return Ok(self.tokens);
            };

            match ch {
                b' ' | b'\t' => self.advance(),
                b'\r' | b'\n' => self.newline(),
                b'#' => self.skip_comment(),
                b',' => self.single(TokenKind::Comma, start)?,
                b'(' => self.single(TokenKind::LPar, start)?,
                b')' => self.single(TokenKind::RPar, start)?,
                b':' => self.single(TokenKind::Colon, start)?,
                b';' => self.single(TokenKind::Semicolon, start)?,
                b'+' => self.single(TokenKind::Add, start)?,
                b'-' => self.single(TokenKind::Sub, start)?,
                b'*' => self.single(TokenKind::Mul, start)?,
                b'/' => self.single(TokenKind::Div, start)?,
                b'<' => self.single(TokenKind::Less, start)?,
                b'=' => self.one_or_two(TokenKind::Assign, TokenKind::Equal, start)?,
                b'>' => self.one_or_two(TokenKind::Greater, TokenKind::GreaterEq, start)?,
                b'!' => self.one_or_two(TokenKind::Not, TokenKind::NotEq, start)?,
                b'&' => self.doubled(TokenKind::And, start)?,
                b'|' => self.doubled(TokenKind::Or, start)?,
                b'"' => self.read_string()?,
                b'0'..=b'9' => self.read_number()?,
                c if c.is_ascii_alphabetic() || c == b'_' => self.read_word()?,
                _ => return Err(self.unexpected_character(start)),
            }
        }
    }

    const fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.col,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(byte) = self.peek() {
            // continuation bytes of a multi-byte character share its column
            if byte & 0xC0 != 0x80 {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    /// Consume one line terminator: CR, LF, or CR+LF.
    fn newline(&mut self) {
        if self.peek() == Some(b'\r') {
            self.pos += 1;
        }
        if self.peek() == Some(b'\n') {
            self.pos += 1;
        }
        self.line += 1;
        self.col = 1;
    }

    fn push(&mut self, kind: TokenKind, span: Span) -> Result<(), LexError> {
        if let Some(limit) = self
            .config
            .max_tokens
            .filter(|&limit| self.tokens.len() >= limit)
        {
            return Err(LexError {
                kind: LexErrorKind::TooManyTokens { limit },
                span,
            });
        }
        self.tokens.push(Token { kind, span });
        Ok(())
    }

    fn single(&mut self, kind: TokenKind, span: Span) -> Result<(), LexError> {
        self.advance();
        self.push(kind, span)
    }

    /// `x` or `x=`, longest match wins.
    fn one_or_two(&mut self, short: TokenKind, long: TokenKind, span: Span) -> Result<(), LexError> {
        self.advance();
        if self.peek() == Some(b'=') {
            self.advance();
            self.push(long, span)
        } else {
            self.push(short, span)
        }
    }

    /// `&&` or `||`; the single character alone is not a token.
    fn doubled(&mut self, kind: TokenKind, span: Span) -> Result<(), LexError> {
        let ch = self.peek();
        if self.peek_at(1) != ch {
            return Err(self.unexpected_character(span));
        }
        self.advance();
        self.advance();
        self.push(kind, span)
    }

    fn skip_comment(&mut self) {
        while !matches!(self.peek(), None | Some(b'\r' | b'\n' | 0)) {
            self.advance();
        }
    }

    fn check_len(&self, text: &str, span: Span) -> Result<(), LexError> {
        let limit = self.config.max_text_len;
        if text.chars().count() > limit {
            return Err(LexError {
                kind: LexErrorKind::TextTooLong { limit },
                span,
            });
        }
        Ok(())
    }

    fn read_string(&mut self) -> Result<(), LexError> {
        let span = self.span();
        self.advance(); // opening quote
        let start = self.pos;

        loop {
            match self.peek() {
                None | Some(0) => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedString,
                        span,
                    });
                }
                Some(b'"') => break,
                Some(b'\r' | b'\n') => self.newline(),
                Some(_) => self.advance(),
            }
        }

        let text = self.input[start..self.pos].to_string();
        self.check_len(&text, span)?;
        self.advance(); // closing quote
        self.push(TokenKind::Str(text), span)
    }

    fn read_number(&mut self) -> Result<(), LexError> {
        let span = self.span();
        let start = self.pos;
        self.skip_digits();

        let is_real = self.peek() == Some(b'.');
        if is_real {
            self.advance();
            self.skip_digits();
        }

        let text = &self.input[start..self.pos];
        self.check_len(text, span)?;

        let out_of_range = || LexError {
            kind: LexErrorKind::NumberOutOfRange(text.to_string()),
            span,
        };
        let kind = if is_real {
            TokenKind::Real(text.parse().map_err(|_| out_of_range())?)
        } else {
            TokenKind::Int(text.parse().map_err(|_| out_of_range())?)
        };
        self.push(kind, span)
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
    }

    fn read_word(&mut self) -> Result<(), LexError> {
        let span = self.span();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        self.check_len(text, span)?;

        let kind = TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Id(text.to_string()));
        self.push(kind, span)
    }

    fn unexpected_character(&self, span: Span) -> LexError {
        let ch = self.input[self.pos..]
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        LexError {
            kind: LexErrorKind::UnexpectedCharacter(ch),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("should tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn empty_input_is_just_finish() {
        assert_eq!(kinds(""), vec![TokenKind::Finish]);
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            kinds(",():;+"),
            vec![
                TokenKind::Comma,
                TokenKind::LPar,
                TokenKind::RPar,
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Add,
                TokenKind::Finish,
            ]
        );
    }

    #[test]
    fn assign_vs_equal() {
        assert_eq!(
            kinds("= == ==="),
            vec![
                TokenKind::Assign,
                TokenKind::Equal,
                TokenKind::Equal,
                TokenKind::Assign,
                TokenKind::Finish,
            ]
        );
    }

    #[test]
    fn greater_is_not_followed_by_less() {
        assert_eq!(
            kinds("a > b >= c"),
            vec![
                TokenKind::Id("a".to_string()),
                TokenKind::Greater,
                TokenKind::Id("b".to_string()),
                TokenKind::GreaterEq,
                TokenKind::Id("c".to_string()),
                TokenKind::Finish,
            ]
        );
    }

    #[test]
    fn logical_operators() {
        assert_eq!(
            kinds("! != && ||"),
            vec![
                TokenKind::Not,
                TokenKind::NotEq,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Finish,
            ]
        );
    }

    #[test]
    fn lone_ampersand_is_rejected() {
        let err = tokenize("a & b").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('&'));
        assert_eq!(err.span.column, 3);
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("42 3.25 7."),
            vec![
                TokenKind::Int(42),
                TokenKind::Real(3.25),
                TokenKind::Real(7.0),
                TokenKind::Finish,
            ]
        );
    }

    #[test]
    fn integer_overflow() {
        let err = tokenize("99999999999999999999").unwrap_err();
        assert!(matches!(err.kind, LexErrorKind::NumberOutOfRange(_)));
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("var Var _var var1"),
            vec![
                TokenKind::Var,
                TokenKind::Id("Var".to_string()),
                TokenKind::Id("_var".to_string()),
                TokenKind::Id("var1".to_string()),
                TokenKind::Finish,
            ]
        );
    }

    #[test]
    fn raw_string() {
        let tokens = tokenize(r#""a\nb""#).expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Str(r"a\nb".to_string()));
    }

    #[test]
    fn unterminated_string() {
        let err = tokenize("\"abc").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.span.line, 1);
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(
            kinds("# nothing ; here\n;"),
            vec![TokenKind::Semicolon, TokenKind::Finish]
        );
    }

    #[test]
    fn line_terminators() {
        let tokens = tokenize("a\rb\r\nc\nd").expect("should tokenize");
        let lines: Vec<_> = tokens.iter().map(Token::line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4, 4]);
    }

    #[test]
    fn nul_terminates_input() {
        assert_eq!(kinds("; \0 ;"), vec![TokenKind::Semicolon, TokenKind::Finish]);
    }

    #[test]
    fn bom_stripping() {
        assert_eq!(kinds("\u{FEFF};"), vec![TokenKind::Semicolon, TokenKind::Finish]);
    }

    #[test]
    fn invalid_char_message_names_code() {
        let err = tokenize("x = 1 @").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('@'));
        assert_eq!(err.to_string(), "error in line 1: invalid char: @ (64)");
    }

    #[test]
    fn span_tracking() {
        let tokens = tokenize("a\n  bc d").expect("should tokenize");
        assert_eq!(tokens[0].span, Span { line: 1, column: 1 });
        assert_eq!(tokens[1].span, Span { line: 2, column: 3 });
        assert_eq!(tokens[2].span, Span { line: 2, column: 6 });
    }
}
