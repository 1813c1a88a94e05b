//! Lexer and syntax checker for Quick, a small imperative language.
//!
//! The lexer turns source text into a token stream ending in a
//! `FINISH` sentinel; the recursive-descent parser then decides whether
//! the stream is a well-formed program. Nothing else is built: no AST,
//! no symbol table, no evaluation.
//!
//! # Quick start
//!
//! ```
//! use quick_syntax::{check_str, tokenize, parse};
//!
//! let src = "var x: int;\nx = 3 + 4;\n";
//! let tokens = tokenize(src).unwrap();
//! let summary = parse(&tokens).unwrap();
//! assert_eq!(summary.variables, 1);
//! assert_eq!(summary.instructions, 1);
//!
//! let err = check_str("x = ;").unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "error in line 1: invalid or missing expression after ="
//! );
//! ```
//!
//! ## Limits
//!
//! ```
//! use quick_syntax::{Config, Error, check_str_with};
//!
//! let config = Config::new().max_tokens(3);
//! let err = check_str_with("a; b;", &config).unwrap_err();
//! assert!(matches!(err, Error::Lex(_)));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod config;
pub mod lexer;
pub mod listing;
pub mod parser;
pub mod token;

pub use config::Config;
pub use lexer::{LexError, LexErrorKind, tokenize, tokenize_with};
pub use listing::format_tokens;
pub use parser::{ParseError, ParseErrorKind, Summary, parse, parse_with};
pub use token::{Span, Token, TokenKind};

/// Unified error type covering both lexing and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Where the error was detected.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Lex(e) => e.span,
            Self::Parse(e) => e.span,
        }
    }
}

/// Tokenize and parse a source string in one step.
pub fn check_str(input: &str) -> Result<Summary, Error> {
    check_str_with(input, &Config::default())
}

/// Tokenize and parse a source string with explicit limits.
pub fn check_str_with(input: &str, config: &Config) -> Result<Summary, Error> {
    let tokens = tokenize_with(input, config)?;
    Ok(parse_with(&tokens, config)?)
}
