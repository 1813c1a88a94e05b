#![allow(dead_code)]

use quick_syntax::{ParseError, ParseErrorKind, Summary, TokenKind, parse, tokenize};

/// Token kinds of `input`, sentinel included.
pub fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
        .expect("tokenize failed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

/// Space-separated listing names of `input`, e.g. `ID(x) ASSIGN INT(1)`.
pub fn kind_names(input: &str) -> String {
    kinds(input)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Assert that `input` is a well-formed program.
pub fn accepts(input: &str) -> Summary {
    let tokens = tokenize(input).expect("tokenize failed");
    parse(&tokens).unwrap_or_else(|e| {
        panic!("expected a valid program: {e}\n--- source ---\n{input}")
    })
}

/// Parse `input`, expecting a syntax error.
pub fn rejects(input: &str) -> ParseError {
    let tokens = tokenize(input).expect("tokenize failed");
    match parse(&tokens) {
        Ok(summary) => panic!("expected a syntax error, got {summary:?}\n--- source ---\n{input}"),
        Err(e) => e,
    }
}

/// Assert the error kind and line of a rejected program.
pub fn assert_rejects(input: &str, kind: &ParseErrorKind, line: usize) {
    let err = rejects(input);
    assert_eq!(&err.kind, kind, "wrong error for:\n{input}");
    assert_eq!(err.span.line, line, "wrong line for:\n{input}");
}
