//! Human-readable token listing.
//!
//! One token per line: the source line, a tab, the kind name, and the
//! payload for identifiers and literals.

use std::fmt::Write;

use crate::token::{Token, TokenKind};

/// Format a token stream as a listing.
#[must_use]
pub fn format_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        format_token(&mut out, token);
        out.push('\n');
    }
    out
}

fn format_token(out: &mut String, token: &Token) {
    let line = token.line();
    let name = token.kind.name();
    // Writing to a String cannot fail.
    let _ = match &token.kind {
        TokenKind::Id(text) | TokenKind::Str(text) => write!(out, "{line}\t{name}: {text}"),
        TokenKind::Int(value) => write!(out, "{line}\t{name}: {value}"),
        TokenKind::Real(value) => write!(out, "{line}\t{name}: {value:.6}"),
        _ => write!(out, "{line}\t{name}"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn payloads_are_listed() {
        let tokens = tokenize("x = 2.5;\n\"hi\" 7").expect("tokenize failed");
        assert_eq!(
            format_tokens(&tokens),
            "1\tID: x\n\
             1\tASSIGN\n\
             1\tREAL: 2.500000\n\
             1\tSEMICOLON\n\
             2\tSTR: hi\n\
             2\tINT: 7\n\
             2\tFINISH\n"
        );
    }

    #[test]
    fn keywords_have_no_payload() {
        let tokens = tokenize("var v: string;").expect("tokenize failed");
        let listing = format_tokens(&tokens);
        assert!(listing.starts_with("1\tVAR\n1\tID: v\n1\tCOLON\n1\tSTR\n"));
    }
}
