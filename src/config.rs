//! Safety limits shared by the lexer and the parser.

/// Longest identifier, string literal, or number spelling accepted.
pub const DEFAULT_MAX_TEXT_LEN: usize = 127;

/// Default token-stream capacity, counting the end-of-stream sentinel.
pub const DEFAULT_MAX_TOKENS: usize = 4096;

/// Default bound on expression and block nesting.
pub const DEFAULT_MAX_NESTING: usize = 64;

/// Limits applied while checking one source.
///
/// Each call to [`crate::tokenize_with`] or [`crate::parse_with`] reads
/// the limits from here and keeps the rest of its state to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum length, in characters, of a text-carrying token.
    pub max_text_len: usize,
    /// Maximum number of tokens, or `None` for no limit.
    pub max_tokens: Option<usize>,
    /// Maximum nesting depth of expressions and blocks.
    pub max_nesting: usize,
}

impl Config {
    /// Create a configuration with the default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    /// Set the maximum text token length.
    #[must_use]
    pub const fn max_text_len(mut self, len: usize) -> Self {
        self.max_text_len = len;
        self
    }

    /// Set the token-stream capacity.
    #[must_use]
    pub const fn max_tokens(mut self, limit: usize) -> Self {
        self.max_tokens = Some(limit);
        self
    }

    /// Remove the token-stream capacity.
    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.max_tokens = None;
        self
    }

    /// Set the nesting bound.
    #[must_use]
    pub const fn max_nesting(mut self, depth: usize) -> Self {
        self.max_nesting = depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.max_text_len, 127);
        assert_eq!(config.max_tokens, Some(4096));
        assert_eq!(config.max_nesting, 64);
    }

    #[test]
    fn fluent_setters() {
        let config = Config::new().max_text_len(8).max_tokens(10).max_nesting(3);
        assert_eq!(config.max_text_len, 8);
        assert_eq!(config.max_tokens, Some(10));
        assert_eq!(config.max_nesting, 3);
        assert_eq!(config.unbounded().max_tokens, None);
    }
}
