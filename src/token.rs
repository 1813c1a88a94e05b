use std::fmt;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

/// Token kinds produced by the lexer.
///
/// Identifiers and literals carry their payload inline, so the payload
/// always matches the kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier that is not a reserved word.
    Id(String),

    /// `var`
    Var,
    /// `function`
    Function,
    /// `if`
    If,
    /// `else`
    Else,
    /// `while`
    While,
    /// `end`
    End,
    /// `return`
    Return,
    /// `int`
    TypeInt,
    /// `real`
    TypeReal,
    /// `string`
    TypeString,

    /// Integer literal (`42`).
    Int(i64),
    /// Real literal (`4.2`).
    Real(f64),
    /// Double-quoted string literal, contents taken verbatim.
    Str(String),

    Comma,
    Colon,
    Semicolon,
    LPar,
    RPar,
    /// End-of-stream sentinel, always the last token.
    Finish,

    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!`
    Not,
    /// `=`
    Assign,
    /// `==`
    Equal,
    /// `!=`
    NotEq,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
}

impl TokenKind {
    /// Look up a reserved word. Matching is exact and case-sensitive.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "var" => Self::Var,
            "function" => Self::Function,
            "if" => Self::If,
            "else" => Self::Else,
            "while" => Self::While,
            "end" => Self::End,
            "return" => Self::Return,
            "int" => Self::TypeInt,
            "real" => Self::TypeReal,
            "string" => Self::TypeString,
            _ => return None,
        };
        Some(kind)
    }

    /// Listing name of the kind, without payload.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Id(_) => "ID",
            Self::Var => "VAR",
            Self::Function => "FUNCTION",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::While => "WHILE",
            Self::End => "END",
            Self::Return => "RETURN",
            Self::TypeInt | Self::Int(_) => "INT",
            Self::TypeReal | Self::Real(_) => "REAL",
            Self::TypeString | Self::Str(_) => "STR",
            Self::Comma => "COMMA",
            Self::Colon => "COLON",
            Self::Semicolon => "SEMICOLON",
            Self::LPar => "LPAR",
            Self::RPar => "RPAR",
            Self::Finish => "FINISH",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Assign => "ASSIGN",
            Self::Equal => "EQUAL",
            Self::NotEq => "NOTEQ",
            Self::Less => "LESS",
            Self::Greater => "GREATER",
            Self::GreaterEq => "GREATEREQ",
        }
    }

    /// Whether this is one of the reserved words.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Var
                | Self::Function
                | Self::If
                | Self::Else
                | Self::While
                | Self::End
                | Self::Return
                | Self::TypeInt
                | Self::TypeReal
                | Self::TypeString
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(text) | Self::Str(text) => write!(f, "{}({text})", self.name()),
            Self::Int(value) => write!(f, "{}({value})", self.name()),
            Self::Real(value) => write!(f, "{}({value})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

/// A single token with its kind and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Source line the token starts on.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.span.line
    }
}
