use std::fmt;

use crate::config::Config;
use crate::token::{Span, Token, TokenKind};

/// Classifies a parser error by the construct that was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An operator was not followed by its operand.
    MissingOperand { operator: &'static str },
    /// `(` not followed by an expression.
    MissingGroupedExpression,
    /// Parenthesized expression not closed by `)`.
    UnclosedGroup,
    /// `,` in a call not followed by an argument.
    MissingCallArgument,
    /// Call argument list not closed by `)`.
    UnclosedCall,
    /// Expression statement not terminated by `;`.
    MissingSemicolon,

    MissingIfParen,
    MissingIfCondition,
    UnclosedIfCondition,
    MissingIfBody,
    MissingElseBody,
    MissingIfEnd,

    MissingReturnValue,
    MissingReturnSemicolon,

    MissingWhileParen,
    MissingWhileCondition,
    UnclosedWhileCondition,
    MissingWhileBody,
    MissingWhileEnd,

    MissingParamColon,
    MissingParamType,
    /// `,` in a parameter list not followed by a parameter.
    MissingParam,

    MissingVarName,
    MissingVarColon,
    MissingVarType,
    MissingVarSemicolon,

    MissingFunctionName,
    MissingFunctionParen,
    UnclosedParams,
    MissingReturnTypeColon,
    MissingReturnType,
    MissingFunctionBody,
    MissingFunctionEnd,

    /// Expressions or blocks nested deeper than the configured bound.
    NestingTooDeep { limit: usize },
    /// The top level stopped on something other than the end of input.
    UnexpectedToken { found: Option<String> },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MissingOperand { operator } => {
                return write!(f, "invalid or missing expression after {operator}");
            }
            Self::MissingGroupedExpression => "invalid or missing expression after (",
            Self::UnclosedGroup => "missing ) or invalid expression after (",
            Self::MissingCallArgument => "invalid or missing call argument after ,",
            Self::UnclosedCall => "missing ) or invalid call argument",
            Self::MissingSemicolon => "missing ; after expression",
            Self::MissingIfParen => "missing ( after if",
            Self::MissingIfCondition => "invalid or missing if condition",
            Self::UnclosedIfCondition => "missing ) after if condition",
            Self::MissingIfBody => "invalid or missing if body",
            Self::MissingElseBody => "invalid or missing else block",
            Self::MissingIfEnd => "missing end after if body",
            Self::MissingReturnValue => "invalid or missing expression after return",
            Self::MissingReturnSemicolon => "missing ; after the return expression",
            Self::MissingWhileParen => "missing ( after while",
            Self::MissingWhileCondition => "invalid or missing while condition",
            Self::UnclosedWhileCondition => "missing ) after while condition",
            Self::MissingWhileBody => "invalid or missing while block",
            Self::MissingWhileEnd => "missing end after while loop",
            Self::MissingParamColon => "missing : after parameter name",
            Self::MissingParamType => "invalid or missing parameter type",
            Self::MissingParam => "invalid or missing function parameter after ,",
            Self::MissingVarName => "missing var name",
            Self::MissingVarColon => "missing : after var name",
            Self::MissingVarType => "invalid or missing var type",
            Self::MissingVarSemicolon => "missing ; after var type",
            Self::MissingFunctionName => "missing function name",
            Self::MissingFunctionParen => "missing ( after function name",
            Self::UnclosedParams => "invalid or missing function parameters or missing )",
            Self::MissingReturnTypeColon => "missing : before function return type",
            Self::MissingReturnType => "invalid or missing function return type after :",
            Self::MissingFunctionBody => "invalid or missing function body",
            Self::MissingFunctionEnd => "missing end after function body",
            Self::NestingTooDeep { limit } => {
                return write!(f, "nesting deeper than {limit} levels");
            }
            Self::UnexpectedToken { found: Some(t) } => {
                return write!(f, "syntax error: unexpected {t}");
            }
            Self::UnexpectedToken { found: None } => "syntax error: unexpected end of tokens",
        };
        f.write_str(msg)
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("error in line {}: {kind}", span.line)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Counts of the top-level items of a well-formed program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Global `var` definitions.
    pub variables: usize,
    /// `function` definitions.
    pub functions: usize,
    /// Instructions outside any function.
    pub instructions: usize,
}

/// Check a token stream against the grammar with the default limits.
///
/// The stream must end with [`TokenKind::Finish`] and is consumed
/// exactly through it.
///
/// # Errors
///
/// Returns the first `ParseError`; there is no recovery.
pub fn parse(tokens: &[Token]) -> Result<Summary, ParseError> {
    parse_with(tokens, &Config::default())
}

/// Check a token stream against the grammar with explicit limits.
pub fn parse_with(tokens: &[Token], config: &Config) -> Result<Summary, ParseError> {
    Parser::new(tokens, config.max_nesting).program()
}

/// `Ok(true)` when the rule matched, `Ok(false)` when it did not start,
/// `Err` once a committed production is missing a piece.
type Match = Result<bool, ParseError>;

static PREFIX_OPS: [(TokenKind, &str); 2] = [(TokenKind::Sub, "-"), (TokenKind::Not, "!")];
static MUL_OPS: [(TokenKind, &str); 2] = [(TokenKind::Mul, "*"), (TokenKind::Div, "/")];
static ADD_OPS: [(TokenKind, &str); 2] = [(TokenKind::Add, "+"), (TokenKind::Sub, "-")];
static COMP_OPS: [(TokenKind, &str); 5] = [
    (TokenKind::Less, "<"),
    (TokenKind::Equal, "=="),
    (TokenKind::NotEq, "!="),
    (TokenKind::Greater, ">"),
    (TokenKind::GreaterEq, ">="),
];
static LOGIC_OPS: [(TokenKind, &str); 2] = [(TokenKind::And, "&&"), (TokenKind::Or, "||")];

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    max_nesting: usize,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [Token], max_nesting: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            max_nesting,
        }
    }

    // program ::= ( defVar | defFunc | block )* FINISH
    fn program(mut self) -> Result<Summary, ParseError> {
        let mut summary = Summary::default();

        loop {
            if self.def_var()? {
                summary.variables += 1;
            } else if self.def_func()? {
                summary.functions += 1;
            } else {
                let instructions = self.block_len()?;
                if instructions == 0 {
                    break;
                }
                summary.instructions += instructions;
            }
        }

        if !self.consume(&TokenKind::Finish) || self.pos < self.tokens.len() {
            return Err(self.error(ParseErrorKind::UnexpectedToken {
                found: self.peek().map(ToString::to_string),
            }));
        }
        Ok(summary)
    }

    // defVar ::= VAR ID COLON baseType SEMICOLON
    fn def_var(&mut self) -> Match {
        if !self.consume(&TokenKind::Var) {
            return Ok(false);
        }
        self.expect_id(ParseErrorKind::MissingVarName)?;
        self.expect(&TokenKind::Colon, ParseErrorKind::MissingVarColon)?;
        self.need(Self::base_type, ParseErrorKind::MissingVarType)?;
        self.expect(&TokenKind::Semicolon, ParseErrorKind::MissingVarSemicolon)?;
        Ok(true)
    }

    // defFunc ::= FUNCTION ID LPAR funcParams? RPAR COLON baseType defVar* block END
    fn def_func(&mut self) -> Match {
        if !self.consume(&TokenKind::Function) {
            return Ok(false);
        }
        self.expect_id(ParseErrorKind::MissingFunctionName)?;
        self.expect(&TokenKind::LPar, ParseErrorKind::MissingFunctionParen)?;
        self.func_params()?;
        self.expect(&TokenKind::RPar, ParseErrorKind::UnclosedParams)?;
        self.expect(&TokenKind::Colon, ParseErrorKind::MissingReturnTypeColon)?;
        self.need(Self::base_type, ParseErrorKind::MissingReturnType)?;
        while self.def_var()? {}
        self.need(Self::block, ParseErrorKind::MissingFunctionBody)?;
        self.expect(&TokenKind::End, ParseErrorKind::MissingFunctionEnd)?;
        Ok(true)
    }

    // baseType ::= TYPE_INT | TYPE_REAL | TYPE_STRING
    fn base_type(&mut self) -> Match {
        Ok(self.consume_if(|k| {
            matches!(
                k,
                TokenKind::TypeInt | TokenKind::TypeReal | TokenKind::TypeString
            )
        }))
    }

    // funcParams ::= funcParam ( COMMA funcParam )*
    fn func_params(&mut self) -> Match {
        if !self.func_param()? {
            return Ok(false);
        }
        while self.consume(&TokenKind::Comma) {
            self.need(Self::func_param, ParseErrorKind::MissingParam)?;
        }
        Ok(true)
    }

    // funcParam ::= ID COLON baseType
    fn func_param(&mut self) -> Match {
        if !self.consume_id() {
            return Ok(false);
        }
        self.expect(&TokenKind::Colon, ParseErrorKind::MissingParamColon)?;
        self.need(Self::base_type, ParseErrorKind::MissingParamType)?;
        Ok(true)
    }

    // block ::= instr+
    fn block(&mut self) -> Match {
        Ok(self.block_len()? > 0)
    }

    /// Number of instructions in the block; zero when no block starts here.
    fn block_len(&mut self) -> Result<usize, ParseError> {
        self.nested(|p| {
            let mut count = 0;
            while p.instr()? {
                count += 1;
            }
            Ok(count)
        })
    }

    // instr ::= expr? SEMICOLON
    //         | IF LPAR expr RPAR block ( ELSE block )? END
    //         | RETURN expr SEMICOLON
    //         | WHILE LPAR expr RPAR block END
    fn instr(&mut self) -> Match {
        if self.expr()? {
            self.expect(&TokenKind::Semicolon, ParseErrorKind::MissingSemicolon)?;
            return Ok(true);
        }
        if self.consume(&TokenKind::Semicolon) {
            return Ok(true);
        }
        if self.consume(&TokenKind::If) {
            self.expect(&TokenKind::LPar, ParseErrorKind::MissingIfParen)?;
            self.need(Self::expr, ParseErrorKind::MissingIfCondition)?;
            self.expect(&TokenKind::RPar, ParseErrorKind::UnclosedIfCondition)?;
            self.need(Self::block, ParseErrorKind::MissingIfBody)?;
            if self.consume(&TokenKind::Else) {
                self.need(Self::block, ParseErrorKind::MissingElseBody)?;
            }
            self.expect(&TokenKind::End, ParseErrorKind::MissingIfEnd)?;
            return Ok(true);
        }
        if self.consume(&TokenKind::Return) {
            self.need(Self::expr, ParseErrorKind::MissingReturnValue)?;
            self.expect(&TokenKind::Semicolon, ParseErrorKind::MissingReturnSemicolon)?;
            return Ok(true);
        }
        if self.consume(&TokenKind::While) {
            self.expect(&TokenKind::LPar, ParseErrorKind::MissingWhileParen)?;
            self.need(Self::expr, ParseErrorKind::MissingWhileCondition)?;
            self.expect(&TokenKind::RPar, ParseErrorKind::UnclosedWhileCondition)?;
            self.need(Self::block, ParseErrorKind::MissingWhileBody)?;
            self.expect(&TokenKind::End, ParseErrorKind::MissingWhileEnd)?;
            return Ok(true);
        }
        Ok(false)
    }

    // expr ::= exprLogic
    fn expr(&mut self) -> Match {
        self.nested(Self::expr_logic)
    }

    // exprLogic ::= exprAssign ( ( AND | OR ) exprAssign )*
    fn expr_logic(&mut self) -> Match {
        self.binary(&LOGIC_OPS, Self::expr_assign)
    }

    // exprAssign ::= ( ID ASSIGN )? exprComp
    fn expr_assign(&mut self) -> Match {
        if self.attempt(|p| p.consume_id() && p.consume(&TokenKind::Assign)) {
            self.need(
                Self::expr_comp,
                ParseErrorKind::MissingOperand { operator: "=" },
            )?;
            return Ok(true);
        }
        self.expr_comp()
    }

    // exprComp ::= exprAdd ( ( LESS | EQUAL | NOTEQ | GREATER | GREATEREQ ) exprAdd )*
    fn expr_comp(&mut self) -> Match {
        self.binary(&COMP_OPS, Self::expr_add)
    }

    // exprAdd ::= exprMul ( ( ADD | SUB ) exprMul )*
    fn expr_add(&mut self) -> Match {
        self.binary(&ADD_OPS, Self::expr_mul)
    }

    // exprMul ::= exprPrefix ( ( MUL | DIV ) exprPrefix )*
    fn expr_mul(&mut self) -> Match {
        self.binary(&MUL_OPS, Self::expr_prefix)
    }

    // exprPrefix ::= ( SUB | NOT )? factor
    fn expr_prefix(&mut self) -> Match {
        if let Some(operator) = self.consume_operator(&PREFIX_OPS) {
            self.need(Self::factor, ParseErrorKind::MissingOperand { operator })?;
            return Ok(true);
        }
        self.factor()
    }

    // factor ::= INT | REAL | STR
    //          | LPAR expr RPAR
    //          | ID ( LPAR ( expr ( COMMA expr )* )? RPAR )?
    fn factor(&mut self) -> Match {
        if self.consume_if(|k| {
            matches!(
                k,
                TokenKind::Int(_) | TokenKind::Real(_) | TokenKind::Str(_)
            )
        }) {
            return Ok(true);
        }
        if self.consume(&TokenKind::LPar) {
            self.need(Self::expr, ParseErrorKind::MissingGroupedExpression)?;
            self.expect(&TokenKind::RPar, ParseErrorKind::UnclosedGroup)?;
            return Ok(true);
        }
        if self.consume_id() {
            if self.consume(&TokenKind::LPar) {
                if self.expr()? {
                    while self.consume(&TokenKind::Comma) {
                        self.need(Self::expr, ParseErrorKind::MissingCallArgument)?;
                    }
                }
                self.expect(&TokenKind::RPar, ParseErrorKind::UnclosedCall)?;
            }
            return Ok(true);
        }
        Ok(false)
    }

    /// `operand ( op operand )*` for a left-associative precedence level.
    fn binary(
        &mut self,
        ops: &[(TokenKind, &'static str)],
        operand: fn(&mut Self) -> Match,
    ) -> Match {
        if !operand(self)? {
            return Ok(false);
        }
        while let Some(operator) = self.consume_operator(ops) {
            self.need(operand, ParseErrorKind::MissingOperand { operator })?;
        }
        Ok(true)
    }

    /// Run `rule` and rewind the cursor if it does not match.
    fn attempt(&mut self, rule: impl FnOnce(&mut Self) -> bool) -> bool {
        let start = self.pos;
        let matched = rule(self);
        if !matched {
            self.pos = start;
        }
        matched
    }

    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_nesting {
            return Err(self.error(ParseErrorKind::NestingTooDeep {
                limit: self.max_nesting,
            }));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Run a rule that must match at this point.
    fn need(&mut self, rule: fn(&mut Self) -> Match, kind: ParseErrorKind) -> Result<(), ParseError> {
        if rule(self)? {
            Ok(())
        } else {
            Err(self.error(kind))
        }
    }

    fn expect(&mut self, expected: &TokenKind, kind: ParseErrorKind) -> Result<(), ParseError> {
        if self.consume(expected) {
            Ok(())
        } else {
            Err(self.error(kind))
        }
    }

    fn expect_id(&mut self, kind: ParseErrorKind) -> Result<(), ParseError> {
        if self.consume_id() {
            Ok(())
        } else {
            Err(self.error(kind))
        }
    }

    fn peek(&self) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn consume_if(&mut self, pred: impl FnOnce(&TokenKind) -> bool) -> bool {
        if self.peek().is_some_and(pred) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn consume(&mut self, expected: &TokenKind) -> bool {
        self.consume_if(|k| k == expected)
    }

    fn consume_id(&mut self) -> bool {
        self.consume_if(|k| matches!(k, TokenKind::Id(_)))
    }

    fn consume_operator(&mut self, ops: &[(TokenKind, &'static str)]) -> Option<&'static str> {
        ops.iter()
            .find(|(kind, _)| self.consume(kind))
            .map(|&(_, operator)| operator)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            span: self.current_span(),
        }
    }

    /// Span of the current token, or of the last one past the end.
    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(Span { line: 1, column: 1 }, |t| t.span)
    }
}
