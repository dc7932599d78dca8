//! Tokens produced by the lexer.

use std::fmt;
use std::ops::Index;

use crate::{Name, Op, Span};

/// Token kinds.
///
/// `Newline`, `Indent` and `Dedent` carry the block structure of the source:
/// the lexer turns leading whitespace into `Indent`/`Dedent` pairs so the
/// parser never looks at columns.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Layout
    Eof,
    Newline,
    Indent,
    Dedent,

    // Literals and names
    Ident(Name),
    /// Integer literal value.
    Int(u64),
    /// Float literal, stored as `f64::to_bits` for `Eq`/`Hash`.
    Float(u64),
    /// String literal with escapes already processed.
    Str(Name),

    // Keywords
    Def,
    Extern,
    Return,
    If,
    Elif,
    Else,
    For,
    In,
    Range,
    While,
    Do,
    Break,
    Continue,
    Print,
    Type,
    Struct,
    Const,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,
    Eq,
    Arrow,
    At,

    /// Any operator, including the keyword operators `not`, `and`, `or`.
    Op(Op),

    /// Placeholder for a lexeme that failed to lex. A diagnostic was
    /// already recorded for it.
    Error,
}

impl TokenKind {
    /// Number of distinct discriminants, used to size token sets.
    pub const TAG_COUNT: u8 = 37;

    /// Dense discriminant index, ignoring payloads.
    pub const fn tag(&self) -> u8 {
        match self {
            TokenKind::Eof => 0,
            TokenKind::Newline => 1,
            TokenKind::Indent => 2,
            TokenKind::Dedent => 3,
            TokenKind::Ident(_) => 4,
            TokenKind::Int(_) => 5,
            TokenKind::Float(_) => 6,
            TokenKind::Str(_) => 7,
            TokenKind::Def => 8,
            TokenKind::Extern => 9,
            TokenKind::Return => 10,
            TokenKind::If => 11,
            TokenKind::Elif => 12,
            TokenKind::Else => 13,
            TokenKind::For => 14,
            TokenKind::In => 15,
            TokenKind::Range => 16,
            TokenKind::While => 17,
            TokenKind::Do => 18,
            TokenKind::Break => 19,
            TokenKind::Continue => 20,
            TokenKind::Print => 21,
            TokenKind::Type => 22,
            TokenKind::Struct => 23,
            TokenKind::Const => 24,
            TokenKind::LParen => 25,
            TokenKind::RParen => 26,
            TokenKind::LBracket => 27,
            TokenKind::RBracket => 28,
            TokenKind::Comma => 29,
            TokenKind::Colon => 30,
            TokenKind::Dot => 31,
            TokenKind::Eq => 32,
            TokenKind::Arrow => 33,
            TokenKind::At => 34,
            TokenKind::Op(_) => 35,
            TokenKind::Error => 36,
        }
    }

    /// Keyword lookup for an identifier-shaped lexeme.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "def" => TokenKind::Def,
            "extern" => TokenKind::Extern,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "range" => TokenKind::Range,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "print" => TokenKind::Print,
            "type" => TokenKind::Type,
            "struct" => TokenKind::Struct,
            "const" => TokenKind::Const,
            "not" => TokenKind::Op(Op::Not),
            "and" => TokenKind::Op(Op::And),
            "or" => TokenKind::Op(Op::Or),
            _ => return None,
        };
        Some(kind)
    }

    /// Short human description for "expected X, found Y" messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Eof => "end of input",
            TokenKind::Newline => "end of line",
            TokenKind::Indent => "indentation",
            TokenKind::Dedent => "end of block",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(_) => "integer literal",
            TokenKind::Float(_) => "float literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::Def => "`def`",
            TokenKind::Extern => "`extern`",
            TokenKind::Return => "`return`",
            TokenKind::If => "`if`",
            TokenKind::Elif => "`elif`",
            TokenKind::Else => "`else`",
            TokenKind::For => "`for`",
            TokenKind::In => "`in`",
            TokenKind::Range => "`range`",
            TokenKind::While => "`while`",
            TokenKind::Do => "`do`",
            TokenKind::Break => "`break`",
            TokenKind::Continue => "`continue`",
            TokenKind::Print => "`print`",
            TokenKind::Type => "`type`",
            TokenKind::Struct => "`struct`",
            TokenKind::Const => "`const`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Dot => "`.`",
            TokenKind::Eq => "`=`",
            TokenKind::Arrow => "`->`",
            TokenKind::At => "`@`",
            TokenKind::Op(_) => "operator",
            TokenKind::Error => "invalid token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Op(op) => write!(f, "`{op}`"),
            TokenKind::Int(v) => write!(f, "`{v}`"),
            TokenKind::Float(bits) => write!(f, "`{}`", f64::from_bits(*bits)),
            other => f.write_str(other.display_name()),
        }
    }
}

/// A token with its source span.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// The full token stream of one file. Always ends with `Eof`.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Token kinds only, for assertions in tests.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
