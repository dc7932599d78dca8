//! Raw tokens.
//!
//! The `RawToken` enum is the logos-derived tokenizer output before literals
//! are cooked, identifiers interned, and layout tokens synthesized.

use logos::Logos;

/// Raw token from logos.
///
/// Horizontal whitespace is skipped here; the layout layer re-reads the
/// leading whitespace of each line from the source to measure indentation.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\f]+")]
pub(crate) enum RawToken {
    #[regex(r"#[^\r\n]*")]
    Comment,

    #[regex(r"\r\n|\r|\n")]
    Newline,

    #[regex(r"\\[ \t]*(\r\n|\r|\n)")]
    LineContinuation,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    /// Any run that starts like a number. Cooking decides whether it is a
    /// well-formed integer or float.
    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    #[regex(r"\.[0-9][0-9A-Za-z_.]*")]
    Number,

    #[regex(r#""([^"\\\r\n]|\\.)*""#)]
    String,

    #[regex(r#""([^"\\\r\n]|\\.)*"#)]
    UnterminatedString,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("@")]
    At,

    /// Single-character operator symbols; mapped through `Op::from_char`.
    #[regex(r"[+\-*/%<>&|^~!$?;`]")]
    OpChar,
}
