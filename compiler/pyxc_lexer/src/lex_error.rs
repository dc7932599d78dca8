//! Lexer error types.

use pyxc_diagnostic::{Diagnostic, ErrorCode};
use pyxc_ir::Span;

/// A lexer error.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

/// What kind of lexer error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// Missing closing `"`.
    UnterminatedString,
    /// Character that starts no token.
    InvalidChar(char),
    /// Numeric literal with a bad shape (`1.2.3`, `12abc`).
    MalformedNumber { reason: &'static str },
    /// Integer literal above `u64::MAX`.
    NumberOverflow,
    /// Unknown escape in a string literal.
    InvalidEscape(char),
    /// Leading whitespace of one line mixes tabs and spaces.
    MixedIndentation,
    /// Dedent to a width that matches no enclosing block.
    InconsistentDedent { width: u32 },
}

impl LexError {
    pub fn new(span: Span, kind: LexErrorKind) -> Self {
        LexError { span, kind }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match &self.kind {
            LexErrorKind::UnterminatedString => Diagnostic::error(ErrorCode::E0001)
                .with_message("unterminated string literal")
                .with_label(self.span, "string starts here")
                .with_suggestion("add a closing `\"` before the end of the line"),
            LexErrorKind::InvalidChar(c) => Diagnostic::error(ErrorCode::E0002)
                .with_message(format!("invalid character `{}`", c.escape_default()))
                .with_label(self.span, "not valid here"),
            LexErrorKind::MalformedNumber { reason } => Diagnostic::error(ErrorCode::E0003)
                .with_message(format!("malformed number literal: {reason}"))
                .with_label(self.span, "invalid literal"),
            LexErrorKind::NumberOverflow => Diagnostic::error(ErrorCode::E0004)
                .with_message("integer literal is too large")
                .with_label(self.span, "exceeds the 64-bit range")
                .with_note(format!("the largest integer literal is {}", u64::MAX)),
            LexErrorKind::InvalidEscape(c) => Diagnostic::error(ErrorCode::E0005)
                .with_message(format!("unknown escape sequence `\\{c}`"))
                .with_label(self.span, "invalid escape")
                .with_note("valid escapes are \\n \\t \\r \\0 \\\\ \\\""),
            LexErrorKind::MixedIndentation => Diagnostic::error(ErrorCode::E0006)
                .with_message("indentation mixes tabs and spaces")
                .with_label(self.span, "inconsistent indentation")
                .with_suggestion("indent with spaces only or with tabs only"),
            LexErrorKind::InconsistentDedent { width } => Diagnostic::error(ErrorCode::E0007)
                .with_message(format!(
                    "unindent to column {} does not match any outer indentation level",
                    width + 1
                ))
                .with_label(self.span, "unexpected indentation"),
        }
    }
}
