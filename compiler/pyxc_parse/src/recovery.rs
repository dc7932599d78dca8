//! Error recovery for the parser.
//!
//! After a syntax error the parser skips to the next statement boundary and
//! carries on, so one run reports every independent error in a file.
//! Boundaries are layout tokens: the end of the current logical line, or
//! the end of the enclosing block. A block that belongs to the broken line
//! is skipped with it.

use pyxc_ir::TokenKind;

use crate::cursor::Cursor;

/// A set of token kinds, one bit per `TokenKind::tag`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    #[allow(clippy::needless_pass_by_value)] // const fn builder for static initialization
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u64 << kind.tag()))
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(&self, kind: &TokenKind) -> bool {
        (self.0 & (1u64 << kind.tag())) != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Tokens that end a simple statement without being part of it.
pub const STMT_END: TokenSet = TokenSet::new()
    .with(TokenKind::Newline)
    .with(TokenKind::Dedent)
    .with(TokenKind::Eof);

/// Tokens that begin a file-scope declaration.
pub const ITEM_START: TokenSet = TokenSet::new()
    .with(TokenKind::Def)
    .with(TokenKind::Extern)
    .with(TokenKind::Struct)
    .with(TokenKind::Type)
    .with(TokenKind::At);

/// Advance until a token in `recovery` or `Eof`. Returns whether a
/// recovery token was found.
pub fn synchronize(cursor: &mut Cursor<'_>, recovery: TokenSet) -> bool {
    while !cursor.is_at_end() {
        if recovery.contains(&cursor.current_kind()) {
            return true;
        }
        cursor.advance();
    }
    false
}

/// Skip the rest of the current logical line, including any indented
/// block that hangs off it.
///
/// Stops after the line's `Newline` (or after the hanging block's `Dedent`),
/// or before a `Dedent` that closes the enclosing block.
pub fn skip_statement(cursor: &mut Cursor<'_>) {
    let mut depth = 0u32;
    loop {
        match cursor.current_kind() {
            TokenKind::Eof => return,
            TokenKind::Newline if depth == 0 => {
                cursor.advance();
                if !cursor.check(&TokenKind::Indent) {
                    return;
                }
            }
            TokenKind::Indent => {
                depth += 1;
                cursor.advance();
            }
            TokenKind::Dedent => {
                if depth == 0 {
                    return;
                }
                depth -= 1;
                cursor.advance();
                if depth == 0 {
                    return;
                }
            }
            _ => {
                cursor.advance();
            }
        }
    }
}
