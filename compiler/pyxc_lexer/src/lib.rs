//! Lexer for pyxc.
//!
//! Two layers:
//! - `raw_token`: a logos tokenizer for the flat lexical grammar
//! - `lexer`: the layout layer that tracks the indentation stack and
//!   synthesizes `Newline`, `Indent` and `Dedent`
//!
//! [`lex`] drives a [`Lexer`] to completion and returns the whole
//! `TokenList`, which is what the parser consumes.

mod lex_error;
mod lexer;
mod literal;
mod raw_token;

pub use lex_error::{LexError, LexErrorKind};
pub use lexer::Lexer;

use pyxc_ir::{FileId, StringInterner, TokenKind, TokenList};

/// Result of lexing one file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Lex a whole file into a `TokenList` ending in `Eof`.
#[tracing::instrument(level = "debug", skip_all, fields(file = file.raw(), bytes = source.len()))]
pub fn lex(source: &str, file: FileId, interner: &StringInterner) -> LexOutput {
    let mut lexer = Lexer::new(source, file, interner);
    let mut tokens = TokenList::new();
    loop {
        let token = lexer.next_token();
        tokens.push(token);
        if token.kind == TokenKind::Eof {
            break;
        }
    }
    let errors = lexer.into_errors();
    tracing::debug!(tokens = tokens.len(), errors = errors.len(), "lexed");
    LexOutput { tokens, errors }
}
