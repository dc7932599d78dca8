//! Recursive descent parser for pyxc.
//!
//! Consumes the layout-aware token stream of one file and produces a
//! [`TranslationUnit`]. Binary expressions are folded by precedence
//! climbing over the session's [`OperatorTable`], which the parser also
//! extends when it meets an `@unary` or `@binary` definition.

mod cursor;
mod error;
mod grammar;
mod operators;
mod recovery;

pub use cursor::Cursor;
pub use error::{ParseError, ParseWarning};
pub use operators::{
    OperatorConflict, OperatorEntry, OperatorTable, Registration, DEFAULT_BINARY_PRECEDENCE,
    MAX_PRECEDENCE, MIN_PRECEDENCE, UNARY_PRECEDENCE,
};
pub use recovery::{synchronize, TokenSet};

use pyxc_diagnostic::Diagnostic;
use pyxc_ir::{FileId, Name, Span, StringInterner, Token, TokenKind, TokenList, TranslationUnit};
use pyxc_lexer::LexError;

/// Parser state for one file.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    operators: &'a mut OperatorTable,
    unit: TranslationUnit,
    errors: Vec<ParseError>,
    warnings: Vec<ParseWarning>,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: &'a TokenList,
        file: FileId,
        interner: &'a StringInterner,
        operators: &'a mut OperatorTable,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            operators,
            unit: TranslationUnit::new(file),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn advance(&mut self) -> Token {
        self.cursor.advance()
    }

    #[inline]
    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        self.cursor.expect(kind)
    }

    #[inline]
    fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        self.cursor.expect_ident()
    }

    #[inline]
    fn interner(&self) -> &'a StringInterner {
        self.cursor.interner()
    }

    /// Consume the token if it has the given kind.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Parse the whole file.
    #[tracing::instrument(level = "debug", skip_all, fields(file = self.unit.file.raw()))]
    pub fn parse_unit(mut self) -> ParseOutput {
        self.parse_items();
        tracing::debug!(
            items = self.unit.item_count(),
            errors = self.errors.len(),
            "parsed translation unit"
        );
        ParseOutput {
            unit: self.unit,
            lex_errors: Vec::new(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

/// Result of parsing one file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseOutput {
    pub unit: TranslationUnit,
    pub lex_errors: Vec<LexError>,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.lex_errors.is_empty() || !self.errors.is_empty()
    }

    /// Every lexer error, parse error and warning, in that order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lex_errors
            .iter()
            .map(LexError::to_diagnostic)
            .chain(self.errors.iter().map(ParseError::to_diagnostic))
            .chain(self.warnings.iter().map(ParseWarning::to_diagnostic))
            .collect()
    }
}

/// Parse an already lexed file.
pub fn parse(
    tokens: &TokenList,
    file: FileId,
    interner: &StringInterner,
    operators: &mut OperatorTable,
) -> ParseOutput {
    Parser::new(tokens, file, interner, operators).parse_unit()
}

/// Lex and parse one file.
pub fn parse_source(
    source: &str,
    file: FileId,
    interner: &StringInterner,
    operators: &mut OperatorTable,
) -> ParseOutput {
    let lexed = pyxc_lexer::lex(source, file, interner);
    let mut output = parse(&lexed.tokens, file, interner, operators);
    output.lex_errors = lexed.errors;
    output
}

#[cfg(test)]
mod tests;
