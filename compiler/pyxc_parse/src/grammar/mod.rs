//! Grammar rules, split by syntactic category.
//!
//! - `item`: file-scope declarations and decorators
//! - `stmt`: statements and suites
//! - `expr`: precedence climbing, prefix and postfix operators
//! - `ty`: type annotations

mod expr;
mod item;
mod stmt;
mod ty;

use pyxc_diagnostic::ErrorCode;
use pyxc_ir::TokenKind;

use crate::recovery::STMT_END;
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// A simple statement or declaration ends at the end of its line.
    ///
    /// The end of the enclosing block also ends it; that `Dedent` is left
    /// for the block to consume.
    pub(crate) fn expect_statement_end(&mut self) -> Result<(), ParseError> {
        let kind = self.current_kind();
        if STMT_END.contains(&kind) {
            if kind == TokenKind::Newline {
                self.advance();
            }
            Ok(())
        } else {
            Err(ParseError::new(
                ErrorCode::E1001,
                format!("expected end of line, found {kind}"),
                self.current_span(),
            ))
        }
    }
}
