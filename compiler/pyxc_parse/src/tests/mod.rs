//! Parser tests.
//!
//! - `parser`: declarations, statements and expression shapes
//! - `errors`: diagnostics and recovery after syntax errors
//! - `precedence`: property tests for precedence climbing

mod precedence;

use pyxc_diagnostic::ErrorCode;
use pyxc_ir::{FileId, StringInterner};

use crate::{parse_source, OperatorTable, ParseOutput};

pub(super) fn parse_str(source: &str) -> (ParseOutput, StringInterner) {
    let interner = StringInterner::new();
    let mut operators = OperatorTable::with_builtins();
    let output = parse_source(source, FileId::new(0), &interner, &mut operators);
    (output, interner)
}

pub(super) fn error_codes(output: &ParseOutput) -> Vec<ErrorCode> {
    output.errors.iter().map(|e| e.code).collect()
}
