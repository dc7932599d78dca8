//! Type-level proof that an error was reported.

use std::fmt;

/// Proof that at least one error diagnostic has been emitted.
///
/// Only [`DiagnosticQueue::emit_error`](crate::DiagnosticQueue::emit_error)
/// and [`DiagnosticQueue::guarantee`](crate::DiagnosticQueue::guarantee) can
/// construct one.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("compilation failed; errors were reported")
    }
}

impl std::error::Error for ErrorGuaranteed {}
