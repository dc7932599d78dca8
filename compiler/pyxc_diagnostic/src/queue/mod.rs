//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! One queue lives for a whole compilation batch. Lexer, parser, type
//! registry and resolver all push into it, so a single invocation reports
//! every independent error rather than just the first.

use rustc_hash::FxHashSet;

use pyxc_ir::Span;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop a diagnostic identical in code, message and primary span to one
    /// already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits and no deduplication.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }

    #[must_use]
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = limit;
        self
    }
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// let guarantee = queue.emit_error(diagnostic);
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Errors accepted, including ones dropped by the limit.
    error_count: usize,
    /// Errors dropped because the limit was reached.
    suppressed: usize,
    seen: FxHashSet<(ErrorCode, Option<Span>, String)>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DiagnosticConfig {
        &self.config
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if the diagnostic was kept, `false` if it was filtered
    /// as a duplicate or dropped by the error limit.
    pub fn push(&mut self, diag: Diagnostic) -> bool {
        if self.config.deduplicate {
            let key = (diag.code, diag.primary_span(), diag.message.clone());
            if !self.seen.insert(key) {
                return false;
            }
        }

        if diag.is_error() {
            self.error_count += 1;
            if self.config.error_limit > 0 && self.error_count > self.config.error_limit {
                self.suppressed += 1;
                return false;
            }
        }

        self.diagnostics.push(diag);
        true
    }

    /// Add an error diagnostic and obtain proof that it was reported.
    ///
    /// The guarantee is issued even when the diagnostic itself is filtered,
    /// since an equivalent error is already in the queue or the limit has
    /// been hit.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error called with a non-error");
        self.push(diag);
        ErrorGuaranteed::new()
    }

    /// Add every diagnostic from an iterator.
    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.push(diag);
        }
    }

    /// Proof of failure if any error has been reported.
    pub fn guarantee(&self) -> Option<ErrorGuaranteed> {
        self.has_errors().then(ErrorGuaranteed::new)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of errors dropped by the error limit.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics in insertion order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the queue, sorted by file then position.
    ///
    /// Diagnostics without a primary span sort last; the sort is stable so
    /// equal positions keep insertion order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut diags = std::mem::take(&mut self.diagnostics);
        diags.sort_by_key(|d| {
            d.primary_span()
                .map_or((u32::MAX, u32::MAX), |s| (s.file.raw(), s.start))
        });
        if self.suppressed > 0 {
            diags.push(
                Diagnostic::warning(ErrorCode::E9002).with_message(format!(
                    "{} further error(s) not shown (error limit is {})",
                    self.suppressed, self.config.error_limit
                )),
            );
        }
        self.seen.clear();
        self.error_count = 0;
        self.suppressed = 0;
        diags
    }

    /// Forget everything queued so far, keeping the configuration.
    pub fn clear(&mut self) {
        let config = self.config.clone();
        *self = Self::with_config(config);
    }
}

#[cfg(test)]
mod tests;
