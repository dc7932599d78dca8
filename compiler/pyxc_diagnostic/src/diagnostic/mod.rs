//! Structured diagnostics.
//!
//! Every phase (lexing `E0xxx`, parsing `E1xxx`, type expressions `E2xxx`,
//! function bodies `E3xxx`, cross-unit assembly `E4xxx`, driver `E9xxx`)
//! turns its own error values into a [`Diagnostic`]. Rendering is left to a
//! [`DiagnosticSink`](crate::DiagnosticSink), which flattens one diagnostic
//! into a headline report followed by `note` and `help` reports.

use std::fmt;

use pyxc_ir::Span;

use crate::ErrorCode;

/// How a report is presented. Only `Error` blocks lowering; `Note` and
/// `Help` are produced when a sink flattens secondary parts.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl Severity {
    /// Lowercase word printed before the message (`error: ...`).
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source range annotated with a short message.
///
/// The primary label is where the sink places the headline. Secondary
/// labels point at related declarations, which may live in another unit.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, message.into(), true)
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, message.into(), false)
    }

    fn new(span: Span, message: String, is_primary: bool) -> Self {
        Label {
            span,
            message,
            is_primary,
        }
    }
}

/// One problem found while compiling a batch of `.pyx` units.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "a diagnostic has no effect until it is pushed to a queue or sink"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    /// Headline text without the `[Exxxx]` prefix.
    pub message: String,
    pub labels: Vec<Label>,
    /// Reported as `note` lines at the primary location.
    pub notes: Vec<String>,
    /// Reported as `help` lines at the primary location.
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn blank(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn error(code: ErrorCode) -> Self {
        Self::blank(code, Severity::Error)
    }

    /// Warnings never fail a batch; the driver uses them for the
    /// error-limit summary.
    pub fn warning(code: ErrorCode) -> Self {
        Self::blank(code, Severity::Warning)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Location of the headline. Phase errors attach exactly one.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Points at a related site, such as the first of two conflicting
    /// declarations.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// The first primary label wins if a builder attached several.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    pub fn secondary_labels(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter().filter(|l| !l.is_primary)
    }

    /// Message as sinks print it: `[E3006] unknown variable 'x'`.
    pub fn headline(&self) -> String {
        format!("[{}] {}", self.code, self.message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Compact debugging form: the headline, then one indented line per label,
/// note and suggestion. Terminal output goes through a sink instead.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.headline())?;
        for label in &self.labels {
            let marker = if label.is_primary { "at" } else { "see" };
            write!(f, "\n  {marker} {:?}: {}", label.span, label.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  help: {suggestion}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
