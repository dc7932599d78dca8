//! Parse errors and warnings.

use pyxc_diagnostic::{Diagnostic, ErrorCode};
use pyxc_ir::{Arity, Op, Span};

/// Parse error with error code for rich diagnostics.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Location of the error.
    pub span: Span,
    /// Label text for the primary span.
    pub context: Option<String>,
    /// Related locations, such as an earlier declaration.
    pub related: Vec<(Span, String)>,
    /// Optional help messages.
    pub help: Vec<String>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
            related: Vec::new(),
            help: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related.push((span, message.into()));
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, self.context.as_deref().unwrap_or("here"));
        for (span, message) in &self.related {
            diag = diag.with_secondary_label(*span, message);
        }
        for help in &self.help {
            diag = diag.with_suggestion(help);
        }
        diag
    }
}

/// Non-fatal parser diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParseWarning {
    /// A declaration replaced an operator of the same arity.
    OperatorRedefined {
        span: Span,
        op: Op,
        arity: Arity,
        previous: u32,
        precedence: u32,
        was_builtin: bool,
    },
}

impl ParseWarning {
    pub fn span(&self) -> Span {
        match self {
            ParseWarning::OperatorRedefined { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ParseWarning::OperatorRedefined {
                span,
                op,
                arity,
                previous,
                precedence,
                was_builtin,
            } => {
                let origin = if *was_builtin { "builtin" } else { "user" };
                let mut diag = Diagnostic::warning(ErrorCode::E1015)
                    .with_message(format!("{arity} operator `{op}` redefined"))
                    .with_label(*span, format!("replaces the {origin} `{op}`"));
                if *arity == Arity::Binary && previous != precedence {
                    diag = diag.with_note(format!(
                        "precedence changes from {previous} to {precedence} for code parsed after this point"
                    ));
                }
                diag
            }
        }
    }
}
