//! Diagnostic system for the pyxc front end.
//!
//! Every phase reports failures as [`Diagnostic`] values:
//! - an error code for searchability (`E0xxx` lexer ... `E4xxx` linking)
//! - a message saying what went wrong
//! - a primary label saying where
//! - secondary labels, notes and suggestions for context
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] can only be obtained from [`DiagnosticQueue::emit_error`],
//! so a function returning `Result<T, ErrorGuaranteed>` has provably reported
//! its failure.
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn assemble(..) -> Result<Program, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;
mod source;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use emitter::{CollectingSink, ColorMode, DiagnosticSink, Report, TerminalEmitter};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
pub use source::{LineOffsetTable, SourceFile, SourceLocation, SourceMap};
