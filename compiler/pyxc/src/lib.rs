//! The pyxc front end.
//!
//! Ties the phases together behind one [`CompilationSession`]:
//!
//! ```text
//! sources ──lex──▶ tokens ──parse──▶ TranslationUnit ─┐
//!    (per file, parallel if configured)  (in order)   ├─assemble──▶ Program ──lower──▶ Backend
//! sources ──lex──▶ tokens ──parse──▶ TranslationUnit ─┘
//! ```
//!
//! # Usage
//!
//! ```text
//! pyxc::init_tracing();
//! let mut session = CompilationSession::from_env();
//! match session.compile_batch(&[("main.pyx", source)]) {
//!     Ok(program) => program.lower(&mut backend)?,
//!     Err(_) => session.emit(&mut sink),
//! }
//! ```

mod config;
mod session;

pub use config::{ConfigError, SessionConfig, ERROR_LIMIT_VAR, NO_COLOR_VAR, PARALLEL_LEX_VAR};
pub use session::CompilationSession;

pub use pyxc_diagnostic::{
    CollectingSink, ColorMode, Diagnostic, DiagnosticConfig, DiagnosticSink, ErrorCode,
    ErrorGuaranteed, Report, Severity, TerminalEmitter,
};
pub use pyxc_ir::{FileId, Name, StringInterner, TranslationUnit};
pub use pyxc_resolve::{
    AccessStep, Backend, ElementAddress, Local, LocalKind, Program, ResolvedFunction,
    ResolvedPrototype, ResolvedTopLevel,
};
pub use pyxc_types::{StructLayout, TypeId};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a global tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=pyxc_resolve=debug`.
/// With `PYXC_LOG_TREE=1` spans are rendered as an indented tree instead of
/// flat lines. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let tree = std::env::var("PYXC_LOG_TREE").is_ok_and(|v| v == "1");

        // Another subscriber may already be installed by the embedding program.
        let _ = if tree {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init()
        };
    });
}
