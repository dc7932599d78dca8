//! Shared helpers for pipeline tests.

use pyxc::{CollectingSink, CompilationSession, ErrorCode, Program};

pub fn compile(sources: &[(&str, &str)]) -> (CompilationSession, Program) {
    let mut session = CompilationSession::default();
    match session.compile_batch(sources) {
        Ok(program) => (session, program),
        Err(_) => {
            let mut sink = CollectingSink::new();
            session.emit(&mut sink);
            let messages: Vec<_> = sink.reports.iter().map(|r| r.message.clone()).collect();
            panic!("expected the batch to compile, got {messages:?}");
        }
    }
}

/// Compile a batch that must fail and return the emitted reports.
pub fn compile_err(session: &mut CompilationSession, sources: &[(&str, &str)]) -> CollectingSink {
    assert!(
        session.compile_batch(sources).is_err(),
        "expected the batch to fail"
    );
    let mut sink = CollectingSink::new();
    session.emit(&mut sink);
    sink
}

pub fn error_codes(session: &CompilationSession) -> Vec<ErrorCode> {
    session
        .diagnostics()
        .diagnostics()
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.code)
        .collect()
}
