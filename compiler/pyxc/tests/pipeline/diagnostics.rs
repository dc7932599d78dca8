use pretty_assertions::assert_eq;
use pyxc::{
    CollectingSink, ColorMode, CompilationSession, ErrorCode, SessionConfig, Severity,
};

use crate::common::{compile_err, error_codes};

const UNKNOWN_X: &str = "def f() -> i64:\n    return x\n";

#[test]
fn unknown_variable_is_located() {
    let mut session = CompilationSession::default();
    let sink = compile_err(&mut session, &[("main.pyx", UNKNOWN_X)]);

    let error = sink.errors().next().unwrap();
    assert_eq!(error.message, "[E3006] unknown variable 'x'");
    assert_eq!((error.file.raw(), error.line, error.column), (0, 2, 12));
}

#[test]
fn terminal_output() {
    let mut session = CompilationSession::new(SessionConfig::new().with_color(ColorMode::Never));
    assert!(session.compile_batch(&[("main.pyx", UNKNOWN_X)]).is_err());

    let output = String::from_utf8(session.emit_to(Vec::new()).unwrap()).unwrap();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(
        lines[..3],
        [
            "main.pyx:2:12: error: [E3006] unknown variable 'x'",
            "2 |     return x",
            "  |            ^",
        ]
    );
    assert!(!output.contains('\x1b'));
}

#[test]
fn error_limit_summarises_the_rest() {
    let mut session = CompilationSession::new(SessionConfig::new().with_error_limit(1));
    assert!(session
        .compile_batch(&[("f.pyx", "def f() -> i64:\n    return a + b + c\n")])
        .is_err());
    assert_eq!(session.diagnostics().suppressed(), 2);

    let mut sink = CollectingSink::new();
    session.emit(&mut sink);

    let errors: Vec<_> = sink.errors().map(|r| r.message.as_str()).collect();
    assert_eq!(errors, vec!["[E3006] unknown variable 'a'"]);
    let last = sink.reports.last().unwrap();
    assert_eq!(last.severity, Severity::Warning);
    assert_eq!(
        last.message,
        "[E9002] 2 further error(s) not shown (error limit is 1)"
    );
}

#[test]
fn diagnostics_are_sorted_by_file() {
    let mut session = CompilationSession::default();
    assert!(session
        .compile_batch(&[
            ("body.pyx", UNKNOWN_X),
            ("types.pyx", "struct S:\n    a: Missing\n"),
        ])
        .is_err());

    // Struct layouts are checked before any function body.
    assert_eq!(error_codes(&session), vec![ErrorCode::E2001, ErrorCode::E3006]);

    let mut sink = CollectingSink::new();
    session.emit(&mut sink);
    let errors: Vec<_> = sink
        .errors()
        .map(|r| (r.file.raw(), r.message.as_str()))
        .collect();
    assert_eq!(
        errors,
        vec![
            (0, "[E3006] unknown variable 'x'"),
            (1, "[E2001] unknown type 'Missing'"),
        ]
    );
}

#[test]
fn emitting_drains_the_queue() {
    let mut session = CompilationSession::default();
    let first = compile_err(&mut session, &[("main.pyx", UNKNOWN_X)]);
    assert_eq!(first.errors().count(), 1);
    assert!(!session.has_errors());

    let mut again = CollectingSink::new();
    session.emit(&mut again);
    assert!(again.reports.is_empty());
}

#[test]
fn lexer_errors_are_reported() {
    let mut session = CompilationSession::default();
    let sink = compile_err(&mut session, &[("mixed.pyx", "def f() -> i64:\n \treturn 1\n")]);

    let first = sink.errors().next().unwrap();
    assert_eq!(first.message, "[E0006] indentation mixes tabs and spaces");
    assert_eq!(first.line, 2);
    assert!(sink
        .reports
        .iter()
        .any(|r| r.severity == Severity::Help && r.message.contains("spaces only")));
}
