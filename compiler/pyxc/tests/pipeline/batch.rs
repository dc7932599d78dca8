use pretty_assertions::assert_eq;
use pyxc::{CompilationSession, ErrorCode, SessionConfig, TypeId};

use crate::common::{compile, compile_err, error_codes};

const MATH: &str = "\
extern def sqrt(x: f64) -> f64

struct Vec2:
    x: f64
    y: f64

def length(v: Vec2) -> f64:
    return sqrt(dot(v, v))
";

const DOT: &str = "\
extern def sqrt(x: f64) -> f64

struct Vec2:
    x: f64
    y: f64

def dot(a: Vec2, b: Vec2) -> f64:
    return a.x * b.x + a.y * b.y
";

#[test]
fn extern_and_definition_across_files() {
    let (session, program) = compile(&[
        ("a.pyx", "extern def add(a: i32, b: i32) -> i32\nadd(1, 2)\n"),
        ("b.pyx", "def add(a: i32, b: i32) -> i32:\n    return a + b\n"),
    ]);
    assert_eq!(session.prototypes().len(), 1);
    assert_eq!(program.functions.len(), 1);
    assert_eq!(program.externs().count(), 0);
    assert!(!session.has_errors());
}

#[test]
fn duplicate_struct_across_files_is_rejected() {
    // `Vec2` is declared by both files: first declaration wins, the second is an error.
    let mut session = CompilationSession::default();
    let sink = compile_err(&mut session, &[("math.pyx", MATH), ("dot.pyx", DOT)]);
    let errors: Vec<_> = sink.errors().map(|r| r.message.as_str()).collect();
    assert_eq!(errors, vec!["[E3001] duplicate struct 'Vec2'"]);
}

#[test]
fn call_into_another_file() {
    let dot = DOT.replace("struct Vec2:\n    x: f64\n    y: f64\n", "");
    let (_, program) = compile(&[("math.pyx", MATH), ("dot.pyx", dot.as_str())]);

    let files: Vec<_> = program
        .functions
        .iter()
        .map(|f| f.file.raw())
        .collect();
    assert_eq!(files, vec![0, 1]);
    assert_eq!(program.externs().count(), 1);
}

#[test]
fn operators_flow_to_later_files() {
    let (_, program) = compile(&[
        (
            "ops.pyx",
            "@binary(precedence=50)\ndef $(a: f64, b: f64) -> f64:\n    return a * b\n",
        ),
        ("main.pyx", "1.0 + 2.0 $ 3.0\n"),
    ]);
    assert_eq!(program.top_level.len(), 1);
    assert_eq!(program.top_level[0].ty, Some(TypeId::F64));
}

#[test]
fn parallel_lexing_matches_sequential() {
    let sources = [
        ("a.pyx", "def a() -> i64:\n    return b() + 1\n"),
        ("b.pyx", "def b() -> i64:\n    return c() + 1\n"),
        ("c.pyx", "def c() -> i64:\n    return 1\n"),
        ("d.pyx", "a()\n"),
    ];

    let mut sequential = CompilationSession::new(SessionConfig::new());
    let mut parallel = CompilationSession::new(SessionConfig::new().with_parallel_lexing(true));
    let first = sequential.compile_batch(&sources).unwrap();
    let second = parallel.compile_batch(&sources).unwrap();

    assert_eq!(first.functions.len(), second.functions.len());
    assert_eq!(first.top_level.len(), second.top_level.len());
    assert_eq!(second.top_level[0].ty, Some(TypeId::I64));
}

#[test]
fn syntax_errors_skip_assembly() {
    let mut session = CompilationSession::default();
    assert!(session
        .compile_batch(&[
            ("bad.pyx", "1 $ 2\n"),
            ("semantic.pyx", "def f() -> i64:\n    return missing\n"),
        ])
        .is_err());
    let codes = error_codes(&session);
    assert!(!codes.is_empty());
    assert!(codes.iter().all(|c| !c.is_semantic_error()), "{codes:?}");
}

#[test]
fn signature_conflict_is_reported_once() {
    let mut session = CompilationSession::default();
    let sink = compile_err(
        &mut session,
        &[
            ("a.pyx", "extern def add(a: i32, b: i32) -> i32\n"),
            ("b.pyx", "def add(a: f64, b: f64) -> i32:\n    return missing\n"),
        ],
    );

    let errors: Vec<_> = sink.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.starts_with("[E4001] conflicting declarations of 'add'"));
    assert_eq!((errors[0].file.raw(), errors[0].line), (1, 1));

    // The secondary label points at the first declaration.
    let first = sink
        .reports
        .iter()
        .find(|r| r.message == "first declared here")
        .unwrap();
    assert_eq!((first.file.raw(), first.line), (0, 1));
}

#[test]
fn batches_are_independent() {
    let mut session = CompilationSession::default();
    session
        .compile_batch(&[("one.pyx", "def add(a: i32) -> i32:\n    return a\n")])
        .unwrap();
    let program = session
        .compile_batch(&[("two.pyx", "def add(a: f64, b: f64) -> f64:\n    return a\n")])
        .unwrap();

    assert_eq!(session.sources().len(), 1);
    assert_eq!(program.prototypes.len(), 1);
    assert_eq!(program.prototypes[0].arity(), 2);
}

#[test]
fn manual_pipeline() {
    let mut session = CompilationSession::default();
    let sources = [
        ("main.pyx", "def main() -> i64:\n    return helper(2)\n"),
        ("helper.pyx", "def helper(x: i64) -> i64:\n    return x * 2\n"),
    ];

    let mut units = Vec::new();
    for (name, text) in sources {
        let file = session.add_source(name, text);
        let (unit, diagnostics) = session.parse_translation_unit(text, file);
        assert!(diagnostics.is_empty());
        units.push(unit);
    }
    let program = session.assemble(&units).unwrap();
    assert_eq!(program.functions.len(), 2);

    session.reset();
    assert!(session.prototypes().is_empty());
    assert!(session.sources().is_empty());
}

#[test]
fn assembly_errors_reach_the_queue() {
    let mut session = CompilationSession::default();
    let text = "def f() -> i64:\n    return a + b\n";
    let file = session.add_source("f.pyx", text);
    let (unit, _) = session.parse_translation_unit(text, file);

    assert!(session.assemble(&[unit]).is_err());
    assert_eq!(error_codes(&session), vec![ErrorCode::E3006, ErrorCode::E3006]);
}
