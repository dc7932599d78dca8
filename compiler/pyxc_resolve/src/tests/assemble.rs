#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use pyxc_diagnostic::ErrorCode;
use pyxc_ir::StringInterner;
use pyxc_types::{TypeId, TypeRegistry};

use super::{assemble_err, assemble_ok, codes, parse_units};
use crate::{assemble, LocalKind, PrototypeTable};

#[test]
fn test_extern_and_definition_in_different_units() {
    let (program, interner) = assemble_ok(&[
        "extern def add(a: i32, b: i32) -> i32\nadd(1, 2)\n",
        "def add(a: i32, b: i32) -> i32:\n    return a + b\n",
    ]);

    assert_eq!(program.prototypes.len(), 1);
    let add = program.prototype(interner.intern("add")).unwrap();
    assert!(add.is_defined());
    assert_eq!(add.param_types().collect::<Vec<_>>(), vec![TypeId::I32, TypeId::I32]);
    assert_eq!(add.ret, TypeId::I32);
    assert_eq!(program.externs().count(), 0);

    assert_eq!(program.functions.len(), 1);
    assert_eq!(program.top_level.len(), 1);
    assert_eq!(program.top_level[0].ty, Some(TypeId::I32));
}

#[test]
fn test_shared_extern_declared_in_two_units() {
    let (program, interner) = assemble_ok(&[
        "extern def putchard(c: f64) -> f64\nputchard(65.0)\n",
        "extern def putchard(c: f64) -> f64\nputchard(66.0)\n",
    ]);
    let externs: Vec<_> = program.externs().map(|p| interner.lookup(p.name)).collect();
    assert_eq!(externs, vec!["putchard"]);
    assert_eq!(program.top_level.len(), 2);
}

#[test]
fn test_signature_conflict_skips_body_resolution() {
    let (errors, interner) = assemble_err(&[
        "extern def add(a: i32, b: i32) -> i32\n",
        "def add(a: f64, b: i32) -> i32:\n    return undefined_name\n",
    ]);

    // The unknown variable in the body is never looked at.
    assert_eq!(codes(&errors), vec![ErrorCode::E4001]);
    assert_eq!(
        errors[0].message(&interner),
        "conflicting declarations of 'add': 'def add(a: i32, b: i32) -> i32' \
         and 'def add(a: f64, b: i32) -> i32'"
    );

    let diag = errors[0].to_diagnostic(&interner);
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(errors[0].span.file.raw(), 1);
}

#[test]
fn test_arity_conflict_is_a_signature_conflict() {
    let (errors, _) = assemble_err(&[
        "extern def f(a: i64) -> i64\n",
        "extern def f(a: i64, b: i64) -> i64\n",
    ]);
    assert_eq!(codes(&errors), vec![ErrorCode::E4001]);
}

#[test]
fn test_duplicate_definition() {
    let (errors, _) = assemble_err(&[
        "def one() -> i64:\n    return 1\n",
        "def one() -> i64:\n    return missing\n",
    ]);
    assert_eq!(codes(&errors), vec![ErrorCode::E4002]);
}

#[test]
fn test_forward_reference_in_one_unit() {
    let source = "\
def main() -> i64:
    return add(1, 2)

def add(a: i64, b: i64) -> i64:
    return a + b
";
    let (program, interner) = assemble_ok(&[source]);
    let names: Vec<_> = program
        .functions
        .iter()
        .map(|f| interner.lookup(f.proto.name))
        .collect();
    assert_eq!(names, vec!["main", "add"]);

    let add = program.function(interner.intern("add")).unwrap();
    let params: Vec<_> = add
        .locals
        .iter()
        .map(|l| (interner.lookup(l.name), l.kind))
        .collect();
    assert_eq!(params, vec![("a", LocalKind::Param), ("b", LocalKind::Param)]);
}

#[test]
fn test_mutual_recursion() {
    let source = "\
def is_even(n: i64) -> i32:
    if n == 0:
        return 1
    return is_odd(n - 1)

def is_odd(n: i64) -> i32:
    if n == 0:
        return 0
    return is_even(n - 1)

is_even(10)
";
    let (program, _) = assemble_ok(&[source]);
    assert_eq!(program.functions.len(), 2);
    assert_eq!(program.top_level[0].ty, Some(TypeId::I32));
}

#[test]
fn test_call_into_later_unit() {
    let (program, _) = assemble_ok(&[
        "def main() -> f64:\n    return helper(2.0)\n",
        "def helper(x: f64) -> f64:\n    return x * 2.0\n",
    ]);
    assert_eq!(program.functions.len(), 2);
}

#[test]
fn test_failed_prototype_is_reported_once() {
    let (errors, interner) = assemble_err(&["def f(x: Missing) -> i32:\n    return 1\nf(1)\n"]);
    assert_eq!(codes(&errors), vec![ErrorCode::E2001]);
    assert_eq!(errors[0].message(&interner), "unknown type 'Missing'");
}

#[test]
fn test_every_bad_signature_type_is_reported() {
    let (errors, _) = assemble_err(&["extern def g(a: Foo) -> Bar\n"]);
    assert_eq!(codes(&errors), vec![ErrorCode::E2001, ErrorCode::E2001]);
}

#[test]
fn test_duplicate_struct_keeps_first() {
    let interner = StringInterner::new();
    let units = parse_units(
        &["struct P:\n    x: i32\n", "struct P:\n    y: f64\n    z: f64\n"],
        &interner,
    );
    let mut registry = TypeRegistry::new();
    let mut prototypes = PrototypeTable::new();
    let errors = assemble(&units, &interner, &mut registry, &mut prototypes).unwrap_err();

    assert_eq!(codes(&errors), vec![ErrorCode::E3001]);
    assert_eq!(errors[0].message(&interner), "duplicate struct 'P'");
    assert_eq!(errors[0].span.file.raw(), 1);

    let layout = registry.layout(interner.intern("P")).unwrap();
    assert_eq!(layout.fields.len(), 1);
    assert_eq!(layout.size, 4);
}

#[test]
fn test_alias_named_like_a_struct() {
    let (errors, interner) = assemble_err(&["struct P:\n    x: i32\n", "type P = i64\n"]);
    assert_eq!(codes(&errors), vec![ErrorCode::E3002]);
    assert_eq!(
        errors[0].message(&interner),
        "'P' is already declared as a struct"
    );
}

#[test]
fn test_unused_cyclic_structs_are_reported() {
    let (errors, _) = assemble_err(&["struct A:\n    b: B\n\nstruct B:\n    a: A\n"]);
    assert_eq!(codes(&errors), vec![ErrorCode::E2004]);
}

#[test]
fn test_alias_cycle_terminates() {
    let (errors, interner) = assemble_err(&["type A = B\ntype B = A\n"]);
    assert_eq!(codes(&errors), vec![ErrorCode::E2004]);
    assert!(errors[0]
        .message(&interner)
        .starts_with("cyclic type definition"));
}

#[test]
fn test_types_declared_after_use() {
    let source = "\
def origin() -> ptr[Point]:
    p: ptr[Point] = alloc()
    return p

extern def alloc() -> ptr[Point]

struct Point:
    x: Coord
    y: Coord

type Coord = f64
";
    let (program, interner) = assemble_ok(&[source]);
    let point = program.types.layout(interner.intern("Point")).unwrap();
    assert_eq!(point.size, 16);
    assert_eq!(
        program.types.alias(interner.intern("Coord")),
        Some(TypeId::F64)
    );
}

#[test]
fn test_prototypes_keep_first_declaration_order() {
    let (program, interner) = assemble_ok(&[
        "extern def c() -> i64\ndef a() -> i64:\n    return c()\n",
        "def c() -> i64:\n    return 3\nextern def b() -> i64\n",
    ]);
    let names: Vec<_> = program
        .prototypes
        .iter()
        .map(|p| interner.lookup(p.name))
        .collect();
    assert_eq!(names, vec!["c", "a", "b"]);
    let externs: Vec<_> = program.externs().map(|p| interner.lookup(p.name)).collect();
    assert_eq!(externs, vec!["b"]);
}
