use pretty_assertions::assert_eq;
use pyxc::{
    AccessStep, Backend, LocalKind, Program, ResolvedFunction, ResolvedPrototype,
    ResolvedTopLevel, StringInterner, StructLayout, TypeId,
};
use pyxc_ir::{Arity, Op};

use crate::common::compile;

const TYPES: &str = "\
type Real = f64

struct Node:
    value: Real
    next: ptr[Node]
";

const OPS: &str = "\
extern def putchard(c)

@binary(precedence=5)
def ?(a, b):
    return a + b
";

const MAIN: &str = "\
def sum(nodes: ptr[Node], count: i64) -> Real:
    total = 0.0
    for i in range(0, count):
        total = total ? nodes[i].value
    return total

putchard(65.0 ? 1.0)
";

/// Renders every backend call as a signature line.
struct Printer<'a> {
    program: &'a Program,
    interner: &'a StringInterner,
    lines: Vec<String>,
}

impl Printer<'_> {
    fn signature(&self, proto: &ResolvedPrototype) -> String {
        let params: Vec<_> = proto
            .param_types()
            .map(|ty| self.program.types.display(ty, self.interner))
            .collect();
        format!(
            "{}({}) -> {}",
            self.interner.lookup(proto.name),
            params.join(", "),
            self.program.types.display(proto.ret, self.interner)
        )
    }
}

impl Backend for Printer<'_> {
    type Error = std::convert::Infallible;

    fn materialize_struct(&mut self, layout: &StructLayout) -> Result<(), Self::Error> {
        let line = format!("struct {} {}", self.interner.lookup(layout.name), layout.size);
        self.lines.push(line);
        Ok(())
    }

    fn declare_extern(&mut self, proto: &ResolvedPrototype) -> Result<(), Self::Error> {
        let line = format!("extern {}", self.signature(proto));
        self.lines.push(line);
        Ok(())
    }

    fn emit_function(&mut self, function: &ResolvedFunction) -> Result<(), Self::Error> {
        let line = format!("def {}", self.signature(&function.proto));
        self.lines.push(line);
        Ok(())
    }

    fn emit_top_level(&mut self, expr: &ResolvedTopLevel) -> Result<(), Self::Error> {
        let ty = expr
            .ty
            .map_or_else(|| "void".to_string(), |ty| self.program.types.display(ty, self.interner));
        self.lines.push(format!("top {} -> {ty}", self.interner.lookup(expr.name)));
        Ok(())
    }
}

#[test]
fn lowering_a_multi_file_program() {
    let (session, program) = compile(&[("types.pyx", TYPES), ("ops.pyx", OPS), ("main.pyx", MAIN)]);
    let mut printer = Printer {
        program: &program,
        interner: session.interner(),
        lines: Vec::new(),
    };
    program.lower(&mut printer).unwrap();

    assert_eq!(
        printer.lines,
        vec![
            "struct Node 16",
            "extern putchard(f64) -> f64",
            "def binary?(f64, f64) -> f64",
            "def sum(ptr[Node], i64) -> f64",
            "top __anon_expr -> f64",
        ]
    );
}

#[test]
fn locals_are_typed() {
    let (session, program) = compile(&[("types.pyx", TYPES), ("ops.pyx", OPS), ("main.pyx", MAIN)]);
    let interner = session.interner();
    let sum = program.function(interner.intern("sum")).unwrap();

    let locals: Vec<_> = sum
        .locals
        .iter()
        .map(|l| {
            (
                interner.lookup(l.name),
                program.types.display(l.ty, interner),
                l.kind,
            )
        })
        .collect();
    assert_eq!(
        locals,
        vec![
            ("nodes", "ptr[Node]".to_string(), LocalKind::Param),
            ("count", "i64".to_string(), LocalKind::Param),
            ("total", "f64".to_string(), LocalKind::Assigned),
            ("i", "i64".to_string(), LocalKind::LoopVar),
        ]
    );
    assert_eq!(sum.file.raw(), 2);
}

#[test]
fn backend_queries() {
    let (session, program) = compile(&[("types.pyx", TYPES), ("ops.pyx", OPS), ("main.pyx", MAIN)]);
    let interner = session.interner();
    let printer = Printer {
        program: &program,
        interner,
        lines: Vec::new(),
    };

    let dispatch = printer.operator_dispatch(&program, Op::Custom('?'), Arity::Binary);
    assert_eq!(dispatch.map(|n| interner.lookup(n)), Some("binary?"));

    let node = program.types.layout(interner.intern("Node")).unwrap();
    let next = printer
        .element_address(&program, node.ty, AccessStep::Field(interner.intern("next")))
        .unwrap();
    assert_eq!((next.offset, next.field_index), (8, Some(1)));

    let pointee = printer
        .element_address(&program, next.ty, AccessStep::Index)
        .unwrap();
    assert_eq!(pointee.ty, node.ty);
    assert!(pointee.through_pointer);

    let value = printer
        .element_address(&program, pointee.ty, AccessStep::Field(interner.intern("value")))
        .unwrap();
    assert_eq!((value.ty, value.offset), (TypeId::F64, 0));
}
