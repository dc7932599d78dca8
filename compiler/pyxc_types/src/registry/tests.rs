#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use pyxc_diagnostic::ErrorCode;
use pyxc_ir::{
    AliasDecl, ArraySize, BuiltinType, FieldDecl, FileId, Name, Span, StringInterner, StructDecl,
    TypeExpr, TypeExprArena, TypeExprId,
};

use super::*;

struct Fixture {
    interner: StringInterner,
    arena: TypeExprArena,
    registry: TypeRegistry,
    next_offset: u32,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            interner: StringInterner::new(),
            arena: TypeExprArena::new(),
            registry: TypeRegistry::new(),
            next_offset: 0,
        }
    }

    fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// A distinct span for every node so errors can be told apart.
    fn span(&mut self) -> Span {
        let start = self.next_offset;
        self.next_offset += 4;
        Span::new(FileId::new(0), start, start + 3)
    }

    fn alloc(&mut self, expr: TypeExpr) -> TypeExprId {
        let span = self.span();
        self.arena.alloc(expr, span)
    }

    fn builtin(&mut self, builtin: BuiltinType) -> TypeExprId {
        self.alloc(TypeExpr::Builtin(builtin))
    }

    fn named(&mut self, name: &str) -> TypeExprId {
        let name = self.name(name);
        self.alloc(TypeExpr::Named(name))
    }

    fn ptr(&mut self, pointee: TypeExprId) -> TypeExprId {
        self.alloc(TypeExpr::Pointer(pointee))
    }

    fn array(&mut self, elem: TypeExprId, size: i64) -> TypeExprId {
        self.alloc(TypeExpr::Array {
            elem,
            size: ArraySize::Literal(size),
        })
    }

    fn declare_struct(&mut self, name: &str, fields: &[(&str, TypeExprId)]) -> Result<(), NameClash> {
        let fields = fields
            .iter()
            .map(|&(field, ty)| FieldDecl {
                name: self.name(field),
                ty,
                span: self.arena.span(ty),
            })
            .collect();
        let decl = StructDecl {
            name: self.name(name),
            fields,
            span: self.span(),
        };
        self.registry.register_struct(&self.arena, &decl)
    }

    fn declare_alias(&mut self, name: &str, target: TypeExprId) -> Result<(), NameClash> {
        let decl = AliasDecl {
            name: self.name(name),
            target,
            span: self.span(),
        };
        self.registry.register_alias(&self.arena, &decl)
    }

    fn resolve(&mut self, id: TypeExprId) -> Result<TypeId, TypeError> {
        self.registry.resolve(&self.arena, id)
    }

    fn resolve_named(&mut self, name: &str) -> Result<TypeId, TypeError> {
        let id = self.named(name);
        self.resolve(id)
    }

    fn display(&self, ty: TypeId) -> String {
        self.registry.display(ty, &self.interner)
    }
}

fn codes(errors: &[TypeError]) -> Vec<ErrorCode> {
    errors.iter().map(TypeError::code).collect()
}

// === Arrays ===

proptest! {
    #[test]
    fn positive_array_sizes_resolve_to_that_many_elements(n in 1i64..100_000) {
        let mut fx = Fixture::new();
        let elem = fx.builtin(BuiltinType::I32);
        let arr = fx.array(elem, n);
        let ty = fx.resolve(arr).unwrap();

        prop_assert_eq!(fx.registry.pool().array_len(ty), Some(n as u64));
        prop_assert_eq!(fx.registry.element_type(ty), Some(TypeId::I32));
        prop_assert_eq!(fx.registry.size_of(ty), Some(4 * n as u64));
    }

    #[test]
    fn non_positive_array_sizes_are_rejected(n in i64::MIN..=0) {
        let mut fx = Fixture::new();
        let elem = fx.builtin(BuiltinType::F64);
        let arr = fx.array(elem, n);
        let err = fx.resolve(arr).unwrap_err();

        prop_assert_eq!(err.code(), ErrorCode::E2002);
        prop_assert_eq!(err.kind, TypeErrorKind::NonPositiveArraySize(n));
    }
}

#[test]
fn test_non_literal_array_size() {
    let mut fx = Fixture::new();
    let elem = fx.builtin(BuiltinType::I8);
    let arr = fx.alloc(TypeExpr::Array {
        elem,
        size: ArraySize::NonLiteral,
    });
    assert_eq!(fx.resolve(arr).unwrap_err().code(), ErrorCode::E2003);
}

#[test]
fn test_array_length_helper() {
    assert_eq!(array_length(ArraySize::Literal(3), Span::DUMMY), Ok(3));
    assert!(array_length(ArraySize::Literal(0), Span::DUMMY).is_err());
    assert!(array_length(ArraySize::NonLiteral, Span::DUMMY).is_err());
}

// === Aliases ===

#[test]
fn test_alias_chain_is_memoized() {
    let mut fx = Fixture::new();
    // type A = B, type B = i32, type C = ptr[A]
    let b = fx.named("B");
    fx.declare_alias("A", b).unwrap();
    let i32_ty = fx.builtin(BuiltinType::I32);
    fx.declare_alias("B", i32_ty).unwrap();
    let a = fx.named("A");
    let ptr_a = fx.ptr(a);
    fx.declare_alias("C", ptr_a).unwrap();

    assert!(fx.registry.resolve_all_aliases().is_empty());

    let first = fx.resolve_named("A").unwrap();
    let second = fx.resolve_named("A").unwrap();
    assert_eq!(first, TypeId::I32);
    assert_eq!(first, second);

    let c = fx.resolve_named("C").unwrap();
    let direct = {
        let i32_ty = fx.builtin(BuiltinType::I32);
        let p = fx.ptr(i32_ty);
        fx.resolve(p).unwrap()
    };
    assert_eq!(c, direct);
    assert_eq!(fx.display(c), "ptr[i32]");

    let resolved: Vec<_> = fx.registry.resolved_aliases().map(|(_, ty)| ty).collect();
    assert_eq!(resolved, vec![TypeId::I32, TypeId::I32, c]);
}

#[test]
fn test_alias_cycle_is_reported_once() {
    let mut fx = Fixture::new();
    let b = fx.named("B");
    fx.declare_alias("A", b).unwrap();
    let a = fx.named("A");
    fx.declare_alias("B", a).unwrap();

    let errors = fx.registry.resolve_all_aliases();
    assert_eq!(codes(&errors), vec![ErrorCode::E2004]);
    assert_eq!(
        errors[0].message(&fx.interner),
        "cyclic type definition: A -> B -> A"
    );

    // Later references are silent.
    assert!(fx.resolve_named("B").unwrap_err().is_poisoned());
    assert!(fx.registry.is_failed(fx.name("A")));
}

#[test]
fn test_alias_through_pointer_is_still_a_cycle() {
    let mut fx = Fixture::new();
    let list = fx.named("List");
    let ptr = fx.ptr(list);
    fx.declare_alias("List", ptr).unwrap();

    let errors = fx.registry.resolve_all_aliases();
    assert_eq!(codes(&errors), vec![ErrorCode::E2004]);
}

#[test]
fn test_alias_to_unknown_type() {
    let mut fx = Fixture::new();
    let missing = fx.named("Missing");
    fx.declare_alias("A", missing).unwrap();
    let a = fx.named("A");
    let arr = fx.array(a, 2);
    fx.declare_alias("B", arr).unwrap();

    let errors = fx.registry.resolve_all_aliases();
    assert_eq!(codes(&errors), vec![ErrorCode::E2001]);
    assert_eq!(errors[0].message(&fx.interner), "unknown type 'Missing'");
    assert!(fx.registry.alias(fx.name("B")).is_none());
}

// === Structs ===

#[test]
fn test_struct_may_point_to_itself() {
    let mut fx = Fixture::new();
    let value = fx.builtin(BuiltinType::I64);
    let node = fx.named("Node");
    let next = fx.ptr(node);
    fx.declare_struct("Node", &[("value", value), ("next", next)])
        .unwrap();

    assert!(fx.registry.resolve_layouts().is_empty());

    let node_ty = fx.resolve_named("Node").unwrap();
    let layout = fx.registry.layout(fx.name("Node")).unwrap();
    assert_eq!(layout.ty, node_ty);
    assert_eq!(layout.size, 16);

    let next_ty = fx.registry.field_type(node_ty, fx.name("next")).unwrap();
    assert_eq!(fx.display(next_ty), "ptr[Node]");
    assert_eq!(fx.registry.element_type(next_ty), Some(node_ty));
}

#[test]
fn test_by_value_cycle_is_reported_once() {
    let mut fx = Fixture::new();
    let b = fx.named("B");
    fx.declare_struct("A", &[("b", b)]).unwrap();
    let a = fx.named("A");
    fx.declare_struct("B", &[("a", a)]).unwrap();
    let a_again = fx.named("A");
    fx.declare_struct("C", &[("a", a_again)]).unwrap();

    let errors = fx.registry.resolve_layouts();
    assert_eq!(codes(&errors), vec![ErrorCode::E2004]);
    assert_eq!(
        errors[0].message(&fx.interner),
        "cyclic type definition: A -> B -> A"
    );
    for name in ["A", "B", "C"] {
        assert!(fx.registry.layout(fx.name(name)).is_none());
        assert!(fx.registry.is_failed(fx.name(name)));
    }
}

#[test]
fn test_by_value_cycle_through_array_and_alias() {
    let mut fx = Fixture::new();
    let s = fx.named("S");
    let arr = fx.array(s, 2);
    fx.declare_alias("Pair", arr).unwrap();
    let pair = fx.named("Pair");
    fx.declare_struct("S", &[("items", pair)]).unwrap();

    assert!(fx.registry.resolve_all_aliases().is_empty());
    let errors = fx.registry.resolve_layouts();
    assert_eq!(codes(&errors), vec![ErrorCode::E2004]);
}

#[test]
fn test_unknown_field_type_reported_once() {
    let mut fx = Fixture::new();
    let missing = fx.named("Missing");
    fx.declare_struct("Inner", &[("m", missing)]).unwrap();
    let inner = fx.named("Inner");
    fx.declare_struct("Outer", &[("inner", inner)]).unwrap();

    let errors = fx.registry.resolve_layouts();
    assert_eq!(codes(&errors), vec![ErrorCode::E2001]);
    assert!(fx.registry.layout(fx.name("Outer")).is_none());
}

#[test]
fn test_nested_layout_offsets() {
    let mut fx = Fixture::new();
    let i8_ty = fx.builtin(BuiltinType::I8);
    let i32_ty = fx.builtin(BuiltinType::I32);
    fx.declare_struct("Inner", &[("a", i8_ty), ("b", i32_ty)])
        .unwrap();

    let u8_ty = fx.builtin(BuiltinType::U8);
    let inner = fx.named("Inner");
    let i16_ty = fx.builtin(BuiltinType::I16);
    let shorts = fx.array(i16_ty, 3);
    fx.declare_struct("Outer", &[("c", u8_ty), ("inner", inner), ("d", shorts)])
        .unwrap();

    assert!(fx.registry.resolve_layouts().is_empty());

    let inner = fx.registry.layout(fx.name("Inner")).unwrap();
    assert_eq!((inner.size, inner.align), (8, 4));

    let outer = fx.registry.layout(fx.name("Outer")).unwrap();
    let offsets: Vec<_> = outer.fields.iter().map(|f| f.offset).collect();
    assert_eq!(offsets, vec![0, 4, 12]);
    assert_eq!((outer.size, outer.align), (20, 4));

    let order: Vec<_> = fx.registry.layouts().map(|l| l.name).collect();
    assert_eq!(order, vec![fx.name("Inner"), fx.name("Outer")]);
}

#[test]
fn test_element_type_two_levels_down() {
    let mut fx = Fixture::new();
    let f64_ty = fx.builtin(BuiltinType::F64);
    fx.declare_struct("Point", &[("x", f64_ty), ("y", f64_ty)])
        .unwrap();
    let point = fx.named("Point");
    let ends = fx.array(point, 2);
    fx.declare_struct("Line", &[("ends", ends)]).unwrap();

    let row = fx.array(f64_ty, 3);
    let grid = fx.array(row, 3);
    fx.declare_alias("Grid", grid).unwrap();

    assert!(fx.registry.resolve_all_aliases().is_empty());
    assert!(fx.registry.resolve_layouts().is_empty());

    let grid_ty = fx.resolve_named("Grid").unwrap();
    let row_ty = fx.registry.element_type(grid_ty).unwrap();
    assert_eq!(fx.registry.element_type(row_ty), Some(TypeId::F64));

    let line_ty = fx.resolve_named("Line").unwrap();
    let ends_ty = fx.registry.field_type(line_ty, fx.name("ends")).unwrap();
    let point_ty = fx.registry.element_type(ends_ty).unwrap();
    assert_eq!(fx.display(point_ty), "Point");
    assert_eq!(
        fx.registry.field_type(point_ty, fx.name("y")),
        Some(TypeId::F64)
    );
    assert_eq!(fx.registry.field_type(point_ty, fx.name("z")), None);
}

// === Void ===

#[test]
fn test_void_positions() {
    let mut fx = Fixture::new();
    let void = fx.builtin(BuiltinType::Void);
    assert_eq!(fx.resolve(void), Ok(TypeId::VOID));

    let err = fx
        .registry
        .resolve_value(&fx.arena, void, ValueContext::Parameter)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2005);

    let ptr_void = fx.ptr(void);
    assert!(fx.resolve(ptr_void).is_ok());

    let arr_void = fx.array(void, 2);
    assert_eq!(fx.resolve(arr_void).unwrap_err().code(), ErrorCode::E2005);

    let void_field = fx.builtin(BuiltinType::Void);
    fx.declare_struct("Bad", &[("v", void_field)]).unwrap();
    assert_eq!(
        codes(&fx.registry.resolve_layouts()),
        vec![ErrorCode::E2005]
    );
}

// === Registration ===

#[test]
fn test_name_clashes() {
    let mut fx = Fixture::new();
    let i32_ty = fx.builtin(BuiltinType::I32);
    fx.declare_struct("P", &[("x", i32_ty)]).unwrap();

    let clash = fx.declare_struct("P", &[("y", i32_ty)]).unwrap_err();
    assert_eq!(clash.existing, DeclKind::Struct);

    let clash = fx.declare_alias("P", i32_ty).unwrap_err();
    assert_eq!(clash.existing, DeclKind::Struct);

    fx.declare_alias("Q", i32_ty).unwrap();
    let clash = fx.declare_struct("Q", &[("x", i32_ty)]).unwrap_err();
    assert_eq!(clash.existing, DeclKind::Alias);

    // The first declaration is untouched.
    assert_eq!(fx.registry.structs().get(fx.name("P")).unwrap().fields.len(), 1);
    assert_eq!(fx.registry.structs().len(), 1);
    assert_eq!(fx.registry.aliases().len(), 1);
}

#[test]
fn test_unknown_name() {
    let mut fx = Fixture::new();
    let err = fx.resolve_named("Nope").unwrap_err();
    assert_eq!(err.kind, TypeErrorKind::UnknownType(fx.name("Nope")));
}

#[test]
fn test_clear() {
    let mut fx = Fixture::new();
    let i32_ty = fx.builtin(BuiltinType::I32);
    fx.declare_alias("A", i32_ty).unwrap();
    assert!(fx.registry.resolve_all_aliases().is_empty());

    fx.registry.clear();
    assert!(fx.registry.aliases().is_empty());
    assert!(fx.registry.alias(fx.name("A")).is_none());
    assert_eq!(fx.registry.pool().len(), TypeId::BUILTIN_COUNT as usize);
}
