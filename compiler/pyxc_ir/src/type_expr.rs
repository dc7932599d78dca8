//! Textual type annotations.
//!
//! `TypeExpr` captures a type exactly as written, before resolution. Nodes
//! live in a `TypeExprArena` and refer to each other by `TypeExprId`, so a
//! type expression never owns another one. Named references stay names:
//! whether `Foo` is an alias or a struct is only known once every file of
//! the batch has been collected.

use std::fmt::Write as _;

use crate::{Name, Span, StringInterner};

/// Fixed-width builtin types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinType {
    Void,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 11] = [
        BuiltinType::Void,
        BuiltinType::I8,
        BuiltinType::I16,
        BuiltinType::I32,
        BuiltinType::I64,
        BuiltinType::U8,
        BuiltinType::U16,
        BuiltinType::U32,
        BuiltinType::U64,
        BuiltinType::F32,
        BuiltinType::F64,
    ];

    pub fn from_name(name: &str) -> Option<BuiltinType> {
        BuiltinType::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Void => "void",
            BuiltinType::I8 => "i8",
            BuiltinType::I16 => "i16",
            BuiltinType::I32 => "i32",
            BuiltinType::I64 => "i64",
            BuiltinType::U8 => "u8",
            BuiltinType::U16 => "u16",
            BuiltinType::U32 => "u32",
            BuiltinType::U64 => "u64",
            BuiltinType::F32 => "f32",
            BuiltinType::F64 => "f64",
        }
    }

    /// Width in bits; `void` has none.
    pub fn bit_width(self) -> u32 {
        match self {
            BuiltinType::Void => 0,
            BuiltinType::I8 | BuiltinType::U8 => 8,
            BuiltinType::I16 | BuiltinType::U16 => 16,
            BuiltinType::I32 | BuiltinType::U32 | BuiltinType::F32 => 32,
            BuiltinType::I64 | BuiltinType::U64 | BuiltinType::F64 => 64,
        }
    }

    pub fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            BuiltinType::I8 | BuiltinType::I16 | BuiltinType::I32 | BuiltinType::I64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            BuiltinType::U8 | BuiltinType::U16 | BuiltinType::U32 | BuiltinType::U64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, BuiltinType::F32 | BuiltinType::F64)
    }
}

/// Handle of a `TypeExpr` inside a `TypeExprArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeExprId(u32);

impl TypeExprId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The size operand of `array[T, N]` as written.
///
/// Only integer literals are legal sizes. Anything else is kept so that the
/// type registry can report it with a precise error.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArraySize {
    /// An integer literal, possibly negated.
    Literal(i64),
    /// A computed expression or a non-integer literal.
    NonLiteral,
}

/// A type expression as written in source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeExpr {
    Builtin(BuiltinType),
    /// Alias or struct reference.
    Named(Name),
    /// `ptr[T]`
    Pointer(TypeExprId),
    /// `array[T, N]`
    Array { elem: TypeExprId, size: ArraySize },
}

/// Arena of type expressions owned by one translation unit (or by the type
/// registry for declarations merged from many units).
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TypeExprArena {
    exprs: Vec<TypeExpr>,
    spans: Vec<Span>,
}

impl TypeExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node.
    ///
    /// # Panics
    /// Panics if the arena grows past `u32::MAX` nodes.
    pub fn alloc(&mut self, expr: TypeExpr, span: Span) -> TypeExprId {
        let id = u32::try_from(self.exprs.len())
            .unwrap_or_else(|_| panic!("type expression arena exceeded {} nodes", u32::MAX));
        self.exprs.push(expr);
        self.spans.push(span);
        TypeExprId(id)
    }

    #[inline]
    pub fn get(&self, id: TypeExprId) -> TypeExpr {
        self.exprs[id.index()]
    }

    #[inline]
    pub fn span(&self, id: TypeExprId) -> Span {
        self.spans[id.index()]
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Deep-copy the tree rooted at `id` in `src` into this arena.
    pub fn import(&mut self, src: &TypeExprArena, id: TypeExprId) -> TypeExprId {
        let span = src.span(id);
        let copied = match src.get(id) {
            expr @ (TypeExpr::Builtin(_) | TypeExpr::Named(_)) => expr,
            TypeExpr::Pointer(elem) => TypeExpr::Pointer(self.import(src, elem)),
            TypeExpr::Array { elem, size } => TypeExpr::Array {
                elem: self.import(src, elem),
                size,
            },
        };
        self.alloc(copied, span)
    }

    /// Render a type expression back to source syntax.
    pub fn display(&self, id: TypeExprId, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.write_expr(&mut out, id, interner);
        out
    }

    fn write_expr(&self, out: &mut String, id: TypeExprId, interner: &StringInterner) {
        match self.get(id) {
            TypeExpr::Builtin(b) => out.push_str(b.name()),
            TypeExpr::Named(name) => out.push_str(interner.lookup(name)),
            TypeExpr::Pointer(elem) => {
                out.push_str("ptr[");
                self.write_expr(out, elem, interner);
                out.push(']');
            }
            TypeExpr::Array { elem, size } => {
                out.push_str("array[");
                self.write_expr(out, elem, interner);
                match size {
                    ArraySize::Literal(n) => {
                        let _ = write!(out, ", {n}]");
                    }
                    ArraySize::NonLiteral => out.push_str(", <expr>]"),
                }
            }
        }
    }
}
