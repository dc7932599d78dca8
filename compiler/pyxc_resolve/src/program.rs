//! The assembled program and the seam to a code generator.
//!
//! A `Program` is only ever produced from a batch with no errors, so a
//! `Backend` can assume every name it meets resolves.

use pyxc_ir::{Arity, Block, Expr, FileId, Name, Op, OperatorRole, Span};
use pyxc_types::{StructLayout, TypeData, TypeId, TypeRegistry};

use crate::ResolvedPrototype;

/// How a local came into existence.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LocalKind {
    Param,
    Const,
    /// `name: T [= init]`
    Declared,
    /// First assignment to an undeclared name.
    Assigned,
    /// Induction variable of a `for`.
    LoopVar,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Local {
    pub name: Name,
    pub ty: TypeId,
    pub kind: LocalKind,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ResolvedFunction {
    pub proto: ResolvedPrototype,
    pub body: Block,
    /// Every local with its resolved type, in declaration order.
    pub locals: Vec<Local>,
    pub file: FileId,
}

impl ResolvedFunction {
    pub fn local(&self, name: Name) -> Option<&Local> {
        self.locals.iter().find(|l| l.name == name)
    }
}

/// A top-level expression, wrapped as an anonymous function.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ResolvedTopLevel {
    /// Always `__anon_expr`; backends make it unique if they need to.
    pub name: Name,
    pub expr: Expr,
    pub ty: Option<TypeId>,
    pub span: Span,
    pub file: FileId,
}

/// One step of an lvalue or rvalue access path.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AccessStep {
    /// `base[i]`
    Index,
    /// `base.field`
    Field(Name),
}

/// Where an accessed element lives relative to its base.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ElementAddress {
    /// Type of the element reached.
    pub ty: TypeId,
    /// Constant byte offset from the base (fields).
    pub offset: u64,
    /// Byte stride per index (arrays and pointers); zero for fields.
    pub stride: u64,
    /// Ordinal of the field in its struct.
    pub field_index: Option<usize>,
    /// The base is a pointer that must be loaded before offsetting.
    pub through_pointer: bool,
}

#[derive(Clone, Debug)]
pub struct Program {
    /// Every prototype in order of first declaration.
    pub prototypes: Vec<ResolvedPrototype>,
    pub types: TypeRegistry,
    /// Function definitions in file order.
    pub functions: Vec<ResolvedFunction>,
    pub top_level: Vec<ResolvedTopLevel>,
}

impl Program {
    /// Prototypes declared with `extern def` and never defined.
    pub fn externs(&self) -> impl Iterator<Item = &ResolvedPrototype> {
        self.prototypes.iter().filter(|p| !p.is_defined())
    }

    pub fn prototype(&self, name: Name) -> Option<&ResolvedPrototype> {
        self.prototypes.iter().find(|p| p.name == name)
    }

    pub fn function(&self, name: Name) -> Option<&ResolvedFunction> {
        self.functions.iter().find(|f| f.proto.name == name)
    }

    /// Struct layouts in declaration order.
    pub fn layouts(&self) -> impl Iterator<Item = &StructLayout> {
        self.types.layouts()
    }

    /// The function implementing a user-declared operator.
    pub fn operator_dispatch(&self, op: Op, arity: Arity) -> Option<&ResolvedPrototype> {
        self.prototypes.iter().find(|p| match (p.role, arity) {
            (OperatorRole::Unary(o), Arity::Unary) => o == op,
            (OperatorRole::Binary { op: o, .. }, Arity::Binary) => o == op,
            _ => false,
        })
    }

    /// Address computation for one access step from a value of type `base`.
    pub fn element_address(&self, base: TypeId, step: AccessStep) -> Option<ElementAddress> {
        match step {
            AccessStep::Index => {
                let (elem, through_pointer) = match self.types.pool().get(base) {
                    TypeData::Array { elem, .. } => (elem, false),
                    TypeData::Pointer(elem) if elem != TypeId::VOID => (elem, true),
                    _ => return None,
                };
                Some(ElementAddress {
                    ty: elem,
                    offset: 0,
                    stride: self.types.size_of(elem)?,
                    field_index: None,
                    through_pointer,
                })
            }
            AccessStep::Field(name) => {
                let layout = self.types.struct_layout(base)?;
                let index = layout.field_index(name)?;
                let field = &layout.fields[index];
                Some(ElementAddress {
                    ty: field.ty,
                    offset: field.offset,
                    stride: 0,
                    field_index: Some(index),
                    through_pointer: false,
                })
            }
        }
    }

    /// Hand the program to `backend`: struct types first, then extern
    /// declarations, function definitions and finally top-level expressions.
    #[tracing::instrument(level = "debug", skip_all, fields(functions = self.functions.len()))]
    pub fn lower<B: Backend>(&self, backend: &mut B) -> Result<(), B::Error> {
        for layout in self.layouts() {
            backend.materialize_struct(layout)?;
        }
        for proto in self.externs() {
            backend.declare_extern(proto)?;
        }
        for function in &self.functions {
            backend.emit_function(function)?;
        }
        for expr in &self.top_level {
            backend.emit_top_level(expr)?;
        }
        Ok(())
    }
}

/// A code generator fed by `Program::lower`.
pub trait Backend {
    type Error;

    fn materialize_struct(&mut self, layout: &StructLayout) -> Result<(), Self::Error>;

    fn declare_extern(&mut self, proto: &ResolvedPrototype) -> Result<(), Self::Error>;

    fn emit_function(&mut self, function: &ResolvedFunction) -> Result<(), Self::Error>;

    fn emit_top_level(&mut self, expr: &ResolvedTopLevel) -> Result<(), Self::Error>;

    fn element_address(
        &self,
        program: &Program,
        base: TypeId,
        step: AccessStep,
    ) -> Option<ElementAddress> {
        program.element_address(base, step)
    }

    /// Name of the function to call for a user-declared operator.
    fn operator_dispatch(&self, program: &Program, op: Op, arity: Arity) -> Option<Name> {
        program.operator_dispatch(op, arity).map(|p| p.name)
    }
}
