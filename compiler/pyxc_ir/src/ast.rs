//! Syntax trees.
//!
//! Every node owns its children exclusively. Type annotations are
//! `TypeExprId`s into the owning unit's `TypeExprArena`.

use crate::{FileId, Name, Op, Span, TypeExprArena, TypeExprId};

/// Literal values.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Int(u64),
    /// Stored as `f64::to_bits`.
    Float(u64),
    Str(Name),
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Variables, member accesses and index expressions can be assigned to.
    pub fn is_place(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Var(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
        )
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Literal(Literal),
    Var(Name),
    /// `dispatch` names the implementing function when the operator was
    /// user-declared at the point it was parsed.
    Unary {
        op: Op,
        operand: Box<Expr>,
        dispatch: Option<Name>,
    },
    Binary {
        op: Op,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        dispatch: Option<Name>,
    },
    /// `callee(args)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `base[index]`
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    /// `base.field`
    Member {
        base: Box<Expr>,
        field: Name,
        field_span: Span,
    },
    /// `addr(place)`: pointer to a variable, field or element.
    AddrOf(Box<Expr>),
}

/// An indented suite, or a single inline statement after `:`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct IfBranch {
    pub cond: Expr,
    pub body: Block,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// `if` plus every `elif`, in order; `else_body` is the trailing `else`.
    If {
        branches: Vec<IfBranch>,
        else_body: Option<Block>,
    },
    /// `for var in range(start, end[, step]): body`
    For {
        var: Name,
        var_span: Span,
        start: Expr,
        end: Expr,
        step: Option<Expr>,
        body: Block,
    },
    While {
        cond: Expr,
        body: Block,
    },
    DoWhile {
        body: Block,
        cond: Expr,
    },
    Break,
    Continue,
    Return(Option<Expr>),
    Print(Vec<Expr>),
    /// `const name[: T] = value`
    Const {
        name: Name,
        ty: Option<TypeExprId>,
        value: Expr,
    },
    /// `name: T [= init]`
    TypedDecl {
        name: Name,
        ty: TypeExprId,
        init: Option<Expr>,
    },
    /// `target = value`
    Assign {
        target: Expr,
        value: Expr,
    },
    Expr(Expr),
    /// A nested block; produced when the parser recovers from an
    /// unexpected indent.
    Block(Block),
}

/// Operator role of a prototype declared with a decorator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OperatorRole {
    None,
    Unary(Op),
    Binary { op: Op, precedence: u32 },
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: TypeExprId,
    pub span: Span,
}

/// A function signature.
///
/// For operator prototypes `name` is the dispatch name (`binary|`).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Prototype {
    pub name: Name,
    pub params: Vec<Param>,
    pub ret: TypeExprId,
    pub role: OperatorRole,
    pub span: Span,
}

impl Prototype {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_operator(&self) -> bool {
        !matches!(self.role, OperatorRole::None)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Function {
    pub proto: Prototype,
    pub body: Block,
    pub span: Span,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: TypeExprId,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StructDecl {
    pub name: Name,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

impl StructDecl {
    /// Ordinal of a field in declaration order.
    pub fn field_index(&self, name: Name) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// `type name = target`
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AliasDecl {
    pub name: Name,
    pub target: TypeExprId,
    pub span: Span,
}

/// An expression written at file scope.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TopLevelExpr {
    pub expr: Expr,
    pub span: Span,
}

/// Parse output of one source file.
///
/// Declarations of each kind are kept in source order.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TranslationUnit {
    pub file: FileId,
    pub structs: Vec<StructDecl>,
    pub aliases: Vec<AliasDecl>,
    pub externs: Vec<Prototype>,
    pub functions: Vec<Function>,
    pub top_level: Vec<TopLevelExpr>,
    /// Arena holding every type annotation of this unit.
    pub types: TypeExprArena,
}

impl TranslationUnit {
    pub fn new(file: FileId) -> Self {
        TranslationUnit {
            file,
            ..Self::default()
        }
    }

    /// Total number of declarations and top-level expressions.
    pub fn item_count(&self) -> usize {
        self.structs.len()
            + self.aliases.len()
            + self.externs.len()
            + self.functions.len()
            + self.top_level.len()
    }
}
