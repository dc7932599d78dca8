//! pyxc IR - shared front-end data structures.
//!
//! This crate contains the types every front-end phase agrees on:
//! - Spans and file ids for source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` for lexer output
//! - Operator symbols and arities
//! - AST nodes (expressions, statements, declarations)
//! - The `TypeExpr` arena for textual type annotations
//!
//! Floats are stored as `u64` bits so that every node can derive `Eq` and `Hash`.
//! Identifiers and string literals are interned `Name`s for O(1) equality.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod interner;
mod name;
mod op;
mod span;
mod token;
mod type_expr;

pub use ast::{
    AliasDecl, Block, Expr, ExprKind, FieldDecl, Function, IfBranch, Literal, OperatorRole, Param,
    Prototype, Stmt, StmtKind, StructDecl, TopLevelExpr, TranslationUnit,
};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use op::{Arity, Op};
pub use span::{FileId, Span};
pub use token::{Token, TokenKind, TokenList};
pub use type_expr::{ArraySize, BuiltinType, TypeExpr, TypeExprArena, TypeExprId};
