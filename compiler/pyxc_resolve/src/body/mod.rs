//! Body resolution (Phase 2).
//!
//! Walks one function body or top-level expression against the complete
//! prototype, struct and alias tables. Every name use is checked, every
//! local gets a resolved type, and expression types are computed just far
//! enough to check member access, indexing and returns.
//!
//! An expression whose type cannot be determined types as `None`. Checks
//! that depend on it stay silent, since the cause was reported already.

mod expr;
mod scope;

use pyxc_ir::{
    Block, Expr, ExprKind, Name, Span, Stmt, StmtKind, StringInterner, TypeExprArena, TypeExprId,
};
use pyxc_stack::ensure_sufficient_stack;
use pyxc_types::{TypeError, TypeErrorKind, TypeId, TypeRegistry, ValueContext};

use crate::{Local, LocalKind, PrototypeTable, ResolveError, ResolveErrorKind, ResolvedPrototype};
use scope::{Binding, Scope};

pub(crate) struct BodyResolver<'a> {
    interner: &'a StringInterner,
    registry: &'a mut TypeRegistry,
    prototypes: &'a PrototypeTable,
    /// Arena of the unit the body was parsed from.
    types: &'a TypeExprArena,
    errors: &'a mut Vec<ResolveError>,
    /// Name and return type of the enclosing function.
    function: Option<(Name, TypeId)>,
    scope: Scope,
    locals: Vec<Local>,
    loop_depth: u32,
}

impl<'a> BodyResolver<'a> {
    pub fn new(
        interner: &'a StringInterner,
        registry: &'a mut TypeRegistry,
        prototypes: &'a PrototypeTable,
        types: &'a TypeExprArena,
        errors: &'a mut Vec<ResolveError>,
    ) -> Self {
        BodyResolver {
            interner,
            registry,
            prototypes,
            types,
            errors,
            function: None,
            scope: Scope::new(),
            locals: Vec::new(),
            loop_depth: 0,
        }
    }

    /// Enter `proto`: its parameters become locals.
    pub fn for_function(mut self, proto: &ResolvedPrototype) -> Self {
        self.function = Some((proto.name, proto.ret));
        for param in &proto.params {
            self.declare(param.name, Some(param.ty), false, param.span, LocalKind::Param);
        }
        self
    }

    /// Locals with a known type, in declaration order.
    pub fn finish(self) -> Vec<Local> {
        self.locals
    }

    // === Reporting ===

    fn error(&mut self, kind: ResolveErrorKind, span: Span) {
        self.errors.push(ResolveError::new(kind, span));
    }

    fn type_error(&mut self, err: TypeError) {
        if !err.is_poisoned() {
            self.errors.push(err.into());
        }
    }

    fn display(&self, ty: TypeId) -> String {
        self.registry.display(ty, self.interner)
    }

    // === Bindings ===

    fn declare(
        &mut self,
        name: Name,
        ty: Option<TypeId>,
        is_const: bool,
        span: Span,
        kind: LocalKind,
    ) {
        let binding = Binding {
            name,
            ty,
            is_const,
            span,
        };
        match self.scope.declare(binding) {
            Ok(()) => {
                if let Some(ty) = ty {
                    self.locals.push(Local {
                        name,
                        ty,
                        kind,
                        span,
                    });
                }
            }
            Err(existing) => match (existing.ty, ty) {
                (Some(previous), Some(new)) if previous != new => {
                    let kind = ResolveErrorKind::ConflictingLocal {
                        name,
                        previous_ty: self.display(previous),
                        new_ty: self.display(new),
                        previous: existing.span,
                    };
                    self.error(kind, span);
                }
                _ => {}
            },
        }
    }

    /// Type of a value stored in a variable; `void` is rejected.
    fn value_type(&mut self, ty: Option<TypeId>, span: Span) -> Option<TypeId> {
        if ty == Some(TypeId::VOID) {
            self.type_error(TypeError::new(
                TypeErrorKind::VoidNotAllowed(ValueContext::Variable),
                span,
            ));
            return None;
        }
        ty
    }

    // === Statements ===

    pub fn resolve_block(&mut self, block: &Block) {
        for stmt in &block.stmts {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_loop_body(&mut self, body: &Block) {
        self.loop_depth += 1;
        self.resolve_block(body);
        self.loop_depth -= 1;
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        ensure_sufficient_stack(|| self.resolve_stmt_inner(stmt));
    }

    fn resolve_stmt_inner(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::If {
                branches,
                else_body,
            } => {
                for branch in branches {
                    self.resolve_expr(&branch.cond);
                    self.resolve_block(&branch.body);
                }
                if let Some(else_body) = else_body {
                    self.resolve_block(else_body);
                }
            }
            StmtKind::For {
                var,
                var_span,
                start,
                end,
                step,
                body,
            } => {
                let var_ty = self.resolve_expr(start);
                self.resolve_expr(end);
                if let Some(step) = step {
                    self.resolve_expr(step);
                }
                if let Some(ty) = var_ty {
                    self.locals.push(Local {
                        name: *var,
                        ty,
                        kind: LocalKind::LoopVar,
                        span: *var_span,
                    });
                }
                self.scope.push_loop_var(Binding {
                    name: *var,
                    ty: var_ty,
                    is_const: false,
                    span: *var_span,
                });
                self.resolve_loop_body(body);
                self.scope.pop_loop_var();
            }
            StmtKind::While { cond, body } => {
                self.resolve_expr(cond);
                self.resolve_loop_body(body);
            }
            StmtKind::DoWhile { body, cond } => {
                self.resolve_loop_body(body);
                self.resolve_expr(cond);
            }
            StmtKind::Break => self.check_in_loop("break", stmt.span),
            StmtKind::Continue => self.check_in_loop("continue", stmt.span),
            StmtKind::Return(value) => {
                let Some(value) = value else {
                    return;
                };
                self.resolve_expr(value);
                if let Some((function, TypeId::VOID)) = self.function {
                    self.error(ResolveErrorKind::ReturnValueInVoid { function }, value.span);
                }
            }
            StmtKind::Print(args) => {
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            StmtKind::Const { name, ty, value } => {
                let value_ty = self.resolve_expr(value);
                let ty = match ty {
                    Some(ty) => self.resolve_local_type(*ty),
                    None => self.value_type(value_ty, value.span),
                };
                self.declare(*name, ty, true, stmt.span, LocalKind::Const);
            }
            StmtKind::TypedDecl { name, ty, init } => {
                let ty = self.resolve_local_type(*ty);
                if let Some(init) = init {
                    self.resolve_expr(init);
                }
                self.declare(*name, ty, false, stmt.span, LocalKind::Declared);
            }
            StmtKind::Assign { target, value } => self.resolve_assign(target, value),
            StmtKind::Expr(expr) => {
                self.resolve_expr(expr);
            }
            StmtKind::Block(block) => self.resolve_block(block),
        }
    }

    fn check_in_loop(&mut self, keyword: &'static str, span: Span) {
        if self.loop_depth == 0 {
            self.error(ResolveErrorKind::LoopControlOutsideLoop { keyword }, span);
        }
    }

    fn resolve_local_type(&mut self, ty: TypeExprId) -> Option<TypeId> {
        match self
            .registry
            .resolve_value(self.types, ty, ValueContext::Variable)
        {
            Ok(ty) => Some(ty),
            Err(err) => {
                self.type_error(err);
                None
            }
        }
    }

    fn resolve_assign(&mut self, target: &Expr, value: &Expr) {
        let value_ty = self.resolve_expr(value);
        let ExprKind::Var(name) = target.kind else {
            self.resolve_expr(target);
            return;
        };
        match self.scope.lookup(name).copied() {
            Some(binding) if binding.is_const => {
                self.error(
                    ResolveErrorKind::AssignToConst {
                        name,
                        declared: binding.span,
                    },
                    target.span,
                );
            }
            Some(_) => {}
            None => {
                let ty = self.value_type(value_ty, value.span);
                self.declare(name, ty, false, target.span, LocalKind::Assigned);
            }
        }
    }
}
