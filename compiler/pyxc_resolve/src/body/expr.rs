//! Expression typing.

use pyxc_ir::{Expr, ExprKind, Literal, Name, Span};
use pyxc_stack::ensure_sufficient_stack;
use pyxc_types::{TypeFlags, TypeId};

use super::BodyResolver;
use crate::{Lookup, ResolveErrorKind};

impl BodyResolver<'_> {
    /// Check `expr` and compute its type.
    pub fn resolve_expr(&mut self, expr: &Expr) -> Option<TypeId> {
        ensure_sufficient_stack(|| self.resolve_expr_inner(expr))
    }

    fn resolve_expr_inner(&mut self, expr: &Expr) -> Option<TypeId> {
        match &expr.kind {
            ExprKind::Literal(Literal::Int(_)) => Some(TypeId::I64),
            ExprKind::Literal(Literal::Float(_)) => Some(TypeId::F64),
            ExprKind::Literal(Literal::Str(_)) => Some(self.registry.pointer(TypeId::I8)),
            ExprKind::Var(name) => match self.scope.lookup(*name) {
                Some(binding) => binding.ty,
                None => {
                    self.error(ResolveErrorKind::UnknownVariable(*name), expr.span);
                    None
                }
            },
            ExprKind::Unary {
                op,
                operand,
                dispatch,
            } => {
                let operand_ty = self.resolve_expr(operand);
                match dispatch {
                    Some(function) => self.dispatch_type(*function, expr.span),
                    None if op.is_comparison_or_logical() => Some(TypeId::I32),
                    None => operand_ty,
                }
            }
            ExprKind::Binary {
                op,
                lhs,
                rhs,
                dispatch,
            } => {
                let lhs_ty = self.resolve_expr(lhs);
                self.resolve_expr(rhs);
                match dispatch {
                    Some(function) => self.dispatch_type(*function, expr.span),
                    None if op.is_comparison_or_logical() => Some(TypeId::I32),
                    None => lhs_ty,
                }
            }
            ExprKind::Call { callee, args } => self.resolve_call(expr, callee, args),
            ExprKind::Index { base, index } => {
                let base_ty = self.resolve_expr(base);
                self.resolve_expr(index);
                self.index_type(base_ty?, expr.span)
            }
            ExprKind::Member {
                base,
                field,
                field_span,
            } => {
                let base_ty = self.resolve_expr(base)?;
                self.member_type(base_ty, *field, *field_span)
            }
            ExprKind::AddrOf(operand) => {
                let operand_ty = self.resolve_expr(operand);
                if !operand.is_place() {
                    self.error(ResolveErrorKind::NotAddressable, operand.span);
                    return None;
                }
                Some(self.registry.pointer(operand_ty?))
            }
        }
    }

    /// Result type of a user-declared operator.
    fn dispatch_type(&mut self, function: Name, span: Span) -> Option<TypeId> {
        let prototypes = self.prototypes;
        match prototypes.lookup(function) {
            Lookup::Found(proto) => Some(proto.ret),
            Lookup::Failed => None,
            Lookup::Missing => {
                self.error(ResolveErrorKind::UnknownFunction(function), span);
                None
            }
        }
    }

    fn resolve_call(&mut self, call: &Expr, callee: &Expr, args: &[Expr]) -> Option<TypeId> {
        for arg in args {
            self.resolve_expr(arg);
        }
        let ExprKind::Var(name) = callee.kind else {
            self.error(ResolveErrorKind::NotCallable, callee.span);
            return None;
        };

        let prototypes = self.prototypes;
        match prototypes.lookup(name) {
            Lookup::Found(proto) => {
                if proto.arity() != args.len() {
                    self.error(
                        ResolveErrorKind::ArityMismatch {
                            name,
                            expected: proto.arity(),
                            found: args.len(),
                            declared: proto.span,
                        },
                        call.span,
                    );
                }
                Some(proto.ret)
            }
            Lookup::Failed => None,
            Lookup::Missing => {
                self.error(ResolveErrorKind::UnknownFunction(name), callee.span);
                None
            }
        }
    }

    fn index_type(&mut self, base: TypeId, span: Span) -> Option<TypeId> {
        let flags = self.registry.pool().flags(base);
        let elem = if flags.is_indexable() {
            self.registry.element_type(base)
        } else {
            None
        };
        match elem {
            Some(TypeId::VOID) if flags.contains(TypeFlags::IS_POINTER) => {}
            Some(elem) => return Some(elem),
            None => {}
        }
        let found = self.display(base);
        self.error(ResolveErrorKind::NotIndexable { found }, span);
        None
    }

    fn member_type(&mut self, base: TypeId, field: Name, field_span: Span) -> Option<TypeId> {
        let Some(struct_name) = self.registry.pool().struct_name(base) else {
            let found = self.display(base);
            self.error(ResolveErrorKind::MemberOnNonStruct { field, found }, field_span);
            return None;
        };
        // A struct without a layout already reported its own failure.
        self.registry.layout(struct_name)?;
        let ty = self.registry.field_type(base, field);
        if ty.is_none() {
            self.error(
                ResolveErrorKind::UnknownField { struct_name, field },
                field_span,
            );
        }
        ty
    }
}
