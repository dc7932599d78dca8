//! Expression parsing.
//!
//! Binary operators are folded by precedence climbing: the loop consumes
//! every operator whose precedence is at least the current minimum and
//! parses its right operand at one level above the operator's own, which
//! makes all binary operators left-associative. Precedences come from the
//! operator table at the moment the operator is parsed.

use pyxc_diagnostic::ErrorCode;
use pyxc_ir::{Arity, Expr, ExprKind, Literal, Op, TokenKind};
use pyxc_stack::ensure_sufficient_stack;

use crate::operators::OperatorEntry;
use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| {
            let lhs = self.parse_unary()?;
            self.parse_binary_rhs(0, lhs)
        })
    }

    /// The binary operator at the cursor, if the current token is one.
    fn current_binary_op(&self) -> Option<(Op, OperatorEntry)> {
        match self.current_kind() {
            TokenKind::Op(op) => self
                .operators
                .lookup(op, Arity::Binary)
                .map(|entry| (op, entry)),
            _ => None,
        }
    }

    fn parse_binary_rhs(&mut self, min_precedence: u32, mut lhs: Expr) -> Result<Expr, ParseError> {
        while let Some((op, entry)) = self.current_binary_op() {
            let precedence = entry.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let rhs = self.parse_unary()?;
            let rhs = self.parse_binary_rhs(precedence + 1, rhs)?;
            let span = lhs.span.merge(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                    dispatch: entry.dispatch_name(),
                },
                span,
            );
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if let TokenKind::Op(op) = self.current_kind() {
            if let Some(entry) = self.operators.lookup(op, Arity::Unary) {
                let start = self.advance().span;
                let operand = ensure_sufficient_stack(|| self.parse_unary())?;
                let span = start.merge(operand.span);
                return Ok(Expr::new(
                    ExprKind::Unary {
                        op,
                        operand: Box::new(operand),
                        dispatch: entry.dispatch_name(),
                    },
                    span,
                ));
            }
        }
        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::Int(value) => ExprKind::Literal(Literal::Int(value)),
            TokenKind::Float(bits) => ExprKind::Literal(Literal::Float(bits)),
            TokenKind::Str(name) => ExprKind::Literal(Literal::Str(name)),
            TokenKind::Ident(name)
                if self.cursor.peek_kind(1) == TokenKind::LParen
                    && self.interner().lookup(name) == "addr" =>
            {
                return self.parse_addr_of();
            }
            TokenKind::Ident(name) => ExprKind::Var(name),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(Expr::new(inner.kind, span.merge(self.previous_span())));
            }
            // The lexer already reported this token.
            TokenKind::Error => ExprKind::Literal(Literal::Int(0)),
            found => {
                return Err(ParseError::new(
                    ErrorCode::E1002,
                    format!("expected expression, found {found}"),
                    span,
                ))
            }
        };
        self.advance();
        Ok(Expr::new(kind, span))
    }

    /// `addr(expr)`. Whether the operand has an address is checked during
    /// resolution.
    fn parse_addr_of(&mut self) -> Result<Expr, ParseError> {
        let start = self.advance().span;
        self.expect(&TokenKind::LParen)?;
        let operand = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let span = start.merge(self.previous_span());
        Ok(Expr::new(ExprKind::AddrOf(Box::new(operand)), span))
    }

    /// Calls, indexing and member access, applied left to right.
    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            match self.current_kind() {
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_call_args()?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Index {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.advance();
                    let (field, field_span) = self.expect_ident()?;
                    let span = expr.span.merge(field_span);
                    expr = Expr::new(
                        ExprKind::Member {
                            base: Box::new(expr),
                            field,
                            field_span,
                        },
                        span,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Arguments after the opening `(`, through the closing `)`.
    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            match self.current_kind() {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RParen => {
                    self.advance();
                    return Ok(args);
                }
                found => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!("expected `,` or `)` in argument list, found {found}"),
                        self.current_span(),
                    ))
                }
            }
        }
    }
}
