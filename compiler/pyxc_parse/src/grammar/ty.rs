//! Type annotations: builtin names, named references, `ptr[T]` and
//! `array[T, N]`.

use pyxc_diagnostic::ErrorCode;
use pyxc_ir::{ArraySize, BuiltinType, Op, TokenKind, TypeExpr, TypeExprId};
use pyxc_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_type(&mut self) -> Result<TypeExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_type_inner())
    }

    fn parse_type_inner(&mut self) -> Result<TypeExprId, ParseError> {
        let start = self.current_span();
        let TokenKind::Ident(name) = self.current_kind() else {
            return Err(ParseError::new(
                ErrorCode::E1004,
                format!("expected a type, found {}", self.current_kind()),
                start,
            ));
        };
        self.advance();

        let text = self.interner().lookup(name);
        let expr = if let Some(builtin) = BuiltinType::from_name(text) {
            TypeExpr::Builtin(builtin)
        } else if text == "ptr" && self.eat(&TokenKind::LBracket) {
            let pointee = self.parse_type()?;
            self.expect(&TokenKind::RBracket)?;
            TypeExpr::Pointer(pointee)
        } else if text == "array" && self.eat(&TokenKind::LBracket) {
            let elem = self.parse_type()?;
            self.expect(&TokenKind::Comma)?;
            let size = self.parse_array_size()?;
            self.expect(&TokenKind::RBracket)?;
            TypeExpr::Array { elem, size }
        } else {
            TypeExpr::Named(name)
        };

        let span = start.merge(self.previous_span());
        Ok(self.unit.types.alloc(expr, span))
    }

    /// The `N` of `array[T, N]`.
    ///
    /// Only an integer literal, optionally negated, counts as a literal
    /// size. Any other expression is parsed, then recorded as non-literal
    /// and reported.
    fn parse_array_size(&mut self) -> Result<ArraySize, ParseError> {
        let start = self.current_span();
        let size = match (
            self.current_kind(),
            self.cursor.peek_kind(1),
            self.cursor.peek_kind(2),
        ) {
            (TokenKind::Int(value), TokenKind::RBracket, _) => {
                self.advance();
                ArraySize::Literal(i64::try_from(value).unwrap_or(i64::MAX))
            }
            (TokenKind::Op(Op::Minus), TokenKind::Int(value), TokenKind::RBracket) => {
                self.advance();
                self.advance();
                ArraySize::Literal(i64::try_from(value).map_or(i64::MIN, |n| -n))
            }
            _ => {
                self.parse_expr()?;
                ArraySize::NonLiteral
            }
        };
        let span = start.merge(self.previous_span());

        if let Err(err) = pyxc_types::array_length(size, span) {
            self.errors.push(
                ParseError::new(err.code(), err.message(self.interner()), span)
                    .with_context("array size"),
            );
        }
        Ok(size)
    }
}
