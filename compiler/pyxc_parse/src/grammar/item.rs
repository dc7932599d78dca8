//! File-scope declarations: structs, aliases, externs, definitions and
//! top-level expressions.

use pyxc_diagnostic::ErrorCode;
use pyxc_ir::{
    AliasDecl, Arity, BuiltinType, FieldDecl, Function, Name, Op, OperatorRole, Param, Prototype,
    Span, StructDecl, TokenKind, TopLevelExpr, TypeExpr, TypeExprId,
};

use crate::operators::{
    Registration, DEFAULT_BINARY_PRECEDENCE, MAX_PRECEDENCE, MIN_PRECEDENCE, UNARY_PRECEDENCE,
};
use crate::recovery::{self, ITEM_START};
use crate::{ParseError, ParseWarning, Parser};

/// A parsed `@unary` or `@binary[(precedence=N)]` line.
#[derive(Copy, Clone, Debug)]
struct Decorator {
    arity: Arity,
    precedence: u32,
    span: Span,
}

impl Parser<'_> {
    pub(crate) fn parse_items(&mut self) {
        loop {
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::Newline | TokenKind::Dedent => {
                    self.advance();
                }
                TokenKind::Indent => {
                    self.errors.push(
                        ParseError::new(ErrorCode::E1013, "unexpected indent", self.current_span())
                            .with_context("declarations start at column 1"),
                    );
                    recovery::skip_statement(&mut self.cursor);
                }
                _ => {
                    let start = self.cursor.position();
                    if let Err(err) = self.parse_item() {
                        self.errors.push(err);
                        recovery::skip_statement(&mut self.cursor);
                    }
                    if self.cursor.position() == start {
                        self.advance();
                    }
                }
            }
        }
    }

    fn parse_item(&mut self) -> Result<(), ParseError> {
        match self.current_kind() {
            TokenKind::Struct => self.parse_struct(),
            TokenKind::Type => self.parse_alias(),
            TokenKind::Extern => self.parse_extern(),
            TokenKind::At => match self.parse_decorator() {
                Ok(decorator) => {
                    self.cursor.skip_newlines();
                    self.parse_definition(Some(decorator))
                }
                Err(err) => {
                    self.errors.push(err);
                    recovery::skip_statement(&mut self.cursor);
                    // An operator definition is meaningless without its decorator.
                    if self.check(&TokenKind::Def)
                        && matches!(self.cursor.peek_kind(1), TokenKind::Op(_))
                    {
                        recovery::skip_statement(&mut self.cursor);
                    }
                    Ok(())
                }
            },
            TokenKind::Def => self.parse_definition(None),
            TokenKind::Elif | TokenKind::Else => Err(self.dangling_branch()),
            _ => self.parse_top_level_expr(),
        }
    }

    fn parse_struct(&mut self) -> Result<(), ParseError> {
        let start = self.advance().span;
        let (name, name_span) = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let struct_name = self.interner().lookup(name);
        if !self.check(&TokenKind::Newline) {
            return Err(ParseError::new(
                ErrorCode::E1001,
                format!("expected end of line after `struct {struct_name}:`"),
                self.current_span(),
            )
            .with_help("declare each field on its own indented line"));
        }
        self.advance();
        if !self.eat(&TokenKind::Indent) {
            // The next line already belongs to the following item.
            self.errors.push(ParseError::new(
                ErrorCode::E1006,
                format!("Struct '{struct_name}' must declare at least one field"),
                name_span,
            ));
            return Ok(());
        }

        let mut fields: Vec<FieldDecl> = Vec::new();
        while !matches!(self.current_kind(), TokenKind::Dedent | TokenKind::Eof) {
            if self.eat(&TokenKind::Newline) {
                continue;
            }
            match self.parse_field() {
                Ok(field) => {
                    if let Some(first) = fields.iter().find(|f| f.name == field.name).copied() {
                        self.errors.push(
                            ParseError::new(
                                ErrorCode::E1007,
                                format!(
                                    "Duplicate field '{}' in struct '{struct_name}'",
                                    self.interner().lookup(field.name)
                                ),
                                field.span,
                            )
                            .with_context("redeclared here")
                            .with_related(first.span, "first declared here"),
                        );
                    } else {
                        fields.push(field);
                    }
                }
                Err(err) => {
                    self.errors.push(err);
                    recovery::skip_statement(&mut self.cursor);
                }
            }
        }
        self.eat(&TokenKind::Dedent);

        if !fields.is_empty() {
            tracing::trace!(name = struct_name, fields = fields.len(), "struct");
            self.unit.structs.push(StructDecl {
                name,
                fields,
                span: start.merge(name_span),
            });
        }
        Ok(())
    }

    fn parse_field(&mut self) -> Result<FieldDecl, ParseError> {
        let (name, span) = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.expect_statement_end()?;
        Ok(FieldDecl { name, ty, span })
    }

    /// `type Name = T`
    fn parse_alias(&mut self) -> Result<(), ParseError> {
        let start = self.advance().span;
        let (name, _) = self.expect_ident()?;
        self.expect(&TokenKind::Eq)?;
        let target = self.parse_type()?;
        let span = start.merge(self.previous_span());
        self.expect_statement_end()?;
        self.unit.aliases.push(AliasDecl { name, target, span });
        Ok(())
    }

    /// `extern def name(params) -> T`
    fn parse_extern(&mut self) -> Result<(), ParseError> {
        let start = self.advance().span;
        self.expect(&TokenKind::Def)?;
        let mut proto = self.parse_prototype(None)?;
        proto.span = start.merge(proto.span);
        self.expect_statement_end()?;
        self.unit.externs.push(proto);
        Ok(())
    }

    fn parse_definition(&mut self, decorator: Option<Decorator>) -> Result<(), ParseError> {
        let start = decorator.map_or_else(|| self.current_span(), |d| d.span);
        if !self.check(&TokenKind::Def) {
            let found = self.current_kind();
            let mut err = ParseError::new(
                ErrorCode::E1001,
                format!("expected `def`, found {found}"),
                self.current_span(),
            );
            if decorator.is_some() {
                err = err.with_context("a decorator must be followed by a definition");
            }
            return Err(err);
        }
        self.advance();
        let proto = self.parse_prototype(decorator)?;
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_suite("def")?;
        let span = start.merge(self.previous_span());
        self.unit.functions.push(Function { proto, body, span });
        Ok(())
    }

    fn parse_decorator(&mut self) -> Result<Decorator, ParseError> {
        let at = self.advance().span;
        let (name, name_span) = self.expect_ident()?;
        let arity = match self.interner().lookup(name) {
            "unary" => Arity::Unary,
            "binary" => Arity::Binary,
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1008,
                    format!("unknown decorator `@{other}`"),
                    name_span,
                )
                .with_help("operator definitions are decorated with `@unary` or `@binary`"))
            }
        };

        let mut precedence = match arity {
            Arity::Unary => UNARY_PRECEDENCE,
            Arity::Binary => DEFAULT_BINARY_PRECEDENCE,
        };
        if self.check(&TokenKind::LParen) {
            let open = self.advance().span;
            if arity == Arity::Unary {
                return Err(ParseError::new(
                    ErrorCode::E1008,
                    "`@unary` takes no arguments",
                    open,
                ));
            }
            if !self.check(&TokenKind::RParen) {
                precedence = self.parse_precedence_argument()?;
            }
            self.expect(&TokenKind::RParen)?;
        }

        Ok(Decorator {
            arity,
            precedence,
            span: at.merge(self.previous_span()),
        })
    }

    /// `precedence = N` inside `@binary(...)`.
    fn parse_precedence_argument(&mut self) -> Result<u32, ParseError> {
        let (key, key_span) = self.expect_ident()?;
        let key = self.interner().lookup(key);
        if key != "precedence" {
            return Err(ParseError::new(
                ErrorCode::E1008,
                format!("unknown decorator argument `{key}`"),
                key_span,
            )
            .with_help("the only argument is `precedence=N`"));
        }
        self.expect(&TokenKind::Eq)?;
        match self.current_kind() {
            TokenKind::Int(value) => {
                let span = self.advance().span;
                match u32::try_from(value) {
                    Ok(p) if (MIN_PRECEDENCE..=MAX_PRECEDENCE).contains(&p) => Ok(p),
                    _ => Err(ParseError::new(
                        ErrorCode::E1008,
                        format!(
                            "precedence {value} is out of range; expected {MIN_PRECEDENCE} to {MAX_PRECEDENCE}"
                        ),
                        span,
                    )),
                }
            }
            found => Err(ParseError::new(
                ErrorCode::E1008,
                format!("expected an integer precedence, found {found}"),
                self.current_span(),
            )),
        }
    }

    /// `name(params) [-> T]`, or `<op>(params) [-> T]` under a decorator.
    ///
    /// An operator prototype is registered in the operator table before
    /// its body is parsed, so the body and every later line can use it.
    fn parse_prototype(&mut self, decorator: Option<Decorator>) -> Result<Prototype, ParseError> {
        let start = self.current_span();
        let (name, operator) = match decorator {
            None => (self.expect_ident()?.0, None),
            Some(decorator) => {
                let op = match self.current_kind() {
                    TokenKind::Op(op) => op,
                    found => {
                        return Err(ParseError::new(
                            ErrorCode::E1009,
                            format!("expected an operator character after `def`, found {found}"),
                            self.current_span(),
                        ))
                    }
                };
                let op_span = self.advance().span;
                let Some(dispatch) = op.dispatch_name(decorator.arity) else {
                    return Err(ParseError::new(
                        ErrorCode::E1009,
                        format!("`{op}` cannot be declared as an operator"),
                        op_span,
                    )
                    .with_help("operator definitions name a single punctuation character"));
                };
                (self.interner().intern(&dispatch), Some((op, decorator)))
            }
        };

        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        let ret = if self.eat(&TokenKind::Arrow) {
            self.parse_type()?
        } else {
            self.default_type(self.previous_span())
        };
        let span = start.merge(self.previous_span());

        let role = match operator {
            None => OperatorRole::None,
            Some((op, decorator)) => {
                let expected = decorator.arity.operand_count();
                if params.len() != expected {
                    return Err(ParseError::new(
                        ErrorCode::E1009,
                        format!(
                            "{} operator `{op}` takes {expected} operand{}, found {}",
                            decorator.arity,
                            if expected == 1 { "" } else { "s" },
                            params.len()
                        ),
                        span,
                    ));
                }
                self.declare_operator(op, decorator, name, span);
                match decorator.arity {
                    Arity::Unary => OperatorRole::Unary(op),
                    Arity::Binary => OperatorRole::Binary {
                        op,
                        precedence: decorator.precedence,
                    },
                }
            }
        };

        Ok(Prototype {
            name,
            params,
            ret,
            role,
            span,
        })
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let (name, span) = self.expect_ident()?;
        let ty = if self.eat(&TokenKind::Colon) {
            self.parse_type()?
        } else {
            self.default_type(span)
        };
        Ok(Param { name, ty, span })
    }

    /// Unannotated parameters and results are `f64`.
    fn default_type(&mut self, span: Span) -> TypeExprId {
        self.unit
            .types
            .alloc(TypeExpr::Builtin(BuiltinType::F64), span)
    }

    fn declare_operator(&mut self, op: Op, decorator: Decorator, dispatch: Name, span: Span) {
        match self
            .operators
            .register(op, decorator.arity, decorator.precedence, dispatch)
        {
            Ok(Registration::Added) => {}
            Ok(Registration::Redefined { previous }) => {
                let was_builtin = previous.dispatch_name().is_none();
                if was_builtin || previous.precedence() != decorator.precedence {
                    self.warnings.push(ParseWarning::OperatorRedefined {
                        span,
                        op,
                        arity: decorator.arity,
                        previous: previous.precedence(),
                        precedence: decorator.precedence,
                        was_builtin,
                    });
                }
            }
            Err(conflict) => self.errors.push(
                ParseError::new(
                    ErrorCode::E1010,
                    format!(
                        "`{op}` is already a {} operator and cannot also be declared {}",
                        conflict.existing, conflict.requested
                    ),
                    span,
                )
                .with_context("conflicting operator declaration"),
            ),
        }
    }

    fn parse_top_level_expr(&mut self) -> Result<(), ParseError> {
        let expr = self.parse_expr()?;
        if ITEM_START.contains(&self.current_kind()) {
            return Err(ParseError::new(
                ErrorCode::E1001,
                format!("expected end of line, found {}", self.current_kind()),
                self.current_span(),
            )
            .with_help("start each declaration on its own line"));
        }
        self.expect_statement_end()?;
        let span = expr.span;
        self.unit.top_level.push(TopLevelExpr { expr, span });
        Ok(())
    }
}
