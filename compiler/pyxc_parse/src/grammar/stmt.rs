//! Statements and suites.

use pyxc_diagnostic::ErrorCode;
use pyxc_ir::{Block, ExprKind, IfBranch, Stmt, StmtKind, TokenKind};

use crate::recovery::{self, STMT_END};
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// The body after a block opener's `:`.
    ///
    /// Either a single statement on the same line, or a `Newline` followed
    /// by an indented block. `construct` names the opener in the error
    /// reported when the indented block is missing.
    pub(crate) fn parse_suite(&mut self, construct: &str) -> Result<Block, ParseError> {
        let start = self.current_span();
        if !self.check(&TokenKind::Newline) {
            let stmt = self.parse_statement()?;
            return Ok(Block {
                span: stmt.span,
                stmts: vec![stmt],
            });
        }
        self.advance();

        if !self.eat(&TokenKind::Indent) {
            // Leave the next line alone: it starts the next statement.
            self.errors.push(
                ParseError::new(
                    ErrorCode::E1005,
                    format!("expected an indented block after '{construct}'"),
                    self.current_span(),
                )
                .with_context("expected an indented line here"),
            );
            return Ok(Block {
                stmts: Vec::new(),
                span: start,
            });
        }

        let stmts = self.parse_block_statements();
        let span = start.merge(self.previous_span());
        self.eat(&TokenKind::Dedent);
        Ok(Block { stmts, span })
    }

    /// Statements up to the `Dedent` closing the current block.
    ///
    /// A statement with a syntax error is reported and skipped; the rest of
    /// the block is still parsed.
    fn parse_block_statements(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Dedent | TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.advance();
                }
                _ => {
                    let start = self.cursor.position();
                    match self.parse_statement() {
                        Ok(stmt) => stmts.push(stmt),
                        Err(err) => {
                            self.errors.push(err);
                            recovery::skip_statement(&mut self.cursor);
                        }
                    }
                    if self.cursor.position() == start && !self.check(&TokenKind::Dedent) {
                        self.advance();
                    }
                }
            }
        }
        stmts
    }

    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        pyxc_stack::ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        match self.current_kind() {
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::Break => {
                self.advance();
                self.expect_statement_end()?;
                Ok(Stmt::new(StmtKind::Break, start))
            }
            TokenKind::Continue => {
                self.advance();
                self.expect_statement_end()?;
                Ok(Stmt::new(StmtKind::Continue, start))
            }
            TokenKind::Return => self.parse_return(),
            TokenKind::Print => self.parse_print(),
            TokenKind::Const => self.parse_const(),
            TokenKind::Elif | TokenKind::Else => Err(self.dangling_branch()),
            TokenKind::Indent => Ok(self.parse_unexpected_indent()),
            _ => self.parse_simple_statement(),
        }
    }

    pub(crate) fn dangling_branch(&self) -> ParseError {
        let kind = self.current_kind();
        ParseError::new(
            ErrorCode::E1012,
            format!("{kind} without a matching `if`"),
            self.current_span(),
        )
        .with_help("`elif` and `else` must follow the block of an `if` at the same indentation")
    }

    /// Report the indent and keep the indented lines as a nested block.
    fn parse_unexpected_indent(&mut self) -> Stmt {
        let start = self.advance().span;
        self.errors.push(
            ParseError::new(ErrorCode::E1013, "unexpected indent", start)
                .with_context("this line is indented more than the line before it"),
        );
        let stmts = self.parse_block_statements();
        let span = start.merge(self.previous_span());
        self.eat(&TokenKind::Dedent);
        Stmt::new(StmtKind::Block(Block { stmts, span }), span)
    }

    /// `if c: ... elif c: ... else: ...`
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_suite("if")?;
        let mut branches = vec![IfBranch { cond, body }];
        let mut else_body = None;

        loop {
            if self.eat(&TokenKind::Elif) {
                let cond = self.parse_expr()?;
                self.expect(&TokenKind::Colon)?;
                let body = self.parse_suite("elif")?;
                branches.push(IfBranch { cond, body });
            } else if self.eat(&TokenKind::Else) {
                self.expect(&TokenKind::Colon)?;
                else_body = Some(self.parse_suite("else")?);
                break;
            } else {
                break;
            }
        }

        let span = start.merge(self.previous_span());
        Ok(Stmt::new(
            StmtKind::If {
                branches,
                else_body,
            },
            span,
        ))
    }

    /// `for i in range(start, end[, step]): ...`
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let (var, var_span) = self.expect_ident()?;
        self.expect(&TokenKind::In)?;
        self.expect(&TokenKind::Range)?;
        self.expect(&TokenKind::LParen)?;
        let from = self.parse_expr()?;
        self.expect(&TokenKind::Comma)?;
        let to = self.parse_expr()?;
        let step = if self.eat(&TokenKind::Comma) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_suite("for")?;
        let span = start.merge(self.previous_span());
        Ok(Stmt::new(
            StmtKind::For {
                var,
                var_span,
                start: from,
                end: to,
                step,
                body,
            },
            span,
        ))
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_suite("while")?;
        let span = start.merge(self.previous_span());
        Ok(Stmt::new(StmtKind::While { cond, body }, span))
    }

    /// `do: ... while cond`
    fn parse_do_while(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_suite("do")?;
        if !self.eat(&TokenKind::While) {
            return Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "expected `while` after the `do` block, found {}",
                    self.current_kind()
                ),
                self.current_span(),
            ));
        }
        let cond = self.parse_expr()?;
        let span = start.merge(self.previous_span());
        self.expect_statement_end()?;
        Ok(Stmt::new(StmtKind::DoWhile { body, cond }, span))
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let value = if STMT_END.contains(&self.current_kind()) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let span = start.merge(self.previous_span());
        self.expect_statement_end()?;
        Ok(Stmt::new(StmtKind::Return(value), span))
    }

    /// `print(a, b, ...)`; a trailing comma is rejected.
    fn parse_print(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                let comma = self.advance().span;
                if self.check(&TokenKind::RParen) {
                    return Err(ParseError::new(
                        ErrorCode::E1011,
                        "trailing comma in `print` arguments",
                        comma,
                    )
                    .with_help("remove the final `,`"));
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        let span = start.merge(self.previous_span());
        self.expect_statement_end()?;
        Ok(Stmt::new(StmtKind::Print(args), span))
    }

    /// `const name[: T] = value`
    fn parse_const(&mut self) -> Result<Stmt, ParseError> {
        let start = self.advance().span;
        let (name, _) = self.expect_ident()?;
        let ty = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expr()?;
        let span = start.merge(self.previous_span());
        self.expect_statement_end()?;
        Ok(Stmt::new(StmtKind::Const { name, ty, value }, span))
    }

    /// Expression statements, assignments and typed declarations.
    ///
    /// All three start with an expression; the token after it decides.
    fn parse_simple_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current_span();
        let expr = self.parse_expr()?;
        let kind = match self.current_kind() {
            TokenKind::Colon => {
                let ExprKind::Var(name) = expr.kind else {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        "only a plain name can be declared with a type",
                        expr.span,
                    ));
                };
                self.advance();
                let ty = self.parse_type()?;
                let init = if self.eat(&TokenKind::Eq) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                StmtKind::TypedDecl { name, ty, init }
            }
            TokenKind::Eq => {
                if !expr.is_place() {
                    return Err(ParseError::new(
                        ErrorCode::E1014,
                        "invalid assignment target",
                        expr.span,
                    )
                    .with_context("cannot assign to this expression")
                    .with_help("assign to a variable, a field or an indexed element"));
                }
                self.advance();
                let value = self.parse_expr()?;
                StmtKind::Assign {
                    target: expr,
                    value,
                }
            }
            _ => StmtKind::Expr(expr),
        };
        let span = start.merge(self.previous_span());
        self.expect_statement_end()?;
        Ok(Stmt::new(kind, span))
    }
}
