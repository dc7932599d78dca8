//! Layout layer: turns raw tokens into the parser-facing token stream.
//!
//! Responsibilities on top of logos:
//! - `Newline` is significant, but blank and comment-only lines vanish.
//! - The first token of every logical line is preceded by `Indent` or by
//!   one `Dedent` per closed block, computed against the indentation stack.
//! - Newlines inside `(...)` and `[...]` are joined.
//! - End of input closes the current line and every open block.

use std::collections::VecDeque;

use logos::Logos;
use pyxc_ir::{FileId, Op, Span, StringInterner, Token, TokenKind};

use crate::lex_error::{LexError, LexErrorKind};
use crate::literal::{cook_number, cook_string};
use crate::raw_token::RawToken;

/// Tab stops are every 8 columns.
const TAB_WIDTH: u32 = 8;

/// Incremental lexer for one source file.
///
/// Call [`Lexer::next_token`] until it yields `Eof`; it keeps yielding `Eof`
/// afterwards. All state is per file: a new `Lexer` starts with an
/// indentation stack of `[0]` and an empty pending queue.
pub struct Lexer<'src> {
    source: &'src str,
    file: FileId,
    interner: &'src StringInterner,
    raw: logos::Lexer<'src, RawToken>,
    indent_stack: Vec<u32>,
    /// Whitespace character of the first indented line; every later
    /// indented line of the file must use the same one.
    indent_char: Option<char>,
    /// Synthetic and buffered tokens waiting to be returned.
    pending: VecDeque<Token>,
    /// No real token has been produced on the current logical line yet.
    at_line_start: bool,
    /// Byte offset where the current physical line starts.
    line_start: usize,
    /// Open `(` and `[` count; newlines inside brackets are not significant.
    bracket_depth: u32,
    finished: bool,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, file: FileId, interner: &'src StringInterner) -> Self {
        Lexer {
            source,
            file,
            interner,
            raw: RawToken::lexer(source),
            indent_stack: vec![0],
            indent_char: None,
            pending: VecDeque::new(),
            at_line_start: true,
            line_start: 0,
            bracket_depth: 0,
            finished: false,
            errors: Vec::new(),
        }
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    /// Current indentation depth (number of open blocks).
    pub fn depth(&self) -> usize {
        self.indent_stack.len() - 1
    }

    fn span(&self, range: std::ops::Range<usize>) -> Span {
        Span::new(self.file, to_u32(range.start), to_u32(range.end))
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token;
            }
            if self.finished {
                return Token::new(TokenKind::Eof, self.eof_span());
            }
            self.fill();
        }
    }

    fn eof_span(&self) -> Span {
        Span::point(self.file, to_u32(self.source.len()))
    }

    /// Pull raw tokens until at least one token is pending or input ends.
    fn fill(&mut self) {
        let Some(result) = self.raw.next() else {
            self.finish();
            return;
        };
        let range = self.raw.span();
        let span = self.span(range.clone());

        let raw = match result {
            Ok(raw) => raw,
            Err(()) => {
                let c = self.raw.slice().chars().next().unwrap_or('\u{fffd}');
                self.errors
                    .push(LexError::new(span, LexErrorKind::InvalidChar(c)));
                self.push_real(TokenKind::Error, span, range.start);
                return;
            }
        };

        match raw {
            RawToken::Comment | RawToken::LineContinuation => {}
            RawToken::Newline => {
                let was_blank = self.at_line_start;
                self.line_start = range.end;
                if was_blank || self.bracket_depth > 0 {
                    return;
                }
                self.at_line_start = true;
                self.pending.push_back(Token::new(TokenKind::Newline, span));
            }
            _ => {
                let kind = self.cook(raw, span);
                self.push_real(kind, span, range.start);
                match kind {
                    TokenKind::LParen | TokenKind::LBracket => self.bracket_depth += 1,
                    TokenKind::RParen | TokenKind::RBracket => {
                        self.bracket_depth = self.bracket_depth.saturating_sub(1);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Queue a real token, preceded by layout tokens if it starts a line.
    fn push_real(&mut self, kind: TokenKind, span: Span, start: usize) {
        if self.at_line_start {
            self.at_line_start = false;
            self.apply_indentation(start);
        }
        self.pending.push_back(Token::new(kind, span));
    }

    /// Compare the indentation of the line starting at `self.line_start`
    /// (ending at `first_token`) with the stack, queueing `Indent`/`Dedent`.
    fn apply_indentation(&mut self, first_token: usize) {
        let indent = self.source.get(self.line_start..first_token).unwrap_or("");
        let indent_span = self.span(self.line_start..first_token);
        let width = self.measure(indent, indent_span);
        let top = self.indent_stack.last().copied().unwrap_or(0);

        if width > top {
            self.indent_stack.push(width);
            self.pending.push_back(Token::new(TokenKind::Indent, indent_span));
            return;
        }

        while self.indent_stack.len() > 1
            && self.indent_stack.last().copied().unwrap_or(0) > width
        {
            self.indent_stack.pop();
            self.pending.push_back(Token::new(
                TokenKind::Dedent,
                Span::point(self.file, to_u32(first_token)),
            ));
        }

        // A dedent between two levels re-labels the enclosing level with
        // the new width, so later lines of the same block line up with it.
        let base = self.indent_stack.len() == 1;
        if let Some(level) = self.indent_stack.last_mut() {
            if *level != width {
                // The outermost level only sits above `width` after an
                // earlier re-label; returning to column 0 is not an error.
                let report = !(base && *level > width);
                *level = width;
                if report {
                    self.errors.push(LexError::new(
                        indent_span,
                        LexErrorKind::InconsistentDedent { width },
                    ));
                }
            }
        }
    }

    /// Column width of leading whitespace; tabs advance to the next stop.
    ///
    /// A line mixing both characters, or using the other character than the
    /// first indented line of the file, is `MixedIndentation`.
    fn measure(&mut self, indent: &str, span: Span) -> u32 {
        let mixed = if indent.contains(' ') && indent.contains('\t') {
            true
        } else if let Some(c) = indent.chars().next() {
            *self.indent_char.get_or_insert(c) != c
        } else {
            false
        };
        if mixed {
            self.errors
                .push(LexError::new(span, LexErrorKind::MixedIndentation));
        }
        indent.chars().fold(0, |width, c| match c {
            '\t' => (width / TAB_WIDTH + 1) * TAB_WIDTH,
            _ => width + 1,
        })
    }

    /// End of input: close the last line and every open block.
    fn finish(&mut self) {
        let eof = self.eof_span();
        if !self.at_line_start {
            self.at_line_start = true;
            self.pending.push_back(Token::new(TokenKind::Newline, eof));
        }
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.pending.push_back(Token::new(TokenKind::Dedent, eof));
        }
        self.pending.push_back(Token::new(TokenKind::Eof, eof));
        self.finished = true;
    }

    /// Convert a raw token to a `TokenKind`, interning and cooking literals.
    fn cook(&mut self, raw: RawToken, span: Span) -> TokenKind {
        let slice = self.raw.slice();
        match raw {
            RawToken::Ident => {
                TokenKind::keyword(slice).unwrap_or_else(|| TokenKind::Ident(self.interner.intern(slice)))
            }
            RawToken::Number => cook_number(slice).unwrap_or_else(|kind| {
                self.errors.push(LexError::new(span, kind));
                TokenKind::Error
            }),
            RawToken::String => {
                let body = &slice[1..slice.len() - 1];
                let (text, bad) = cook_string(body);
                for (offset, c) in bad {
                    let at = span.start + 1 + to_u32(offset);
                    self.errors.push(LexError::new(
                        Span::new(self.file, at, at + 1 + to_u32(c.len_utf8())),
                        LexErrorKind::InvalidEscape(c),
                    ));
                }
                TokenKind::Str(self.interner.intern(&text))
            }
            RawToken::UnterminatedString => {
                self.errors
                    .push(LexError::new(span, LexErrorKind::UnterminatedString));
                TokenKind::Error
            }
            RawToken::EqEq => TokenKind::Op(Op::EqEq),
            RawToken::NotEq => TokenKind::Op(Op::NotEq),
            RawToken::LtEq => TokenKind::Op(Op::LtEq),
            RawToken::GtEq => TokenKind::Op(Op::GtEq),
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Eq => TokenKind::Eq,
            RawToken::At => TokenKind::At,
            RawToken::OpChar => slice
                .chars()
                .next()
                .and_then(Op::from_char)
                .map_or(TokenKind::Error, TokenKind::Op),
            RawToken::Comment | RawToken::Newline | RawToken::LineContinuation => TokenKind::Error,
        }
    }
}

fn to_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}
