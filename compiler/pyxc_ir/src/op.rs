//! Operator symbols.
//!
//! `Op` is the token-level identity of an operator. Whether an `Op` is usable
//! as a prefix or infix operator, and at which precedence, is decided by the
//! parser's operator table, not here.

use std::fmt;

/// An operator token.
///
/// Keyword operators (`not`, `and`, `or`) are operators too. `Custom` covers
/// any other single ASCII punctuation character, which becomes meaningful
/// once a program declares it with `@unary` or `@binary`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Op {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Not,
    And,
    Or,
    Custom(char),
}

impl Op {
    /// Map a single punctuation character to its operator.
    pub fn from_char(c: char) -> Option<Op> {
        let op = match c {
            '+' => Op::Plus,
            '-' => Op::Minus,
            '*' => Op::Star,
            '/' => Op::Slash,
            '%' => Op::Percent,
            '<' => Op::Lt,
            '>' => Op::Gt,
            '&' => Op::Amp,
            '|' => Op::Pipe,
            '^' => Op::Caret,
            '~' => Op::Tilde,
            '!' => Op::Bang,
            '$' | '?' | ';' | '`' => Op::Custom(c),
            _ => return None,
        };
        Some(op)
    }

    /// The single character spelling of this operator, if it has one.
    ///
    /// Only single-character operators can be declared by user code, since
    /// their dispatch name is `unary<c>` or `binary<c>`.
    pub fn as_char(self) -> Option<char> {
        let c = match self {
            Op::Plus => '+',
            Op::Minus => '-',
            Op::Star => '*',
            Op::Slash => '/',
            Op::Percent => '%',
            Op::Lt => '<',
            Op::Gt => '>',
            Op::Amp => '&',
            Op::Pipe => '|',
            Op::Caret => '^',
            Op::Tilde => '~',
            Op::Bang => '!',
            Op::Custom(c) => c,
            Op::LtEq | Op::GtEq | Op::EqEq | Op::NotEq | Op::Not | Op::And | Op::Or => {
                return None
            }
        };
        Some(c)
    }

    /// Source spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Plus => "+",
            Op::Minus => "-",
            Op::Star => "*",
            Op::Slash => "/",
            Op::Percent => "%",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::LtEq => "<=",
            Op::GtEq => ">=",
            Op::EqEq => "==",
            Op::NotEq => "!=",
            Op::Amp => "&",
            Op::Pipe => "|",
            Op::Caret => "^",
            Op::Tilde => "~",
            Op::Bang => "!",
            Op::Not => "not",
            Op::And => "and",
            Op::Or => "or",
            Op::Custom('$') => "$",
            Op::Custom('?') => "?",
            Op::Custom(';') => ";",
            Op::Custom('`') => "`",
            Op::Custom(_) => "<op>",
        }
    }

    /// Dispatch function name for a user-declared operator of this arity.
    pub fn dispatch_name(self, arity: Arity) -> Option<String> {
        let c = self.as_char()?;
        Some(format!("{}{c}", arity.prefix()))
    }

    /// Comparison and logical operators produce a truth value.
    pub fn is_comparison_or_logical(self) -> bool {
        matches!(
            self,
            Op::Lt
                | Op::Gt
                | Op::LtEq
                | Op::GtEq
                | Op::EqEq
                | Op::NotEq
                | Op::Not
                | Op::Bang
                | Op::And
                | Op::Or
        )
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Custom(c) => write!(f, "{c}"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Number of operands an operator takes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Arity {
    Unary,
    Binary,
}

impl Arity {
    /// Prefix of the dispatch name for user-declared operators.
    pub fn prefix(self) -> &'static str {
        match self {
            Arity::Unary => "unary",
            Arity::Binary => "binary",
        }
    }

    /// Parameter count of an operator implementation function.
    pub fn operand_count(self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}
