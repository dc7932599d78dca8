//! Type resolution errors.

use std::fmt;

use pyxc_diagnostic::{Diagnostic, ErrorCode};
use pyxc_ir::{Name, Span, StringInterner};

/// Position in which a `void` type was rejected.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueContext {
    Parameter,
    Field,
    Variable,
    ArrayElement,
}

impl fmt::Display for ValueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueContext::Parameter => "parameter",
            ValueContext::Field => "struct field",
            ValueContext::Variable => "variable",
            ValueContext::ArrayElement => "array element",
        })
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeErrorKind {
    /// Neither a builtin, a struct nor an alias.
    UnknownType(Name),
    NonPositiveArraySize(i64),
    NonLiteralArraySize,
    /// Declarations that expand into themselves. The first name is repeated
    /// at the end: `A -> B -> A`.
    Cycle { chain: Vec<Name> },
    VoidNotAllowed(ValueContext),
    /// The named declaration already failed and was reported there.
    Poisoned(Name),
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub span: Span,
}

impl TypeError {
    pub fn new(kind: TypeErrorKind, span: Span) -> Self {
        TypeError { kind, span }
    }

    /// Errors that must not be reported again.
    pub fn is_poisoned(&self) -> bool {
        matches!(self.kind, TypeErrorKind::Poisoned(_))
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            TypeErrorKind::UnknownType(_) | TypeErrorKind::Poisoned(_) => ErrorCode::E2001,
            TypeErrorKind::NonPositiveArraySize(_) => ErrorCode::E2002,
            TypeErrorKind::NonLiteralArraySize => ErrorCode::E2003,
            TypeErrorKind::Cycle { .. } => ErrorCode::E2004,
            TypeErrorKind::VoidNotAllowed(_) => ErrorCode::E2005,
        }
    }

    pub fn message(&self, interner: &StringInterner) -> String {
        match &self.kind {
            TypeErrorKind::UnknownType(name) => {
                format!("unknown type '{}'", interner.lookup(*name))
            }
            TypeErrorKind::NonPositiveArraySize(n) => {
                format!("array size must be a positive integer, found {n}")
            }
            TypeErrorKind::NonLiteralArraySize => {
                "array size must be an integer literal".to_string()
            }
            TypeErrorKind::Cycle { chain } => {
                let names: Vec<_> = chain.iter().map(|n| interner.lookup(*n)).collect();
                format!("cyclic type definition: {}", names.join(" -> "))
            }
            TypeErrorKind::VoidNotAllowed(context) => {
                format!("'void' cannot be the type of a {context}")
            }
            TypeErrorKind::Poisoned(name) => {
                format!("type '{}' failed to resolve", interner.lookup(*name))
            }
        }
    }

    pub fn to_diagnostic(&self, interner: &StringInterner) -> Diagnostic {
        let diag = Diagnostic::error(self.code())
            .with_message(self.message(interner))
            .with_label(self.span, self.label());
        match &self.kind {
            TypeErrorKind::Cycle { .. } => diag.with_note(
                "a struct can refer to itself only through `ptr[...]`, an alias never can",
            ),
            TypeErrorKind::NonPositiveArraySize(_) | TypeErrorKind::NonLiteralArraySize => {
                diag.with_suggestion("write the element count as a literal such as `array[i32, 4]`")
            }
            TypeErrorKind::VoidNotAllowed(_) => {
                diag.with_suggestion("use `ptr[void]` for an untyped pointer")
            }
            _ => diag,
        }
    }

    fn label(&self) -> &'static str {
        match self.kind {
            TypeErrorKind::UnknownType(_) | TypeErrorKind::Poisoned(_) => "not declared",
            TypeErrorKind::NonPositiveArraySize(_) | TypeErrorKind::NonLiteralArraySize => {
                "invalid array size"
            }
            TypeErrorKind::Cycle { .. } => "cycle closes here",
            TypeErrorKind::VoidNotAllowed(_) => "void type",
        }
    }
}
