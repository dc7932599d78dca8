//! Resolution errors.
//!
//! Messages that mention types carry the rendered type, since the pool the
//! type lived in may be gone by the time the error is displayed.

use pyxc_diagnostic::{Diagnostic, ErrorCode};
use pyxc_ir::{Name, Span, StringInterner};
use pyxc_types::{DeclKind, TypeError};

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ResolveErrorKind {
    /// A type could not be resolved.
    Type(TypeError),

    // === Declarations ===
    /// A struct or alias name is already taken.
    DuplicateType {
        name: Name,
        declared: DeclKind,
        existing: DeclKind,
        previous: Span,
    },
    /// Two declarations of a function disagree on their signature.
    SignatureConflict {
        name: Name,
        previous: Span,
        existing: String,
        conflicting: String,
    },
    DuplicateDefinition {
        name: Name,
        previous: Span,
    },

    // === Bodies ===
    UnknownField {
        struct_name: Name,
        field: Name,
    },
    MemberOnNonStruct {
        field: Name,
        found: String,
    },
    LoopControlOutsideLoop {
        keyword: &'static str,
    },
    UnknownVariable(Name),
    UnknownFunction(Name),
    ArityMismatch {
        name: Name,
        expected: usize,
        found: usize,
        declared: Span,
    },
    AssignToConst {
        name: Name,
        declared: Span,
    },
    NotIndexable {
        found: String,
    },
    ConflictingLocal {
        name: Name,
        previous_ty: String,
        new_ty: String,
        previous: Span,
    },
    ReturnValueInVoid {
        function: Name,
    },
    NotCallable,
    NotAddressable,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub span: Span,
}

impl From<TypeError> for ResolveError {
    fn from(err: TypeError) -> Self {
        ResolveError {
            span: err.span,
            kind: ResolveErrorKind::Type(err),
        }
    }
}

impl ResolveError {
    pub fn new(kind: ResolveErrorKind, span: Span) -> Self {
        ResolveError { kind, span }
    }

    pub fn code(&self) -> ErrorCode {
        match &self.kind {
            ResolveErrorKind::Type(err) => err.code(),
            ResolveErrorKind::DuplicateType {
                declared: DeclKind::Struct,
                existing: DeclKind::Struct,
                ..
            } => ErrorCode::E3001,
            ResolveErrorKind::DuplicateType { .. } => ErrorCode::E3002,
            ResolveErrorKind::UnknownField { .. } => ErrorCode::E3003,
            ResolveErrorKind::MemberOnNonStruct { .. } => ErrorCode::E3004,
            ResolveErrorKind::LoopControlOutsideLoop { .. } => ErrorCode::E3005,
            ResolveErrorKind::UnknownVariable(_) => ErrorCode::E3006,
            ResolveErrorKind::UnknownFunction(_) => ErrorCode::E3007,
            ResolveErrorKind::ArityMismatch { .. } => ErrorCode::E3008,
            ResolveErrorKind::AssignToConst { .. } => ErrorCode::E3009,
            ResolveErrorKind::NotIndexable { .. } => ErrorCode::E3010,
            ResolveErrorKind::ConflictingLocal { .. } => ErrorCode::E3011,
            ResolveErrorKind::ReturnValueInVoid { .. } => ErrorCode::E3012,
            ResolveErrorKind::NotCallable => ErrorCode::E3013,
            ResolveErrorKind::NotAddressable => ErrorCode::E3014,
            ResolveErrorKind::SignatureConflict { .. } => ErrorCode::E4001,
            ResolveErrorKind::DuplicateDefinition { .. } => ErrorCode::E4002,
        }
    }

    /// Linking errors leave the batch without a consistent meaning.
    pub fn is_linking_error(&self) -> bool {
        self.code().is_linking_error()
    }

    pub fn message(&self, interner: &StringInterner) -> String {
        let name = |n: &Name| interner.lookup(*n);
        match &self.kind {
            ResolveErrorKind::Type(err) => err.message(interner),
            ResolveErrorKind::DuplicateType {
                name: n,
                declared,
                existing,
                ..
            } if declared == existing => {
                format!("duplicate {} '{}'", declared.as_str(), name(n))
            }
            ResolveErrorKind::DuplicateType {
                name: n, existing, ..
            } => format!(
                "'{}' is already declared as {} {}",
                name(n),
                article(*existing),
                existing.as_str()
            ),
            ResolveErrorKind::SignatureConflict {
                name: n,
                existing,
                conflicting,
                ..
            } => format!(
                "conflicting declarations of '{}': {existing} and {conflicting}",
                name(n)
            ),
            ResolveErrorKind::DuplicateDefinition { name: n, .. } => {
                format!("function '{}' is defined more than once", name(n))
            }
            ResolveErrorKind::UnknownField { struct_name, field } => format!(
                "unknown field '{}' on struct '{}'",
                name(field),
                name(struct_name)
            ),
            ResolveErrorKind::MemberOnNonStruct { field, found } => format!(
                "member access '.{}' requires a struct-typed base, found '{found}'",
                name(field)
            ),
            ResolveErrorKind::LoopControlOutsideLoop { keyword } => {
                format!("'{keyword}' outside of a loop")
            }
            ResolveErrorKind::UnknownVariable(n) => format!("unknown variable '{}'", name(n)),
            ResolveErrorKind::UnknownFunction(n) => format!("unknown function '{}'", name(n)),
            ResolveErrorKind::ArityMismatch {
                name: n,
                expected,
                found,
                ..
            } => {
                let plural = if *expected == 1 { "" } else { "s" };
                format!(
                    "function '{}' takes {expected} argument{plural}, found {found}",
                    name(n)
                )
            }
            ResolveErrorKind::AssignToConst { name: n, .. } => {
                format!("cannot assign to constant '{}'", name(n))
            }
            ResolveErrorKind::NotIndexable { found } => {
                format!("cannot index a value of type '{found}'")
            }
            ResolveErrorKind::ConflictingLocal {
                name: n,
                previous_ty,
                new_ty,
                ..
            } => format!(
                "'{}' is already declared as '{previous_ty}', cannot redeclare it as '{new_ty}'",
                name(n)
            ),
            ResolveErrorKind::ReturnValueInVoid { function } => {
                format!("void function '{}' cannot return a value", name(function))
            }
            ResolveErrorKind::NotCallable => "only named functions can be called".to_string(),
            ResolveErrorKind::NotAddressable => {
                "addr() requires a variable, field or element".to_string()
            }
        }
    }

    pub fn to_diagnostic(&self, interner: &StringInterner) -> Diagnostic {
        if let ResolveErrorKind::Type(err) = &self.kind {
            return err.to_diagnostic(interner);
        }
        let diag = Diagnostic::error(self.code())
            .with_message(self.message(interner))
            .with_label(self.span, self.label());
        match &self.kind {
            ResolveErrorKind::DuplicateType { previous, .. } => {
                diag.with_secondary_label(*previous, "first declared here")
            }
            ResolveErrorKind::SignatureConflict { previous, .. } => diag
                .with_secondary_label(*previous, "first declared here")
                .with_note("every declaration of a function must agree on arity, parameter types and return type"),
            ResolveErrorKind::DuplicateDefinition { previous, .. } => {
                diag.with_secondary_label(*previous, "first defined here")
            }
            ResolveErrorKind::ArityMismatch { declared, .. } => {
                diag.with_secondary_label(*declared, "declared here")
            }
            ResolveErrorKind::AssignToConst { declared, .. } => diag
                .with_secondary_label(*declared, "declared as constant here")
                .with_suggestion("declare it without `const` if it needs to change"),
            ResolveErrorKind::ConflictingLocal { previous, .. } => {
                diag.with_secondary_label(*previous, "previous declaration")
            }
            ResolveErrorKind::NotIndexable { .. } => {
                diag.with_note("only `array[T, N]` and `ptr[T]` values can be indexed")
            }
            _ => diag,
        }
    }

    fn label(&self) -> &'static str {
        match &self.kind {
            ResolveErrorKind::Type(_) => "invalid type",
            ResolveErrorKind::DuplicateType { .. } => "redeclared here",
            ResolveErrorKind::SignatureConflict { .. } => "conflicting declaration",
            ResolveErrorKind::DuplicateDefinition { .. } => "defined again here",
            ResolveErrorKind::UnknownField { .. } => "no such field",
            ResolveErrorKind::MemberOnNonStruct { .. } => "not a struct",
            ResolveErrorKind::LoopControlOutsideLoop { .. } => "not inside a loop",
            ResolveErrorKind::UnknownVariable(_) => "not found in this scope",
            ResolveErrorKind::UnknownFunction(_) => "not declared",
            ResolveErrorKind::ArityMismatch { .. } => "wrong number of arguments",
            ResolveErrorKind::AssignToConst { .. } => "assignment to constant",
            ResolveErrorKind::NotIndexable { .. } => "not indexable",
            ResolveErrorKind::ConflictingLocal { .. } => "conflicting declaration",
            ResolveErrorKind::ReturnValueInVoid { .. } => "value returned here",
            ResolveErrorKind::NotCallable => "not a function name",
            ResolveErrorKind::NotAddressable => "has no address",
        }
    }
}

fn article(kind: DeclKind) -> &'static str {
    match kind {
        DeclKind::Struct => "a",
        DeclKind::Alias => "an",
    }
}
