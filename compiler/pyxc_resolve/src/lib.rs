//! Symbol resolution for the pyxc front end.
//!
//! Merges the translation units of one batch into a [`Program`]:
//! - Phase 1 collects every struct, alias and prototype of every unit and
//!   checks that all declarations of a function agree
//! - Phase 2 resolves function bodies and top-level expressions against
//!   the complete tables
//!
//! The prototype table and type registry are owned by the caller so that
//! they can outlive a single call (see `pyxc::CompilationSession`).
//!
//! # Usage
//!
//! ```text
//! let program = assemble(&units, &interner, &mut registry, &mut prototypes)?;
//! program.lower(&mut backend)?;
//! ```

mod assemble;
mod body;
mod error;
mod program;
mod prototypes;

pub use assemble::{Assembler, ANON_EXPR_NAME};
pub use error::{ResolveError, ResolveErrorKind};
pub use program::{
    AccessStep, Backend, ElementAddress, Local, LocalKind, Program, ResolvedFunction,
    ResolvedTopLevel,
};
pub use prototypes::{Lookup, PrototypeConflict, PrototypeTable, ResolvedParam, ResolvedPrototype};

use pyxc_ir::{StringInterner, TranslationUnit};
use pyxc_types::TypeRegistry;

/// Assemble `units` (in file order) into a program.
///
/// Every error found is returned; a signature conflict or duplicate
/// definition stops assembly before any body is resolved.
pub fn assemble(
    units: &[TranslationUnit],
    interner: &StringInterner,
    registry: &mut TypeRegistry,
    prototypes: &mut PrototypeTable,
) -> Result<Program, Vec<ResolveError>> {
    Assembler::new(interner, registry, prototypes).assemble(units)
}

#[cfg(test)]
mod tests;
