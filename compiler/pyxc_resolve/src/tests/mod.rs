//! Resolver tests.
//!
//! - `assemble`: Phase 1 collection, cross-unit linking, type declarations
//! - `semantic`: body checks and local typing
//! - `program`: the assembled program and the backend hand-off

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod assemble;

use pyxc_diagnostic::ErrorCode;
use pyxc_ir::{FileId, StringInterner, TranslationUnit};
use pyxc_parse::{parse_source, OperatorTable};
use pyxc_types::TypeRegistry;

use crate::{assemble as assemble_units, Program, PrototypeTable, ResolveError};

/// Parse each source as its own file, sharing one operator table.
pub(super) fn parse_units(sources: &[&str], interner: &StringInterner) -> Vec<TranslationUnit> {
    let mut operators = OperatorTable::with_builtins();
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let file = FileId::new(u32::try_from(i).unwrap());
            let output = parse_source(source, file, interner, &mut operators);
            assert!(!output.has_errors(), "{:?}", output.diagnostics());
            output.unit
        })
        .collect()
}

pub(super) fn assemble_sources(
    sources: &[&str],
) -> (Result<Program, Vec<ResolveError>>, StringInterner) {
    let interner = StringInterner::new();
    let units = parse_units(sources, &interner);
    let mut registry = TypeRegistry::new();
    let mut prototypes = PrototypeTable::new();
    let result = assemble_units(&units, &interner, &mut registry, &mut prototypes);
    (result, interner)
}

pub(super) fn assemble_ok(sources: &[&str]) -> (Program, StringInterner) {
    let (result, interner) = assemble_sources(sources);
    match result {
        Ok(program) => (program, interner),
        Err(errors) => {
            let messages: Vec<_> = errors.iter().map(|e| e.message(&interner)).collect();
            panic!("expected success, got {messages:?}");
        }
    }
}

pub(super) fn assemble_err(sources: &[&str]) -> (Vec<ResolveError>, StringInterner) {
    let (result, interner) = assemble_sources(sources);
    match result {
        Ok(_) => panic!("expected errors"),
        Err(errors) => (errors, interner),
    }
}

pub(super) fn codes(errors: &[ResolveError]) -> Vec<ErrorCode> {
    errors.iter().map(ResolveError::code).collect()
}
