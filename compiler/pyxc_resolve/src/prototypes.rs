//! Canonical function signatures.
//!
//! Every `extern def` and `def` of a batch declares a prototype. The first
//! declaration of a name becomes canonical. Later declarations must match it
//! exactly (arity, parameter types in order, return type), and at most one
//! of them may carry a body.

use pyxc_ir::{Name, OperatorRole, Span, StringInterner};
use pyxc_types::{TypeId, TypePool};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResolvedParam {
    pub name: Name,
    pub ty: TypeId,
    pub span: Span,
}

/// A prototype whose types have been resolved.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResolvedPrototype {
    pub name: Name,
    pub params: Vec<ResolvedParam>,
    pub ret: TypeId,
    pub role: OperatorRole,
    /// Span of the first declaration.
    pub span: Span,
    /// Span of the prototype that carries the body, if any declaration does.
    pub definition: Option<Span>,
}

impl ResolvedPrototype {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_defined(&self) -> bool {
        self.definition.is_some()
    }

    pub fn param_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.params.iter().map(|p| p.ty)
    }

    /// Same arity, same parameter types in order, same return type.
    pub fn is_compatible(&self, other: &ResolvedPrototype) -> bool {
        self.ret == other.ret && self.param_types().eq(other.param_types())
    }

    /// `def name(a: i32, b: i32) -> i32`
    pub fn signature(&self, pool: &TypePool, interner: &StringInterner) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{}: {}", interner.lookup(p.name), pool.display(p.ty, interner)))
            .collect();
        format!(
            "'def {}({}) -> {}'",
            interner.lookup(self.name),
            params.join(", "),
            pool.display(self.ret, interner)
        )
    }
}

/// Why a declaration was rejected.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum PrototypeConflict {
    /// The signature differs from the canonical one.
    Signature { existing: ResolvedPrototype },
    /// A second body for the same function.
    Redefinition { previous: Span },
}

/// Outcome of looking a function up.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Lookup<'a> {
    Found(&'a ResolvedPrototype),
    /// Every declaration failed to resolve; the failure is already reported.
    Failed,
    Missing,
}

#[derive(Clone, Debug, Default)]
pub struct PrototypeTable {
    entries: Vec<ResolvedPrototype>,
    by_name: FxHashMap<Name, usize>,
    failed: FxHashSet<Name>,
}

impl PrototypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one declaration; `has_body` for a `def`, false for an `extern def`.
    pub fn declare(
        &mut self,
        mut proto: ResolvedPrototype,
        has_body: bool,
    ) -> Result<(), PrototypeConflict> {
        let Some(&index) = self.by_name.get(&proto.name) else {
            proto.definition = has_body.then_some(proto.span);
            tracing::debug!(name = ?proto.name, arity = proto.arity(), "prototype declared");
            self.by_name.insert(proto.name, self.entries.len());
            self.entries.push(proto);
            return Ok(());
        };

        let existing = &mut self.entries[index];
        if !existing.is_compatible(&proto) {
            return Err(PrototypeConflict::Signature {
                existing: existing.clone(),
            });
        }
        if has_body {
            if let Some(previous) = existing.definition {
                return Err(PrototypeConflict::Redefinition { previous });
            }
            existing.definition = Some(proto.span);
        }
        tracing::trace!(name = ?proto.name, "compatible redeclaration");
        Ok(())
    }

    /// Record a declaration whose types failed to resolve.
    pub fn mark_failed(&mut self, name: Name) {
        self.failed.insert(name);
    }

    pub fn lookup(&self, name: Name) -> Lookup<'_> {
        match self.by_name.get(&name) {
            Some(&index) => Lookup::Found(&self.entries[index]),
            None if self.failed.contains(&name) => Lookup::Failed,
            None => Lookup::Missing,
        }
    }

    pub fn get(&self, name: Name) -> Option<&ResolvedPrototype> {
        self.by_name.get(&name).map(|&index| &self.entries[index])
    }

    /// Prototypes in order of first declaration.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedPrototype> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_name.clear();
        self.failed.clear();
    }
}
