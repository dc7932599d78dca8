//! Struct and alias declaration tables.
//!
//! Both tables keep declaration order for deterministic iteration and index
//! by name for lookup. The first declaration of a name wins.

use pyxc_ir::{FieldDecl, Name, Span, TypeExprId};
use rustc_hash::FxHashMap;

/// A struct declaration, field types pointing into the registry's arena.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StructEntry {
    pub name: Name,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

/// An alias declaration, target pointing into the registry's arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AliasEntry {
    pub name: Name,
    pub target: TypeExprId,
    pub span: Span,
}

pub trait Declared {
    fn name(&self) -> Name;
    fn span(&self) -> Span;
}

impl Declared for StructEntry {
    fn name(&self) -> Name {
        self.name
    }

    fn span(&self) -> Span {
        self.span
    }
}

impl Declared for AliasEntry {
    fn name(&self) -> Name {
        self.name
    }

    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Clone, Debug)]
pub struct DeclTable<E> {
    entries: Vec<E>,
    by_name: FxHashMap<Name, usize>,
}

pub type StructTable = DeclTable<StructEntry>;
pub type AliasTable = DeclTable<AliasEntry>;

impl<E: Declared> DeclTable<E> {
    pub fn new() -> Self {
        DeclTable {
            entries: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Insert a declaration. On a duplicate the table is unchanged and the
    /// span of the existing declaration is returned.
    pub fn insert(&mut self, entry: E) -> Result<(), Span> {
        if let Some(&index) = self.by_name.get(&entry.name()) {
            return Err(self.entries[index].span());
        }
        self.by_name.insert(entry.name(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, name: Name) -> Option<&E> {
        self.by_name.get(&name).map(|&index| &self.entries[index])
    }

    pub fn contains(&self, name: Name) -> bool {
        self.by_name.contains_key(&name)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
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
    }
}

impl<E: Declared> Default for DeclTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which kind of declaration already owns a name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Struct,
    Alias,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Struct => "struct",
            DeclKind::Alias => "alias",
        }
    }
}

/// A type declaration whose name is already taken.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NameClash {
    pub name: Name,
    pub existing: DeclKind,
    pub previous: Span,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyxc_ir::{FileId, StringInterner};

    #[test]
    fn test_first_declaration_wins() {
        let interner = StringInterner::new();
        let p = interner.intern("P");
        let first = Span::new(FileId::new(0), 0, 5);
        let second = Span::new(FileId::new(1), 10, 15);

        let mut table = StructTable::new();
        let entry = |span| StructEntry {
            name: p,
            fields: Vec::new(),
            span,
        };
        assert_eq!(table.insert(entry(first)), Ok(()));
        assert_eq!(table.insert(entry(second)), Err(first));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(p).map(|e| e.span), Some(first));
    }
}
