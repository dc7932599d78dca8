//! Type registry: struct and alias tables plus resolution.
//!
//! # Architecture
//!
//! ```text
//! TypeRegistry
//!     types:    TypeExprArena       (declaration types copied from every unit)
//!     structs:  StructTable         (declaration order)
//!     aliases:  AliasTable          (declaration order)
//!     pool:     TypePool            (resolved, interned types)
//!     layouts:  Name -> StructLayout
//! ```
//!
//! Resolution turns a `TypeExpr` into a `TypeId`. Alias references expand
//! to their target, memoized by name. Struct references are nominal and
//! resolve to `TypeData::Struct(name)` without touching the fields, so a
//! struct can hold a pointer to itself. Layouts are computed separately by
//! [`TypeRegistry::resolve_layouts`], which is where by-value containment
//! cycles are caught.
//!
//! A declaration that fails is remembered. Later references to it produce
//! [`TypeErrorKind::Poisoned`], which callers drop instead of reporting the
//! same problem again.

use pyxc_ir::{
    AliasDecl, ArraySize, BuiltinType, FieldDecl, Name, Span, StringInterner, StructDecl,
    TypeExpr, TypeExprArena, TypeExprId,
};
use pyxc_stack::ensure_sufficient_stack;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    AliasEntry, AliasTable, DeclKind, NameClash, StructEntry, StructLayout, StructTable,
    TypeData, TypeError, TypeErrorKind, TypeId, TypePool, ValueContext,
};

/// Size and alignment of `ptr[T]` in bytes.
pub const POINTER_SIZE: u64 = 8;

/// Names currently being expanded. Nesting is rarely deep.
type InProgress = SmallVec<[Name; 8]>;

/// Validate the size operand of `array[T, N]`.
pub fn array_length(size: ArraySize, span: Span) -> Result<u64, TypeError> {
    match size {
        ArraySize::Literal(n) => u64::try_from(n)
            .ok()
            .filter(|&len| len > 0)
            .ok_or_else(|| TypeError::new(TypeErrorKind::NonPositiveArraySize(n), span)),
        ArraySize::NonLiteral => Err(TypeError::new(TypeErrorKind::NonLiteralArraySize, span)),
    }
}

#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    types: TypeExprArena,
    structs: StructTable,
    aliases: AliasTable,
    pool: TypePool,
    alias_cache: FxHashMap<Name, TypeId>,
    failed_aliases: FxHashSet<Name>,
    layouts: FxHashMap<Name, StructLayout>,
    failed_structs: FxHashSet<Name>,
    alias_stack: InProgress,
    layout_stack: InProgress,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // === Registration ===

    /// Register a struct declared in a unit whose types live in `src`.
    pub fn register_struct(
        &mut self,
        src: &TypeExprArena,
        decl: &StructDecl,
    ) -> Result<(), NameClash> {
        if let Some(clash) = self.clash(decl.name) {
            return Err(clash);
        }
        let fields = decl
            .fields
            .iter()
            .map(|field| FieldDecl {
                ty: self.types.import(src, field.ty),
                ..*field
            })
            .collect();
        debug!(name = ?decl.name, "struct registered");
        self.structs
            .insert(StructEntry {
                name: decl.name,
                fields,
                span: decl.span,
            })
            .map_err(|previous| NameClash {
                name: decl.name,
                existing: DeclKind::Struct,
                previous,
            })
    }

    /// Register an alias declared in a unit whose types live in `src`.
    pub fn register_alias(&mut self, src: &TypeExprArena, decl: &AliasDecl) -> Result<(), NameClash> {
        if let Some(clash) = self.clash(decl.name) {
            return Err(clash);
        }
        let target = self.types.import(src, decl.target);
        debug!(name = ?decl.name, "alias registered");
        self.aliases
            .insert(AliasEntry {
                name: decl.name,
                target,
                span: decl.span,
            })
            .map_err(|previous| NameClash {
                name: decl.name,
                existing: DeclKind::Alias,
                previous,
            })
    }

    fn clash(&self, name: Name) -> Option<NameClash> {
        if let Some(existing) = self.structs.get(name) {
            return Some(NameClash {
                name,
                existing: DeclKind::Struct,
                previous: existing.span,
            });
        }
        self.aliases.get(name).map(|existing| NameClash {
            name,
            existing: DeclKind::Alias,
            previous: existing.span,
        })
    }

    // === Resolution ===

    fn expander(&mut self) -> Expander<'_> {
        Expander {
            types: &self.types,
            structs: &self.structs,
            aliases: &self.aliases,
            pool: &mut self.pool,
            cache: &mut self.alias_cache,
            failed: &mut self.failed_aliases,
            stack: &mut self.alias_stack,
        }
    }

    /// Resolve a type expression from `arena`. `void` is accepted, which is
    /// what return types need.
    pub fn resolve(&mut self, arena: &TypeExprArena, id: TypeExprId) -> Result<TypeId, TypeError> {
        self.expander().resolve(arena, id)
    }

    /// Resolve the type of a value: a parameter, field or variable.
    pub fn resolve_value(
        &mut self,
        arena: &TypeExprArena,
        id: TypeExprId,
        context: ValueContext,
    ) -> Result<TypeId, TypeError> {
        let ty = self.resolve(arena, id)?;
        if ty == TypeId::VOID {
            return Err(TypeError::new(
                TypeErrorKind::VoidNotAllowed(context),
                arena.span(id),
            ));
        }
        Ok(ty)
    }

    /// Resolve a type expression stored in the registry's own arena.
    fn resolve_own_value(
        &mut self,
        id: TypeExprId,
        context: ValueContext,
    ) -> Result<TypeId, TypeError> {
        let mut expander = self.expander();
        let types = expander.types;
        let ty = expander.resolve(types, id)?;
        if ty == TypeId::VOID {
            return Err(TypeError::new(
                TypeErrorKind::VoidNotAllowed(context),
                types.span(id),
            ));
        }
        Ok(ty)
    }

    /// Resolve every alias in declaration order. Each failing alias is
    /// reported once.
    #[tracing::instrument(level = "debug", skip_all, fields(aliases = self.aliases.len()))]
    pub fn resolve_all_aliases(&mut self) -> Vec<TypeError> {
        let names: Vec<(Name, Span)> = self.aliases.iter().map(|a| (a.name, a.span)).collect();
        let mut errors = Vec::new();
        for (name, span) in names {
            if let Err(err) = self.expander().resolve_named(name, span) {
                if !err.is_poisoned() {
                    errors.push(err);
                }
            }
        }
        errors
    }

    /// Lay out every struct in declaration order. Each struct is reported at
    /// most once, a containment cycle once for all of its members.
    #[tracing::instrument(level = "debug", skip_all, fields(structs = self.structs.len()))]
    pub fn resolve_layouts(&mut self) -> Vec<TypeError> {
        let names: Vec<Name> = self.structs.iter().map(|s| s.name).collect();
        let mut errors = Vec::new();
        for name in names {
            self.ensure_layout(name, &mut errors);
        }
        errors
    }

    fn ensure_layout(&mut self, name: Name, errors: &mut Vec<TypeError>) -> bool {
        if self.layouts.contains_key(&name) {
            return true;
        }
        if self.failed_structs.contains(&name) {
            return false;
        }
        let Some(entry) = self.structs.get(name) else {
            return false;
        };
        let (fields, span) = (entry.fields.clone(), entry.span);

        if let Some(pos) = self.layout_stack.iter().position(|&n| n == name) {
            let mut chain: Vec<Name> = self.layout_stack[pos..].to_vec();
            chain.push(name);
            self.failed_structs.extend(chain.iter().copied());
            errors.push(TypeError::new(TypeErrorKind::Cycle { chain }, span));
            return false;
        }

        self.layout_stack.push(name);
        let mut resolved = Vec::with_capacity(fields.len());
        let mut ok = true;
        for field in &fields {
            match self.resolve_own_value(field.ty, ValueContext::Field) {
                Ok(ty) => {
                    ok &= self.ensure_inline_structs(ty, errors);
                    resolved.push((field, ty));
                }
                Err(err) => {
                    if !err.is_poisoned() {
                        errors.push(err);
                    }
                    ok = false;
                }
            }
        }
        self.layout_stack.pop();

        if !ok || self.failed_structs.contains(&name) {
            self.failed_structs.insert(name);
            return false;
        }

        let mut sized = Vec::with_capacity(resolved.len());
        for (field, ty) in resolved {
            let (Some(size), Some(align)) = (self.size_of(ty), self.align_of(ty)) else {
                self.failed_structs.insert(name);
                return false;
            };
            sized.push((field.name, ty, size, align, field.span));
        }
        let ty = self.pool.struct_type(name);
        let layout = StructLayout::compute(name, ty, span, sized);
        debug!(name = ?name, size = layout.size, align = layout.align, "struct laid out");
        self.layouts.insert(name, layout);
        true
    }

    /// Lay out every struct stored by value inside `ty`. Pointers end the walk.
    fn ensure_inline_structs(&mut self, ty: TypeId, errors: &mut Vec<TypeError>) -> bool {
        ensure_sufficient_stack(|| match self.pool.get(ty) {
            TypeData::Struct(name) => self.ensure_layout(name, errors),
            TypeData::Array { elem, .. } => self.ensure_inline_structs(elem, errors),
            TypeData::Builtin(_) | TypeData::Pointer(_) => true,
        })
    }

    /// Intern `ptr[pointee]`.
    pub fn pointer(&mut self, pointee: TypeId) -> TypeId {
        self.pool.pointer(pointee)
    }

    // === Queries ===

    pub fn pool(&self) -> &TypePool {
        &self.pool
    }

    pub fn structs(&self) -> &StructTable {
        &self.structs
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Whether `name` is a declared struct or alias.
    pub fn contains(&self, name: Name) -> bool {
        self.structs.contains(name) || self.aliases.contains(name)
    }

    /// Whether the struct or alias `name` failed to resolve.
    pub fn is_failed(&self, name: Name) -> bool {
        self.failed_structs.contains(&name) || self.failed_aliases.contains(&name)
    }

    pub fn alias(&self, name: Name) -> Option<TypeId> {
        self.alias_cache.get(&name).copied()
    }

    /// Successfully resolved aliases in declaration order.
    pub fn resolved_aliases(&self) -> impl Iterator<Item = (Name, TypeId)> + '_ {
        self.aliases
            .iter()
            .filter_map(|a| self.alias(a.name).map(|ty| (a.name, ty)))
    }

    pub fn layout(&self, name: Name) -> Option<&StructLayout> {
        self.layouts.get(&name)
    }

    /// Layouts in struct declaration order.
    pub fn layouts(&self) -> impl Iterator<Item = &StructLayout> {
        self.structs.iter().filter_map(|s| self.layouts.get(&s.name))
    }

    /// Layout of a struct type, if `ty` is one and it was laid out.
    pub fn struct_layout(&self, ty: TypeId) -> Option<&StructLayout> {
        self.pool.struct_name(ty).and_then(|name| self.layout(name))
    }

    /// Type of `field` in struct type `ty`.
    pub fn field_type(&self, ty: TypeId, field: Name) -> Option<TypeId> {
        self.struct_layout(ty)
            .and_then(|layout| layout.field(field))
            .map(|f| f.ty)
    }

    /// Element of an array or pointee of a pointer.
    pub fn element_type(&self, ty: TypeId) -> Option<TypeId> {
        self.pool.element_type(ty)
    }

    /// Size in bytes. `None` for `void` and for structs without a layout.
    pub fn size_of(&self, ty: TypeId) -> Option<u64> {
        match self.pool.get(ty) {
            TypeData::Builtin(BuiltinType::Void) => None,
            TypeData::Builtin(b) => Some(u64::from(b.bit_width() / 8)),
            TypeData::Pointer(_) => Some(POINTER_SIZE),
            TypeData::Array { elem, len } => self.size_of(elem).map(|size| size.saturating_mul(len)),
            TypeData::Struct(name) => self.layout(name).map(|l| l.size),
        }
    }

    pub fn align_of(&self, ty: TypeId) -> Option<u64> {
        match self.pool.get(ty) {
            TypeData::Builtin(BuiltinType::Void) => None,
            TypeData::Builtin(b) => Some(u64::from(b.bit_width() / 8)),
            TypeData::Pointer(_) => Some(POINTER_SIZE),
            TypeData::Array { elem, .. } => self.align_of(elem),
            TypeData::Struct(name) => self.layout(name).map(|l| l.align),
        }
    }

    pub fn display(&self, ty: TypeId, interner: &StringInterner) -> String {
        self.pool.display(ty, interner)
    }

    /// Drop every declaration and resolved type.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Disjoint borrows of the registry used while expanding aliases.
struct Expander<'r> {
    types: &'r TypeExprArena,
    structs: &'r StructTable,
    aliases: &'r AliasTable,
    pool: &'r mut TypePool,
    cache: &'r mut FxHashMap<Name, TypeId>,
    failed: &'r mut FxHashSet<Name>,
    stack: &'r mut InProgress,
}

impl Expander<'_> {
    fn resolve(&mut self, arena: &TypeExprArena, id: TypeExprId) -> Result<TypeId, TypeError> {
        ensure_sufficient_stack(|| self.resolve_inner(arena, id))
    }

    fn resolve_inner(&mut self, arena: &TypeExprArena, id: TypeExprId) -> Result<TypeId, TypeError> {
        let span = arena.span(id);
        match arena.get(id) {
            TypeExpr::Builtin(builtin) => Ok(TypeId::builtin(builtin)),
            TypeExpr::Named(name) => self.resolve_named(name, span),
            TypeExpr::Pointer(pointee) => {
                let pointee = self.resolve(arena, pointee)?;
                Ok(self.pool.pointer(pointee))
            }
            TypeExpr::Array { elem, size } => {
                let elem_ty = self.resolve(arena, elem)?;
                if elem_ty == TypeId::VOID {
                    return Err(TypeError::new(
                        TypeErrorKind::VoidNotAllowed(ValueContext::ArrayElement),
                        arena.span(elem),
                    ));
                }
                let len = array_length(size, span)?;
                Ok(self.pool.array(elem_ty, len))
            }
        }
    }

    fn resolve_named(&mut self, name: Name, span: Span) -> Result<TypeId, TypeError> {
        if self.structs.contains(name) {
            return Ok(self.pool.struct_type(name));
        }
        let Some(target) = self.aliases.get(name).map(|a| a.target) else {
            return Err(TypeError::new(TypeErrorKind::UnknownType(name), span));
        };
        if let Some(&ty) = self.cache.get(&name) {
            trace!(name = ?name, "alias cache hit");
            return Ok(ty);
        }
        if self.failed.contains(&name) {
            return Err(TypeError::new(TypeErrorKind::Poisoned(name), span));
        }
        if let Some(pos) = self.stack.iter().position(|&n| n == name) {
            let mut chain: Vec<Name> = self.stack[pos..].to_vec();
            chain.push(name);
            self.failed.extend(self.stack[pos..].iter().copied());
            return Err(TypeError::new(TypeErrorKind::Cycle { chain }, span));
        }

        self.stack.push(name);
        let types = self.types;
        let result = self.resolve(types, target);
        self.stack.pop();

        match result {
            Ok(ty) => {
                debug!(name = ?name, ty = ?ty, "alias resolved");
                self.cache.insert(name, ty);
                Ok(ty)
            }
            Err(err) => {
                self.failed.insert(name);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests;
