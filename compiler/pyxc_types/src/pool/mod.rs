//! Interned storage for resolved types.
//!
//! # Architecture
//!
//! ```text
//! TypePool
//!     data:  Vec<TypeData>     (indexed by TypeId)
//!     flags: Vec<TypeFlags>    (pre-computed on intern)
//!     map:   TypeData -> TypeId
//! ```
//!
//! Builtins occupy the first [`TypeId::BUILTIN_COUNT`] slots. Structs are
//! nominal: `Struct(name)` says nothing about the fields, which live in the
//! registry's layouts. That keeps a struct that points at itself a finite
//! value in the pool.

use std::fmt::Write as _;

use pyxc_ir::{BuiltinType, Name, StringInterner};
use rustc_hash::FxHashMap;

use crate::{TypeFlags, TypeId};

/// Structure of a resolved type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    Builtin(BuiltinType),
    Pointer(TypeId),
    Array { elem: TypeId, len: u64 },
    Struct(Name),
}

#[derive(Clone, Debug)]
pub struct TypePool {
    data: Vec<TypeData>,
    flags: Vec<TypeFlags>,
    map: FxHashMap<TypeData, TypeId>,
}

impl TypePool {
    /// Create a pool holding only the builtin types.
    pub fn new() -> Self {
        let mut pool = TypePool {
            data: Vec::with_capacity(64),
            flags: Vec::with_capacity(64),
            map: FxHashMap::default(),
        };
        for builtin in BuiltinType::ALL {
            pool.intern(TypeData::Builtin(builtin));
        }
        debug_assert_eq!(pool.len(), TypeId::BUILTIN_COUNT as usize);
        pool
    }

    fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.map.get(&data) {
            return id;
        }
        let raw = u32::try_from(self.data.len())
            .unwrap_or_else(|_| panic!("type pool exceeded {} types", u32::MAX));
        let id = TypeId::from_raw(raw);
        let flags = self.compute_flags(data);
        self.data.push(data);
        self.flags.push(flags);
        self.map.insert(data, id);
        id
    }

    fn compute_flags(&self, data: TypeData) -> TypeFlags {
        match data {
            TypeData::Builtin(BuiltinType::Void) => TypeFlags::IS_VOID,
            TypeData::Builtin(b) if b.is_float() => TypeFlags::IS_FLOAT,
            TypeData::Builtin(b) if b.is_signed() => TypeFlags::IS_INTEGER | TypeFlags::IS_SIGNED,
            TypeData::Builtin(_) => TypeFlags::IS_INTEGER,
            TypeData::Pointer(_) => TypeFlags::IS_POINTER,
            TypeData::Array { elem, .. } => {
                TypeFlags::IS_ARRAY | (self.flags(elem) & TypeFlags::PROPAGATE_MASK)
            }
            TypeData::Struct(_) => TypeFlags::IS_STRUCT | TypeFlags::HAS_INLINE_STRUCT,
        }
    }

    // === Construction ===

    #[inline]
    pub fn builtin(&self, builtin: BuiltinType) -> TypeId {
        TypeId::builtin(builtin)
    }

    pub fn pointer(&mut self, pointee: TypeId) -> TypeId {
        self.intern(TypeData::Pointer(pointee))
    }

    pub fn array(&mut self, elem: TypeId, len: u64) -> TypeId {
        self.intern(TypeData::Array { elem, len })
    }

    pub fn struct_type(&mut self, name: Name) -> TypeId {
        self.intern(TypeData::Struct(name))
    }

    // === Queries ===

    #[inline]
    pub fn get(&self, id: TypeId) -> TypeData {
        self.data[id.index()]
    }

    #[inline]
    pub fn flags(&self, id: TypeId) -> TypeFlags {
        self.flags[id.index()]
    }

    /// Pointee of a pointer or element of an array.
    pub fn element_type(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            TypeData::Pointer(elem) | TypeData::Array { elem, .. } => Some(elem),
            TypeData::Builtin(_) | TypeData::Struct(_) => None,
        }
    }

    pub fn array_len(&self, id: TypeId) -> Option<u64> {
        match self.get(id) {
            TypeData::Array { len, .. } => Some(len),
            _ => None,
        }
    }

    pub fn struct_name(&self, id: TypeId) -> Option<Name> {
        match self.get(id) {
            TypeData::Struct(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_builtin(&self, id: TypeId) -> Option<BuiltinType> {
        match self.get(id) {
            TypeData::Builtin(b) => Some(b),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Render a type in source syntax.
    pub fn display(&self, id: TypeId, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id, interner);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId, interner: &StringInterner) {
        match self.get(id) {
            TypeData::Builtin(b) => out.push_str(b.name()),
            TypeData::Pointer(elem) => {
                out.push_str("ptr[");
                self.write_type(out, elem, interner);
                out.push(']');
            }
            TypeData::Array { elem, len } => {
                out.push_str("array[");
                self.write_type(out, elem, interner);
                // Formatting into a `String` never fails.
                write!(out, ", {len}]").ok();
            }
            TypeData::Struct(name) => out.push_str(interner.lookup(name)),
        }
    }
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}
