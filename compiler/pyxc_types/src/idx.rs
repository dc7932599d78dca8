//! Resolved type handle.
//!
//! Every resolved type lives in a [`TypePool`](crate::TypePool) and is
//! referred to by a 32-bit `TypeId`. Structurally equal types are interned
//! once, so two resolutions that describe the same type yield the same id
//! and type equality is an integer comparison.

use std::fmt;

use pyxc_ir::BuiltinType;

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // Builtins are pre-interned in `BuiltinType::ALL` order.
    pub const VOID: Self = Self(0);
    pub const I8: Self = Self(1);
    pub const I16: Self = Self(2);
    pub const I32: Self = Self(3);
    pub const I64: Self = Self(4);
    pub const U8: Self = Self(5);
    pub const U16: Self = Self(6);
    pub const U32: Self = Self(7);
    pub const U64: Self = Self(8);
    pub const F32: Self = Self(9);
    pub const F64: Self = Self(10);

    /// Number of pre-interned builtin types.
    pub const BUILTIN_COUNT: u32 = 11;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Fixed id of a builtin type.
    pub const fn builtin(builtin: BuiltinType) -> Self {
        match builtin {
            BuiltinType::Void => Self::VOID,
            BuiltinType::I8 => Self::I8,
            BuiltinType::I16 => Self::I16,
            BuiltinType::I32 => Self::I32,
            BuiltinType::I64 => Self::I64,
            BuiltinType::U8 => Self::U8,
            BuiltinType::U16 => Self::U16,
            BuiltinType::U32 => Self::U32,
            BuiltinType::U64 => Self::U64,
            BuiltinType::F32 => Self::F32,
            BuiltinType::F64 => Self::F64,
        }
    }

    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}
