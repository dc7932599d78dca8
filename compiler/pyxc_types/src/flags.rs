//! Pre-computed type metadata flags.
//!
//! Computed once when a type is interned, so category queries never walk
//! the type.

use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u16 {
        // === Category Flags ===

        const IS_VOID = 1 << 0;
        const IS_INTEGER = 1 << 1;
        const IS_SIGNED = 1 << 2;
        const IS_FLOAT = 1 << 3;
        const IS_POINTER = 1 << 4;
        const IS_ARRAY = 1 << 5;
        const IS_STRUCT = 1 << 6;

        // === Presence Flags ===

        /// A struct is stored inline somewhere in this type, not behind a
        /// pointer. Such a type needs its struct layouts to be sized.
        const HAS_INLINE_STRUCT = 1 << 8;
    }
}

impl TypeFlags {
    /// Flags an array inherits from its element type.
    pub const PROPAGATE_MASK: Self = Self::HAS_INLINE_STRUCT;

    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.intersects(Self::IS_INTEGER.union(Self::IS_FLOAT))
    }

    /// Types that can be indexed with `[]`.
    #[inline]
    pub const fn is_indexable(self) -> bool {
        self.intersects(Self::IS_POINTER.union(Self::IS_ARRAY))
    }
}
