//! Type registry for the pyxc front end.
//!
//! Turns textual `TypeExpr`s into resolved types:
//! - `TypeId`: 32-bit handle into the `TypePool`, equal ids mean equal types
//! - `TypePool`: interned `TypeData` with pre-computed `TypeFlags`
//! - `TypeRegistry`: struct and alias tables, memoized alias expansion,
//!   cycle detection and C-like struct layouts
//!
//! # Usage
//!
//! ```text
//! registry.register_struct(&unit.types, &decl)?;   // every unit, every decl
//! registry.register_alias(&unit.types, &alias)?;
//! errors.extend(registry.resolve_all_aliases());
//! errors.extend(registry.resolve_layouts());
//! let ty = registry.resolve_value(&unit.types, param.ty, ValueContext::Parameter)?;
//! ```

mod error;
mod flags;
mod idx;
mod layout;
mod pool;
mod registry;
mod tables;

pub use error::{TypeError, TypeErrorKind, ValueContext};
pub use flags::TypeFlags;
pub use idx::TypeId;
pub use layout::{FieldLayout, StructLayout};
pub use pool::{TypeData, TypePool};
pub use registry::{array_length, TypeRegistry, POINTER_SIZE};
pub use tables::{
    AliasEntry, AliasTable, DeclKind, DeclTable, Declared, NameClash, StructEntry, StructTable,
};

// Size assertions to prevent accidental regressions.
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{TypeData, TypeId};
    // TypeId is a bare u32 handle.
    pyxc_ir::static_assert_size!(TypeId, 4);
    // Largest variant is Array: TypeId (4) + u64 (8), plus discriminant.
    pyxc_ir::static_assert_size!(TypeData, 16);
}
