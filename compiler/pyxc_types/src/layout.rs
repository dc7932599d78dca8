//! Struct layouts.
//!
//! Fields stay in declaration order. Offsets follow C rules: every field is
//! placed at the next multiple of its alignment, and the struct is padded
//! to a multiple of its largest field alignment.

use pyxc_ir::{Name, Span};
use rustc_hash::FxHashMap;

use crate::TypeId;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldLayout {
    pub name: Name,
    pub ty: TypeId,
    pub offset: u64,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StructLayout {
    pub name: Name,
    /// The struct's own type in the pool.
    pub ty: TypeId,
    pub fields: Vec<FieldLayout>,
    pub size: u64,
    pub align: u64,
    pub span: Span,
    field_index: FxHashMap<Name, usize>,
}

impl StructLayout {
    /// Lay out `fields` given as `(name, type, size, align, span)`.
    pub(crate) fn compute(
        name: Name,
        ty: TypeId,
        span: Span,
        fields: impl IntoIterator<Item = (Name, TypeId, u64, u64, Span)>,
    ) -> Self {
        let mut offset = 0u64;
        let mut align = 1u64;
        let mut laid_out = Vec::new();
        let mut field_index = FxHashMap::default();

        for (field_name, field_ty, field_size, field_align, field_span) in fields {
            offset = align_to(offset, field_align);
            field_index.insert(field_name, laid_out.len());
            laid_out.push(FieldLayout {
                name: field_name,
                ty: field_ty,
                offset,
                span: field_span,
            });
            offset = offset.saturating_add(field_size);
            align = align.max(field_align);
        }

        StructLayout {
            name,
            ty,
            fields: laid_out,
            size: align_to(offset, align),
            align,
            span,
            field_index,
        }
    }

    /// Ordinal of a field in declaration order.
    pub fn field_index(&self, name: Name) -> Option<usize> {
        self.field_index.get(&name).copied()
    }

    pub fn field(&self, name: Name) -> Option<&FieldLayout> {
        self.field_index(name).map(|index| &self.fields[index])
    }
}

fn align_to(offset: u64, align: u64) -> u64 {
    if align <= 1 {
        return offset;
    }
    offset.div_ceil(align).saturating_mul(align)
}
