//! Local bindings of one body.
//!
//! ```text
//! frames[0]    function frame: parameters, constants, declared and
//!              assignment-introduced locals
//! frames[1..]  one frame per enclosing `for`, holding its induction variable
//! ```
//!
//! Locals declared inside a loop body still land in the function frame and
//! stay visible after the loop. Only the induction variable goes out of
//! scope when its loop ends.

use pyxc_ir::{Name, Span};
use pyxc_types::TypeId;
use smallvec::SmallVec;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) struct Binding {
    pub name: Name,
    /// `None` when the type could not be determined; uses stay silent.
    pub ty: Option<TypeId>,
    pub is_const: bool,
    pub span: Span,
}

type Frame = SmallVec<[Binding; 8]>;

#[derive(Clone, Debug)]
pub(crate) struct Scope {
    frames: SmallVec<[Frame; 4]>,
}

impl Scope {
    pub fn new() -> Self {
        let mut frames = SmallVec::new();
        frames.push(Frame::new());
        Scope { frames }
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: Name) -> Option<&Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.iter().rev().find(|b| b.name == name))
    }

    /// Declare in the function frame. A name already declared there is
    /// returned instead and the frame is unchanged.
    pub fn declare(&mut self, binding: Binding) -> Result<(), Binding> {
        let frame = &mut self.frames[0];
        if let Some(existing) = frame.iter().find(|b| b.name == binding.name) {
            return Err(*existing);
        }
        frame.push(binding);
        Ok(())
    }

    /// Open a loop frame holding the induction variable.
    pub fn push_loop_var(&mut self, binding: Binding) {
        let mut frame = Frame::new();
        frame.push(binding);
        self.frames.push(frame);
    }

    pub fn pop_loop_var(&mut self) {
        debug_assert!(self.frames.len() > 1, "popped the function frame");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyxc_ir::StringInterner;

    fn binding(name: Name, ty: TypeId) -> Binding {
        Binding {
            name,
            ty: Some(ty),
            is_const: false,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn test_loop_variable_shadows_and_expires() {
        let interner = StringInterner::new();
        let i = interner.intern("i");
        let mut scope = Scope::new();

        scope.declare(binding(i, TypeId::F64)).unwrap();
        scope.push_loop_var(binding(i, TypeId::I64));
        assert_eq!(scope.lookup(i).and_then(|b| b.ty), Some(TypeId::I64));

        scope.pop_loop_var();
        assert_eq!(scope.lookup(i).and_then(|b| b.ty), Some(TypeId::F64));
    }

    #[test]
    fn test_redeclaration_returns_existing() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut scope = Scope::new();

        scope.declare(binding(x, TypeId::I32)).unwrap();
        let existing = scope.declare(binding(x, TypeId::F64)).unwrap_err();
        assert_eq!(existing.ty, Some(TypeId::I32));
        assert_eq!(scope.lookup(x).and_then(|b| b.ty), Some(TypeId::I32));
    }
}
