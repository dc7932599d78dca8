//! Operator table.
//!
//! Maps an operator token and arity to its precedence and, for operators
//! declared by the program, the name of the implementing function. The
//! parser consults the table for every operator it folds, and extends it
//! as it encounters `@unary`/`@binary` definitions, so a declaration is
//! visible to everything parsed after it in the same session.

use rustc_hash::FxHashMap;

use pyxc_ir::{Arity, Name, Op};

/// Precedence of a `@binary` operator declared without `precedence=`.
pub const DEFAULT_BINARY_PRECEDENCE: u32 = 30;

/// Inclusive bounds for a declared precedence.
pub const MIN_PRECEDENCE: u32 = 1;
pub const MAX_PRECEDENCE: u32 = 100;

/// Prefix operators bind tighter than any binary operator.
pub const UNARY_PRECEDENCE: u32 = MAX_PRECEDENCE;

const BUILTIN_BINARY: [(Op, u32); 16] = [
    (Op::Or, 5),
    (Op::And, 6),
    (Op::Pipe, 7),
    (Op::Caret, 8),
    (Op::Amp, 9),
    (Op::EqEq, 10),
    (Op::NotEq, 10),
    (Op::Lt, 12),
    (Op::Gt, 12),
    (Op::LtEq, 12),
    (Op::GtEq, 12),
    (Op::Plus, 20),
    (Op::Minus, 20),
    (Op::Star, 40),
    (Op::Slash, 40),
    (Op::Percent, 40),
];

const BUILTIN_UNARY: [Op; 5] = [Op::Plus, Op::Minus, Op::Bang, Op::Tilde, Op::Not];

/// One row of the table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OperatorEntry {
    Builtin { precedence: u32 },
    UserDefined { precedence: u32, dispatch_name: Name },
}

impl OperatorEntry {
    #[inline]
    pub fn precedence(self) -> u32 {
        match self {
            OperatorEntry::Builtin { precedence }
            | OperatorEntry::UserDefined { precedence, .. } => precedence,
        }
    }

    /// Implementing function of a user-declared operator.
    #[inline]
    pub fn dispatch_name(self) -> Option<Name> {
        match self {
            OperatorEntry::Builtin { .. } => None,
            OperatorEntry::UserDefined { dispatch_name, .. } => Some(dispatch_name),
        }
    }
}

/// Outcome of a successful registration.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Registration {
    /// The token had no entry of this arity.
    Added,
    /// An entry of the same arity existed and was replaced.
    Redefined { previous: OperatorEntry },
}

/// A declaration that would give a token a second, different arity.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct OperatorConflict {
    pub op: Op,
    pub requested: Arity,
    pub existing: Arity,
}

/// Operator precedence and arity table, scoped to a compilation session.
#[derive(Clone, Debug)]
pub struct OperatorTable {
    entries: FxHashMap<(Op, Arity), OperatorEntry>,
}

impl OperatorTable {
    /// A table holding only the builtin operators.
    pub fn with_builtins() -> Self {
        let mut entries = FxHashMap::default();
        for (op, precedence) in BUILTIN_BINARY {
            entries.insert((op, Arity::Binary), OperatorEntry::Builtin { precedence });
        }
        for op in BUILTIN_UNARY {
            entries.insert(
                (op, Arity::Unary),
                OperatorEntry::Builtin {
                    precedence: UNARY_PRECEDENCE,
                },
            );
        }
        OperatorTable { entries }
    }

    #[inline]
    pub fn lookup(&self, op: Op, arity: Arity) -> Option<OperatorEntry> {
        self.entries.get(&(op, arity)).copied()
    }

    /// Precedence of `op` in infix position, if it is a binary operator.
    #[inline]
    pub fn binary_precedence(&self, op: Op) -> Option<u32> {
        self.lookup(op, Arity::Binary).map(OperatorEntry::precedence)
    }

    #[inline]
    pub fn is_unary(&self, op: Op) -> bool {
        self.entries.contains_key(&(op, Arity::Unary))
    }

    /// Declare a user operator.
    ///
    /// Redeclaring an arity the token already has replaces the entry, which
    /// is how a program changes the precedence of an operator. Declaring an
    /// arity the token does not have while it already has the other one is
    /// a conflict, and the table is left unchanged.
    pub fn register(
        &mut self,
        op: Op,
        arity: Arity,
        precedence: u32,
        dispatch_name: Name,
    ) -> Result<Registration, OperatorConflict> {
        let other = match arity {
            Arity::Unary => Arity::Binary,
            Arity::Binary => Arity::Unary,
        };
        if !self.entries.contains_key(&(op, arity)) && self.entries.contains_key(&(op, other)) {
            return Err(OperatorConflict {
                op,
                requested: arity,
                existing: other,
            });
        }

        let entry = OperatorEntry::UserDefined {
            precedence,
            dispatch_name,
        };
        let registration = match self.entries.insert((op, arity), entry) {
            Some(previous) => Registration::Redefined { previous },
            None => Registration::Added,
        };
        tracing::debug!(%op, %arity, precedence, ?registration, "operator registered");
        Ok(registration)
    }

    /// Drop every user declaration.
    pub fn reset(&mut self) {
        *self = Self::with_builtins();
    }

    /// Number of entries, counting each arity of a token separately.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::with_builtins()
    }
}
