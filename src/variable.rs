//! Logic variables and the arena that allocates them.

use smallvec::SmallVec;
use std::fmt;

/// A logic variable: an ordinal handle into the arena of one query.
///
/// Variables compare by ordinal, never structurally. Two variables are the same
/// variable exactly when they were handed out by the same allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(usize);

impl Var {
    /// The variable with the given ordinal.
    ///
    /// Meant for reading terms back from text or JSON. A variable built this way is
    /// only meaningful in a state whose arena has allocated it, see
    /// [`State::check_scope`](crate::State::check_scope).
    #[must_use]
    pub fn from_ordinal(ordinal: usize) -> Self {
        Self(ordinal)
    }

    /// Position of this variable in the arena that allocated it
    #[must_use]
    pub fn ordinal(self) -> usize {
        self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// Fresh variables handed out together by [`VarArena::fresh_n`]
pub type FreshVars = SmallVec<[Var; 4]>;

/// Allocator of the variables of one query.
///
/// The arena is a value: allocating returns the variable together with the advanced
/// arena and leaves the original untouched, so sibling search branches can allocate
/// independently from a shared state. Ordinals only ever grow, hence no arena
/// returns the same variable twice along one branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VarArena {
    count: usize,
}

impl VarArena {
    /// Create an arena that has not allocated anything yet
    #[must_use]
    pub fn new() -> Self {
        Self { count: 0 }
    }

    /// Number of variables allocated so far
    #[must_use]
    pub fn len(self) -> usize {
        self.count
    }

    /// Returns true if no variable has been allocated yet
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.count == 0
    }

    /// Allocate one variable
    #[must_use]
    pub fn fresh(self) -> (Var, Self) {
        let var = Var(self.count);
        (
            var,
            Self {
                count: self.count + 1,
            },
        )
    }

    /// Allocate `n` consecutive variables
    #[must_use]
    pub fn fresh_n(self, n: usize) -> (FreshVars, Self) {
        let vars = (self.count..self.count + n).map(Var).collect();
        (
            vars,
            Self {
                count: self.count + n,
            },
        )
    }

    /// Returns true if `var` was produced by this arena
    #[must_use]
    pub fn owns(self, var: Var) -> bool {
        var.0 < self.count
    }
}
