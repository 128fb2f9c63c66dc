//! Substitutions map variables to the terms they are bound to.
//!
//! A substitution is persistent: extending it returns a new substitution that
//! shares structure with the old one, and the old one stays valid. Search
//! branches forking from one state therefore never interfere.

use crate::term::Term;
use crate::variable::{FreshVars, Var};
use im::OrdMap;
use std::fmt;

/// Persistent mapping of variables to terms.
///
/// Invariant: following bindings from any variable never leads back to that
/// variable. [`Substitution::extend`] enforces this with the occurs-check.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: OrdMap<Var, Term>,
}

impl Substitution {
    /// Create a substitution without bindings
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: OrdMap::new(),
        }
    }

    /// Number of bound variables
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if no variable is bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The term `var` is directly bound to, if any
    #[must_use]
    pub fn get(&self, var: Var) -> Option<&Term> {
        self.bindings.get(&var)
    }

    /// Iterate over the direct bindings, ordered by variable
    pub fn iter(&self) -> impl Iterator<Item = (&Var, &Term)> {
        self.bindings.iter()
    }

    /// Dereference a term.
    ///
    /// Follows bindings while the term is a bound variable. The result is either a
    /// non-variable term or a variable without binding.
    #[must_use]
    pub fn walk<'a>(&'a self, term: &'a Term) -> &'a Term {
        let mut current = term;
        while let Term::Var(var) = current {
            match self.bindings.get(var) {
                Some(bound) => current = bound,
                None => break,
            }
        }
        current
    }

    /// Dereference a term deeply, rebuilding every pair with walked components.
    ///
    /// Variables that remain unbound are left in place.
    #[must_use]
    pub fn walk_star(&self, term: &Term) -> Term {
        // iterate along the list spine, recurse only into heads
        let mut heads = Vec::new();
        let mut cursor = self.walk(term);
        while let Term::Pair(pair) = cursor {
            heads.push(self.walk_star(&pair.first));
            cursor = self.walk(&pair.rest);
        }
        heads
            .into_iter()
            .rev()
            .fold(cursor.clone(), |rest, first| Term::cons(first, rest))
    }

    /// Returns true if `var` occurs in `term` once `term` is dereferenced
    #[must_use]
    pub fn occurs(&self, var: Var, term: &Term) -> bool {
        let mut pending = vec![term];
        while let Some(next) = pending.pop() {
            match self.walk(next) {
                Term::Var(other) if *other == var => return true,
                Term::Pair(pair) => {
                    pending.push(&pair.rest);
                    pending.push(&pair.first);
                }
                _ => {}
            }
        }
        false
    }

    /// Bind `var` to `term`.
    ///
    /// Returns `None` if `var` occurs in `term`, since the binding would be cyclic.
    #[must_use]
    pub fn extend(&self, var: Var, term: Term) -> Option<Self> {
        if self.occurs(var, &term) {
            return None;
        }
        Some(Self {
            bindings: self.bindings.update(var, term),
        })
    }

    /// Most general unifier of `u` and `v` extending this substitution.
    ///
    /// Returns `None` if the terms cannot be made equal.
    #[must_use]
    pub fn unify(&self, u: &Term, v: &Term) -> Option<Self> {
        self.unify_recording(u, v, &mut FreshVars::new())
    }

    /// Like [`Substitution::unify`], also recording every variable the unification binds
    pub(crate) fn unify_recording(
        &self,
        u: &Term,
        v: &Term,
        bound: &mut FreshVars,
    ) -> Option<Self> {
        let mut subst = self.clone();
        let mut pending = vec![(u.clone(), v.clone())];
        while let Some((u, v)) = pending.pop() {
            let u = subst.walk(&u).clone();
            let v = subst.walk(&v).clone();
            match (&u, &v) {
                (Term::Var(a), Term::Var(b)) if a == b => {}
                (Term::Var(a), _) => {
                    subst = subst.extend(*a, v.clone())?;
                    bound.push(*a);
                }
                (_, Term::Var(b)) => {
                    subst = subst.extend(*b, u.clone())?;
                    bound.push(*b);
                }
                (Term::Pair(p), Term::Pair(q)) => {
                    // heads are unified before tails
                    pending.push((p.rest.clone(), q.rest.clone()));
                    pending.push((p.first.clone(), q.first.clone()));
                }
                _ if u == v => {}
                _ => return None,
            }
        }
        Some(subst)
    }
}

impl fmt::Debug for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var}: {term}")?;
        }
        write!(f, "}}")
    }
}
