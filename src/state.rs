//! Search states: the variables, bindings and constraints of one branch.

use crate::constraint::{Constraint, ConstraintStore};
use crate::error::{KanrenError, Result};
use crate::reify::reify;
use crate::substitution::Substitution;
use crate::term::Term;
use crate::variable::{FreshVars, Var, VarArena};
use log::trace;

/// One point of the search space: the variables allocated so far, their bindings,
/// and the constraints the bindings must keep satisfying.
///
/// States are immutable. Every operation returns a successor state and leaves the
/// receiver valid, so sibling branches share their common history.
#[derive(Debug, Clone, Default)]
pub struct State {
    variables: VarArena,
    substitution: Substitution,
    constraints: ConstraintStore,
}

impl State {
    /// The state a query starts from
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The arena that allocated this state's variables
    #[must_use]
    pub fn variables(&self) -> VarArena {
        self.variables
    }

    /// The bindings of this state
    #[must_use]
    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    /// The constraints of this state
    #[must_use]
    pub fn constraints(&self) -> &ConstraintStore {
        &self.constraints
    }

    /// Allocate one fresh variable
    #[must_use]
    pub fn fresh(&self) -> (Var, Self) {
        let (var, variables) = self.variables.fresh();
        trace!("allocated {var}");
        (
            var,
            Self {
                variables,
                ..self.clone()
            },
        )
    }

    /// Allocate `n` fresh variables
    #[must_use]
    pub fn fresh_n(&self, n: usize) -> (FreshVars, Self) {
        let (vars, variables) = self.variables.fresh_n(n);
        trace!("allocated {n} variables");
        (
            vars,
            Self {
                variables,
                ..self.clone()
            },
        )
    }

    /// Unify two terms.
    ///
    /// Returns `None` if the terms do not unify or the new bindings violate a
    /// constraint. Only the constraints that can see the terms or the newly bound
    /// variables are re-checked.
    #[must_use]
    pub fn unify(&self, u: &Term, v: &Term) -> Option<Self> {
        let mut touched = FreshVars::new();
        let substitution = self.substitution.unify_recording(u, v, &mut touched)?;
        if touched.is_empty() {
            // nothing was bound, so no constraint changed status
            return Some(Self {
                substitution,
                ..self.clone()
            });
        }

        let constraints = self.constraints.reindex(&substitution, &touched);
        touched.extend(top_level_vars(u, v));
        let next = Self {
            variables: self.variables,
            substitution,
            constraints,
        };
        next.is_consistent(Some(touched.as_slice())).then_some(next)
    }

    /// Require two terms to stay different from now on.
    ///
    /// Returns `None` if they are already equal. The constraint is indexed under
    /// every variable the two terms currently reach.
    #[must_use]
    pub fn disequal(&self, u: &Term, v: &Term) -> Option<Self> {
        let constraint = Constraint::Disequality(u.clone(), v.clone());
        if !constraint.is_satisfied(&self.substitution) {
            trace!("{constraint} is violated on arrival");
            return None;
        }
        let mut relevant = self.substitution.walk_star(&Term::cons(u, v)).variables();
        relevant.extend(top_level_vars(u, v));
        Some(Self {
            constraints: self.constraints.add(constraint, relevant),
            ..self.clone()
        })
    }

    /// Returns true if the bindings satisfy the constraints.
    ///
    /// `touched` restricts the check to constraints indexed under those variables.
    #[must_use]
    pub fn is_consistent(&self, touched: Option<&[Var]>) -> bool {
        self.constraints.check(&self.substitution, touched)
    }

    /// Dereference `term` deeply under this state's bindings
    #[must_use]
    pub fn walk_star(&self, term: &Term) -> Term {
        self.substitution.walk_star(term)
    }

    /// Reify `term` into its printable form, see [`reify`]
    #[must_use]
    pub fn reify(&self, term: &Term) -> Term {
        reify(self, term)
    }

    /// Verify that every variable in `term` was allocated by this state's arena.
    ///
    /// # Errors
    ///
    /// Returns [`KanrenError::ForeignVariable`] naming the first variable that was not.
    pub fn check_scope(&self, term: &Term) -> Result<()> {
        match term
            .variables()
            .into_iter()
            .find(|var| !self.variables.owns(*var))
        {
            Some(var) => Err(KanrenError::ForeignVariable {
                var,
                arena_len: self.variables.len(),
            }),
            None => Ok(()),
        }
    }
}

fn top_level_vars(u: &Term, v: &Term) -> impl Iterator<Item = Var> {
    [u.as_var(), v.as_var()].into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_has_nothing() {
        let state = State::empty();
        assert!(state.variables().is_empty());
        assert!(state.substitution().is_empty());
        assert!(state.constraints().is_empty());
    }

    #[test]
    fn test_fresh_advances_arena_only_in_successor() {
        let state = State::empty();
        let (x, next) = state.fresh();
        assert!(state.variables().is_empty());
        assert!(next.variables().owns(x));
    }

    #[test]
    fn test_unify_binds_variable() {
        let (x, state) = State::empty().fresh();
        let state = state.unify(&x.into(), &5.into()).expect("unifies");
        assert_eq!(state.walk_star(&x.into()), Term::from(5));
    }

    #[test]
    fn test_unify_fails_on_mismatch() {
        assert!(State::empty().unify(&1.into(), &2.into()).is_none());
    }

    #[test]
    fn test_unify_respects_disequality() {
        let (x, state) = State::empty().fresh();
        let state = state.disequal(&x.into(), &1.into()).expect("consistent");
        assert!(state.unify(&x.into(), &1.into()).is_none());
        assert!(state.unify(&x.into(), &2.into()).is_some());
    }

    #[test]
    fn test_disequality_detected_through_aliasing() {
        let (vars, state) = State::empty().fresh_n(2);
        let (x, y) = (vars[0], vars[1]);
        let state = state.disequal(&x.into(), &1.into()).expect("consistent");
        let state = state.unify(&x.into(), &y.into()).expect("aliasing is fine");
        assert!(
            state.unify(&y.into(), &1.into()).is_none(),
            "Binding the alias must violate the constraint"
        );
    }

    #[test]
    fn test_disequality_detected_inside_pairs() {
        let (vars, state) = State::empty().fresh_n(3);
        let (x, a, b) = (vars[0], vars[1], vars[2]);
        let state = state
            .disequal(&x.into(), &Term::list([1, 2]))
            .expect("consistent");
        let state = state
            .unify(&x.into(), &Term::list([Term::from(a), b.into()]))
            .expect("still different");
        let state = state.unify(&a.into(), &1.into()).expect("still different");
        assert!(state.unify(&b.into(), &2.into()).is_none());
    }

    #[test]
    fn test_disequal_fails_when_already_equal() {
        let (x, state) = State::empty().fresh();
        let state = state.unify(&x.into(), &1.into()).expect("unifies");
        assert!(state.disequal(&x.into(), &1.into()).is_none());
        assert!(state.disequal(&x.into(), &2.into()).is_some());
    }

    #[test]
    fn test_check_scope_reports_foreign_variables() {
        let (_, larger) = State::empty().fresh_n(3);
        let (vars, _) = larger.fresh_n(1);
        let (own, state) = State::empty().fresh();
        assert!(state.check_scope(&Term::cons(own, 1)).is_ok());
        assert_eq!(
            state.check_scope(&Term::list([Term::from(vars[0])])),
            Err(KanrenError::ForeignVariable {
                var: vars[0],
                arena_len: 1
            })
        );
    }
}
