//! Constraint store holding the disequalities of a search branch.

use crate::substitution::Substitution;
use crate::term::Term;
use crate::variable::Var;
use im::{OrdMap, Vector};
use indexmap::IndexSet;
use log::trace;
use std::fmt;

/// A standing requirement on the bindings of a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The two terms must never become equal
    Disequality(Term, Term),
}

impl Constraint {
    /// Returns true if this constraint holds under `substitution`.
    ///
    /// A disequality is violated once both sides are already equal, meaning that
    /// unifying them would not bind anything. Sides that could still differ, for
    /// instance a distinct unbound variable, satisfy it.
    #[must_use]
    pub fn is_satisfied(&self, substitution: &Substitution) -> bool {
        match self {
            Constraint::Disequality(u, v) => !substitution
                .unify(u, v)
                .is_some_and(|unified| unified.len() == substitution.len()),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Disequality(u, v) => write!(f, "{u} =/= {v}"),
        }
    }
}

/// Persistent store of active constraints.
///
/// Besides the ordered list of constraints, the store keeps an index from each
/// variable to the constraints that may depend on it, so that after a unification
/// only the constraints reachable from the touched variables are re-checked.
#[derive(Debug, Clone, Default)]
pub struct ConstraintStore {
    all: Vector<Constraint>,
    index: OrdMap<Var, Vector<usize>>,
}

impl ConstraintStore {
    /// Create a store without constraints
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of active constraints
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns true if no constraint is active
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Iterate over the active constraints in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.all.iter()
    }

    /// Constraints indexed under `var`
    pub fn relevant_to(&self, var: Var) -> impl Iterator<Item = &Constraint> {
        self.index
            .get(&var)
            .into_iter()
            .flat_map(|ids| ids.iter().filter_map(|id| self.all.get(*id)))
    }

    /// Add a constraint, indexing it under every variable in `relevant`
    #[must_use]
    pub fn add(&self, constraint: Constraint, relevant: impl IntoIterator<Item = Var>) -> Self {
        trace!("adding constraint {constraint}");
        let id = self.all.len();
        let mut all = self.all.clone();
        all.push_back(constraint);

        let mut index = self.index.clone();
        for var in relevant {
            index_under(&mut index, var, [id]);
        }
        Self { all, index }
    }

    /// Check the constraints against `substitution`.
    ///
    /// With `touched` given, only constraints indexed under those variables are
    /// checked; binding a variable is the only way a satisfied constraint can
    /// become violated. Returns false on the first violated constraint.
    #[must_use]
    pub fn check(&self, substitution: &Substitution, touched: Option<&[Var]>) -> bool {
        let violated = |constraint: &Constraint| {
            let ok = constraint.is_satisfied(substitution);
            if !ok {
                trace!("constraint {constraint} violated");
            }
            !ok
        };

        match touched {
            None => !self.all.iter().any(violated),
            Some(vars) => {
                let ids: IndexSet<usize> = vars
                    .iter()
                    .filter_map(|var| self.index.get(var))
                    .flat_map(|ids| ids.iter().copied())
                    .collect();
                !ids.into_iter()
                    .filter_map(|id| self.all.get(id))
                    .any(violated)
            }
        }
    }

    /// Keep the index complete after `bound` variables received bindings.
    ///
    /// Constraints indexed under a newly bound variable now depend on the unbound
    /// variables of its binding, so they get indexed under those as well.
    #[must_use]
    pub fn reindex(&self, substitution: &Substitution, bound: &[Var]) -> Self {
        let mut index = self.index.clone();
        for var in bound {
            let (Some(ids), Some(binding)) = (self.index.get(var), substitution.get(*var)) else {
                continue;
            };
            for reached in substitution.walk_star(binding).variables() {
                index_under(&mut index, reached, ids.iter().copied());
            }
        }
        Self {
            all: self.all.clone(),
            index,
        }
    }
}

/// Index the constraints `ids` under `var`, each at most once
fn index_under(
    index: &mut OrdMap<Var, Vector<usize>>,
    var: Var,
    ids: impl IntoIterator<Item = usize>,
) {
    let mut entry = index.get(&var).cloned().unwrap_or_default();
    for id in ids {
        if !entry.contains(&id) {
            entry.push_back(id);
        }
    }
    index.insert(var, entry);
}
