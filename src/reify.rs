//! Reification: turning a solution into a stable printable term.

use crate::state::State;
use crate::substitution::Substitution;
use crate::term::{Atom, Term};

/// Replace every variable in `term` by its binding in `state`, then name the
/// variables that remain unbound.
///
/// Unbound variables become [`Atom::Reified`] names numbered in the order they are
/// first met in the walked term, heads before tails. The names do not depend on
/// arena ordinals, so equivalent answers print the same however many variables the
/// search allocated on the way.
#[must_use]
pub fn reify(state: &State, term: &Term) -> Term {
    let walked = state.walk_star(term);
    let names = name_unbound(&walked, Substitution::empty());
    names.walk_star(&walked)
}

/// Extend `names` with a reified name for every unbound variable of a walked term
fn name_unbound(term: &Term, mut names: Substitution) -> Substitution {
    let mut pending = vec![term];
    while let Some(next) = pending.pop() {
        match next {
            Term::Var(var) if names.get(*var).is_none() => {
                let name = Term::Atom(Atom::Reified(names.len()));
                // names are atoms, the occurs-check cannot reject them
                names = names.extend(*var, name).unwrap_or(names);
            }
            Term::Pair(pair) => {
                pending.push(&pair.rest);
                pending.push(&pair.first);
            }
            Term::Var(_) | Term::Atom(_) => {}
        }
    }
    names
}
