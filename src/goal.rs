//! Goals and the combinators that build them.
//!
//! A goal maps a [`State`] to the lazy stream of states in which it holds.
//! Failure is an empty stream, never an error.

use crate::state::State;
use crate::stream::Stream;
use crate::term::Term;
use crate::variable::Var;
use std::fmt;
use std::rc::Rc;

/// A goal: a function from a state to the stream of its successor states
#[derive(Clone)]
pub struct Goal(Rc<dyn Fn(State) -> Stream<State>>);

impl Goal {
    /// Lift a function into a goal
    #[must_use]
    pub fn new(f: impl Fn(State) -> Stream<State> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Run the goal from `state`
    #[must_use]
    pub fn apply(&self, state: State) -> Stream<State> {
        (self.0)(state)
    }
}

impl fmt::Debug for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Goal(..)")
    }
}

/// The goal that always holds, once
#[must_use]
pub fn succeed() -> Goal {
    Goal::new(Stream::unit)
}

/// The goal that never holds
#[must_use]
pub fn fail() -> Goal {
    Goal::new(|_| Stream::empty())
}

/// Holds if `u` and `v` unify without violating a constraint.
///
/// # Panics
///
/// In debug builds, panics if either term mentions a variable the state's arena
/// did not allocate.
#[must_use]
pub fn unify(u: impl Into<Term>, v: impl Into<Term>) -> Goal {
    let (u, v) = (u.into(), v.into());
    Goal::new(move |state| {
        debug_check_scope(&state, &u, &v);
        state.unify(&u, &v).map_or_else(Stream::empty, Stream::unit)
    })
}

/// Holds if `u` and `v` are different now and stay different in every extension.
///
/// # Panics
///
/// In debug builds, panics if either term mentions a variable the state's arena
/// did not allocate.
#[must_use]
pub fn disequality(u: impl Into<Term>, v: impl Into<Term>) -> Goal {
    let (u, v) = (u.into(), v.into());
    Goal::new(move |state| {
        debug_check_scope(&state, &u, &v);
        state.disequal(&u, &v).map_or_else(Stream::empty, Stream::unit)
    })
}

/// Holds if all of `terms` are pairwise different
#[must_use]
pub fn none_equal<T: Into<Term>>(terms: impl IntoIterator<Item = T>) -> Goal {
    let terms: Vec<Term> = terms.into_iter().map(Into::into).collect();
    let mut constraints = Vec::new();
    for (i, u) in terms.iter().enumerate() {
        for v in &terms[i + 1..] {
            constraints.push(disequality(u, v));
        }
    }
    and(constraints)
}

/// Holds if either goal holds; answers of both are fairly interleaved
#[must_use]
pub fn disjunction(g1: Goal, g2: Goal) -> Goal {
    Goal::new(move |state| g1.apply(state.clone()).plus(g2.apply(state)))
}

/// Holds if both goals hold: `g2` is run on every state produced by `g1`
#[must_use]
pub fn conjunction(g1: Goal, g2: Goal) -> Goal {
    Goal::new(move |state| {
        let g2 = g2.clone();
        g1.apply(state).bind(move |state| g2.apply(state))
    })
}

/// Conjunction of any number of goals; holds once if `goals` is empty.
///
/// Answers come in the same order as from right-nested [`conjunction`]s ending in
/// [`succeed`], without nesting one goal per conjunct.
#[must_use]
pub fn and(goals: impl IntoIterator<Item = Goal>) -> Goal {
    let goals: Rc<[Goal]> = goals.into_iter().collect();
    Goal::new(move |state| conjoin(&goals, 0, state))
}

/// Run `goals[from..]` in sequence on `state`
fn conjoin(goals: &Rc<[Goal]>, from: usize, state: State) -> Stream<State> {
    match goals.get(from) {
        None => Stream::unit(state),
        Some(goal) => {
            let goals = Rc::clone(goals);
            goal.apply(state)
                .bind(move |state| conjoin(&goals, from + 1, state))
        }
    }
}

/// Disjunction of any number of goals; never holds if `goals` is empty.
///
/// Answers come in the same order as from right-nested [`disjunction`]s ending in
/// [`fail`]. The streams are merged in a loop, so the number of goals does not
/// bound the native stack.
#[must_use]
pub fn or(goals: impl IntoIterator<Item = Goal>) -> Goal {
    let goals: Rc<[Goal]> = goals.into_iter().collect();
    Goal::new(move |state| {
        let streams: Vec<Stream<State>> =
            goals.iter().map(|goal| goal.apply(state.clone())).collect();
        streams
            .into_iter()
            .rev()
            .fold(Stream::empty(), |rest, stream| stream.plus(rest))
    })
}

/// Multi-clause selection.
///
/// Each clause is a list of goals that must all hold. The selection holds for
/// every clause that holds, with the answers of all clauses fairly interleaved.
#[must_use]
pub fn conde<C>(clauses: impl IntoIterator<Item = C>) -> Goal
where
    C: IntoIterator<Item = Goal>,
{
    or(clauses.into_iter().map(and))
}

/// Allocate `n` fresh variables and run the goal `builder` makes from them.
///
/// # Panics
///
/// Panics if `builder` indexes past the `n` variables it is given.
#[must_use]
pub fn fresh_vars(n: usize, builder: impl Fn(&[Var]) -> Goal + 'static) -> Goal {
    Goal::new(move |state| {
        let (vars, state) = state.fresh_n(n);
        builder(&vars).apply(state)
    })
}

/// Allocate `N` fresh variables, the count fixed by the builder's argument type
#[must_use]
pub fn fresh<const N: usize>(builder: impl Fn([Var; N]) -> Goal + 'static) -> Goal {
    Goal::new(move |state| {
        let (vars, state) = state.fresh_n(N);
        builder(std::array::from_fn(|i| vars[i])).apply(state)
    })
}

/// Allocate one fresh variable
#[must_use]
pub fn call_with_fresh(builder: impl Fn(Var) -> Goal + 'static) -> Goal {
    Goal::new(move |state| {
        let (var, state) = state.fresh();
        builder(var).apply(state)
    })
}

/// Defer building a goal until the search reaches it.
///
/// Recursive relations wrap their recursive call in `delay`; the goal is then
/// only built when the stream engine steps the suspension, so the recursion
/// unfolds one level per turn instead of diverging on construction.
#[must_use]
pub fn delay(thunk: impl Fn() -> Goal + 'static) -> Goal {
    let thunk = Rc::new(thunk);
    Goal::new(move |state| {
        let thunk = Rc::clone(&thunk);
        Stream::suspend(move || thunk().apply(state))
    })
}

fn debug_check_scope(state: &State, u: &Term, v: &Term) {
    if cfg!(debug_assertions) {
        for term in [u, v] {
            if let Err(err) = state.check_scope(term) {
                panic!("{err}");
            }
        }
    }
}
