//! Running goals and collecting their answers.
//!
//! Every query starts from an empty [`State`], so it owns a fresh variable arena
//! and shares nothing with other queries. Answers are pulled lazily; nothing past
//! the last requested answer is evaluated.

use crate::goal::Goal;
use crate::reify::reify;
use crate::state::State;
use crate::stream::{Stream, StreamIter};
use crate::term::Term;
use crate::variable::Var;
use log::debug;

/// Lazy iterator over the reified answers of a query.
///
/// Dropping it, or simply not pulling further, cancels the search.
#[derive(Debug)]
pub struct Answers {
    output: Term,
    states: StreamIter<State>,
}

impl Answers {
    fn new(output: Term, states: Stream<State>) -> Self {
        Self {
            output,
            states: states.into_iter(),
        }
    }
}

impl Iterator for Answers {
    type Item = Term;

    fn next(&mut self) -> Option<Term> {
        let state = self.states.next()?;
        Some(reify(&state, &self.output))
    }
}

/// The stream of states `goal` produces from an empty state
#[must_use]
pub fn call_with_empty_state(goal: &Goal) -> Stream<State> {
    goal.apply(State::empty())
}

/// Allocate the output variable, build the goal, and defer running it until pulled
fn start(builder: impl FnOnce(Var) -> Goal) -> (Var, Stream<State>) {
    let (output, state) = State::empty().fresh();
    let goal = builder(output);
    debug!("starting query for {output}");
    (output, Stream::suspend(move || goal.apply(state)))
}

/// Lazily enumerate the answers for the output variable given to `builder`
#[must_use]
pub fn solve(builder: impl FnOnce(Var) -> Goal) -> Answers {
    let (output, states) = start(builder);
    Answers::new(output.into(), states)
}

/// Collect at most `max_answers` reified answers.
///
/// The builder receives the query's output variable; each answer is that variable
/// reified in one solution state, in the order the search produces them.
///
/// ```
/// use microkanren::{disjunction, run, unify, Term};
///
/// let answers = run(3, |q| disjunction(unify(q, 1), disjunction(unify(q, 2), unify(q, 3))));
/// assert_eq!(answers, vec![Term::from(1), 2.into(), 3.into()]);
/// ```
#[must_use]
pub fn run(max_answers: usize, builder: impl FnOnce(Var) -> Goal) -> Vec<Term> {
    let answers: Vec<Term> = solve(builder).take(max_answers).collect();
    debug!("query produced {} answers", answers.len());
    answers
}

/// Collect every answer. Does not return if the goal has infinitely many.
#[must_use]
pub fn run_all(builder: impl FnOnce(Var) -> Goal) -> Vec<Term> {
    let answers: Vec<Term> = solve(builder).collect();
    debug!("query produced {} answers", answers.len());
    answers
}

/// Collect at most `max_answers` solution states without reifying them
#[must_use]
pub fn run_states(max_answers: usize, builder: impl FnOnce(Var) -> Goal) -> Vec<State> {
    let (_, states) = start(builder);
    let states = states.take(max_answers);
    debug!("query produced {} states", states.len());
    states
}

/// Like [`run`] with `N` output variables, each answer being the list of their
/// reified values
#[must_use]
pub fn run_vars<const N: usize>(
    max_answers: usize,
    builder: impl FnOnce([Var; N]) -> Goal,
) -> Vec<Term> {
    let (vars, state) = State::empty().fresh_n(N);
    let output = Term::list(vars.iter().copied());
    let goal = builder(std::array::from_fn(|i| vars[i]));
    debug!("starting query for {output}");
    let answers: Vec<Term> = Answers::new(output, Stream::suspend(move || goal.apply(state)))
        .take(max_answers)
        .collect();
    debug!("query produced {} answers", answers.len());
    answers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{
        and, call_with_fresh, conde, delay, disequality, disjunction, fresh, or, unify,
    };
    use crate::term::Atom;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn fives(x: Var) -> Goal {
        disjunction(unify(x, 5), delay(move || fives(x)))
    }

    fn sixes(x: Var) -> Goal {
        disjunction(unify(x, 6), delay(move || sixes(x)))
    }

    #[test]
    fn test_run_reifies_bound_output() {
        init_logging();
        let answers = run(1, |q| unify(q, Term::list([1, 2, 3])));
        assert_eq!(answers, vec![Term::list([1, 2, 3])]);
        assert_eq!(answers[0].to_string(), "(1 2 3)");
    }

    #[test]
    fn test_nested_disjunction_answers_in_order() {
        init_logging();
        let answers = run(3, |q| disjunction(unify(q, 1), disjunction(unify(q, 2), unify(q, 3))));
        assert_eq!(answers, vec![Term::from(1), 2.into(), 3.into()]);
    }

    #[test]
    fn test_run_stops_at_requested_count_on_infinite_goal() {
        init_logging();
        for n in 1..=3 {
            let answers = run(n, fives);
            assert_eq!(answers.len(), n, "Should take exactly {n} fives");
            assert!(answers.iter().all(|answer| *answer == Term::from(5)));
        }
    }

    #[test]
    fn test_infinite_branches_share_the_search() {
        init_logging();
        let answers = run(4, |q| disjunction(fives(q), sixes(q)));
        assert!(answers.contains(&Term::from(5)));
        assert!(answers.contains(&Term::from(6)), "Sixes must not be starved");
    }

    #[test]
    fn test_run_zero_answers_evaluates_nothing() {
        let answers = run(0, |_| Goal::new(|_| panic!("goal must not run")));
        assert!(answers.is_empty());
    }

    #[test]
    fn test_disequality_then_unify_has_no_answer() {
        init_logging();
        let answers = run(1, |x| and([disequality(x, 1), unify(x, 1)]));
        assert!(answers.is_empty());
    }

    #[test]
    fn test_disequality_alone_leaves_output_unbound() {
        init_logging();
        let answers = run(1, |x| disequality(x, 1));
        assert_eq!(answers, vec![Term::Atom(Atom::Reified(0))]);
        assert_eq!(answers[0].to_string(), "_0");
    }

    #[test]
    fn test_occurs_check_has_no_answer() {
        let answers = run(1, |x| unify(x, Term::cons(x, Term::nil())));
        assert!(answers.is_empty());
    }

    #[test]
    fn test_reified_names_ignore_allocation_history() {
        init_logging();
        let answers = run(2, |q| {
            fresh(move |_burned: [Var; 25]| {
                call_with_fresh(move |unbound| {
                    unify(q, Term::list([Term::from(1), unbound.into()]))
                })
            })
        });
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].to_string(), "(1 _0)");
    }

    #[test]
    fn test_long_list_answer_is_returned_and_dropped() {
        init_logging();
        let answers = run(1, |q| unify(q, Term::list(0..300_000i64)));
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].to_vec().map(|items| items.len()), Some(300_000));
    }

    #[test]
    fn test_many_clauses_do_not_exhaust_the_stack() {
        let answers = run_all(|q| or((0..200_000i64).map(|i| unify(q, i))));
        assert_eq!(answers.len(), 200_000);
        assert_eq!(answers[0], Term::from(0));
        assert_eq!(answers[199_999], Term::from(199_999));
    }

    #[test]
    fn test_solve_is_lazy() {
        let mut answers = solve(fives);
        assert_eq!(answers.next(), Some(Term::from(5)));
        assert_eq!(answers.next(), Some(Term::from(5)));
    }

    #[test]
    fn test_run_all_collects_finite_answers() {
        let answers = run_all(|q| conde([vec![unify(q, "tea")], vec![unify(q, "cup")]]));
        assert_eq!(answers, vec![Term::from("tea"), "cup".into()]);
    }

    #[test]
    fn test_run_states_returns_raw_states() {
        let states = run_states(5, |q| unify(q, 7));
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].substitution().len(), 1);
        assert_eq!(states[0].variables().len(), 1);
    }

    #[test]
    fn test_run_vars_reifies_outputs_together() {
        let answers = run_vars(1, |[x, y]: [Var; 2]| {
            and([unify(x, 1), unify(Term::cons(x, y), Term::cons(1, 2))])
        });
        assert_eq!(answers, vec![Term::list([1, 2])]);

        let answers = run_vars(1, |[x, y, _z]: [Var; 3]| unify(x, y));
        assert_eq!(answers[0].to_string(), "(_0 _0 _1)");
    }

    #[test]
    fn test_call_with_empty_state_runs_goal() {
        let goal = call_with_fresh(|x| unify(x, 5));
        let states = call_with_empty_state(&goal).take_all();
        assert_eq!(states.len(), 1);
    }
}
