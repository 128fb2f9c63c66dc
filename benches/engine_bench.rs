#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use microkanren::{and, delay, disequality, disjunction, run, unify, Goal, State, Term, Var};

fn fives(x: Var) -> Goal {
    disjunction(unify(x, 5), delay(move || fives(x)))
}

fn sixes(x: Var) -> Goal {
    disjunction(unify(x, 6), delay(move || sixes(x)))
}

/// A chain of 500 variables, each bound to the next, the last to a list
fn setup_variable_chain() -> (Vec<Var>, State) {
    let (vars, mut state) = State::empty().fresh_n(500);
    for pair in vars.windows(2) {
        if let Some(next) = state.unify(&pair[0].into(), &pair[1].into()) {
            state = next;
        }
    }
    let last = vars[vars.len() - 1];
    if let Some(next) = state.unify(&last.into(), &Term::list(0..100i64)) {
        state = next;
    }
    (vars.to_vec(), state)
}

/// Benchmark for unifying two large structurally equal lists
fn bench_unify_lists(c: &mut Criterion) {
    let (vars, state) = State::empty().fresh_n(100);
    let open = Term::list(vars.iter().copied());
    let ground = Term::list(0..100i64);

    c.bench_function("unify_lists", |b| {
        b.iter(|| black_box(state.unify(black_box(&open), black_box(&ground))));
    });
}

/// Benchmark for walking a long alias chain down to a list
fn bench_walk_star_chain(c: &mut Criterion) {
    let (vars, state) = setup_variable_chain();
    let head = Term::from(vars[0]);

    c.bench_function("walk_star_chain", |b| {
        b.iter(|| black_box(state.walk_star(black_box(&head))));
    });
}

/// Benchmark for unification that has to re-check indexed disequalities
fn bench_unify_under_constraints(c: &mut Criterion) {
    let (vars, mut state) = State::empty().fresh_n(200);
    for (i, var) in (0i64..).zip(vars.iter()) {
        if let Some(next) = state.disequal(&(*var).into(), &Term::from(-i)) {
            state = next;
        }
    }
    let open = Term::list(vars.iter().copied());
    let ground = Term::list(1..201i64);

    c.bench_function("unify_under_constraints", |b| {
        b.iter(|| black_box(state.unify(black_box(&open), black_box(&ground))));
    });
}

/// Benchmark for fair disjunction over two infinite relations
fn bench_fair_disjunction(c: &mut Criterion) {
    c.bench_function("fair_disjunction", |b| {
        b.iter(|| black_box(run(1000, |q| disjunction(fives(q), sixes(q)))));
    });
}

/// Benchmark for a query whose only answer is rejected by a disequality
fn bench_disequality_pruning(c: &mut Criterion) {
    c.bench_function("disequality_pruning", |b| {
        b.iter(|| {
            black_box(run(1000, |q| and([disequality(q, 5), disjunction(fives(q), sixes(q))])))
        });
    });
}

criterion_group!(
    benches,
    bench_unify_lists,
    bench_walk_star_chain,
    bench_unify_under_constraints,
    bench_fair_disjunction,
    bench_disequality_pruning
);
criterion_main!(benches);
