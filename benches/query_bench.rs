#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use microkanren::{and, conde, delay, fresh, run, run_vars, unify, Goal, Term, Var};

fn appendo(l: Term, s: Term, out: Term) -> Goal {
    conde([
        vec![unify(l.clone(), Term::nil()), unify(s.clone(), out.clone())],
        vec![fresh(move |[a, d, res]: [Var; 3]| {
            let s = s.clone();
            and([
                unify(Term::cons(a, d), l.clone()),
                unify(Term::cons(a, res), out.clone()),
                delay(move || appendo(d.into(), s.clone(), res.into())),
            ])
        })],
    ])
}

fn setup_list(len: i64) -> Term {
    Term::list(0..len)
}

fn query_append_forwards(c: &mut Criterion) {
    let (prefix, suffix) = (setup_list(200), setup_list(200));

    c.bench_function("query_append_forwards", |b| {
        b.iter(|| {
            let (prefix, suffix) = (prefix.clone(), suffix.clone());
            black_box(run(1, |q| appendo(prefix, suffix, q.into())))
        });
    });
}

fn query_append_splits(c: &mut Criterion) {
    let whole = setup_list(50);

    c.bench_function("query_append_splits", |b| {
        b.iter(|| {
            let whole = whole.clone();
            black_box(run_vars(100, |[x, y]: [Var; 2]| appendo(x.into(), y.into(), whole)))
        });
    });
}

fn query_append_open_ended(c: &mut Criterion) {
    c.bench_function("query_append_open_ended", |b| {
        b.iter(|| {
            black_box(run_vars(100, |[x, y, z]: [Var; 3]| {
                appendo(x.into(), y.into(), z.into())
            }))
        });
    });
}

criterion_group!(
    benches,
    query_append_forwards,
    query_append_splits,
    query_append_open_ended
);
criterion_main!(benches);
