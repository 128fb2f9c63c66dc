//! # microKanren
//!
//! A small relational programming engine: logic variables, unification with an
//! occurs-check, disequality constraints, and a fair search that interleaves
//! infinite branches so every answer is reached after finitely many steps.
//!
//! ## Features
//!
//! - Persistent substitutions and constraint stores shared between search branches
//! - Fair disjunction and fair conjunction over lazy answer streams
//! - Reification of answers with stable names for unbound variables
//! - JSON conversion of terms (`serde` feature) and an s-expression reader
//!   (`parsing` feature)
//!
//! ## Example
//!
//! ```rust
//! use microkanren::{and, conde, delay, fresh, run, unify, Goal, Term, Var};
//!
//! fn appendo(l: Term, s: Term, out: Term) -> Goal {
//!     conde([
//!         vec![unify(l.clone(), Term::nil()), unify(s.clone(), out.clone())],
//!         vec![fresh(move |[a, d, res]: [Var; 3]| {
//!             let (s, out) = (s.clone(), out.clone());
//!             and([
//!                 unify(Term::cons(a, d), l.clone()),
//!                 unify(Term::cons(a, res), out),
//!                 delay(move || appendo(d.into(), s.clone(), res.into())),
//!             ])
//!         })],
//!     ])
//! }
//!
//! let answers = run(1, |q| appendo(Term::list([1, 2]), Term::list([3]), q.into()));
//! assert_eq!(answers, vec![Term::list([1, 2, 3])]);
//! ```

/// Disequality constraints and their store.
pub mod constraint;
/// Engine errors.
pub mod error;
/// Goals and goal combinators.
pub mod goal;
/// Conversions between terms and JSON.
#[cfg(feature = "serde")]
pub mod json;
/// S-expression reader for terms.
#[cfg(feature = "parsing")]
pub mod parse;
/// Query drivers.
pub mod query;
/// Answer reification.
pub mod reify;
/// Search states.
pub mod state;
/// Triangular substitutions and unification.
pub mod substitution;
/// Lazy streams with fair interleaving.
pub mod stream;
/// Terms of the logic language.
pub mod term;
/// Logic variables and their allocator.
pub mod variable;

pub use constraint::{Constraint, ConstraintStore};
pub use error::{KanrenError, Result};
pub use goal::{
    and, call_with_fresh, conde, conjunction, delay, disequality, disjunction, fail, fresh,
    fresh_vars, none_equal, or, succeed, unify, Goal,
};
#[cfg(feature = "parsing")]
pub use parse::parse_term;
pub use query::{call_with_empty_state, run, run_all, run_states, run_vars, solve, Answers};
pub use reify::reify;
pub use state::State;
pub use stream::{Step, Stream, StreamIter, Tail};
pub use substitution::Substitution;
pub use term::{Atom, Pair, Term};
pub use variable::{FreshVars, Var, VarArena};
