//! Terms of the logic language and their s-expression printing.

use crate::variable::Var;
use indexmap::IndexSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// An atomic value.
///
/// Atoms are opaque to the engine: unification only ever asks whether two
/// atoms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    /// The empty sequence, terminating proper lists
    Nil,
    /// A boolean (`#t` / `#f`)
    Bool(bool),
    /// A signed integer
    Int(i64),
    /// A symbol or string (e.g. `"olive"`)
    Symbol(Rc<str>),
    /// Name given to a variable that is still unbound when a solution is reified
    Reified(usize),
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Nil => write!(f, "()"),
            Atom::Bool(true) => write!(f, "#t"),
            Atom::Bool(false) => write!(f, "#f"),
            Atom::Int(n) => write!(f, "{n}"),
            Atom::Symbol(s) if needs_quotes(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    if matches!(c, '"' | '\\') {
                        write!(f, "\\")?;
                    }
                    write!(f, "{c}")?;
                }
                write!(f, "\"")
            }
            Atom::Symbol(s) => write!(f, "{s}"),
            Atom::Reified(n) => write!(f, "_{n}"),
        }
    }
}

/// Returns true if printing `symbol` bare would read back as something else
fn needs_quotes(symbol: &str) -> bool {
    let numbered = |prefix: char| {
        symbol
            .strip_prefix(prefix)
            .is_some_and(|n| n.parse::<usize>().is_ok())
    };
    symbol.is_empty()
        || matches!(symbol, "." | "#t" | "#f")
        || symbol.parse::<i64>().is_ok()
        || numbered('_')
        || numbered('?')
        || symbol
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\\'))
}

/// A cons cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair {
    /// Head of the cell
    pub first: Term,
    /// Tail of the cell; [`Atom::Nil`] for the last cell of a proper list
    pub rest: Term,
}

impl Drop for Pair {
    fn drop(&mut self) {
        // unlink the spine in a loop, one cell at a time
        let mut rest = std::mem::replace(&mut self.rest, Term::nil());
        while let Term::Pair(pair) = rest {
            match Rc::try_unwrap(pair) {
                Ok(mut pair) => rest = std::mem::replace(&mut pair.rest, Term::nil()),
                Err(_) => break,
            }
        }
    }
}

/// A term of the logic language: an atom, a pair of terms, or a logic variable.
///
/// Pairs are reference counted, so cloning a term never copies structure.
/// Dropping, comparing and hashing walk list spines in a loop, so lists of any
/// length are safe to handle.
#[derive(Debug, Clone, Eq)]
pub enum Term {
    /// An atomic value
    Atom(Atom),
    /// A cons cell
    Pair(Rc<Pair>),
    /// A logic variable
    Var(Var),
}

impl Term {
    /// The empty sequence
    #[must_use]
    pub fn nil() -> Self {
        Term::Atom(Atom::Nil)
    }

    /// Build a pair from its two components
    #[must_use]
    pub fn cons(first: impl Into<Term>, rest: impl Into<Term>) -> Self {
        Term::Pair(Rc::new(Pair {
            first: first.into(),
            rest: rest.into(),
        }))
    }

    /// Build a symbol atom
    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Term::Atom(Atom::Symbol(Rc::from(name)))
    }

    /// Build a proper list terminated by [`Atom::Nil`]
    #[must_use]
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::IntoIter: DoubleEndedIterator,
        I::Item: Into<Term>,
    {
        Self::improper_list(items, Term::nil())
    }

    /// Build a list whose last pair ends in `tail` instead of nil
    #[must_use]
    pub fn improper_list<I>(items: I, tail: impl Into<Term>) -> Self
    where
        I: IntoIterator,
        I::IntoIter: DoubleEndedIterator,
        I::Item: Into<Term>,
    {
        items
            .into_iter()
            .rev()
            .fold(tail.into(), |rest, item| Term::cons(item, rest))
    }

    /// Returns true if this term is a pair
    #[must_use]
    pub fn is_pair(&self) -> bool {
        matches!(self, Term::Pair(_))
    }

    /// Returns true if this term is the empty sequence
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Term::Atom(Atom::Nil))
    }

    /// Returns true if this term is a logic variable
    #[must_use]
    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    /// Head of a pair
    #[must_use]
    pub fn first(&self) -> Option<&Term> {
        self.as_pair().map(|(first, _)| first)
    }

    /// Tail of a pair
    #[must_use]
    pub fn rest(&self) -> Option<&Term> {
        self.as_pair().map(|(_, rest)| rest)
    }

    /// Both components of a pair
    #[must_use]
    pub fn as_pair(&self) -> Option<(&Term, &Term)> {
        match self {
            Term::Pair(pair) => Some((&pair.first, &pair.rest)),
            _ => None,
        }
    }

    /// The variable, if this term is one
    #[must_use]
    pub fn as_var(&self) -> Option<Var> {
        match self {
            Term::Var(var) => Some(*var),
            _ => None,
        }
    }

    /// The atom, if this term is one
    #[must_use]
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Term::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    /// Elements of a proper list, or `None` if the term is not one
    #[must_use]
    pub fn to_vec(&self) -> Option<Vec<Term>> {
        let mut items = Vec::new();
        let mut cursor = self;
        loop {
            match cursor {
                Term::Atom(Atom::Nil) => return Some(items),
                Term::Pair(pair) => {
                    items.push(pair.first.clone());
                    cursor = &pair.rest;
                }
                _ => return None,
            }
        }
    }

    /// Distinct variables syntactically contained in this term, in first-seen order
    #[must_use]
    pub fn variables(&self) -> IndexSet<Var> {
        let mut found = IndexSet::new();
        let mut pending = vec![self];
        while let Some(term) = pending.pop() {
            match term {
                Term::Var(var) => {
                    found.insert(*var);
                }
                Term::Pair(pair) => {
                    pending.push(&pair.rest);
                    pending.push(&pair.first);
                }
                Term::Atom(_) => {}
            }
        }
        found
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(next) = pending.pop() {
            match next {
                (Term::Pair(a), Term::Pair(b)) => {
                    if !Rc::ptr_eq(a, b) {
                        pending.push((&a.rest, &b.rest));
                        pending.push((&a.first, &b.first));
                    }
                }
                (Term::Atom(a), Term::Atom(b)) if a == b => {}
                (Term::Var(a), Term::Var(b)) if a == b => {}
                _ => return false,
            }
        }
        true
    }
}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut pending = vec![self];
        while let Some(term) = pending.pop() {
            std::mem::discriminant(term).hash(state);
            match term {
                Term::Atom(atom) => atom.hash(state),
                Term::Var(var) => var.hash(state),
                Term::Pair(pair) => {
                    pending.push(&pair.rest);
                    pending.push(&pair.first);
                }
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(atom) => write!(f, "{atom}"),
            Term::Var(var) => write!(f, "{var}"),
            Term::Pair(pair) => {
                write!(f, "({}", pair.first)?;
                let mut tail = &pair.rest;
                loop {
                    match tail {
                        Term::Atom(Atom::Nil) => break,
                        Term::Pair(next) => {
                            write!(f, " {}", next.first)?;
                            tail = &next.rest;
                        }
                        other => {
                            write!(f, " . {other}")?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
        }
    }
}

impl From<Atom> for Term {
    fn from(atom: Atom) -> Self {
        Term::Atom(atom)
    }
}

impl From<Var> for Term {
    fn from(var: Var) -> Self {
        Term::Var(var)
    }
}

impl From<&Var> for Term {
    fn from(var: &Var) -> Self {
        Term::Var(*var)
    }
}

impl From<&Term> for Term {
    fn from(term: &Term) -> Self {
        term.clone()
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Self {
        Term::Atom(Atom::Int(n))
    }
}

impl From<i32> for Term {
    fn from(n: i32) -> Self {
        Term::Atom(Atom::Int(i64::from(n)))
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Self {
        Term::Atom(Atom::Bool(b))
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::symbol(s)
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Term::Atom(Atom::Symbol(Rc::from(s)))
    }
}

impl From<Vec<Term>> for Term {
    fn from(items: Vec<Term>) -> Self {
        Term::list(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::VarArena;

    #[test]
    fn test_pair_contract() {
        let pair = Term::cons(1, 2);
        assert!(pair.is_pair());
        assert_eq!(pair.first(), Some(&Term::from(1)));
        assert_eq!(pair.rest(), Some(&Term::from(2)));
        assert!(Term::from(1).first().is_none(), "Atoms have no components");
    }

    #[test]
    fn test_nil_is_the_empty_list() {
        assert!(Term::nil().is_nil());
        assert_eq!(Term::list(Vec::<Term>::new()), Term::nil());
        assert!(!Term::cons(1, Term::nil()).is_nil());
    }

    #[test]
    fn test_atoms_compare_by_value() {
        assert_eq!(Term::symbol("olive"), Term::from("olive".to_string()));
        assert_ne!(Term::from(1), Term::from(true));
        assert_ne!(Term::from(0), Term::nil());
    }

    #[test]
    fn test_proper_list_prints_without_dots() {
        let list = Term::list([1, 2, 3]);
        assert_eq!(list.to_string(), "(1 2 3)");
    }

    #[test]
    fn test_improper_list_prints_dotted_tail() {
        assert_eq!(Term::cons(1, 2).to_string(), "(1 . 2)");
        assert_eq!(Term::improper_list([1, 2], 3).to_string(), "(1 2 . 3)");
    }

    #[test]
    fn test_nested_lists_and_atoms_print() {
        let term = Term::list([
            Term::list([Term::symbol("a"), Term::from(true)]),
            Term::nil(),
            Term::Atom(Atom::Reified(0)),
        ]);
        assert_eq!(term.to_string(), "((a #t) () _0)");
    }

    #[test]
    fn test_to_vec_only_accepts_proper_lists() {
        assert_eq!(
            Term::list([1, 2]).to_vec(),
            Some(vec![Term::from(1), Term::from(2)])
        );
        assert_eq!(Term::cons(1, 2).to_vec(), None);
        assert_eq!(Term::nil().to_vec(), Some(Vec::new()));
    }

    #[test]
    fn test_variables_are_listed_once_in_order() {
        let (vars, _) = VarArena::new().fresh_n(2);
        let (x, y) = (vars[0], vars[1]);
        let term = Term::list([Term::from(y), Term::from(1), Term::cons(x, y)]);
        let found: Vec<Var> = term.variables().into_iter().collect();
        assert_eq!(found, vec![y, x]);
    }

    #[test]
    fn test_ambiguous_symbols_print_quoted() {
        assert_eq!(Term::from("42").to_string(), r#""42""#);
        assert_eq!(Term::from("_3").to_string(), r#""_3""#);
        assert_eq!(Term::from("?1").to_string(), r#""?1""#);
        assert_eq!(Term::from(".").to_string(), r#"".""#);
        assert_eq!(Term::from(r#"say "hi""#).to_string(), r#""say \"hi\"""#);
        assert_eq!(Term::from("_x").to_string(), "_x", "Plain symbols stay bare");
    }

    #[test]
    fn test_long_lists_compare_and_drop() {
        let long = Term::list(0..300_000i64);
        let same = Term::list(0..300_000i64);
        assert!(long == same, "Equal long lists must compare equal");
        assert!(long != Term::list(1..300_001i64));
        assert_eq!(long.to_vec().map(|items| items.len()), Some(300_000));
        drop(long);
        drop(same);
    }

    #[test]
    fn test_shared_tail_survives_dropping_one_owner() {
        let tail = Term::list(0..1000i64);
        let longer = Term::cons(-1, tail.clone());
        drop(longer);
        assert_eq!(tail.to_vec().map(|items| items.len()), Some(1000));
    }

    #[test]
    fn test_unbound_variables_print_with_ordinal() {
        let (x, _) = VarArena::new().fresh();
        assert_eq!(Term::cons(x, Term::nil()).to_string(), "(?0)");
    }
}
