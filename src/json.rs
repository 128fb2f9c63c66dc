//! Conversions between [`Term`] and JSON.
//!
//! | JSON                        | Term                          |
//! |-----------------------------|-------------------------------|
//! | `null`, `[]`                | the empty sequence            |
//! | `true` / `false`            | boolean atom                  |
//! | integer                     | integer atom                  |
//! | `"_3"`                      | reified name `_3`             |
//! | any other string            | symbol                        |
//! | `{"symbol": "_3"}`          | symbol `_3`                   |
//! | array                       | proper list                   |
//! | `{"first": a, "rest": b}`   | pair, for improper tails      |
//! | `{"var": 2}`                | variable `?2`                 |
//!
//! Proper lists are written as arrays; only pairs with an improper tail use the
//! object form. Symbols spelled like a reified name are written as
//! `{"symbol": ..}` so they read back as symbols.

use crate::error::{KanrenError, Result};
use crate::term::{Atom, Term};
use crate::variable::Var;
use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Serialize, Serializer};
use serde_json::{json, Map, Value};

impl TryFrom<&Value> for Term {
    type Error = KanrenError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Term::nil()),
            Value::Bool(b) => Ok(Term::from(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Term::from)
                .ok_or_else(|| KanrenError::UnsupportedNumber(n.to_string())),
            Value::String(s) => Ok(read_string(s)),
            Value::Array(items) => {
                let items = items.iter().map(Term::try_from).collect::<Result<Vec<_>>>()?;
                Ok(Term::list(items))
            }
            Value::Object(fields) => read_object(fields)
                .ok_or_else(|| KanrenError::UnclassifiableTerm(value.to_string()))?,
        }
    }
}

impl TryFrom<Value> for Term {
    type Error = KanrenError;

    fn try_from(value: Value) -> Result<Self> {
        Term::try_from(&value)
    }
}

fn reified_number(s: &str) -> Option<usize> {
    s.strip_prefix('_')?.parse().ok()
}

fn read_string(s: &str) -> Term {
    match reified_number(s) {
        Some(n) => Term::Atom(Atom::Reified(n)),
        None => Term::from(s),
    }
}

/// `None` if the object has none of the pair, variable or symbol shapes
fn read_object(fields: &Map<String, Value>) -> Option<Result<Term>> {
    if fields.len() == 1 {
        if let Some(name) = fields.get("symbol") {
            return Some(Ok(Term::from(name.as_str()?)));
        }
    }
    if fields.len() == 2 {
        let (first, rest) = (fields.get("first")?, fields.get("rest")?);
        return Some(
            Term::try_from(first).and_then(|first| Ok(Term::cons(first, Term::try_from(rest)?))),
        );
    }
    let ordinal = fields.get("var")?.as_u64()?;
    if fields.len() != 1 {
        return None;
    }
    let ordinal = usize::try_from(ordinal).ok()?;
    Some(Ok(Term::Var(Var::from_ordinal(ordinal))))
}

impl From<&Term> for Value {
    fn from(term: &Term) -> Self {
        match term {
            Term::Atom(atom) => match atom {
                Atom::Nil => Value::Null,
                Atom::Bool(b) => Value::Bool(*b),
                Atom::Int(n) => Value::from(*n),
                Atom::Symbol(s) if reified_number(s).is_some() => {
                    json!({ "symbol": s.as_ref() })
                }
                Atom::Symbol(s) => Value::String(s.to_string()),
                Atom::Reified(_) => Value::String(atom.to_string()),
            },
            Term::Var(var) => json!({ "var": var.ordinal() }),
            Term::Pair(pair) => match term.to_vec() {
                Some(items) => Value::Array(items.iter().map(Value::from).collect()),
                None => json!({
                    "first": Value::from(&pair.first),
                    "rest": Value::from(&pair.rest),
                }),
            },
        }
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Term {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Term::try_from(&value).map_err(D::Error::custom)
    }
}
