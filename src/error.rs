//! Errors reported by the engine and its readers.

use crate::variable::Var;
use thiserror::Error;

/// Programming and contract errors.
///
/// Failing goals never produce one of these: an unsatisfiable search simply yields
/// no states. These errors report terms the engine cannot work with at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KanrenError {
    /// A term mentions a variable that the state's arena never allocated
    #[error("variable {var} was not allocated by this query (arena holds {arena_len} variables)")]
    ForeignVariable {
        /// The offending variable
        var: Var,
        /// Number of variables the arena has produced so far
        arena_len: usize,
    },

    /// External data that is neither an atom, a pair nor a variable
    #[error("cannot classify {0} as a term")]
    UnclassifiableTerm(String),

    /// A number outside the integer atom domain
    #[error("number {0} is not an integer atom")]
    UnsupportedNumber(String),

    /// Text that does not read as a term
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, KanrenError>;
