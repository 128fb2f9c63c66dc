//! Reading terms from s-expression text.
//!
//! The syntax is the one [`Term`]'s `Display` writes: integers, `#t`/`#f`,
//! symbols, `()`, lists with an optional dotted tail, reified names `_n` and
//! variables `?n`. A symbol that would otherwise read as something else is
//! written in double quotes, with `"` and `\` escaped by a backslash.

use crate::error::{KanrenError, Result};
use crate::term::{Atom, Term};
use crate::variable::Var;
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, cut, map, opt, value, verify},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{preceded, terminated},
    IResult,
};
use std::str::FromStr;

/// Parse one term, surrounded by optional whitespace.
///
/// ```
/// use microkanren::{parse_term, Term};
///
/// let term = parse_term("(1 (a b) . c)").unwrap();
/// assert_eq!(term, Term::improper_list([Term::from(1), Term::list(["a", "b"])], "c"));
/// ```
///
/// # Errors
///
/// Returns [`KanrenError::Parse`] if the text is not exactly one term.
pub fn parse_term(input: &str) -> Result<Term> {
    match all_consuming(terminated(term, multispace0))(input) {
        Ok((_, term)) => Ok(term),
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) if err.input.is_empty() => {
            Err(KanrenError::Parse("unexpected end of input".to_string()))
        }
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => Err(KanrenError::Parse(format!(
            "unexpected input at `{}`",
            err.input.chars().take(16).collect::<String>()
        ))),
        Err(nom::Err::Incomplete(_)) => Err(KanrenError::Parse("incomplete input".to_string())),
    }
}

impl FromStr for Term {
    type Err = KanrenError;

    fn from_str(s: &str) -> Result<Self> {
        parse_term(s)
    }
}

fn term(input: &str) -> IResult<&str, Term> {
    preceded(multispace0, alt((list, quoted, atom)))(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !matches!(c, '(' | ')' | '"'))(input)
}

fn quoted(input: &str) -> IResult<&str, Term> {
    let content = escaped_transform(
        is_not("\\\""),
        '\\',
        alt((value("\\", tag("\\")), value("\"", tag("\"")))),
    );
    map(
        preceded(char('"'), cut(terminated(opt(content), char('"')))),
        |name: Option<String>| Term::symbol(&name.unwrap_or_default()),
    )(input)
}

fn dot(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, verify(token, |t: &str| t == "."))(input)
}

fn atom(input: &str) -> IResult<&str, Term> {
    map(verify(token, |t: &str| t != "."), classify)(input)
}

fn list(input: &str) -> IResult<&str, Term> {
    preceded(char('('), cut(list_body))(input)
}

fn list_body(input: &str) -> IResult<&str, Term> {
    let (input, items) = many0(term)(input)?;
    let (input, tail) = opt(preceded(dot, term))(input)?;
    if tail.is_some() && items.is_empty() {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify)));
    }
    let (input, _) = preceded(multispace0, char::<_, Error<&str>>(')'))(input)?;
    Ok((input, Term::improper_list(items, tail.unwrap_or_else(Term::nil))))
}

fn classify(token: &str) -> Term {
    match token {
        "#t" => return Term::from(true),
        "#f" => return Term::from(false),
        _ => {}
    }
    if let Ok(n) = token.parse::<i64>() {
        return Term::from(n);
    }
    if let Some(Ok(n)) = token.strip_prefix('_').map(str::parse::<usize>) {
        return Term::Atom(Atom::Reified(n));
    }
    if let Some(Ok(n)) = token.strip_prefix('?').map(str::parse::<usize>) {
        return Term::Var(Var::from_ordinal(n));
    }
    Term::symbol(token)
}
