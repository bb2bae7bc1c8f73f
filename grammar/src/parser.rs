use nom::{
    bytes::complete::tag,
    character::complete::{char, multispace0, satisfy, space0},
    combinator::{all_consuming, map},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};

use crate::{Production, Symbol};

const ARROW: &str = "->";
const ALTERNATIVE: char = '|';

pub fn lhs(input: &str) -> IResult<&str, char> {
    satisfy(|c| c.is_ascii_uppercase())(input)
}

pub fn symbol(input: &str) -> IResult<&str, Symbol> {
    map(
        satisfy(|c| !c.is_whitespace() && c != ALTERNATIVE),
        Symbol::classify,
    )(input)
}

/// Symbols of a single alternative. May be empty, emptiness is reported when
/// the grammar is validated.
pub fn rhs(input: &str) -> IResult<&str, Vec<Symbol>> {
    many0(preceded(space0, symbol))(input)
}

fn arrow(input: &str) -> IResult<&str, &str> {
    delimited(space0, tag(ARROW), space0)(input)
}

/// A single alternative, `A->aBc`.
pub fn production(input: &str) -> IResult<&str, Production> {
    let (rem, (lhs, _, rhs)) = tuple((preceded(space0, lhs), arrow, rhs))(input)?;
    Ok((rem, Production { lhs, rhs }))
}

/// A rule line, `A->aBc|d`, split into one production per alternative.
pub fn rule(input: &str) -> IResult<&str, Vec<Production>> {
    let (rem, (lhs, _, alternatives)) = terminated(
        tuple((
            preceded(space0, lhs),
            arrow,
            separated_list1(preceded(space0, char(ALTERNATIVE)), rhs),
        )),
        space0,
    )(input)?;
    let productions = alternatives
        .into_iter()
        .map(|rhs| Production { lhs, rhs })
        .collect();
    Ok((rem, productions))
}

pub fn grammar(input: &str) -> IResult<&str, Vec<Production>> {
    let (rem, rules) = all_consuming(terminated(
        many0(preceded(multispace0, rule)),
        multispace0,
    ))(input)?;
    Ok((rem, rules.into_iter().flatten().collect()))
}
