//! Expression token parsing

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0},
    combinator::map,
    sequence::{delimited, separated_pair},
    IResult, Parser,
};

use super::identifiers::parse_variable;
use super::literals::parse_literal;
use crate::ast::Expr;

/// Parse one expression token
pub(crate) fn parse_expression(input: &str) -> IResult<&str, Expr> {
    alt((
        map(parse_literal, Expr::Literal),
        parse_range,
        map(parse_variable, Expr::Variable),
    ))
    .parse(input)
}

/// Parse an inclusive range `(start..end)`
fn parse_range(input: &str) -> IResult<&str, Expr> {
    map(
        delimited(
            (char('('), multispace0),
            separated_pair(
                parse_expression,
                (multispace0, tag(".."), multispace0),
                parse_expression,
            ),
            (multispace0, char(')')),
        ),
        |(start, end)| Expr::Range {
            start: Box::new(start),
            end: Box::new(end),
        },
    )
    .parse(input)
}
