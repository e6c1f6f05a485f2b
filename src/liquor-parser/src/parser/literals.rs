//! Literal value parsing
//!
//! Strings (single or double quoted, no escapes), integers, floats, booleans
//! and nil.

use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit1},
    combinator::{map, map_res, opt, recognize},
    sequence::delimited,
    IResult, Parser,
};

use super::utils::keyword;
use crate::ast::Literal;

/// Parse literals
pub(crate) fn parse_literal(input: &str) -> IResult<&str, Literal> {
    alt((
        parse_string_literal,
        parse_number_literal,
        parse_boolean_literal,
        parse_nil_literal,
    ))
    .parse(input)
}

/// Parse string literals
pub(crate) fn parse_string_literal(input: &str) -> IResult<&str, Literal> {
    alt((
        map(
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
            |s: &str| Literal::String(s.to_string()),
        ),
        map(
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            |s: &str| Literal::String(s.to_string()),
        ),
    ))
    .parse(input)
}

/// Parse number literals.
///
/// Text without a fractional part becomes an integer unless it overflows `i64`.
pub(crate) fn parse_number_literal(input: &str) -> IResult<&str, Literal> {
    map_res(
        recognize((opt(char('-')), digit1, opt((char('.'), digit1)))),
        |s: &str| match s.parse::<i64>() {
            Ok(i) => Ok(Literal::Int(i)),
            Err(_) => s.parse::<f64>().map(Literal::Float),
        },
    )
    .parse(input)
}

/// Parse boolean literals
pub(crate) fn parse_boolean_literal(input: &str) -> IResult<&str, Literal> {
    alt((
        map(keyword("true"), |_| Literal::Bool(true)),
        map(keyword("false"), |_| Literal::Bool(false)),
    ))
    .parse(input)
}

/// Parse `nil` / `null`
pub(crate) fn parse_nil_literal(input: &str) -> IResult<&str, Literal> {
    map(alt((keyword("nil"), keyword("null"))), |_| Literal::Nil).parse(input)
}
