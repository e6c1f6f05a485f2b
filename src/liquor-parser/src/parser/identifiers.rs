//! Identifier and variable path parsing

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};

use super::expressions::parse_expression;
use super::literals::parse_string_literal;
use super::utils::is_word_char;
use crate::ast::{Expr, Literal, Lookup, VariablePath};

/// Parse identifiers: a letter or underscore, word characters, optional trailing `?`
pub(crate) fn parse_identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize((
            take_while1(|c: char| c.is_alphabetic() || c == '_'),
            take_while(is_word_char),
            opt(char('?')),
        )),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

/// Parse a variable path such as `user.tags[0]`, `pair.1` or `['first name']`
pub(crate) fn parse_variable(input: &str) -> IResult<&str, VariablePath> {
    map((parse_root, many0(parse_lookup)), |(name, lookups)| {
        VariablePath { name, lookups }
    })
    .parse(input)
}

fn parse_root(input: &str) -> IResult<&str, String> {
    alt((
        parse_identifier,
        map(
            delimited(
                (char('['), multispace0),
                parse_string_literal,
                (multispace0, char(']')),
            ),
            |lit| match lit {
                Literal::String(s) => s,
                other => other.to_string(),
            },
        ),
    ))
    .parse(input)
}

fn parse_lookup(input: &str) -> IResult<&str, Lookup> {
    alt((
        map(
            preceded(
                char('.'),
                recognize((take_while1(is_word_char), opt(char('?')))),
            ),
            dot_lookup,
        ),
        map(
            delimited(
                terminated(char('['), multispace0),
                parse_expression,
                preceded(multispace0, char(']')),
            ),
            bracket_lookup,
        ),
    ))
    .parse(input)
}

fn dot_lookup(segment: &str) -> Lookup {
    match segment.parse::<i64>() {
        Ok(i) if segment.bytes().all(|b| b.is_ascii_digit()) => Lookup::Index(i),
        _ => Lookup::Key(segment.to_string()),
    }
}

fn bracket_lookup(expr: Expr) -> Lookup {
    match expr {
        Expr::Literal(Literal::String(s)) => Lookup::Key(s),
        Expr::Literal(Literal::Int(i)) => Lookup::Index(i),
        other => Lookup::Dynamic(Box::new(other)),
    }
}
