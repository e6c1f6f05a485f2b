//! `if`-style condition markup: `left op right (and|or left op right)*`

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{multispace0, multispace1},
    combinator::{map, opt, recognize, verify},
    multi::many0,
    sequence::{delimited, preceded},
    IResult, Parser,
};

use super::expressions::parse_expression;
use super::utils::keyword;
use crate::ast::{Comparison, ConditionMarkup, Logical};

/// Parse a full chain of comparisons
pub(crate) fn parse_condition_markup(input: &str) -> IResult<&str, ConditionMarkup> {
    map(
        (parse_comparison, many0((parse_logical, parse_comparison))),
        |(head, tail)| ConditionMarkup { head, tail },
    )
    .parse(input)
}

fn parse_comparison(input: &str) -> IResult<&str, Comparison> {
    map(
        (
            recognize(parse_expression),
            opt(preceded(
                multispace0,
                (
                    parse_operator,
                    preceded(multispace0, recognize(parse_expression)),
                ),
            )),
        ),
        |(left, rest)| Comparison {
            left: left.to_string(),
            operator: rest.map(|(op, _)| op.to_string()),
            right: rest.map(|(_, right)| right.to_string()),
        },
    )
    .parse(input)
}

/// Symbolic operators, or a word operator other than `and`/`or`
fn parse_operator(input: &str) -> IResult<&str, &str> {
    alt((
        tag("=="),
        tag("!="),
        tag("<>"),
        tag("<="),
        tag(">="),
        tag("<"),
        tag(">"),
        verify(
            recognize((
                take_while1(|c: char| c.is_alphabetic() || c == '_'),
                take_while(|c: char| c.is_alphanumeric() || c == '_'),
            )),
            |word: &str| word != "and" && word != "or",
        ),
    ))
    .parse(input)
}

fn parse_logical(input: &str) -> IResult<&str, Logical> {
    delimited(
        multispace1,
        alt((
            map(keyword("and"), |_| Logical::And),
            map(keyword("or"), |_| Logical::Or),
        )),
        multispace1,
    )
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tokens() {
        assert_eq!(parse_operator("<> 1"), Ok((" 1", "<>")));
        assert_eq!(parse_operator("<= 1"), Ok((" 1", "<=")));
        assert_eq!(parse_operator("IsMultipleOf 4"), Ok((" 4", "IsMultipleOf")));
        assert!(parse_operator("and b").is_err());
    }

    #[test]
    fn test_single_comparison() {
        let (rest, cmp) = parse_comparison("'bob' contains 'bo'").unwrap();
        assert_eq!(rest, "");
        assert_eq!(cmp.left, "'bob'");
        assert_eq!(cmp.operator.as_deref(), Some("contains"));
        assert_eq!(cmp.right.as_deref(), Some("'bo'"));
    }

    #[test]
    fn test_bare_expression_leaves_logical() {
        let (rest, cmp) = parse_comparison("user and x").unwrap();
        assert_eq!(rest, " and x");
        assert_eq!(cmp.operator, None);
    }
}
