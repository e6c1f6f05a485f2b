//! Parser implementation for liquor markup
//!
//! This module converts expression tokens and condition markup into AST
//! representations using nom parser combinators.

use nom::{
    character::complete::multispace0,
    combinator::all_consuming,
    sequence::delimited,
    Parser,
};

use crate::ast::{ConditionMarkup, Expr};
use crate::error::{ParseError, Result};

mod condition;
mod expressions;
mod identifiers;
mod literals;
mod utils;

use condition::parse_condition_markup;
use expressions::parse_expression as expression;

/// Parser for expression tokens and condition markup
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupParser {}

impl MarkupParser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self {}
    }

    /// Parse a single expression token such as `user.name` or `'bob'`
    pub fn parse_expression(&self, input: &str) -> Result<Expr> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        match all_consuming(expression).parse(input) {
            Ok((_, expr)) => Ok(expr),
            Err(e) => Err(ParseError::from_nom(input, e)),
        }
    }

    /// Parse `if`-style condition markup such as `a == 1 and b contains 'x'`
    pub fn parse_condition(&self, input: &str) -> Result<ConditionMarkup> {
        if input.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        match all_consuming(delimited(multispace0, parse_condition_markup, multispace0))
            .parse(input)
        {
            Ok((_, markup)) => Ok(markup),
            Err(e) => Err(ParseError::from_nom(input, e)),
        }
    }
}

/// Parse a single expression token
pub fn parse_expression(input: &str) -> Result<Expr> {
    MarkupParser::new().parse_expression(input)
}

/// Parse `if`-style condition markup
pub fn parse_condition(input: &str) -> Result<ConditionMarkup> {
    MarkupParser::new().parse_condition(input)
}
