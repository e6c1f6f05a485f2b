//! Conditions
//!
//! A [`Condition`] is one `left op right` comparison (or a bare truthiness
//! test) optionally followed by a chain of further conditions joined by
//! `and`/`or`. The chain is evaluated strictly left to right with no
//! precedence between the combinators.

use std::fmt;

use liquor_parser::{Comparison, ConditionMarkup, Logical};
use liquor_shared::{Result, Value};

use crate::context::RenderContext;
use crate::operators::apply_operator;

/// A comparison plus the rest of its `and`/`or` chain
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    left: String,
    operator: Option<String>,
    right: Option<String>,
    child: Option<(Logical, Box<Condition>)>,
}

impl Condition {
    /// `left op right`, with operands given as expression text
    pub fn new(left: impl Into<String>, operator: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            operator: Some(operator.into()),
            right: Some(right.into()),
            child: None,
        }
    }

    /// A bare expression tested for truthiness
    pub fn truthy(expression: impl Into<String>) -> Self {
        Self {
            left: expression.into(),
            operator: None,
            right: None,
            child: None,
        }
    }

    /// Append `condition` to the end of the chain with `and`
    pub fn and(&mut self, condition: Condition) -> &mut Self {
        self.append(Logical::And, condition)
    }

    /// Append `condition` to the end of the chain with `or`
    pub fn or(&mut self, condition: Condition) -> &mut Self {
        self.append(Logical::Or, condition)
    }

    fn append(&mut self, logical: Logical, condition: Condition) -> &mut Self {
        let mut slot = &mut self.child;
        while let Some((_, next)) = slot {
            slot = &mut next.child;
        }
        *slot = Some((logical, Box::new(condition)));
        self
    }

    /// Build a chain from parsed condition markup
    pub fn from_markup(markup: &ConditionMarkup) -> Self {
        let mut condition = Self::from_comparison(&markup.head);
        for (logical, comparison) in &markup.tail {
            condition.append(*logical, Self::from_comparison(comparison));
        }
        condition
    }

    fn from_comparison(comparison: &Comparison) -> Self {
        Self {
            left: comparison.left.clone(),
            operator: comparison.operator.clone(),
            right: comparison.right.clone(),
            child: None,
        }
    }

    /// Parse `if`-style markup such as `a == 1 and b contains 'x'`.
    ///
    /// Operators are not looked up here; an unknown operator only fails when
    /// the condition is evaluated.
    pub fn parse(markup: &str) -> Result<Self> {
        let parsed = liquor_parser::parse_condition(markup).map_err(|e| e.into_error(markup))?;
        Ok(Self::from_markup(&parsed))
    }

    /// Left operand expression text
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Raw operator token, `None` for a truthiness test
    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    /// Right operand expression text
    pub fn right(&self) -> Option<&str> {
        self.right.as_deref()
    }

    /// Next link of the chain
    pub fn child(&self) -> Option<(Logical, &Condition)> {
        self.child.as_ref().map(|(logical, next)| (*logical, next.as_ref()))
    }

    /// Evaluate the whole chain against `context`.
    ///
    /// A link whose outcome cannot change the running result is skipped, so
    /// it cannot raise either.
    pub fn evaluate(&self, context: &RenderContext) -> Result<bool> {
        let mut result = self.evaluate_link(context)?;
        let mut next = self.child.as_ref();
        while let Some((logical, link)) = next {
            result = match logical {
                Logical::And => result && link.evaluate_link(context)?,
                Logical::Or => result || link.evaluate_link(context)?,
            };
            next = link.child.as_ref();
        }
        Ok(result)
    }

    fn evaluate_link(&self, context: &RenderContext) -> Result<bool> {
        let left = context.resolve(&self.left)?;
        let Some(operator) = self.operator.as_deref() else {
            return Ok(left.is_truthy());
        };
        let right = match self.right.as_deref() {
            Some(expression) => context.resolve(expression)?,
            None => Value::Nil,
        };
        let outcome = apply_operator(operator, &left, &right, context)?;
        log::trace!("{} {operator} {} -> {outcome}", self.left, self.right.as_deref().unwrap_or("nil"));
        Ok(outcome)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.left)?;
        if let Some(operator) = &self.operator {
            write!(f, " {operator}")?;
        }
        if let Some(right) = &self.right {
            write!(f, " {right}")?;
        }
        if let Some((logical, next)) = &self.child {
            write!(f, " {logical} {next}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liquor_shared::NamingConvention;

    fn ctx() -> RenderContext {
        RenderContext::with_naming(NamingConvention::Ruby)
    }

    #[test]
    fn test_and_appends_to_tail() {
        let mut condition = Condition::new("1", "==", "1");
        condition.and(Condition::new("2", "==", "2")).or(Condition::truthy("x"));
        assert_eq!(condition.to_string(), "1 == 1 and 2 == 2 or x");
        let (logical, second) = condition.child().unwrap();
        assert_eq!(logical, Logical::And);
        assert_eq!(second.child().unwrap().0, Logical::Or);
    }

    #[test]
    fn test_parse_round_trips_through_display() {
        let condition = Condition::parse("a == 1 or b contains 'x'").unwrap();
        assert_eq!(condition.to_string(), "a == 1 or b contains 'x'");
        assert_eq!(condition.operator(), Some("=="));
    }

    #[test]
    fn test_no_precedence_between_combinators() {
        // (true or false) and false
        let condition = Condition::parse("true or false and false").unwrap();
        assert!(!condition.evaluate(&ctx()).unwrap());
        // (false and true) or true
        let condition = Condition::parse("false and true or true").unwrap();
        assert!(condition.evaluate(&ctx()).unwrap());
    }

    #[test]
    fn test_short_circuit_skips_unknown_operator() {
        let mut condition = Condition::truthy("true");
        condition.or(Condition::new("1", "nosuchop", "1"));
        assert!(condition.evaluate(&ctx()).unwrap());

        let mut condition = Condition::truthy("false");
        condition.or(Condition::new("1", "nosuchop", "1"));
        let err = condition.evaluate(&ctx()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown operator nosuchop");
    }

    #[test]
    fn test_missing_right_operand_is_nil() {
        let condition = Condition {
            left: "nil".to_string(),
            operator: Some("==".to_string()),
            right: None,
            child: None,
        };
        assert!(condition.evaluate(&ctx()).unwrap());
    }

    #[test]
    fn test_truthiness() {
        let context = ctx().with_variables(
            [("empty".to_string(), Value::string("")), ("zero".to_string(), Value::Int(0))]
                .into_iter()
                .collect(),
        );
        assert!(Condition::truthy("empty").evaluate(&context).unwrap());
        assert!(Condition::truthy("zero").evaluate(&context).unwrap());
        assert!(!Condition::truthy("missing").evaluate(&context).unwrap());
        assert!(!Condition::truthy("false").evaluate(&context).unwrap());
    }
}
