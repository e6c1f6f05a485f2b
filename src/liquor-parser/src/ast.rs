//! Abstract Syntax Tree (AST) definitions for expression tokens and condition markup
//!
//! An expression token is what a condition carries on either side of its
//! operator: a literal, a range, or a variable path such as `user.tags[0]`.

use std::fmt;

/// Literal values
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Literal {
    /// `nil` or `null`
    Nil,
    /// `true` or `false`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// Single or double quoted string, quotes removed
    String(String),
}

/// One step of a variable path
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Lookup {
    /// `.name` or `["name"]`
    Key(String),
    /// `[3]`, `[-1]` or `.0`
    Index(i64),
    /// `[expr]`, the key is the value of another expression
    Dynamic(Box<Expr>),
}

/// A variable reference followed by lookups
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct VariablePath {
    /// Root variable name
    pub name: String,
    /// Lookups applied left to right
    pub lookups: Vec<Lookup>,
}

/// Expression token
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Expr {
    /// Literal value
    Literal(Literal),
    /// Inclusive integer range `(start..end)`
    Range {
        /// First element
        start: Box<Expr>,
        /// Last element
        end: Box<Expr>,
    },
    /// Variable path
    Variable(VariablePath),
}

/// Logical combinator between two comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Logical {
    /// `and`
    And,
    /// `or`
    Or,
}

/// A single `left op right` comparison, or a bare expression tested for truthiness.
///
/// Operands and operator are kept as source text: operands are resolved and the
/// operator is looked up only when the condition is evaluated.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Comparison {
    /// Left operand expression text
    pub left: String,
    /// Raw operator token
    pub operator: Option<String>,
    /// Right operand expression text
    pub right: Option<String>,
}

/// Parsed `if`-style condition markup: a head comparison and a flat chain
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConditionMarkup {
    /// First comparison
    pub head: Comparison,
    /// Remaining comparisons in encounter order
    pub tail: Vec<(Logical, Comparison)>,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Nil => write!(f, "nil"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x:?}"),
            Literal::String(s) if s.contains('\'') => write!(f, "\"{s}\""),
            Literal::String(s) => write!(f, "'{s}'"),
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Key(k) => write!(f, ".{k}"),
            Lookup::Index(i) => write!(f, "[{i}]"),
            Lookup::Dynamic(e) => write!(f, "[{e}]"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::Range { start, end } => write!(f, "({start}..{end})"),
            Expr::Variable(path) => {
                write!(f, "{}", path.name)?;
                for lookup in &path.lookups {
                    write!(f, "{lookup}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Logical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logical::And => write!(f, "and"),
            Logical::Or => write!(f, "or"),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.left)?;
        if let (Some(op), Some(right)) = (&self.operator, &self.right) {
            write!(f, " {op} {right}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ConditionMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        for (logical, comparison) in &self.tail {
            write!(f, " {logical} {comparison}")?;
        }
        Ok(())
    }
}
