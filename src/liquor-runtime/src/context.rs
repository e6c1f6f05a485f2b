//! Render context
//!
//! A [`RenderContext`] owns the variable scope chain of one render together with
//! the naming convention and syntax-compatibility level it was started with,
//! and resolves expression tokens against them.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::str::FromStr;

use liquor_parser::{Expr, Literal, Lookup, MarkupParser, VariablePath};
use liquor_shared::{Context, Error, NamingConvention, Object, Result, Value};

use crate::drops::LegacyKeyValueDrop;

/// Largest number of items a `(a..b)` range may produce
pub const MAX_RANGE_LEN: usize = 100_000;

/// Template language version the render emulates
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxCompatibility {
    /// Liquid 2.0
    #[default]
    Liquid20,
    /// Liquid 2.1
    Liquid21,
    /// Liquid 2.2: map iteration yields `[key, value]` pairs
    Liquid22,
    /// Liquid 2.2 with later fixes
    Liquid22a,
}

impl fmt::Display for SyntaxCompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyntaxCompatibility::Liquid20 => "liquid20",
            SyntaxCompatibility::Liquid21 => "liquid21",
            SyntaxCompatibility::Liquid22 => "liquid22",
            SyntaxCompatibility::Liquid22a => "liquid22a",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SyntaxCompatibility {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "liquid20" | "2.0" => Ok(SyntaxCompatibility::Liquid20),
            "liquid21" | "2.1" => Ok(SyntaxCompatibility::Liquid21),
            "liquid22" | "2.2" => Ok(SyntaxCompatibility::Liquid22),
            "liquid22a" | "2.2a" => Ok(SyntaxCompatibility::Liquid22a),
            other => Err(format!("Unknown syntax compatibility level: {other}")),
        }
    }
}

/// Variable scopes and settings for one render
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Outermost (global) scope first
    scopes: Vec<Object>,
    naming: NamingConvention,
    syntax: SyntaxCompatibility,
    parser: MarkupParser,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext {
    /// Create a context using the process default naming convention
    pub fn new() -> Self {
        Self::with_naming(NamingConvention::global())
    }

    /// Create a context using `naming`
    pub fn with_naming(naming: NamingConvention) -> Self {
        Self {
            scopes: vec![Object::new()],
            naming,
            syntax: SyntaxCompatibility::default(),
            parser: MarkupParser::new(),
        }
    }

    /// Set the syntax-compatibility level
    #[must_use]
    pub fn with_syntax(mut self, syntax: SyntaxCompatibility) -> Self {
        self.syntax = syntax;
        self
    }

    /// Seed the global scope
    #[must_use]
    pub fn with_variables(mut self, variables: Object) -> Self {
        self.scopes[0].extend(variables);
        self
    }

    /// Naming convention of this render
    pub fn naming_convention(&self) -> NamingConvention {
        self.naming
    }

    /// Syntax-compatibility level of this render
    pub fn syntax_compatibility(&self) -> SyntaxCompatibility {
        self.syntax
    }

    /// Open a new innermost scope
    pub fn push_scope(&mut self) {
        self.scopes.push(Object::new());
    }

    /// Close the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) -> Option<Object> {
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }

    /// Run `f` inside a fresh scope
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push_scope();
        let result = f(self);
        self.pop_scope();
        result
    }

    /// Assign in the innermost scope
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), value.into());
        }
    }

    /// Assign in the global scope
    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.scopes[0].insert(name.into(), value.into());
    }

    /// Look a variable up, innermost scope first
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Whether any scope defines `name`
    pub fn has_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Parse and evaluate an expression token
    pub fn resolve(&self, expression: &str) -> Result<Value> {
        let expr = self
            .parser
            .parse_expression(expression)
            .map_err(|e| e.into_error(expression))?;
        let value = self.evaluate(&expr)?;
        log::trace!("resolved {expression} to {}", value.type_name());
        Ok(value)
    }

    /// Evaluate a parsed expression
    pub fn evaluate(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(literal_value(literal)),
            Expr::Range { start, end } => {
                let (start, end) = (self.evaluate(start)?, self.evaluate(end)?);
                let bound = |v: &Value| {
                    range_bound(v).ok_or_else(|| {
                        Error::syntax(expr.to_string(), format!("invalid range bound {v}"))
                    })
                };
                let (first, last) = (bound(&start)?, bound(&end)?);
                let len = i128::from(last) - i128::from(first) + 1;
                if len > MAX_RANGE_LEN as i128 {
                    return Err(Error::syntax(
                        expr.to_string(),
                        format!("range of {len} items exceeds the limit of {MAX_RANGE_LEN}"),
                    ));
                }
                Ok(Value::Array((first..=last).map(Value::Int).collect()))
            }
            Expr::Variable(path) => self.evaluate_path(path),
        }
    }

    fn evaluate_path(&self, path: &VariablePath) -> Result<Value> {
        let mut current = self.get(&path.name).cloned().unwrap_or_default();
        for lookup in &path.lookups {
            let key = match lookup {
                Lookup::Key(k) => Value::string(k.clone()),
                Lookup::Index(i) => Value::Int(*i),
                Lookup::Dynamic(expr) => self.evaluate(expr)?,
            };
            current = self.lookup(&current, &key);
            if current.is_nil() {
                break;
            }
        }
        Ok(current)
    }

    /// Resolve one path segment against `value`.
    ///
    /// Container access comes first (index, key, and the `size`, `first`,
    /// `last` commands), then drop members, otherwise nil.
    pub fn lookup(&self, value: &Value, key: &Value) -> Value {
        if let Some(found) = container_lookup(value, key) {
            return found;
        }
        if let Value::Drop(drop) = value {
            if let Some(name) = key.scalar_text() {
                if drop.contains_key(&name, self) {
                    return drop.resolve(&name, self).unwrap_or_default();
                }
            }
        }
        Value::Nil
    }

    /// Entries of `map` as iteration items.
    ///
    /// Before Liquid 2.2 each entry is a [`LegacyKeyValueDrop`]; from 2.2 on it
    /// is a `[key, value]` pair.
    pub fn map_entries(&self, map: &Object) -> Vec<Value> {
        map.iter()
            .map(|(key, value)| {
                if self.syntax < SyntaxCompatibility::Liquid22 {
                    Value::drop(LegacyKeyValueDrop::new(key.clone(), value.clone()))
                } else {
                    Value::Array(vec![Value::string(key.clone()), value.clone()])
                }
            })
            .collect()
    }
}

impl Context for RenderContext {
    fn get_variable(&self, name: &str) -> Option<Value> {
        self.resolve(name).ok().filter(|v| !v.is_nil())
    }

    fn set_variable(&mut self, name: &str, value: Value) {
        self.set(name, value);
    }

    fn naming(&self) -> NamingConvention {
        self.naming
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Nil => Value::Nil,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::String(s) => Value::string(s.clone()),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn range_bound(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn count(len: usize) -> Value {
    Value::Int(i64::try_from(len).unwrap_or(i64::MAX))
}

fn container_lookup(value: &Value, key: &Value) -> Option<Value> {
    match (value, key) {
        (Value::Array(items), Value::Int(i)) => {
            let index = if *i < 0 {
                usize::try_from(i.unsigned_abs())
                    .ok()
                    .and_then(|back| items.len().checked_sub(back))
            } else {
                usize::try_from(*i).ok()
            };
            Some(index.and_then(|n| items.get(n)).cloned().unwrap_or_default())
        }
        (Value::Array(items), Value::String(command)) => match command.as_str() {
            "size" => Some(count(items.len())),
            "first" => Some(items.first().cloned().unwrap_or_default()),
            "last" => Some(items.last().cloned().unwrap_or_default()),
            _ => None,
        },
        (Value::Object(map), key) => {
            let name = key.scalar_text()?;
            match map.get(&name) {
                Some(found) => Some(found.clone()),
                None if name == "size" => Some(count(map.len())),
                None => None,
            }
        }
        (Value::String(s), Value::String(command)) => match command.as_str() {
            "size" => Some(count(s.chars().count())),
            "first" => Some(s.chars().next().map(Value::from).unwrap_or_default()),
            "last" => Some(s.chars().last().map(Value::from).unwrap_or_default()),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context() -> RenderContext {
        let mut ctx = RenderContext::with_naming(NamingConvention::Ruby);
        ctx.set("items", Value::array([10, 20, 30]));
        ctx.set(
            "user",
            Value::object([
                ("name", Value::string("Ann")),
                ("tags", Value::array(["a", "b"])),
            ]),
        );
        ctx.set("key", "name");
        ctx
    }

    #[test]
    fn test_literals() {
        let ctx = context();
        assert_eq!(ctx.resolve("nil").unwrap(), Value::Nil);
        assert_eq!(ctx.resolve("5.00").unwrap(), Value::Float(5.0));
        assert_eq!(ctx.resolve("'bob'").unwrap(), Value::string("bob"));
        assert_eq!(ctx.resolve("(1..3)").unwrap(), Value::array([1, 2, 3]));
    }

    #[test]
    fn test_paths() {
        let ctx = context();
        assert_eq!(ctx.resolve("items[1]").unwrap(), Value::Int(20));
        assert_eq!(ctx.resolve("items[-1]").unwrap(), Value::Int(30));
        assert_eq!(ctx.resolve("items[9]").unwrap(), Value::Nil);
        assert_eq!(ctx.resolve("items.size").unwrap(), Value::Int(3));
        assert_eq!(ctx.resolve("items.first").unwrap(), Value::Int(10));
        assert_eq!(ctx.resolve("user.name").unwrap(), Value::string("Ann"));
        assert_eq!(ctx.resolve("user[key]").unwrap(), Value::string("Ann"));
        assert_eq!(ctx.resolve("user.tags.last").unwrap(), Value::string("b"));
        assert_eq!(ctx.resolve("user.name.size").unwrap(), Value::Int(3));
        assert_eq!(ctx.resolve("user.size").unwrap(), Value::Int(2));
        assert_eq!(ctx.resolve("missing.deeper").unwrap(), Value::Nil);
    }

    #[test]
    fn test_syntax_error() {
        let ctx = context();
        assert!(matches!(ctx.resolve("items["), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_oversized_range_is_rejected() {
        let ctx = context();
        assert!(matches!(
            ctx.resolve("(1..5000000)"),
            Err(Error::Syntax { .. })
        ));
        assert!(matches!(
            ctx.resolve("(1..9223372036854775807)"),
            Err(Error::Syntax { .. })
        ));
        match ctx.resolve("(1..100000)").unwrap() {
            Value::Array(items) => assert_eq!(items.len(), MAX_RANGE_LEN),
            other => panic!("expected array, got {other}"),
        }
        assert_eq!(ctx.resolve("(5..1)").unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn test_scopes() {
        let mut ctx = context();
        ctx.scoped(|inner| {
            inner.set("items", "shadowed");
            assert_eq!(inner.get("items"), Some(&Value::string("shadowed")));
            inner.set_global("total", 1);
        });
        assert_eq!(ctx.get("items"), Some(&Value::array([10, 20, 30])));
        assert_eq!(ctx.get("total"), Some(&Value::Int(1)));
        assert_eq!(ctx.pop_scope(), None);
    }

    #[test]
    fn test_map_entries_by_syntax() {
        let map: Object = [("bob".to_string(), Value::string("4"))].into_iter().collect();

        let legacy = RenderContext::with_naming(NamingConvention::Ruby);
        let entries = legacy.map_entries(&map);
        assert!(entries[0].downcast_drop::<LegacyKeyValueDrop>().is_some());

        let modern = legacy.clone().with_syntax(SyntaxCompatibility::Liquid22);
        assert_eq!(
            modern.map_entries(&map),
            vec![Value::array([Value::string("bob"), Value::string("4")])]
        );
    }

    #[test]
    fn test_get_variable_resolves_paths() {
        let ctx = context();
        assert_eq!(ctx.get_variable("user.name"), Some(Value::string("Ann")));
        assert_eq!(ctx.get_variable("nothing"), None);
    }

    #[test]
    fn test_syntax_from_str() {
        assert_eq!("Liquid22a".parse::<SyntaxCompatibility>(), Ok(SyntaxCompatibility::Liquid22a));
        assert_eq!("2.1".parse::<SyntaxCompatibility>(), Ok(SyntaxCompatibility::Liquid21));
        assert!("3.0".parse::<SyntaxCompatibility>().is_err());
    }
}
