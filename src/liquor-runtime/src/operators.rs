//! Operator registry
//!
//! Operators are named binary predicates kept in one process-wide table. The
//! built-ins are installed on first use and can be restored with
//! [`reset_operators`]. Custom operators registered by the embedding
//! application are looked up with the same naming rules as the built-ins.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::sync::{Arc, PoisonError, RwLock};

use liquor_shared::ops::{compare_values, liquid_equals, loose_element_equals};
use liquor_shared::{Context, Error, NamingConvention, Result, Value};

/// A registered operator
pub type OperatorFn = Arc<dyn Fn(&Value, &Value, &dyn Context) -> bool + Send + Sync>;

static OPERATORS: Lazy<RwLock<IndexMap<String, OperatorFn>>> =
    Lazy::new(|| RwLock::new(builtin_operators()));

fn builtin(f: fn(&Value, &Value, &dyn Context) -> bool) -> OperatorFn {
    Arc::new(f)
}

fn builtin_operators() -> IndexMap<String, OperatorFn> {
    let table: [(&str, OperatorFn); 16] = [
        ("==", builtin(|l, r, _| liquid_equals(l, r))),
        ("!=", builtin(|l, r, _| !liquid_equals(l, r))),
        ("<>", builtin(|l, r, _| !liquid_equals(l, r))),
        ("<", builtin(|l, r, _| ordered(l, r, Ordering::is_lt))),
        (">", builtin(|l, r, _| ordered(l, r, Ordering::is_gt))),
        ("<=", builtin(|l, r, _| ordered(l, r, Ordering::is_le))),
        (">=", builtin(|l, r, _| ordered(l, r, Ordering::is_ge))),
        ("contains", builtin(contains)),
        ("startsWith", builtin(starts_with)),
        ("startswith", builtin(starts_with)),
        ("endsWith", builtin(ends_with)),
        ("endswith", builtin(ends_with)),
        ("hasKey", builtin(has_key)),
        ("haskey", builtin(has_key)),
        ("hasValue", builtin(has_value)),
        ("hasvalue", builtin(has_value)),
    ];
    table
        .into_iter()
        .map(|(name, f)| (name.to_string(), f))
        .collect()
}

/// Register `predicate` as operator `name`, replacing any operator of that name
pub fn register_operator<F>(name: impl Into<String>, predicate: F)
where
    F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
{
    let name = name.into();
    log::debug!("registered operator {name}");
    OPERATORS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(
            name,
            Arc::new(move |l: &Value, r: &Value, _: &dyn Context| predicate(l, r)),
        );
}

/// Register an operator whose predicate also sees the render context
pub fn register_context_operator<F>(name: impl Into<String>, predicate: F)
where
    F: Fn(&Value, &Value, &dyn Context) -> bool + Send + Sync + 'static,
{
    let name = name.into();
    log::debug!("registered operator {name}");
    OPERATORS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, Arc::new(predicate));
}

/// Remove operator `name`; returns whether it existed
pub fn unregister_operator(name: &str) -> bool {
    OPERATORS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .shift_remove(name)
        .is_some()
}

/// Drop every custom operator and restore the built-ins
pub fn reset_operators() {
    *OPERATORS.write().unwrap_or_else(PoisonError::into_inner) = builtin_operators();
    log::debug!("operators reset to built-ins");
}

/// Registered operator names in registration order
pub fn operator_names() -> Vec<String> {
    OPERATORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect()
}

/// Find the operator a template token refers to.
///
/// An exact name wins; otherwise the first registered name the token matches
/// under `naming`.
pub fn find_operator(token: &str, naming: NamingConvention) -> Option<OperatorFn> {
    let operators = OPERATORS.read().unwrap_or_else(PoisonError::into_inner);
    if let Some(exact) = operators.get(token) {
        return Some(exact.clone());
    }
    operators
        .iter()
        .find(|(name, _)| naming.operator_matches(token, name))
        .map(|(name, op)| {
            log::trace!("operator token {token} matched {name}");
            op.clone()
        })
}

/// Apply operator `token` to two resolved operands
pub fn apply_operator(token: &str, left: &Value, right: &Value, context: &dyn Context) -> Result<bool> {
    let op = find_operator(token, context.naming())
        .ok_or_else(|| Error::UnknownOperator(token.to_string()))?;
    Ok(op(left, right, context))
}

fn ordered(left: &Value, right: &Value, accept: fn(Ordering) -> bool) -> bool {
    compare_values(left, right).is_some_and(accept)
}

fn operand_text(value: &Value) -> Option<String> {
    match value {
        Value::Drop(d) => d.to_liquid_string(),
        other => other.scalar_text(),
    }
}

fn contains(left: &Value, right: &Value, context: &dyn Context) -> bool {
    if left.is_nil() || right.is_nil() {
        return false;
    }
    match left {
        Value::String(s) => operand_text(right).is_some_and(|needle| s.contains(&needle)),
        Value::Array(items) => items.iter().any(|item| liquid_equals(item, right)),
        Value::Object(_) | Value::Drop(_) => has_key(left, right, context),
        _ => false,
    }
}

fn starts_with(left: &Value, right: &Value, _context: &dyn Context) -> bool {
    if left.is_nil() || right.is_nil() {
        return false;
    }
    match left {
        Value::String(s) => operand_text(right).is_some_and(|prefix| s.starts_with(&prefix)),
        Value::Array(items) => items
            .first()
            .is_some_and(|first| loose_element_equals(first, right)),
        _ => false,
    }
}

fn ends_with(left: &Value, right: &Value, _context: &dyn Context) -> bool {
    if left.is_nil() || right.is_nil() {
        return false;
    }
    match left {
        Value::String(s) => operand_text(right).is_some_and(|suffix| s.ends_with(&suffix)),
        Value::Array(items) => items
            .last()
            .is_some_and(|last| loose_element_equals(last, right)),
        _ => false,
    }
}

fn has_key(left: &Value, right: &Value, context: &dyn Context) -> bool {
    let Some(key) = right.scalar_text() else {
        return false;
    };
    match left {
        Value::Object(map) => map.contains_key(&key),
        Value::Drop(drop) => drop.contains_key(&key, context),
        _ => false,
    }
}

fn has_value(left: &Value, right: &Value, _context: &dyn Context) -> bool {
    match left {
        Value::Object(map) => map.values().any(|v| liquid_equals(v, right)),
        _ => false,
    }
}
