//! Operation utilities
//!
//! Equality and ordering rules shared by the built-in operators and by filter
//! bodies.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::value::Value;

/// Liquid equality.
///
/// A drop's own equality contract is consulted first on the left operand, then
/// on the right one. Numbers compare by value regardless of integer/float
/// representation, strings compare by exact characters, and a char equals a
/// one-character string holding it. Values of unrelated kinds are never equal.
pub fn liquid_equals(left: &Value, right: &Value) -> bool {
    if let Value::Drop(d) = left {
        if let Some(eq) = d.equals(right) {
            return eq;
        }
    }
    if let Value::Drop(d) = right {
        if let Some(eq) = d.equals(left) {
            return eq;
        }
    }

    match (left, right) {
        (Value::Nil, Value::Nil) => true,
        (Value::Int(a), Value::Int(b)) => a == b,
        (a, b) if a.is_number() && b.is_number() => a.as_f64() == b.as_f64(),
        (Value::Char(c), Value::String(s)) | (Value::String(s), Value::Char(c)) => {
            single_char(s) == Some(*c)
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| liquid_equals(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(k, v)| b.get(k).is_some_and(|other| liquid_equals(v, other)))
        }
        (Value::Drop(a), Value::Drop(b)) => Arc::ptr_eq(a, b),
        (Value::Drop(_), _) | (_, Value::Drop(_)) => false,
        _ => left == right,
    }
}

/// Equality used when matching the first or last element of a sequence.
///
/// Besides [`liquid_equals`], a string operand matches a scalar element whose
/// text form is exactly that string.
pub fn loose_element_equals(element: &Value, operand: &Value) -> bool {
    if liquid_equals(element, operand) {
        return true;
    }
    match operand {
        Value::String(s) => element.scalar_text().is_some_and(|text| &text == s),
        _ => false,
    }
}

/// Compare two values for ordering.
///
/// Numbers order numerically and strings ordinally; any other pairing has no
/// order.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (x, y) if x.is_number() && y.is_number() => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
