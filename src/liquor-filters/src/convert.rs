//! Argument conversion
//!
//! Converts a bound argument to the declared parameter type when the runtime
//! value differs but is a convertible scalar. Narrowing conversions succeed
//! only when the value is representable in the target type.

use liquor_shared::Value;

use crate::descriptor::ParamType;

/// Convert `value` to `ty`, or `None` when it cannot be represented.
///
/// Nil always passes through unchanged.
pub fn coerce(value: Value, ty: ParamType) -> Option<Value> {
    try_coerce(value, ty).ok()
}

/// Like [`coerce`], handing the value back on failure
pub fn try_coerce(value: Value, ty: ParamType) -> Result<Value, Value> {
    if value.is_nil() {
        return Ok(value);
    }
    match ty {
        ParamType::Any => Ok(value),
        ParamType::Bool => to_bool(&value).map(Value::Bool).ok_or(value),
        ParamType::Int32 => to_i64(&value)
            .filter(|i| i32::try_from(*i).is_ok())
            .map(Value::Int)
            .ok_or(value),
        ParamType::Int64 => to_i64(&value).map(Value::Int).ok_or(value),
        ParamType::Float => to_f64(&value).map(Value::Float).ok_or(value),
        ParamType::Char => to_char(&value).map(Value::Char).ok_or(value),
        ParamType::String => match value {
            Value::String(_) => Ok(value),
            other => other.scalar_text().map(Value::String).ok_or(other),
        },
        ParamType::Array if matches!(value, Value::Array(_)) => Ok(value),
        ParamType::Object if matches!(value, Value::Object(_)) => Ok(value),
        ParamType::Array | ParamType::Object => Err(value),
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Int(i) => Some(*i != 0),
        Value::Float(f) => Some(*f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) => float_to_i64(*f),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Char(c) => Some(i64::from(u32::from(*c))),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Round half to even, then range-check
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_i64(f: f64) -> Option<i64> {
    let rounded = f.round_ties_even();
    (rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64)
        .then_some(rounded as i64)
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn to_char(value: &Value) -> Option<char> {
    match value {
        Value::Char(c) => Some(*c),
        Value::Int(i) => u32::try_from(*i).ok().and_then(char::from_u32),
        Value::String(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
        _ => None,
    }
}
