//! Standard filters
//!
//! A small provider linked into every strainer. Full filter libraries live
//! with the embedding application.

use liquor_shared::{operation_error, Value};

use crate::descriptor::{FilterDescriptor, ParamType};
use crate::global::{FilterProvider, ProviderRegistration};

/// Provider of the standard filters
#[derive(Debug)]
pub struct StandardFilters;

impl FilterProvider for StandardFilters {
    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::builder("size")
                .param("input", ParamType::Any)
                .build(|args| Ok(size(args.input()))),
            FilterDescriptor::builder("upcase")
                .param("input", ParamType::String)
                .build(|args| Ok(map_text(args.input(), str::to_uppercase))),
            FilterDescriptor::builder("downcase")
                .param("input", ParamType::String)
                .build(|args| Ok(map_text(args.input(), str::to_lowercase))),
            FilterDescriptor::builder("append")
                .param("input", ParamType::String)
                .param("suffix", ParamType::String)
                .build(|args| {
                    Ok(Value::String(format!("{}{}", args.get(0), args.get(1))))
                }),
            FilterDescriptor::builder("default")
                .param("input", ParamType::Any)
                .param("fallback", ParamType::Any)
                .build(|args| {
                    let input = args.input();
                    if is_blank(input) {
                        Ok(args.get(1).clone())
                    } else {
                        Ok(input.clone())
                    }
                }),
            FilterDescriptor::builder("plus")
                .param("input", ParamType::Any)
                .param("operand", ParamType::Any)
                .build(|args| plus(args.get(0), args.get(1))),
            FilterDescriptor::builder("divided_by")
                .param("input", ParamType::Any)
                .param("operand", ParamType::Any)
                .build(|args| divided_by(args.get(0), args.get(1))),
            FilterDescriptor::builder("truncate")
                .param("input", ParamType::String)
                .param_default("length", ParamType::Int32, 50)
                .named("ellipsis", ParamType::String, "...")
                .build(|args| {
                    let length = match args.get(1) {
                        Value::Int(n) => usize::try_from(*n).unwrap_or(0),
                        _ => 50,
                    };
                    Ok(truncate(args.input(), length, &args.named("ellipsis").to_string()))
                }),
            FilterDescriptor::builder("lookup")
                .with_context()
                .param("input", ParamType::Any)
                .param("name", ParamType::String)
                .build(|args| {
                    let name = args.get(1).to_string();
                    Ok(args
                        .context()
                        .and_then(|ctx| ctx.get_variable(&name))
                        .unwrap_or_default())
                }),
        ]
    }
}

inventory::submit! {
    ProviderRegistration {
        name: "StandardFilters",
        filters: <StandardFilters as FilterProvider>::filters,
    }
}

fn size(input: &Value) -> Value {
    let len = match input {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    };
    Value::Int(i64::try_from(len).unwrap_or(i64::MAX))
}

fn map_text(input: &Value, f: impl Fn(&str) -> String) -> Value {
    match input {
        Value::String(s) => Value::String(f(s)),
        other => other.clone(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        other => !other.is_truthy(),
    }
}

enum Number {
    Int(i64),
    Float(f64),
}

fn to_number(value: &Value) -> anyhow::Result<Number> {
    match value {
        Value::Nil => Ok(Number::Int(0)),
        Value::Int(i) => Ok(Number::Int(*i)),
        Value::Float(f) => Ok(Number::Float(*f)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Ok(Number::Int(i))
            } else {
                s.parse::<f64>()
                    .map(Number::Float)
                    .map_err(|_| operation_error(format!("'{s}' is not a number")))
            }
        }
        other => Err(operation_error(format!(
            "{} is not a number",
            other.type_name()
        ))),
    }
}

#[allow(clippy::cast_precision_loss)]
fn as_float(n: &Number) -> f64 {
    match n {
        Number::Int(i) => *i as f64,
        Number::Float(f) => *f,
    }
}

fn plus(left: &Value, right: &Value) -> anyhow::Result<Value> {
    let (a, b) = (to_number(left)?, to_number(right)?);
    if let (Number::Int(x), Number::Int(y)) = (&a, &b) {
        if let Some(sum) = x.checked_add(*y) {
            return Ok(Value::Int(sum));
        }
    }
    Ok(Value::Float(as_float(&a) + as_float(&b)))
}

fn divided_by(left: &Value, right: &Value) -> anyhow::Result<Value> {
    let (a, b) = (to_number(left)?, to_number(right)?);
    match (&a, &b) {
        (_, Number::Int(0)) => Err(operation_error("divided by 0")),
        (Number::Int(x), Number::Int(y)) => Ok(x
            .checked_div_euclid(*y)
            .map_or_else(|| Value::Float(as_float(&a) / as_float(&b)), Value::Int)),
        _ => Ok(Value::Float(as_float(&a) / as_float(&b))),
    }
}

fn truncate(input: &Value, length: usize, ellipsis: &str) -> Value {
    let Value::String(text) = input else {
        return input.clone();
    };
    if text.chars().count() <= length {
        return input.clone();
    }
    let keep = length.saturating_sub(ellipsis.chars().count());
    Value::String(text.chars().take(keep).collect::<String>() + ellipsis)
}
