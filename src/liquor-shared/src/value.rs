//! Value types for template evaluation
//!
//! This module provides the core Value enum that represents every value a
//! template can see: literals, containers built by the host application and
//! duck-typed drops.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde_json::{Number as JsonNumber, Value as JsonValue};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::drop::{DropMembers, LiquidDrop, TypedDrop};

/// Ordered map used for object values
pub type Object = IndexMap<String, Value>;

/// A value visible to templates
#[derive(Clone, Default)]
pub enum Value {
    /// Nil, also used for undefined variables
    #[default]
    Nil,
    /// Boolean value
    Bool(bool),
    /// Integer value (i64)
    Int(i64),
    /// Float value (f64)
    Float(f64),
    /// Single character
    Char(char),
    /// String value
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Object (key-value pairs, insertion ordered)
    Object(Object),
    /// Duck-typed object exposing computed members
    Drop(Arc<dyn LiquidDrop>),
}

impl Value {
    /// Create a new nil value
    #[must_use]
    pub fn nil() -> Self {
        Value::Nil
    }

    /// Create a new string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create a new array value
    pub fn array(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Create a new object value from key-value pairs
    pub fn object<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Wrap an existing drop
    pub fn drop(drop: impl LiquidDrop + 'static) -> Self {
        Value::Drop(Arc::new(drop))
    }

    /// Wrap a type that declares its members through [`DropMembers`]
    pub fn typed_drop<T: DropMembers>(inner: T) -> Self {
        Value::Drop(Arc::new(TypedDrop::new(inner)))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Float(fl) => f.debug_tuple("Float").field(fl).finish(),
            Value::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Array(arr) => f.debug_tuple("Array").field(arr).finish(),
            Value::Object(obj) => f.debug_tuple("Object").field(obj).finish(),
            Value::Drop(d) => f.debug_tuple("Drop").field(d).finish(),
        }
    }
}

impl Value {
    /// Check if value is nil
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Check if value is an integer or a float
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric view of integers and floats
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String slice view of string values
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the concrete type behind a drop value
    #[must_use]
    pub fn downcast_drop<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Drop(d) => d.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Get the type name of this value
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Drop(_) => "drop",
        }
    }

    /// Liquid truthiness: only nil and false are falsy
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Scalar text form, as used when a scalar is compared against a string
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(format_float(*f)),
            Value::Char(c) => Some(c.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Nil => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::Number(JsonNumber::from(*i)),
            Value::Float(f) => JsonNumber::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Char(c) => JsonValue::String(c.to_string()),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Array(arr) => JsonValue::Array(arr.iter().map(Value::to_json).collect()),
            Value::Object(obj) => JsonValue::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Drop(d) => d
                .to_liquid_string()
                .map(JsonValue::String)
                .unwrap_or(JsonValue::Null),
        }
    }

    /// Convert from JSON value
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Nil,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Nil
                }
            }
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(arr) => Value::Array(arr.into_iter().map(Value::from_json).collect()),
            JsonValue::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

/// Render a float the way templates print it: integral values keep one decimal
pub(crate) fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Drop(a), Value::Drop(b)) => {
                Arc::ptr_eq(a, b) || a.equals(other).unwrap_or(false)
            }
            // Cross-type numeric comparisons
            (Value::Int(a), Value::Float(b)) => *a as f64 == *b,
            (Value::Float(a), Value::Int(b)) => *a == *b as f64,
            _ => false,
        }
    }
}

/// Liquid output form: nil renders empty, arrays concatenate their items
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(fl) => write!(f, "{}", format_float(*fl)),
            Value::Char(c) => write!(f, "{c}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Array(arr) => {
                for item in arr {
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Object(obj) => {
                write!(f, "{{")?;
                for (i, (key, value)) in obj.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{key}\"=>{value:?}")?;
                }
                write!(f, "}}")
            }
            Value::Drop(d) => match d.to_liquid_string() {
                Some(s) => write!(f, "{s}"),
                None => write!(f, "{d:?}"),
            },
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Nil => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Char(c) => serializer.serialize_char(*c),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for item in arr {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Drop(d) => match d.to_liquid_string() {
                Some(s) => serializer.serialize_str(&s),
                None => serializer.serialize_none(),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u8> for Value {
    fn from(i: u8) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}
