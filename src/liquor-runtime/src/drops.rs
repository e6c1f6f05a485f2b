//! Drops provided by the runtime

use std::any::Any;

use liquor_shared::{Context, LiquidDrop, Value};

/// One map entry exposed as a drop.
///
/// `Key`, `itemName` and `0` answer the entry key; `Value` and `1` answer the
/// entry value. When the value is itself a map, its own keys stay reachable
/// through the drop.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyKeyValueDrop {
    key: String,
    value: Value,
}

impl LegacyKeyValueDrop {
    /// Wrap an entry
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Entry key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Entry value
    pub fn value(&self) -> &Value {
        &self.value
    }

    fn entry(&self, name: &str) -> Option<&Value> {
        match &self.value {
            Value::Object(map) => map.get(name),
            _ => None,
        }
    }
}

fn is_position(name: &str, position: i64) -> bool {
    name.trim().parse::<i64>() == Ok(position)
}

fn is_key_member(name: &str) -> bool {
    is_position(name, 0) || name == "Key" || name == "itemName"
}

fn is_value_member(name: &str) -> bool {
    is_position(name, 1) || name == "Value"
}

impl LiquidDrop for LegacyKeyValueDrop {
    fn contains_key(&self, name: &str, _context: &dyn Context) -> bool {
        is_key_member(name) || is_value_member(name) || self.entry(name).is_some()
    }

    fn resolve(&self, name: &str, _context: &dyn Context) -> Option<Value> {
        if is_key_member(name) {
            Some(Value::string(self.key.clone()))
        } else if is_value_member(name) {
            Some(self.value.clone())
        } else {
            self.entry(name).cloned()
        }
    }

    fn to_liquid_string(&self) -> Option<String> {
        Some(format!("{}{}", self.key, self.value))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
