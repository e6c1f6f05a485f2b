//! Core traits shared by operators, filters and drops
//!
//! The render context itself lives in the runtime crate; filters and drops only
//! see it through the [`Context`] trait so they can be defined without a
//! dependency on the runtime.

use crate::naming::NamingConvention;
use crate::value::{Object, Value};
use std::any::Any;

/// Render context as seen by filters and drops
pub trait Context {
    /// Get a variable value by name
    fn get_variable(&self, name: &str) -> Option<Value>;

    /// Set a variable value
    fn set_variable(&mut self, name: &str, value: Value);

    /// Naming convention active for this render
    fn naming(&self) -> NamingConvention;

    /// Downcast to Any for concrete type checking
    fn as_any(&self) -> &dyn Any;
}

/// Simple context implementation holding a single flat scope
#[derive(Debug, Clone, Default)]
pub struct SimpleContext {
    /// Naming convention used for member lookups
    pub naming: NamingConvention,
    /// Variables visible to lookups
    pub variables: Object,
}

impl SimpleContext {
    /// Create an empty context using `naming`
    pub fn new(naming: NamingConvention) -> Self {
        Self {
            naming,
            variables: Object::new(),
        }
    }
}

impl Context for SimpleContext {
    fn get_variable(&self, name: &str) -> Option<Value> {
        self.variables.get(name).cloned()
    }

    fn set_variable(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    fn naming(&self) -> NamingConvention {
        self.naming
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
