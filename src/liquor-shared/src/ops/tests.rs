//! Tests for operations

use super::*;
use crate::drop::LiquidDrop;
use crate::naming::NamingConvention;
use crate::value::Value;
use proptest::prelude::*;
use std::any::Any;
use std::cmp::Ordering;

#[derive(Debug)]
struct AlwaysEqual;

impl LiquidDrop for AlwaysEqual {
    fn contains_key(&self, _name: &str, _context: &dyn Context) -> bool {
        false
    }

    fn resolve(&self, _name: &str, _context: &dyn Context) -> Option<Value> {
        None
    }

    fn equals(&self, _other: &Value) -> Option<bool> {
        Some(true)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct Opaque;

impl LiquidDrop for Opaque {
    fn contains_key(&self, _name: &str, _context: &dyn Context) -> bool {
        false
    }

    fn resolve(&self, _name: &str, _context: &dyn Context) -> Option<Value> {
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_nil_equality() {
    assert!(liquid_equals(&Value::Nil, &Value::Nil));
    assert!(!liquid_equals(&Value::Nil, &Value::Bool(false)));
    assert!(!liquid_equals(&Value::string(""), &Value::Nil));
}

#[test]
fn test_numeric_equality_across_representations() {
    assert!(liquid_equals(&Value::Int(5), &Value::Float(5.0)));
    assert!(liquid_equals(&Value::Float(1.0), &Value::Int(1)));
    assert!(!liquid_equals(&Value::Int(5), &Value::Float(5.5)));
}

#[test]
fn test_string_and_char_equality() {
    assert!(liquid_equals(&Value::Char('A'), &Value::string("A")));
    assert!(!liquid_equals(&Value::Char('A'), &Value::string("AB")));
    assert!(!liquid_equals(&Value::string("a"), &Value::string("A")));
}

#[test]
fn test_different_kinds_are_unequal() {
    assert!(!liquid_equals(&Value::Bool(true), &Value::string("true")));
    assert!(!liquid_equals(&Value::Int(1), &Value::string("1")));
}

#[test]
fn test_drop_equality_contract() {
    let drop = Value::drop(AlwaysEqual);
    assert!(liquid_equals(&drop, &Value::Int(3)));
    assert!(liquid_equals(&Value::string("x"), &drop));

    let opaque = Value::drop(Opaque);
    assert!(liquid_equals(&opaque, &opaque.clone()));
    assert!(!liquid_equals(&opaque, &Value::drop(Opaque)));
    assert!(!liquid_equals(&opaque, &Value::Nil));
}

#[test]
fn test_container_equality() {
    let a = Value::array([1, 2]);
    assert!(liquid_equals(&a, &Value::array([Value::Int(1), Value::Float(2.0)])));
    assert!(!liquid_equals(&a, &Value::array([1])));

    let obj = Value::object([("k", 1)]);
    assert!(liquid_equals(&obj, &Value::object([("k", 1.0)])));
    assert!(!liquid_equals(&obj, &Value::object([("j", 1)])));
}

#[test]
fn test_loose_element_equality() {
    assert!(loose_element_equals(&Value::Bool(true), &Value::string("true")));
    assert!(loose_element_equals(&Value::Float(1.0), &Value::string("1.0")));
    assert!(!loose_element_equals(&Value::Bool(true), &Value::Int(1)));
    assert!(!loose_element_equals(&Value::array([1]), &Value::string("1")));
}

#[test]
fn test_compare_values() {
    assert_eq!(
        compare_values(&Value::Int(1), &Value::Float(1.5)),
        Some(Ordering::Less)
    );
    assert_eq!(
        compare_values(&Value::string("b"), &Value::string("a")),
        Some(Ordering::Greater)
    );
    assert_eq!(compare_values(&Value::string("1"), &Value::Int(1)), None);
    assert_eq!(compare_values(&Value::Nil, &Value::Nil), None);
}

#[test]
fn test_simple_context_variables() {
    let mut ctx = SimpleContext::new(NamingConvention::CSharp);
    assert_eq!(ctx.naming(), NamingConvention::CSharp);
    assert_eq!(ctx.get_variable("x"), None);
    ctx.set_variable("x", Value::Int(2));
    assert_eq!(ctx.get_variable("x"), Some(Value::Int(2)));
    assert!(ctx.as_any().downcast_ref::<SimpleContext>().is_some());
}

proptest! {
    #[test]
    fn prop_int_equals_its_float(n in -1_000_000i64..1_000_000) {
        prop_assert!(liquid_equals(&Value::Int(n), &Value::Float(n as f64)));
        prop_assert!(liquid_equals(&Value::Float(n as f64), &Value::Int(n)));
    }

    #[test]
    fn prop_equality_is_symmetric(a in -50i64..50, b in -50i64..50) {
        prop_assert_eq!(
            liquid_equals(&Value::Int(a), &Value::Int(b)),
            liquid_equals(&Value::Int(b), &Value::Int(a))
        );
    }
}
