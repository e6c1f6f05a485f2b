//! Integration tests for filter registration and dispatch

use liquor_filters::{
    register_filter_function, register_filter_provider, reset_filters, unregister_filter_function,
    FilterDescriptor, FilterProvider, ParamType, Strainer,
};
use liquor_shared::{operation_error, Context, Error, NamingConvention, Object, SimpleContext, Value};
use pretty_assertions::assert_eq;
use serial_test::serial;

fn no_named() -> Object {
    Object::new()
}

fn named(pairs: &[(&str, Value)]) -> Object {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn divisible_by() -> FilterDescriptor {
    FilterDescriptor::builder("DivisibleBy")
        .param("a", ParamType::Int64)
        .param("b", ParamType::Int64)
        .build(|args| match (args.get(0), args.get(1)) {
            (Value::Int(a), Value::Int(b)) if *b != 0 => Ok(Value::Bool(a % b == 0)),
            _ => Err(operation_error("DivisibleBy needs two non-zero integers")),
        })
}

struct Overloads;

impl FilterProvider for Overloads {
    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::builder("pick")
                .param("input", ParamType::Any)
                .build(|_| Ok(Value::string("one"))),
            FilterDescriptor::builder("pick")
                .param("input", ParamType::Any)
                .param("second", ParamType::Any)
                .build(|_| Ok(Value::string("two"))),
            FilterDescriptor::builder("pick")
                .param("input", ParamType::Any)
                .param_default("second", ParamType::Any, 0)
                .param_default("third", ParamType::Any, 0)
                .build(|_| Ok(Value::string("three"))),
        ]
    }
}

struct ReplacementPick;

impl FilterProvider for ReplacementPick {
    fn filters() -> Vec<FilterDescriptor> {
        vec![FilterDescriptor::builder("pick")
            .param("input", ParamType::Any)
            .build(|_| Ok(Value::string("replaced")))]
    }
}

#[test]
fn test_standard_filters_are_linked_in() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let strainer = Strainer::create(&ctx);
    assert!(strainer.respond_to("upcase"));
    assert!(strainer.respond_to("divided_by"));
    assert_eq!(
        strainer
            .invoke("upcase", vec![Value::string("abc")], &no_named())
            .unwrap(),
        Value::string("ABC")
    );
}

#[test]
fn test_divided_by_handles_integer_overflow() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let strainer = Strainer::create(&ctx);
    let out = strainer
        .invoke(
            "divided_by",
            vec![Value::Int(i64::MIN), Value::Int(-1)],
            &no_named(),
        )
        .unwrap();
    assert!(matches!(out, Value::Float(f) if f > 0.0));
}

#[test]
fn test_ruby_lookup_accepts_camel_case() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let strainer = Strainer::create(&ctx);
    let out = strainer
        .invoke("dividedBy", vec![Value::Int(10), Value::Int(4)], &no_named())
        .unwrap();
    assert_eq!(out, Value::Int(2));
}

#[test]
fn test_unknown_filter() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let strainer = Strainer::create(&ctx);
    let err = strainer
        .invoke("does_not_exist", vec![], &no_named())
        .unwrap_err();
    assert!(matches!(err, Error::UnknownFilter(ref name) if name == "does_not_exist"));
}

#[test]
#[serial(filters)]
fn test_csharp_function_lookup() {
    reset_filters();
    register_filter_function("DivisibleBy", divisible_by());

    let ctx = SimpleContext::new(NamingConvention::CSharp);
    let strainer = Strainer::create(&ctx);
    let args = || vec![Value::Int(16), Value::Int(4)];
    assert_eq!(
        strainer.invoke("DivisibleBy", args(), &no_named()).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        strainer.invoke("divisibleby", args(), &no_named()).unwrap(),
        Value::Bool(true)
    );
    assert!(matches!(
        strainer.invoke("divisible_by", args(), &no_named()),
        Err(Error::UnknownFilter(_))
    ));

    assert!(unregister_filter_function("DivisibleBy"));
    reset_filters();
}

#[test]
#[serial(filters)]
fn test_ruby_function_lookup() {
    reset_filters();
    register_filter_function("DivisibleBy", divisible_by());

    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let strainer = Strainer::create(&ctx);
    let args = vec![Value::Int(16), Value::Int(5)];
    assert_eq!(
        strainer.invoke("divisible_by", args, &no_named()).unwrap(),
        Value::Bool(false)
    );
    assert!(!strainer.respond_to("divisibleby"));
    reset_filters();
}

#[test]
#[serial(filters)]
fn test_function_reregistered_under_other_spelling_replaces() {
    reset_filters();
    let labelled = |label: &'static str| {
        FilterDescriptor::builder("DivisibleBy")
            .param("a", ParamType::Int64)
            .param("b", ParamType::Int64)
            .build(move |_| Ok(Value::string(label)))
    };
    register_filter_function("DivisibleBy", labelled("first"));
    register_filter_function("divisible_by", labelled("second"));

    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let strainer = Strainer::create(&ctx);
    let out = strainer
        .invoke("divisible_by", vec![Value::Int(4), Value::Int(2)], &no_named())
        .unwrap();
    assert_eq!(out, Value::string("second"));
    assert_eq!(
        strainer
            .descriptors()
            .filter(|d| d.name() == "DivisibleBy")
            .count(),
        1
    );

    assert!(unregister_filter_function("DivisibleBy"));
    assert!(!Strainer::create(&ctx).respond_to("divisible_by"));
    reset_filters();
}

#[test]
fn test_exact_arity_is_preferred() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let mut strainer = Strainer::new(&ctx);
    strainer.extend_provider::<Overloads>();

    let one = strainer
        .invoke("pick", vec![Value::Int(1)], &no_named())
        .unwrap();
    assert_eq!(one, Value::string("one"));
    let two = strainer
        .invoke("pick", vec![Value::Int(1), Value::Int(2)], &no_named())
        .unwrap();
    assert_eq!(two, Value::string("two"));
}

#[test]
fn test_fallback_uses_widest_overload() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let mut strainer = Strainer::new(&ctx);
    strainer.extend_provider::<Overloads>();

    // No overload takes four arguments; the excess is dropped
    let out = strainer
        .invoke(
            "pick",
            vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)],
            &no_named(),
        )
        .unwrap();
    assert_eq!(out, Value::string("three"));
    // Nor zero
    let out = strainer.invoke("pick", vec![], &no_named());
    assert!(matches!(
        out,
        Err(Error::MissingDefaultValue { ref parameter, .. }) if parameter == "input"
    ));
}

#[test]
fn test_extend_replaces_only_same_signature() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let mut strainer = Strainer::new(&ctx);
    strainer.extend_provider::<Overloads>();
    strainer.extend_provider::<ReplacementPick>();

    assert_eq!(strainer.descriptors().count(), 3);
    let one = strainer
        .invoke("pick", vec![Value::Int(1)], &no_named())
        .unwrap();
    assert_eq!(one, Value::string("replaced"));
    let two = strainer
        .invoke("pick", vec![Value::Int(1), Value::Int(2)], &no_named())
        .unwrap();
    assert_eq!(two, Value::string("two"));
}

#[test]
#[serial(filters)]
fn test_registered_provider_merges_after_standard() {
    reset_filters();
    register_filter_provider::<Overloads>();
    register_filter_provider::<Overloads>();

    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let strainer = Strainer::create(&ctx);
    assert!(strainer.respond_to("pick"));
    assert!(strainer.respond_to("size"));
    assert_eq!(strainer.descriptors().filter(|d| d.name() == "pick").count(), 3);
    reset_filters();
    assert!(!Strainer::create(&ctx).respond_to("pick"));
}

#[test]
fn test_defaults_and_named_arguments() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let strainer = Strainer::create(&ctx);
    let text = Value::string("Ground control to Major Tom.");

    let out = strainer
        .invoke("truncate", vec![text.clone()], &no_named())
        .unwrap();
    assert_eq!(out, text);

    let out = strainer
        .invoke(
            "truncate",
            vec![text.clone(), Value::Int(10)],
            &named(&[("ellipsis", Value::string("~"))]),
        )
        .unwrap();
    assert_eq!(out, Value::string("Ground co~"));

    // Unknown named keys are ignored
    let out = strainer
        .invoke(
            "truncate",
            vec![text, Value::Int(10)],
            &named(&[("colour", Value::string("red"))]),
        )
        .unwrap();
    assert_eq!(out, Value::string("Ground ..."));
}

#[test]
fn test_named_argument_supplies_required_parameter() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let strainer = Strainer::create(&ctx);
    let out = strainer
        .invoke(
            "append",
            vec![Value::string("a")],
            &named(&[("suffix", Value::string("b"))]),
        )
        .unwrap();
    assert_eq!(out, Value::string("ab"));
}

#[test]
fn test_argument_conversion() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let strainer = Strainer::create(&ctx);

    let out = strainer
        .invoke(
            "truncate",
            vec![Value::string("abcdefgh"), Value::Float(5.5)],
            &named(&[("ellipsis", Value::string(""))]),
        )
        .unwrap();
    assert_eq!(out, Value::string("abcdef"));

    let err = strainer
        .invoke(
            "truncate",
            vec![Value::string("abc"), Value::Int(i64::MAX)],
            &no_named(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ArgumentConversion { ref parameter, ref target, .. }
            if parameter == "length" && target == "int32"
    ));

    let err = strainer
        .invoke("upcase", vec![Value::array([1])], &no_named())
        .unwrap_err();
    assert!(matches!(err, Error::ArgumentConversion { .. }));
}

#[test]
fn test_fractional_string_fails_integer_parameter() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let mut strainer = Strainer::new(&ctx);
    strainer.add_function(
        "whole",
        FilterDescriptor::builder("whole")
            .param("input", ParamType::Int32)
            .build(|args| Ok(args.input().clone())),
    );

    let err = strainer
        .invoke("whole", vec![Value::string("1.5")], &no_named())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ArgumentConversion { ref parameter, ref value, ref target, .. }
            if parameter == "input" && value == "1.5" && target == "int32"
    ));
    assert_eq!(
        strainer
            .invoke("whole", vec![Value::string("7")], &no_named())
            .unwrap(),
        Value::Int(7)
    );
}

#[test]
fn test_context_is_injected() {
    let mut ctx = SimpleContext::new(NamingConvention::Ruby);
    ctx.set_variable("greeting", Value::string("hello"));
    let strainer = Strainer::create(&ctx);
    let out = strainer
        .invoke(
            "lookup",
            vec![Value::Nil, Value::string("greeting")],
            &no_named(),
        )
        .unwrap();
    assert_eq!(out, Value::string("hello"));
}

#[derive(Debug)]
struct Boom;

impl std::fmt::Display for Boom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "boom")
    }
}

impl std::error::Error for Boom {}

#[test]
fn test_body_errors_pass_through() {
    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let mut strainer = Strainer::new(&ctx);
    strainer.add_function(
        "explode",
        FilterDescriptor::builder("explode")
            .param("input", ParamType::Any)
            .build(|_| Err(Boom.into())),
    );
    let err = strainer
        .invoke("explode", vec![Value::Nil], &no_named())
        .unwrap_err();
    assert_eq!(err.to_string(), "boom");
    match err {
        Error::Filter(inner) => assert!(inner.downcast_ref::<Boom>().is_some()),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_bound_function() {
    struct Prefix(String);

    let ctx = SimpleContext::new(NamingConvention::Ruby);
    let mut strainer = Strainer::new(&ctx);
    strainer.add_function(
        "prefixed",
        FilterDescriptor::builder("prefixed")
            .bind(Prefix("> ".to_string()))
            .param("input", ParamType::String)
            .build(|args| {
                let prefix = args.target::<Prefix>().map_or("", |p| p.0.as_str());
                Ok(Value::string(format!("{prefix}{}", args.input())))
            }),
    );
    let out = strainer
        .invoke("prefixed", vec![Value::Int(3)], &no_named())
        .unwrap();
    assert_eq!(out, Value::string("> 3"));
}
