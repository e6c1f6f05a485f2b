//! liquor: runtime evaluation layer for Liquid-style templates
//!
//! This crate is the surface a template render driver talks to. It evaluates
//! `if`-style conditions, builds the per-render filter registry and owns the
//! global operator and filter tables, all under a configurable naming
//! convention.
//!
//! ```rust
//! use liquor::{create_filter_registry, evaluate_condition, Condition, RenderContext};
//! use liquor::{NamingConvention, Object, Value};
//!
//! let mut ctx = RenderContext::with_naming(NamingConvention::Ruby);
//! ctx.set("title", Value::string("liquor"));
//!
//! assert!(evaluate_condition(&Condition::new("title", "contains", "'qu'"), &ctx)?);
//!
//! let filters = create_filter_registry(&ctx);
//! let upper = filters.invoke("upcase", vec![Value::string("liquor")], &Object::new())?;
//! assert_eq!(upper, Value::string("LIQUOR"));
//! # Ok::<(), liquor::Error>(())
//! ```
//!
//! Registration functions mutate process-wide tables. Finish registering
//! before renders start on other threads.

pub mod config;

pub use config::{Config, ConfigError};

pub use liquor_filters::{
    provider_names, register_filter_provider, reset_filters, unregister_filter_function,
    unregister_filter_provider, FilterArgs, FilterBuilder, FilterDescriptor, FilterProvider,
    ParamType, StandardFilters, Strainer,
};
pub use liquor_parser::{parse_condition, parse_expression, ConditionMarkup, Expr, Logical};
pub use liquor_runtime::{
    operator_names, register_context_operator, register_operator, reset_operators,
    unregister_operator, Condition, LegacyKeyValueDrop, RenderContext, SyntaxCompatibility,
};
pub use liquor_shared::{
    operation_error, Context, DropMembers, Error, LiquidDrop, MemberGetter, NamingConvention,
    Object, Result, TypedDrop, Value,
};

use std::any::Any;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Evaluate a condition chain; fails on an unknown operator
pub fn evaluate_condition(condition: &Condition, context: &RenderContext) -> Result<bool> {
    condition.evaluate(context)
}

/// Parse and evaluate `if`-style markup in one step
pub fn evaluate_markup(markup: &str, context: &RenderContext) -> Result<bool> {
    Condition::parse(markup)?.evaluate(context)
}

/// Per-render filter registry built from the global tables
pub fn create_filter_registry(context: &RenderContext) -> Strainer<'_> {
    Strainer::create(context)
}

/// Register a filter function under `name`.
///
/// `target` is captured by the descriptor and reachable from the body through
/// [`FilterArgs::target`]. A later registration under the same name replaces
/// this one.
pub fn register_filter_function<T, F>(name: &str, target: T, descriptor: FilterBuilder, body: F)
where
    T: Any + Send + Sync,
    F: Fn(&FilterArgs<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    liquor_filters::register_filter_function(name, descriptor.bind(target).build(body));
}

/// Register an already built descriptor under `name`
pub fn register_filter_descriptor(name: &str, descriptor: FilterDescriptor) {
    liquor_filters::register_filter_function(name, descriptor);
}
