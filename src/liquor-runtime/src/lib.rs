//! liquor-runtime: render context, operators and conditions
//!
//! A [`RenderContext`] holds the variables of one render. [`Condition`]s are
//! evaluated against it, looking operators up in the process-wide registry
//! managed by [`register_operator`] and friends.
//!
//! ```rust
//! use liquor_runtime::{Condition, RenderContext};
//! use liquor_shared::{NamingConvention, Value};
//!
//! let mut ctx = RenderContext::with_naming(NamingConvention::Ruby);
//! ctx.set("name", Value::string("Bob"));
//! let condition = Condition::parse("name startsWith 'B' and name.size == 3")?;
//! assert!(condition.evaluate(&ctx)?);
//! # Ok::<(), liquor_shared::Error>(())
//! ```

#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::uninlined_format_args
)]

pub mod condition;
pub mod context;
pub mod drops;
pub mod operators;

pub use condition::Condition;
pub use context::{RenderContext, SyntaxCompatibility};
pub use drops::LegacyKeyValueDrop;
pub use liquor_parser::Logical;
pub use operators::{
    apply_operator, find_operator, operator_names, register_context_operator, register_operator,
    reset_operators, unregister_operator, OperatorFn,
};
