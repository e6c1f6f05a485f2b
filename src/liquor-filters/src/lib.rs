//! liquor-filters: filter registration and dispatch
//!
//! Filters are described by [`FilterDescriptor`]s, registered globally as
//! provider types or ad hoc functions, and merged per render into a
//! [`Strainer`] that resolves overloads, binds arguments and invokes them.
//!
//! ```rust
//! use liquor_filters::{FilterDescriptor, ParamType, Strainer};
//! use liquor_shared::{NamingConvention, Object, SimpleContext, Value};
//!
//! let ctx = SimpleContext::new(NamingConvention::Ruby);
//! let mut strainer = Strainer::create(&ctx);
//! strainer.add_function(
//!     "shout",
//!     FilterDescriptor::builder("shout")
//!         .param("input", ParamType::String)
//!         .build(|args| Ok(Value::string(format!("{}!", args.input())))),
//! );
//! let out = strainer.invoke("shout", vec![Value::string("hi")], &Object::new())?;
//! assert_eq!(out, Value::string("hi!"));
//! # Ok::<(), liquor_shared::Error>(())
//! ```

#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args
)]

pub mod convert;
pub mod descriptor;
pub mod global;
pub mod standard;
pub mod strainer;

// Re-export inventory for providers submitted from other crates
pub use inventory;

pub use convert::{coerce, try_coerce};
pub use descriptor::{FilterArgs, FilterBuilder, FilterDescriptor, ParamSpec, ParamType};
pub use global::{
    provider_names, register_filter_function, register_filter_provider, reset_filters,
    unregister_filter_function, unregister_filter_provider, FilterProvider, ProviderRegistration,
};
pub use standard::StandardFilters;
pub use strainer::Strainer;
