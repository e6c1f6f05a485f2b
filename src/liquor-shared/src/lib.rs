//! liquor-shared: Shared types and utilities for liquor crates
//!
//! This crate contains the value model, the drop capability interface, naming
//! conventions and the error taxonomy used across the liquor crates.
//!
//! # Features
//!
//! - **Value model**: [`Value`] covering literals, containers and drops
//! - **Drops**: duck-typed objects with cached per-type member tables
//! - **Naming conventions**: Ruby-style and C#-style identifier canonicalization
//! - **Errors**: one [`Error`] enum for every failure raised while rendering

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown,
    clippy::type_complexity,
    clippy::uninlined_format_args
)]

/// Drop capability interface and member tables
pub mod drop;

/// Error taxonomy
pub mod error;

/// Naming conventions
pub mod naming;

/// Core operations: context trait, equality and ordering
pub mod ops;

/// Core value types
pub mod value;

pub use drop::{DropMembers, LiquidDrop, MemberGetter, TypedDrop};
pub use error::{operation_error, Error, Result};
pub use naming::NamingConvention;
pub use ops::{Context, SimpleContext};
pub use value::{Object, Value};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
