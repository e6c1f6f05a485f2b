//! liquor-parser: Parser for liquor expression tokens and condition markup
//!
//! A condition carries its operands as expression tokens: literals, ranges and
//! variable paths. This crate parses those tokens, and the `if`-style markup
//! that strings comparisons together, using the nom parser combinator library.
//!
//! # Quick Start
//!
//! ```rust
//! use liquor_parser::{parse_condition, parse_expression, Expr, Logical};
//!
//! let expr = parse_expression("user.tags[0]")?;
//! assert!(matches!(expr, Expr::Variable(_)));
//!
//! let markup = parse_condition("a == 1 or b contains 'x'")?;
//! assert_eq!(markup.tail[0].0, Logical::Or);
//! # Ok::<(), liquor_parser::ParseError>(())
//! ```
//!
//! # Supported Syntax
//!
//! - **Literals**: `nil`, `null`, `true`, `false`, `42`, `-1.5`, `'single'`, `"double"`
//! - **Ranges**: `(1..5)`, `(1..n)`
//! - **Variable paths**: `a.b`, `a[0]`, `a[-1]`, `a['k']`, `a[other.key]`, `pair.0`
//! - **Conditions**: `left op right` joined by `and` / `or`; a bare expression
//!   tests truthiness

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_lines
)]

pub mod ast;
pub mod error;
mod parser;

// Re-export main types
pub use ast::*;
pub use error::*;
pub use parser::*;
