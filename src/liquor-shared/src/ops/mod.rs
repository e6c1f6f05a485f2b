//! Core operations shared by the liquor crates

pub mod traits;
pub mod utils;

#[cfg(test)]
mod tests;

pub use traits::{Context, SimpleContext};
pub use utils::{compare_values, liquid_equals, loose_element_equals};
