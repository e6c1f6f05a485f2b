//! Naming conventions
//!
//! A naming convention maps a declared identifier (a filter name, an operator
//! name, a drop member) to the key used for lookups, so templates can address
//! members in the style of the host language they were written for.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("acronym boundary regex"));
static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("word boundary regex"));

static GLOBAL_CONVENTION: AtomicU8 = AtomicU8::new(NamingConvention::Ruby as u8);

/// Identifier style used to canonicalize names before lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingConvention {
    /// snake_case canonical names (`IsMultipleOf` becomes `is_multiple_of`)
    #[default]
    Ruby = 0,
    /// Names kept as declared and matched case-insensitively
    #[serde(alias = "c#", alias = "cs")]
    CSharp = 1,
}

impl NamingConvention {
    /// The process default convention.
    ///
    /// Contexts built without an explicit convention pick this one up. Changing
    /// it while other threads are rendering is unsupported.
    pub fn global() -> Self {
        match GLOBAL_CONVENTION.load(Ordering::Acquire) {
            1 => NamingConvention::CSharp,
            _ => NamingConvention::Ruby,
        }
    }

    /// Replace the process default convention, returning the previous one
    pub fn set_global(convention: NamingConvention) -> NamingConvention {
        let previous = GLOBAL_CONVENTION.swap(convention as u8, Ordering::AcqRel);
        log::debug!("naming convention set to {convention}");
        match previous {
            1 => NamingConvention::CSharp,
            _ => NamingConvention::Ruby,
        }
    }

    /// Canonical member name for a declared identifier
    pub fn canonical(&self, raw: &str) -> String {
        match self {
            NamingConvention::Ruby => {
                let split = ACRONYM_BOUNDARY.replace_all(raw, "${1}_${2}");
                WORD_BOUNDARY
                    .replace_all(&split, "${1}_${2}")
                    .to_lowercase()
            }
            NamingConvention::CSharp => raw.to_string(),
        }
    }

    /// Key under which a name is stored in registries and member tables.
    ///
    /// Two names address the same entry exactly when their lookup keys are equal.
    pub fn lookup_key(&self, raw: &str) -> String {
        match self {
            NamingConvention::Ruby => self.canonical(raw),
            NamingConvention::CSharp => raw.to_lowercase(),
        }
    }

    /// Whether two names address the same entry under this convention
    pub fn names_match(&self, a: &str, b: &str) -> bool {
        self.lookup_key(a) == self.lookup_key(b)
    }

    /// Whether an operator token written in a template refers to `reference`.
    ///
    /// The exact and the lower-cased form of the registered name always match.
    /// Ruby additionally accepts the snake_case form, C# the form with an
    /// upper-cased first letter.
    pub fn operator_matches(&self, token: &str, reference: &str) -> bool {
        if token == reference || token == reference.to_lowercase() {
            return true;
        }
        match self {
            NamingConvention::Ruby => token == self.canonical(reference),
            NamingConvention::CSharp => token == upper_first(reference),
        }
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingConvention::Ruby => write!(f, "ruby"),
            NamingConvention::CSharp => write!(f, "csharp"),
        }
    }
}

impl FromStr for NamingConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ruby" => Ok(NamingConvention::Ruby),
            "csharp" | "c#" | "cs" => Ok(NamingConvention::CSharp),
            other => Err(format!("Unknown naming convention: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_ruby_canonical() {
        let ruby = NamingConvention::Ruby;
        assert_eq!(ruby.canonical("IsMultipleOf"), "is_multiple_of");
        assert_eq!(ruby.canonical("startsWith"), "starts_with");
        assert_eq!(ruby.canonical("HTMLParser"), "html_parser");
        assert_eq!(ruby.canonical("ABC1Def"), "abc1_def");
        assert_eq!(ruby.canonical("already_snake"), "already_snake");
        assert_eq!(ruby.canonical("Make"), "make");
    }

    #[test]
    fn test_csharp_keeps_declared_name() {
        let cs = NamingConvention::CSharp;
        assert_eq!(cs.canonical("DivisibleBy"), "DivisibleBy");
        assert_eq!(cs.lookup_key("DivisibleBy"), "divisibleby");
        assert!(cs.names_match("DivisibleBy", "divisibleby"));
        assert!(!cs.names_match("DivisibleBy", "divisible_by"));
    }

    #[test]
    fn test_ruby_names_match() {
        let ruby = NamingConvention::Ruby;
        assert!(ruby.names_match("DivisibleBy", "divisible_by"));
        assert!(ruby.names_match("DivisibleBy", "divisibleBy"));
        assert!(!ruby.names_match("DivisibleBy", "divisibleby"));
    }

    #[test]
    fn test_ruby_operator_matching() {
        let ruby = NamingConvention::Ruby;
        assert!(ruby.operator_matches("IsMultipleOf", "IsMultipleOf"));
        assert!(ruby.operator_matches("ismultipleof", "IsMultipleOf"));
        assert!(ruby.operator_matches("is_multiple_of", "IsMultipleOf"));
        assert!(!ruby.operator_matches("isMultipleOf", "IsMultipleOf"));
        assert!(!ruby.operator_matches("StartsWith", "startsWith"));
        assert!(ruby.operator_matches("starts_with", "startsWith"));
    }

    #[test]
    fn test_csharp_operator_matching() {
        let cs = NamingConvention::CSharp;
        assert!(cs.operator_matches("DivisibleBy", "DivisibleBy"));
        assert!(cs.operator_matches("divisibleby", "DivisibleBy"));
        assert!(!cs.operator_matches("divisibleBy", "DivisibleBy"));
        assert!(cs.operator_matches("StartsWith", "startsWith"));
        assert!(!cs.operator_matches("starts_with", "startsWith"));
    }

    #[test]
    fn test_canonical_is_deterministic() {
        for convention in [NamingConvention::Ruby, NamingConvention::CSharp] {
            assert_eq!(
                convention.canonical("SomeFilterName"),
                convention.canonical("SomeFilterName")
            );
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Ruby".parse::<NamingConvention>(), Ok(NamingConvention::Ruby));
        assert_eq!("c#".parse::<NamingConvention>(), Ok(NamingConvention::CSharp));
        assert!("kebab".parse::<NamingConvention>().is_err());
    }

    #[test]
    #[serial(naming)]
    fn test_global_swap() {
        let previous = NamingConvention::set_global(NamingConvention::CSharp);
        assert_eq!(NamingConvention::global(), NamingConvention::CSharp);
        NamingConvention::set_global(previous);
        assert_eq!(NamingConvention::global(), previous);
    }
}
