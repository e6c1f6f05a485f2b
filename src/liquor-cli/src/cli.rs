//! Command-line interface for liquor
//!
//! Argument parsing with clap, plus the small parsers for `NAME=JSON` pairs
//! the subcommands accept.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use liquor::{NamingConvention, SyntaxCompatibility};

/// liquor - evaluate Liquid conditions and filters
///
/// Conditions and filters run against variables given as JSON, with the same
/// operator and filter tables a render would use.
#[derive(Parser, Debug)]
#[command(name = "liquor")]
#[command(author, version, about)]
#[command(after_help = "EXAMPLES:\n  \
    liquor condition \"user.age >= 18 and user.name startsWith 'B'\" --var 'user={\"name\":\"Bob\",\"age\":30}'\n  \
    liquor filter truncate '\"a long sentence\"' 6 --named 'ellipsis=\"~\"'\n  \
    liquor --naming csharp operators")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Naming convention for operator, filter and member lookups
    #[arg(long, global = true, value_name = "CONVENTION", value_parser = parse_naming, env = "LIQUOR_NAMING_CONVENTION")]
    pub naming: Option<NamingConvention>,

    /// Liquid version to emulate (liquid20, liquid21, liquid22, liquid22a)
    #[arg(long, global = true, value_name = "LEVEL", value_parser = parse_syntax, env = "LIQUOR_SYNTAX_COMPATIBILITY")]
    pub syntax: Option<SyntaxCompatibility>,

    /// Configuration file to use
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate condition markup and print true or false
    #[command(after_help = "EXAMPLES:\n  \
        liquor condition \"1 == 1\"\n  \
        liquor condition \"tags contains 'rust'\" --var 'tags=[\"rust\",\"liquid\"]'")]
    Condition {
        /// Condition markup, e.g. "a == 1 or b contains 'x'"
        markup: String,

        #[command(flatten)]
        variables: VariableArgs,
    },

    /// Invoke a filter and print its result as JSON
    Filter {
        /// Filter name
        name: String,

        /// Filter input as JSON
        input: String,

        /// Positional arguments as JSON
        args: Vec<String>,

        /// Named argument, as KEY=JSON (repeatable)
        #[arg(long = "named", value_name = "KEY=JSON", value_parser = parse_assignment)]
        named: Vec<(String, String)>,

        #[command(flatten)]
        variables: VariableArgs,
    },

    /// Parse condition markup and print its structure as JSON
    Parse {
        /// Condition markup
        markup: String,
    },

    /// List registered operators
    Operators,

    /// List available filters
    Filters,
}

/// Variables seeded into the render context
#[derive(Args, Debug, Default, Clone)]
pub struct VariableArgs {
    /// Variable, as NAME=JSON (repeatable)
    #[arg(long = "var", value_name = "NAME=JSON", value_parser = parse_assignment)]
    pub vars: Vec<(String, String)>,

    /// JSON file holding an object of variables
    #[arg(long = "vars", value_name = "FILE")]
    pub vars_file: Option<PathBuf>,
}

/// Split `NAME=VALUE`
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

fn parse_naming(s: &str) -> Result<NamingConvention, String> {
    s.parse()
}

fn parse_syntax(s: &str) -> Result<SyntaxCompatibility, String> {
    s.parse()
}

/// Parse command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Parse command-line arguments from a vector (for testing)
#[allow(dead_code)]
pub fn parse_args_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_parsing() {
        let cli = parse_args_from(["liquor", "condition", "a == 1", "--var", "a=1"]).unwrap();
        match cli.command {
            Commands::Condition { markup, variables } => {
                assert_eq!(markup, "a == 1");
                assert_eq!(variables.vars, vec![("a".to_string(), "1".to_string())]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_filter_parsing() {
        let cli = parse_args_from([
            "liquor",
            "filter",
            "truncate",
            "\"hello world\"",
            "5",
            "--named",
            "ellipsis=\"!\"",
        ])
        .unwrap();
        match cli.command {
            Commands::Filter {
                name, input, args, named, ..
            } => {
                assert_eq!(name, "truncate");
                assert_eq!(input, "\"hello world\"");
                assert_eq!(args, vec!["5".to_string()]);
                assert_eq!(named, vec![("ellipsis".to_string(), "\"!\"".to_string())]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = parse_args_from([
            "liquor", "operators", "--naming", "csharp", "--syntax", "2.2", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.naming, Some(NamingConvention::CSharp));
        assert_eq!(cli.syntax, Some(SyntaxCompatibility::Liquid22));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_invalid_naming() {
        assert!(parse_args_from(["liquor", "--naming", "kebab", "filters"]).is_err());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("a=b=c"),
            Ok(("a".to_string(), "b=c".to_string()))
        );
        assert!(parse_assignment("=1").is_err());
        assert!(parse_assignment("novalue").is_err());
    }
}
