//! Error types for the liquor parser

use std::fmt;

/// Errors that can occur during parsing
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input could not be parsed past `position`
    InvalidSyntax {
        /// Description of the syntax error
        message: String,
        /// Byte offset in the input
        position: usize,
    },

    /// Unterminated string literal
    UnterminatedString {
        /// Position where the string starts
        position: usize,
    },

    /// Empty input
    EmptyInput,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidSyntax { message, position } => {
                write!(f, "Invalid syntax at position {}: {}", position, message)
            }
            ParseError::UnterminatedString { position } => {
                write!(
                    f,
                    "Unterminated string literal starting at position {}",
                    position
                )
            }
            ParseError::EmptyInput => write!(f, "Empty input"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

impl ParseError {
    /// Build a parse error from a nom failure on `input`
    pub(crate) fn from_nom(input: &str, err: nom::Err<nom::error::Error<&str>>) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                let position = input.len().saturating_sub(e.input.len());
                if e.input.starts_with(['\'', '"']) {
                    return ParseError::UnterminatedString { position };
                }
                let found: String = e.input.chars().take(16).collect();
                let message = if found.is_empty() {
                    "unexpected end of input".to_string()
                } else {
                    format!("unexpected '{}'", found)
                };
                ParseError::InvalidSyntax { message, position }
            }
            nom::Err::Incomplete(_) => ParseError::InvalidSyntax {
                message: "incomplete input".to_string(),
                position: input.len(),
            },
        }
    }

    /// Convert into the shared error type, attaching the offending expression
    pub fn into_error(self, expression: &str) -> liquor_shared::Error {
        liquor_shared::Error::syntax(expression, self.to_string())
    }
}
