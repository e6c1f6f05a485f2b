//! Error taxonomy for the evaluation layer
//!
//! Every error message is suitable for direct display; the render driver
//! decides whether to re-raise or print it inline.

use thiserror::Error;

/// Result type alias for liquor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while evaluating conditions, resolving variables or invoking filters
#[derive(Debug, Error)]
pub enum Error {
    /// Operator token that matches no registered operator
    #[error("Unknown operator {0}")]
    UnknownOperator(String),

    /// Filter name with no registered descriptor
    #[error("Unknown filter {0}")]
    UnknownFilter(String),

    /// A filter parameter received no value and declares no default
    #[error("Filter '{filter}' does not have a default value for '{parameter}' and no value was supplied")]
    MissingDefaultValue {
        /// Filter name as invoked
        filter: String,
        /// Declared parameter name
        parameter: String,
    },

    /// An argument could not be represented in the declared parameter type
    #[error("Cannot convert {value} to {target} for parameter '{parameter}' of filter '{filter}'")]
    ArgumentConversion {
        /// Filter name as invoked
        filter: String,
        /// Declared parameter name
        parameter: String,
        /// Offending value, rendered for display
        value: String,
        /// Declared parameter type
        target: String,
    },

    /// An expression token could not be parsed
    #[error("Syntax error in '{expression}': {message}")]
    Syntax {
        /// Expression text as supplied
        expression: String,
        /// Parser diagnostic
        message: String,
    },

    /// Error raised by a filter body, passed through unchanged
    #[error(transparent)]
    Filter(#[from] anyhow::Error),
}

impl Error {
    /// Create a syntax error for an expression token
    pub fn syntax(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Syntax {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a configuration problem rather than a template problem
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::MissingDefaultValue { .. })
    }
}

/// Create a generic operation error, the way filter bodies report failures
pub fn operation_error(msg: impl Into<String>) -> anyhow::Error {
    anyhow::anyhow!("Operation error: {}", msg.into())
}
