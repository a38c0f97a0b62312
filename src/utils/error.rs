//! Error handling for table rendering
//!
//! Mapping and rendering never fail on bad input: unknown selection tokens are
//! ignored and out-of-range spans or sizes are clamped. The error type below
//! only covers the outer surface, i.e. the sink markup is written into and the
//! command-line front end.

use thiserror::Error;

/// Table error type
#[derive(Debug, Error)]
pub enum TableError {
    /// The formatting sink refused a write
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
    /// IO error while streaming markup
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A command-line argument could not be understood
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

impl TableError {
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        TableError::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }
}
