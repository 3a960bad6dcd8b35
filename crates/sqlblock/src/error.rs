//! Error types for sqlblock

use crate::query::StatementKind;
use thiserror::Error;

/// Result type alias for builder operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors raised while constructing or rendering a statement.
///
/// All of these are caller errors: there is nothing to retry, and a failed
/// render produces no output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// Malformed identifier, nested query where none is allowed, bad row shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required clause was never populated
    #[error("Incomplete statement: {0}")]
    IncompleteStatement(String),

    /// Statement kind cannot act as a derived table
    #[error("{0} statements cannot be used as a nested query")]
    UnsupportedNesting(StatementKind),

    /// No dialect registered under this name
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),
}

impl QbError {
    /// Create an invalid argument error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an incomplete statement error
    pub fn incomplete(message: impl Into<String>) -> Self {
        Self::IncompleteStatement(message.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is an incomplete statement error
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::IncompleteStatement(_))
    }

    /// Check if this is a nesting error
    pub fn is_unsupported_nesting(&self) -> bool {
        matches!(self, Self::UnsupportedNesting(_))
    }
}
