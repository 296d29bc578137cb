//! Error types for pagedb.
//!
//! The `Display` strings of [`PrepareError`] are the exact messages the
//! REPL prints, so callers can forward them verbatim.

use thiserror::Error;

/// Result type alias using DbError
pub type Result<T> = std::result::Result<T, DbError>;

/// Top-level error for table setup and statement execution.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Failures reported by the paged table. Table state is unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Table full (max rows: {max_rows})")]
    Full { max_rows: usize },
}

/// Rejections from turning an input line into a statement.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrepareError {
    #[error("Syntax error. Could not parse statement.")]
    Syntax,

    #[error("String is too long.")]
    StringTooLong,

    #[error("ID must be positive.")]
    NegativeId,

    #[error("Unrecognized keyword at start of '{0}'.")]
    Unrecognized(String),
}
