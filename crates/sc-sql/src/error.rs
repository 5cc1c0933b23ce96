//! Error types for sc-sql

use thiserror::Error;

/// SQL parsing and transpilation errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Unknown dialect name (S003)
    #[error("[S003] Unknown SQL dialect: {0}")]
    UnknownDialect(String),

    /// No transpiler for the requested pair (S004)
    #[error("[S004] Cannot transpile from '{read}' to '{write}'")]
    UnsupportedDialectPair { read: String, write: String },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
