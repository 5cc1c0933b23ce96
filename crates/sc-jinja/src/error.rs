//! Error types for sc-jinja

use thiserror::Error;

/// Macro injection errors
#[derive(Error, Debug)]
pub enum InjectError {
    /// Converted model could not be read (I001)
    #[error("[I001] Failed to read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Rewritten model could not be written back (I002)
    #[error("[I002] Failed to write '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    /// A table name produced a pattern the regex engine rejected (I003)
    #[error("[I003] Cannot build match pattern for '{name}': {source}")]
    Pattern {
        name: String,
        source: regex::Error,
    },
}

/// Result type alias for InjectError
pub type InjectResult<T> = Result<T, InjectError>;
