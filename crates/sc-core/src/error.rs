//! Error types for sc-core

use thiserror::Error;

/// Core error type for samconv
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config '{path}': {message}")]
    ConfigParseError { path: String, message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Two input files produced the same model name
    #[error("[E004] Duplicate model name '{name}': {first} and {second}")]
    DuplicateModel {
        name: String,
        first: String,
        second: String,
    },

    /// E005: A filename stem produced an empty model name
    #[error("[E005] Cannot derive a model name from '{path}'")]
    InvalidModelName { path: String },

    /// E006: IO error with file path context
    #[error("[E006] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E007: YAML serialization error
    #[error("[E007] YAML error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
