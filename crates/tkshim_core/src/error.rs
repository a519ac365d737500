//! Error types for tkshim_core

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by option dispatch and variable conversion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A value is structurally invalid for the option it was given to
    #[error("Invalid value for option '{option}': {reason}")]
    Validation { option: String, reason: String },

    /// A referenced external resource does not exist
    #[error("Resource not found: {}", path.display())]
    MissingResource { path: PathBuf },

    /// No resolution level accepted the option (strict mode only)
    #[error("Unknown configuration option '{option}' for {class}")]
    UnknownOption { class: String, option: String },

    /// A command-style option was given something that cannot be invoked
    #[error("Option '{option}' expects a callable, got {found}")]
    InvalidCallable { option: String, found: &'static str },

    /// Read access to an option no resolution level knows about
    #[error("Unknown option '{option}' for {class}")]
    UnknownKey { class: String, option: String },

    /// Type mismatch when converting an option value
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },
}

impl CoreError {
    /// Shorthand for a [`CoreError::Validation`]
    pub fn validation(option: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::Validation {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for tkshim_core operations
pub type Result<T> = std::result::Result<T, CoreError>;
