//! Platform error types

use thiserror::Error;

/// Host toolkit errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Failed to initialize the host toolkit
    #[error("Host toolkit initialization failed: {0}")]
    InitFailed(String),

    /// The host has no native control for this class name
    #[error("Unknown host widget class: {0}")]
    UnknownHostClass(String),

    /// Host not available (no display, missing library)
    #[error("Host toolkit not available: {0}")]
    Unavailable(String),

    /// Generic host error
    #[error("Host error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
