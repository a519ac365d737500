//! Error types for tkshim_app

use std::path::PathBuf;

use thiserror::Error;
use tkshim_core::{CoreError, WidgetId};
use tkshim_layout::GeometryError;
use tkshim_platform::PlatformError;

/// Errors that can occur in a tkshim application
#[derive(Error, Debug)]
pub enum AppError {
    /// Option dispatch or variable conversion failed
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Placement failed
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The host toolkit refused a request
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// No widget class registered under this name
    #[error("Unknown widget class: {0}")]
    UnknownClass(String),

    /// The widget was destroyed
    #[error("{0:?} has been destroyed")]
    Destroyed(WidgetId),

    /// Toplevel windows have no master to be placed into
    #[error("{0:?} is a toplevel and cannot be placed")]
    Toplevel(WidgetId),

    /// Failed to read a configuration file
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for tkshim_app operations
pub type Result<T> = std::result::Result<T, AppError>;
