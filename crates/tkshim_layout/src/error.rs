//! Geometry error types

use thiserror::Error;
use tkshim_core::{CoreError, WidgetId};
use tkshim_platform::HostId;

/// Errors raised by the geometry engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Placement options failed validation
    #[error(transparent)]
    Options(#[from] CoreError),

    /// The master's host control cannot hold a layout container
    #[error("{master:?} (host {host}) cannot hold children")]
    NotAContainer { master: WidgetId, host: HostId },

    /// A widget was asked to become its own child
    #[error("{0:?} cannot be placed inside itself")]
    SelfPlacement(WidgetId),
}

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, GeometryError>;
