//! tkshim Platform Abstraction Layer
//!
//! Platform-agnostic traits for the host GUI toolkit that tkshim drives.
//!
//! # Architecture
//!
//! - [`HostToolkit`] - creates windows, controls and containers; runs modal
//!   dialogs and the main loop
//! - [`HostWidget`] - one native control: margins, alignment, size request,
//!   generic properties, signals
//! - [`HostContainer`] - one native layout container: box, grid or fixed
//!
//! Backends implement these traits; [`headless`] provides a recording
//! implementation used by tests and the CLI.

mod error;
pub mod headless;
mod host;
mod modal;
mod signal;
mod toolkit;

pub use error::{PlatformError, Result};
pub use headless::HeadlessToolkit;
pub use host::{
    Align, ContainerHandle, ContainerKind, HandlerId, HostContainer, HostHandle, HostId,
    HostWidget, Orientation,
};
pub use modal::{FileAction, MessageButtons, MessageKind, ModalRequest, ModalResponse};
pub use signal::{HostEvent, HostSignal, SignalHandler};
pub use toolkit::HostToolkit;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::host::{
        Align, ContainerHandle, ContainerKind, HandlerId, HostContainer, HostHandle, HostId,
        HostWidget, Orientation,
    };
    pub use crate::modal::{FileAction, MessageButtons, MessageKind, ModalRequest, ModalResponse};
    pub use crate::signal::{HostEvent, HostSignal, SignalHandler};
    pub use crate::toolkit::HostToolkit;
}
