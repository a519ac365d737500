//! Host toolkit trait

use crate::error::Result;
use crate::host::{ContainerHandle, ContainerKind, HostHandle};
use crate::modal::{ModalRequest, ModalResponse};

/// Entry point into a native toolkit
///
/// Implemented once per backend. The application context owns one toolkit and
/// routes every host-object creation through it.
pub trait HostToolkit {
    /// Backend name, e.g. "gtk3" or "headless"
    fn name(&self) -> &'static str;

    /// Create a top-level window
    fn create_window(&self) -> Result<HostHandle>;

    /// Create a native control for a host class name ("label", "entry", ...)
    fn create_widget(&self, host_class: &str) -> Result<HostHandle>;

    /// Create an empty layout container
    fn create_container(&self, kind: ContainerKind) -> ContainerHandle;

    /// Run a dialog modally and block until the user answers
    fn run_modal(&self, request: &ModalRequest) -> ModalResponse;

    /// Show all windows and run the host loop until [`HostToolkit::quit`]
    fn main_loop(&self);

    fn quit(&self);
}
