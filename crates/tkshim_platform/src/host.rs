//! Host widget and container abstraction
//!
//! These traits describe the minimum a native toolkit must offer for the
//! geometry engine and the configuration dispatcher to drive it. Methods take
//! `&self`: host handles are reference-counted objects with interior
//! mutability, the same way GTK-style bindings expose them.

use std::fmt;
use std::rc::Rc;

use tkshim_core::{OptionValue, Result as CoreResult};

use crate::signal::{HostSignal, SignalHandler};

/// Shared handle to a host widget
pub type HostHandle = Rc<dyn HostWidget>;

/// Shared handle to a host layout container
pub type ContainerHandle = Rc<dyn HostContainer>;

/// Identity of a host object (widget or container)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostId(pub u64);

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a connected signal handler
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

/// Box orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// The three host container shapes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Ordered box (pack)
    Box(Orientation),
    /// Cell grid (grid)
    Grid,
    /// Absolute positioning (place)
    Fixed,
}

impl ContainerKind {
    pub fn name(&self) -> &'static str {
        match self {
            ContainerKind::Box(Orientation::Horizontal) => "hbox",
            ContainerKind::Box(Orientation::Vertical) => "vbox",
            ContainerKind::Grid => "grid",
            ContainerKind::Fixed => "fixed",
        }
    }
}

/// Per-axis alignment of a widget inside its allocation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    #[default]
    Fill,
    Start,
    End,
    Center,
}

/// A native control
pub trait HostWidget {
    fn host_id(&self) -> HostId;

    /// Host class name this control was created from
    fn host_class(&self) -> &str;

    /// Outer spacing: `horizontal` on start/end, `vertical` on top/bottom
    fn set_margins(&self, horizontal: u32, vertical: u32);

    fn set_expand(&self, horizontal: bool, vertical: bool);

    fn set_align(&self, horizontal: Align, vertical: Align);

    /// Extra inner padding (`ipadx`/`ipady`); hosts without it ignore the call
    fn set_internal_padding(&self, _horizontal: u32, _vertical: u32) {}

    /// Explicit size request; `None` leaves that axis at its natural size
    fn set_size_request(&self, width: Option<i32>, height: Option<i32>);

    /// Natural size, if the host can report it
    fn size_hint(&self) -> Option<(i32, i32)> {
        None
    }

    /// Generic property setter. `None` means the host has no such property.
    fn set_property(&self, name: &str, value: &OptionValue) -> Option<CoreResult<()>>;

    /// Generic property getter. `None` means the host has no such property.
    fn property(&self, name: &str) -> Option<OptionValue>;

    fn connect(&self, signal: HostSignal, handler: SignalHandler) -> HandlerId;

    fn disconnect(&self, handler: HandlerId);

    /// Replace the single child of a bin-like control (window, frame).
    ///
    /// Returns `false` if this control cannot hold content.
    fn set_content(&self, _content: Option<ContainerHandle>) -> bool {
        false
    }

    fn destroy(&self) {}
}

/// A native layout container
pub trait HostContainer {
    fn container_id(&self) -> HostId;

    fn kind(&self) -> ContainerKind;

    /// Box: insert after the start-anchored children
    fn pack_start(&self, child: &HostHandle, expand: bool, fill: bool, padding: u32);

    /// Box: insert before the end-anchored children
    fn pack_end(&self, child: &HostHandle, expand: bool, fill: bool, padding: u32);

    /// Grid: attach to a cell span
    fn attach(&self, child: &HostHandle, column: u32, row: u32, columnspan: u32, rowspan: u32);

    /// Fixed: put at absolute coordinates
    fn put(&self, child: &HostHandle, x: i32, y: i32);

    /// Detach a child; no-op if it is not a child of this container
    fn remove(&self, child: &HostHandle);

    /// Children in host order
    fn children(&self) -> Vec<HostHandle>;

    fn contains(&self, child: &HostHandle) -> bool {
        let id = child.host_id();
        self.children().iter().any(|c| c.host_id() == id)
    }
}
