//! tkshim application layer
//!
//! A Tk-style widget API on top of a native host toolkit:
//!
//! - [`AppContext`] owns the host toolkit, the geometry engine and every
//!   live widget; there is no global root
//! - [`Widget`] handles expose `configure`/`cget`, `pack`/`grid`/`place`,
//!   `bind` and `destroy`
//! - [`WidgetClass`] tables map Tk option names onto host properties; the
//!   built-in classes live in [`classes`]
//!
//! # Example
//!
//! ```rust
//! use tkshim_app::prelude::*;
//!
//! let (ctx, host) = AppContext::headless(ShimConfig::default());
//! let root = ctx.tk().unwrap();
//! root.set("title", "Greeter").unwrap();
//!
//! let name = StringVar::new("world".to_string());
//! let label = root
//!     .create_child("Label", Options::new().with("textvariable", &name))
//!     .unwrap();
//! label.pack(PackOptions::new().side(Side::Left)).unwrap();
//!
//! name.set("tkshim".to_string());
//! assert!(host.dump().contains("label=\"tkshim\""));
//! ```

pub mod class;
pub mod classes;
mod config;
mod context;
pub mod dialog;
mod error;
pub mod event;
pub mod root;
mod widget;
pub mod widgets;

pub use class::{ClassRole, DisplayProperty, WidgetClass};
pub use config::ShimConfig;
pub use context::AppContext;
pub use dialog::DialogAnswer;
pub use error::{AppError, Result};
pub use event::EventSequence;
pub use root::WindowGeometry;
pub use widget::Widget;

// Re-export the layers below for convenience
pub use tkshim_core as core;
pub use tkshim_layout as layout;
pub use tkshim_platform as platform;

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::class::{ClassRole, WidgetClass};
    pub use crate::config::ShimConfig;
    pub use crate::context::AppContext;
    pub use crate::dialog::DialogAnswer;
    pub use crate::error::{AppError, Result};
    pub use crate::widget::Widget;

    pub use tkshim_core::{
        BooleanVar, Callback, ConfigureReport, DoubleVar, IntVar, OptionPolicy, OptionValue,
        Options, Resolution, StringVar, Subscription, VariableRef,
    };
    pub use tkshim_layout::{
        Anchor, Fill, GeometryMode, GridOptions, PackOptions, PlaceOptions, PlacementEntry, Side,
    };
    pub use tkshim_platform::{HeadlessToolkit, HostEvent, HostToolkit};
}
