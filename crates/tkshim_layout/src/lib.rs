//! tkshim Geometry Engine
//!
//! Tk-style `pack`, `grid` and `place` on top of host box, grid and fixed
//! containers.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use slotmap::SlotMap;
//! use tkshim_core::WidgetId;
//! use tkshim_layout::prelude::*;
//! use tkshim_platform::{HeadlessToolkit, HostHandle, HostToolkit};
//!
//! let tk = HeadlessToolkit::new();
//! let mut engine = GeometryEngine::new(ContainerAdapter::new(Rc::new(tk.clone())));
//!
//! let mut ids: SlotMap<WidgetId, HostHandle> = SlotMap::with_key();
//! let window = tk.create_window().unwrap();
//! let label = tk.create_widget("label").unwrap();
//! let (win_id, label_id) = (ids.insert(window.clone()), ids.insert(label.clone()));
//!
//! engine
//!     .pack(
//!         MasterRef { id: win_id, host: &window, nesting: Nesting::Toplevel },
//!         ChildRef { id: label_id, host: &label },
//!         PackOptions::new().side(Side::Left).fill(Fill::Y),
//!     )
//!     .unwrap();
//! assert_eq!(engine.mode(win_id), GeometryMode::Pack);
//! ```

pub mod adapter;
pub mod error;
pub mod geometry;
pub mod placement;

pub use adapter::{apply_pack_hints, ContainerAdapter};
pub use error::{GeometryError, Result};
pub use geometry::{ChildRef, ContainerView, GeometryEngine, MasterRef, Nesting};
pub use placement::{
    Anchor, Fill, GeometryMode, GridOptions, PackOptions, PlaceOptions, PlacementEntry, Side,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapter::ContainerAdapter;
    pub use crate::error::{GeometryError, Result};
    pub use crate::geometry::{ChildRef, GeometryEngine, MasterRef, Nesting};
    pub use crate::placement::{
        Anchor, Fill, GeometryMode, GridOptions, PackOptions, PlaceOptions, PlacementEntry, Side,
    };
}
