//! Geometry engine
//!
//! Tracks, for every master, which geometry manager governs it, the host
//! container that implements that manager, and one placement entry per child.
//!
//! # Mode switches
//!
//! A master holds exactly one container at a time. Placing a child with a
//! different manager than the master's current one replaces the container:
//!
//! - a **toplevel** master (a window) discards the old container together
//!   with every entry it held
//! - a **nested** master (a frame) converts: existing children migrate into
//!   the new container at the new manager's default position
//!
//! Within pack mode, a side that needs the other box orientation rebuilds the
//! box and re-packs every existing child with its recorded entry.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tkshim_core::WidgetId;
use tkshim_platform::{ContainerHandle, ContainerKind, HostHandle, Orientation};

use crate::adapter::{container_kind, ContainerAdapter};
use crate::error::{GeometryError, Result};
use crate::placement::{GeometryMode, GridOptions, PackOptions, PlaceOptions, PlacementEntry};

/// How a master reacts to a mode switch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nesting {
    /// Window: the old container and its entries are discarded
    Toplevel,
    /// Frame-like: children migrate to the new container
    Nested,
}

/// The master side of a placement call
#[derive(Clone, Copy)]
pub struct MasterRef<'a> {
    pub id: WidgetId,
    pub host: &'a HostHandle,
    pub nesting: Nesting,
}

/// The child side of a placement call
#[derive(Clone, Copy)]
pub struct ChildRef<'a> {
    pub id: WidgetId,
    pub host: &'a HostHandle,
}

struct Placed {
    host: HostHandle,
    entry: PlacementEntry,
}

struct ContainerState {
    mode: GeometryMode,
    handle: ContainerHandle,
    children: IndexMap<WidgetId, Placed>,
}

impl ContainerState {
    fn orientation(&self) -> Option<Orientation> {
        match self.handle.kind() {
            ContainerKind::Box(o) => Some(o),
            _ => None,
        }
    }
}

/// Read-only view of one master's layout
#[derive(Clone, Debug)]
pub struct ContainerView {
    pub mode: GeometryMode,
    pub kind: ContainerKind,
    pub children: Vec<(WidgetId, PlacementEntry)>,
}

/// Per-master geometry bookkeeping
pub struct GeometryEngine {
    adapter: ContainerAdapter,
    masters: FxHashMap<WidgetId, ContainerState>,
    /// child -> master
    owners: FxHashMap<WidgetId, WidgetId>,
}

impl GeometryEngine {
    pub fn new(adapter: ContainerAdapter) -> Self {
        Self {
            adapter,
            masters: FxHashMap::default(),
            owners: FxHashMap::default(),
        }
    }

    pub fn adapter(&self) -> &ContainerAdapter {
        &self.adapter
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// Pack `child` into `master`
    ///
    /// Re-packing a child already under `master` moves it to the end of the
    /// packing order with its new options.
    pub fn pack(&mut self, master: MasterRef<'_>, child: ChildRef<'_>, opts: PackOptions) -> Result<()> {
        self.place_entry(master, child, PlacementEntry::Pack(opts))
    }

    /// Attach `child` to a grid cell of `master`
    ///
    /// Overlapping cells are allowed; the host decides which widget shows.
    pub fn grid(&mut self, master: MasterRef<'_>, child: ChildRef<'_>, opts: GridOptions) -> Result<()> {
        opts.validate()?;
        self.place_entry(master, child, PlacementEntry::Grid(opts))
    }

    /// Put `child` at absolute coordinates inside `master`
    pub fn place(&mut self, master: MasterRef<'_>, child: ChildRef<'_>, opts: PlaceOptions) -> Result<()> {
        opts.validate()?;
        self.place_entry(master, child, PlacementEntry::Place(opts))
    }

    fn place_entry(
        &mut self,
        master: MasterRef<'_>,
        child: ChildRef<'_>,
        entry: PlacementEntry,
    ) -> Result<()> {
        if master.id == child.id {
            return Err(GeometryError::SelfPlacement(child.id));
        }
        if let Some(&owner) = self.owners.get(&child.id) {
            if owner != master.id {
                self.forget(child.id);
            }
        }

        let previous = self.masters.remove(&master.id);
        let state = match previous {
            Some(state) if state.mode == entry.mode() => state,
            previous => match self.switch_mode(master, previous, &entry) {
                Ok(state) => state,
                Err((previous, err)) => {
                    if let Some(previous) = previous {
                        self.masters.insert(master.id, previous);
                    }
                    return Err(err);
                }
            },
        };
        let state = self.masters.entry(master.id).or_insert(state);

        if let PlacementEntry::Pack(opts) = &entry {
            let wanted = opts.side.orientation();
            if state.orientation() != Some(wanted) {
                rebox(&self.adapter, master, state, wanted)?;
            }
            // Re-pack goes to the end of the order.
            state.children.shift_remove(&child.id);
        }

        if let PlacementEntry::Grid(opts) = &entry {
            for (other, placed) in &state.children {
                if *other == child.id {
                    continue;
                }
                if placed.entry.as_grid().is_some_and(|g| g.overlaps(opts)) {
                    tracing::debug!(
                        master = ?master.id,
                        child = ?child.id,
                        other = ?other,
                        row = opts.row,
                        column = opts.column,
                        "grid cell overlap, last placed wins"
                    );
                }
            }
        }

        self.adapter.insert(&state.handle, child.host, &entry);
        state.children.insert(
            child.id,
            Placed {
                host: child.host.clone(),
                entry,
            },
        );
        self.owners.insert(child.id, master.id);
        Ok(())
    }

    /// Build the container for `entry`'s mode and retire `previous`
    ///
    /// On failure the untouched previous state is handed back so the caller
    /// can restore it.
    fn switch_mode(
        &mut self,
        master: MasterRef<'_>,
        previous: Option<ContainerState>,
        entry: &PlacementEntry,
    ) -> std::result::Result<ContainerState, (Option<ContainerState>, GeometryError)> {
        let mode = entry.mode();
        let handle = self.adapter.create(container_kind(entry));
        if !master.host.set_content(Some(handle.clone())) {
            let err = GeometryError::NotAContainer {
                master: master.id,
                host: master.host.host_id(),
            };
            return Err((previous, err));
        }

        let mut state = ContainerState {
            mode,
            handle,
            children: IndexMap::new(),
        };
        let Some(old) = previous else {
            tracing::debug!(master = ?master.id, %mode, "container created");
            return Ok(state);
        };

        match master.nesting {
            Nesting::Toplevel => {
                let dropped = self.adapter.discard(&old.handle);
                for child in old.children.keys() {
                    self.owners.remove(child);
                }
                tracing::debug!(
                    master = ?master.id,
                    from = %old.mode,
                    to = %mode,
                    dropped,
                    "geometry mode switch discarded container"
                );
            }
            Nesting::Nested => {
                // Children keep their record, reset to the new mode's default.
                self.adapter.migrate(&old.handle, &state.handle, mode);
                if let Some(reset) = PlacementEntry::reset(mode) {
                    for (id, placed) in old.children {
                        state.children.insert(
                            id,
                            Placed {
                                host: placed.host,
                                entry: reset,
                            },
                        );
                    }
                }
                tracing::debug!(
                    master = ?master.id,
                    from = %old.mode,
                    to = %mode,
                    migrated = state.children.len(),
                    "geometry mode switch converted container"
                );
            }
        }
        Ok(state)
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove `child` from its master; returns whether it was placed
    pub fn forget(&mut self, child: WidgetId) -> bool {
        let Some(master) = self.owners.remove(&child) else {
            return false;
        };
        let Some(state) = self.masters.get_mut(&master) else {
            return false;
        };
        match state.children.shift_remove(&child) {
            Some(placed) => {
                self.adapter.detach(&state.handle, &placed.host);
                true
            }
            None => false,
        }
    }

    /// Drop all layout state for a master being destroyed
    pub fn forget_master(&mut self, master: WidgetId, host: &HostHandle) {
        let Some(state) = self.masters.remove(&master) else {
            return;
        };
        self.adapter.discard(&state.handle);
        host.set_content(None);
        for child in state.children.keys() {
            self.owners.remove(child);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn mode(&self, master: WidgetId) -> GeometryMode {
        self.masters
            .get(&master)
            .map_or(GeometryMode::None, |s| s.mode)
    }

    /// Box orientation when `master` is in pack mode
    pub fn orientation(&self, master: WidgetId) -> Option<Orientation> {
        self.masters.get(&master).and_then(ContainerState::orientation)
    }

    /// Current host container of `master`
    pub fn container(&self, master: WidgetId) -> Option<ContainerHandle> {
        self.masters.get(&master).map(|s| s.handle.clone())
    }

    /// Master `child` is currently placed under
    pub fn master_of(&self, child: WidgetId) -> Option<WidgetId> {
        self.owners.get(&child).copied()
    }

    /// Recorded placement entry of `child`
    pub fn entry(&self, child: WidgetId) -> Option<PlacementEntry> {
        let master = self.owners.get(&child)?;
        self.masters
            .get(master)?
            .children
            .get(&child)
            .map(|p| p.entry)
    }

    /// Placed children of `master`, in placement order
    pub fn children(&self, master: WidgetId) -> Vec<WidgetId> {
        self.masters
            .get(&master)
            .map(|s| s.children.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Effective size of a placed child: explicit place size, else host hint
    pub fn placed_size(&self, child: WidgetId) -> Option<(i32, i32)> {
        let master = self.owners.get(&child)?;
        let placed = self.masters.get(master)?.children.get(&child)?;
        let hint = placed.host.size_hint();
        match placed.entry.as_place() {
            Some(p) if p.has_size() => {
                let (hw, hh) = hint.unwrap_or((0, 0));
                Some((p.width.unwrap_or(hw), p.height.unwrap_or(hh)))
            }
            _ => hint,
        }
    }

    pub fn view(&self, master: WidgetId) -> Option<ContainerView> {
        let state = self.masters.get(&master)?;
        Some(ContainerView {
            mode: state.mode,
            kind: state.handle.kind(),
            children: state
                .children
                .iter()
                .map(|(id, placed)| (*id, placed.entry))
                .collect(),
        })
    }
}

/// Swap a pack container for one of the other orientation, re-packing every
/// existing child with its recorded entry in order
fn rebox(
    adapter: &ContainerAdapter,
    master: MasterRef<'_>,
    state: &mut ContainerState,
    orientation: Orientation,
) -> Result<()> {
    let handle = adapter.create(ContainerKind::Box(orientation));
    if !master.host.set_content(Some(handle.clone())) {
        return Err(GeometryError::NotAContainer {
            master: master.id,
            host: master.host.host_id(),
        });
    }
    let old = std::mem::replace(&mut state.handle, handle);
    adapter.discard(&old);
    for placed in state.children.values() {
        adapter.insert(&state.handle, &placed.host, &placed.entry);
    }
    tracing::debug!(
        master = ?master.id,
        ?orientation,
        children = state.children.len(),
        "pack container reoriented"
    );
    Ok(())
}
