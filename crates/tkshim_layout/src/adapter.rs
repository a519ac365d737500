//! Container adapter
//!
//! Translates placement entries into calls on host containers. The adapter
//! holds no placement state of its own; [`GeometryEngine`] owns the records
//! and asks the adapter to make the host match them.
//!
//! [`GeometryEngine`]: crate::GeometryEngine

use std::rc::Rc;

use tkshim_platform::{Align, ContainerHandle, ContainerKind, HostHandle, HostToolkit};

use crate::placement::{Fill, GeometryMode, PackOptions, PlacementEntry};

/// Host container kind a mode maps to
pub fn container_kind(entry: &PlacementEntry) -> ContainerKind {
    match entry {
        PlacementEntry::Pack(p) => ContainerKind::Box(p.side.orientation()),
        PlacementEntry::Grid(_) => ContainerKind::Grid,
        PlacementEntry::Place(_) => ContainerKind::Fixed,
    }
}

/// Drives host containers on behalf of the geometry engine
#[derive(Clone)]
pub struct ContainerAdapter {
    toolkit: Rc<dyn HostToolkit>,
}

impl ContainerAdapter {
    pub fn new(toolkit: Rc<dyn HostToolkit>) -> Self {
        Self { toolkit }
    }

    pub fn toolkit(&self) -> &Rc<dyn HostToolkit> {
        &self.toolkit
    }

    /// Fresh, empty host container
    pub fn create(&self, kind: ContainerKind) -> ContainerHandle {
        self.toolkit.create_container(kind)
    }

    /// Add `child` to `container` the way `entry` describes
    ///
    /// A child already in the container is detached first, so re-placing a
    /// widget never leaves a duplicate behind.
    pub fn insert(&self, container: &ContainerHandle, child: &HostHandle, entry: &PlacementEntry) {
        if container.contains(child) {
            container.remove(child);
        }
        match entry {
            PlacementEntry::Pack(p) => {
                apply_pack_hints(child, p);
                let fill = p.fill != Fill::None;
                if p.side.is_start() {
                    container.pack_start(child, p.expand, fill, 0);
                } else {
                    container.pack_end(child, p.expand, fill, 0);
                }
            }
            PlacementEntry::Grid(g) => {
                child.set_margins(g.padx, g.pady);
                container.attach(child, g.column, g.row, g.columnspan, g.rowspan);
            }
            PlacementEntry::Place(p) => {
                container.put(child, p.x, p.y);
                if p.has_size() {
                    child.set_size_request(p.width, p.height);
                }
            }
        }
    }

    pub fn detach(&self, container: &ContainerHandle, child: &HostHandle) {
        container.remove(child);
    }

    /// Detach every child; returns how many there were
    pub fn discard(&self, container: &ContainerHandle) -> usize {
        let children = container.children();
        for child in &children {
            container.remove(child);
        }
        children.len()
    }

    /// Move every child of `from` into `to` at the reset position for `mode`
    ///
    /// Prior placement information is dropped. Returns the migrated children
    /// in their original order.
    pub fn migrate(
        &self,
        from: &ContainerHandle,
        to: &ContainerHandle,
        mode: GeometryMode,
    ) -> Vec<HostHandle> {
        let children = from.children();
        let Some(reset) = PlacementEntry::reset(mode) else {
            self.discard(from);
            return Vec::new();
        };
        for child in &children {
            from.remove(child);
            self.insert(to, child, &reset);
        }
        children
    }
}

/// Map pack options onto a child's expand/align/margin hints
///
/// A child expands along an axis only when it both expands and fills that
/// axis. Filling without expanding stretches it within its slot; every other
/// combination centers it. An explicit anchor overrides the alignment.
pub fn apply_pack_hints(child: &HostHandle, opts: &PackOptions) {
    let hexpand = opts.expand && opts.fill.covers_x();
    let vexpand = opts.expand && opts.fill.covers_y();
    child.set_expand(hexpand, vexpand);

    let (halign, valign) = match opts.anchor {
        Some(anchor) => anchor.align(),
        None if !opts.expand && opts.fill != Fill::None => (Align::Fill, Align::Fill),
        None => (Align::Center, Align::Center),
    };
    child.set_align(halign, valign);
    child.set_margins(opts.padx, opts.pady);
    child.set_internal_padding(opts.ipadx, opts.ipady);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{Anchor, GridOptions, PlaceOptions, Side};
    use tkshim_platform::headless::{HeadlessToolkit, SlotPlacement};
    use tkshim_platform::Orientation;

    fn setup() -> (HeadlessToolkit, ContainerAdapter) {
        let tk = HeadlessToolkit::new();
        let adapter = ContainerAdapter::new(Rc::new(tk.clone()));
        (tk, adapter)
    }

    #[test]
    fn test_pack_hints() {
        let (tk, _) = setup();
        let child = tk.create_widget("label").unwrap();
        let concrete = tk.widget(child.host_id()).unwrap();

        apply_pack_hints(&child, &PackOptions::new().expand(true).fill(Fill::X).padx(3));
        assert_eq!(concrete.expand(), (true, false));
        assert_eq!(concrete.align(), (Align::Center, Align::Center));
        assert_eq!(concrete.margins(), (3, 0));

        apply_pack_hints(&child, &PackOptions::new().fill(Fill::Both));
        assert_eq!(concrete.expand(), (false, false));
        assert_eq!(concrete.align(), (Align::Fill, Align::Fill));

        apply_pack_hints(&child, &PackOptions::new().anchor(Anchor::SE).ipad(2, 4));
        assert_eq!(concrete.align(), (Align::End, Align::End));
        assert_eq!(concrete.internal_padding(), (2, 4));
    }

    #[test]
    fn test_insert_by_side() {
        let (tk, adapter) = setup();
        let hbox = adapter.create(ContainerKind::Box(Orientation::Horizontal));
        let a = tk.create_widget("button").unwrap();
        let b = tk.create_widget("button").unwrap();
        adapter.insert(&hbox, &a, &PlacementEntry::Pack(PackOptions::new().side(Side::Left)));
        adapter.insert(
            &hbox,
            &b,
            &PlacementEntry::Pack(PackOptions::new().side(Side::Right).expand(true)),
        );

        let concrete = tk.container(hbox.container_id()).unwrap();
        assert!(matches!(concrete.slot_of(a.host_id()), Some(SlotPlacement::Start { .. })));
        assert!(matches!(
            concrete.slot_of(b.host_id()),
            Some(SlotPlacement::End { expand: true, .. })
        ));
    }

    #[test]
    fn test_reinsert_replaces() {
        let (tk, adapter) = setup();
        let grid = adapter.create(ContainerKind::Grid);
        let a = tk.create_widget("label").unwrap();
        adapter.insert(&grid, &a, &PlacementEntry::Grid(GridOptions::cell(0, 0)));
        adapter.insert(&grid, &a, &PlacementEntry::Grid(GridOptions::cell(1, 2).pad(5, 6)));

        let concrete = tk.container(grid.container_id()).unwrap();
        assert_eq!(concrete.len(), 1);
        assert_eq!(
            concrete.slot_of(a.host_id()),
            Some(SlotPlacement::Cell {
                column: 2,
                row: 1,
                columnspan: 1,
                rowspan: 1
            })
        );
        assert_eq!(tk.widget(a.host_id()).unwrap().margins(), (5, 6));
    }

    #[test]
    fn test_place_size_request() {
        let (tk, adapter) = setup();
        let fixed = adapter.create(ContainerKind::Fixed);
        let a = tk.create_widget("button").unwrap();
        let b = tk.create_widget("button").unwrap();
        adapter.insert(&fixed, &a, &PlacementEntry::Place(PlaceOptions::at(10, 20)));
        adapter.insert(&fixed, &b, &PlacementEntry::Place(PlaceOptions::at(1, 2).size(50, 30)));

        assert_eq!(tk.widget(a.host_id()).unwrap().size_request(), (None, None));
        assert_eq!(tk.widget(b.host_id()).unwrap().size_request(), (Some(50), Some(30)));
    }

    #[test]
    fn test_migrate_keeps_order() {
        let (tk, adapter) = setup();
        let grid = adapter.create(ContainerKind::Grid);
        let a = tk.create_widget("label").unwrap();
        let b = tk.create_widget("label").unwrap();
        adapter.insert(&grid, &a, &PlacementEntry::Grid(GridOptions::cell(3, 0)));
        adapter.insert(&grid, &b, &PlacementEntry::Grid(GridOptions::cell(0, 0)));

        let fixed = adapter.create(ContainerKind::Fixed);
        let moved = adapter.migrate(&grid, &fixed, GeometryMode::Place);
        assert_eq!(moved.len(), 2);
        assert!(grid.children().is_empty());

        let concrete = tk.container(fixed.container_id()).unwrap();
        let ids: Vec<_> = concrete.slots().iter().map(|s| s.child.host_id()).collect();
        assert_eq!(ids, vec![a.host_id(), b.host_id()]);
        assert_eq!(concrete.slot_of(a.host_id()), Some(SlotPlacement::Fixed { x: 0, y: 0 }));
    }
}
