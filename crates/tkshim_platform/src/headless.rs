//! Headless recording backend
//!
//! An in-memory [`HostToolkit`] that records every call instead of drawing.
//! Widgets keep their properties, margins, alignment and signal handlers;
//! containers keep their children with the placement they were added with.
//! Tests and the CLI inspect that state, and drive the widgets by emitting
//! signals or simulating user edits.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tkshim_core::{CoreError, OptionValue, Result as CoreResult};

use crate::error::{PlatformError, Result};
use crate::host::{
    Align, ContainerHandle, ContainerKind, HandlerId, HostContainer, HostHandle, HostId,
    HostWidget,
};
use crate::modal::{ModalRequest, ModalResponse};
use crate::signal::{HostEvent, HostSignal, SignalHandler};
use crate::toolkit::HostToolkit;

// ============================================================================
// Class catalogue
// ============================================================================

/// Properties every headless control understands
const COMMON_PROPERTIES: &[&str] = &[
    "visible",
    "sensitive",
    "tooltip_text",
    "border_width",
    "cursor",
    "background",
    "foreground",
    "font",
    "relief",
    "name",
];

/// Shape of one headless control class
#[derive(Clone, Copy, Debug)]
struct ClassSpec {
    name: &'static str,
    properties: &'static [&'static str],
    /// Property that mirrors the user-editable value, if any
    editable: Option<&'static str>,
    /// Can hold a layout container
    bin: bool,
    natural_size: (i32, i32),
}

const CLASSES: &[ClassSpec] = &[
    ClassSpec {
        name: "window",
        properties: &[
            "title",
            "default_size",
            "position",
            "resizable",
            "min_size",
            "max_size",
            "opacity",
            "fullscreen",
            "decorated",
            "window_position",
        ],
        editable: None,
        bin: true,
        natural_size: (200, 200),
    },
    ClassSpec {
        name: "frame",
        properties: &["label"],
        editable: None,
        bin: true,
        natural_size: (0, 0),
    },
    ClassSpec {
        name: "label",
        properties: &["label", "xalign", "wrap", "justify", "width_chars", "height_chars", "image"],
        editable: None,
        bin: false,
        natural_size: (60, 18),
    },
    ClassSpec {
        name: "button",
        properties: &["label", "image", "width_chars"],
        editable: None,
        bin: false,
        natural_size: (72, 28),
    },
    ClassSpec {
        name: "entry",
        properties: &["text", "visibility", "editable", "width_chars", "xalign"],
        editable: Some("text"),
        bin: false,
        natural_size: (150, 26),
    },
    ClassSpec {
        name: "check_button",
        properties: &["label", "active"],
        editable: Some("active"),
        bin: false,
        natural_size: (90, 22),
    },
    ClassSpec {
        name: "scale",
        properties: &["value", "lower", "upper", "digits", "orientation"],
        editable: Some("value"),
        bin: false,
        natural_size: (120, 30),
    },
];

fn class_spec(name: &str) -> Option<&'static ClassSpec> {
    CLASSES.iter().find(|c| c.name == name)
}

// ============================================================================
// Toolkit
// ============================================================================

#[derive(Default)]
struct Registry {
    next_id: Cell<u64>,
    // Destroyed widgets are removed; containers live as long as some master
    // or test holds them.
    widgets: RefCell<FxHashMap<HostId, Rc<HeadlessWidget>>>,
    containers: RefCell<FxHashMap<HostId, Weak<HeadlessContainer>>>,
    windows: RefCell<Vec<HostId>>,
    modal_answers: RefCell<VecDeque<ModalResponse>>,
    modal_log: RefCell<Vec<ModalRequest>>,
    running: Cell<bool>,
    loops_run: Cell<u32>,
}

impl Registry {
    fn allocate(&self) -> HostId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        HostId(id)
    }

    fn release(&self, id: HostId) {
        self.widgets.borrow_mut().remove(&id);
        self.windows.borrow_mut().retain(|w| *w != id);
    }
}

/// Recording toolkit
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct HeadlessToolkit {
    registry: Rc<Registry>,
}

impl HeadlessToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concrete widget behind a host id
    pub fn widget(&self, id: HostId) -> Option<Rc<HeadlessWidget>> {
        self.registry.widgets.borrow().get(&id).cloned()
    }

    /// Concrete container behind a host id
    pub fn container(&self, id: HostId) -> Option<Rc<HeadlessContainer>> {
        self.registry.containers.borrow().get(&id).and_then(Weak::upgrade)
    }

    /// Number of widgets not yet destroyed
    pub fn live_widgets(&self) -> usize {
        self.registry.widgets.borrow().len()
    }

    /// Number of containers still referenced
    pub fn live_containers(&self) -> usize {
        self.registry
            .containers
            .borrow()
            .values()
            .filter(|c| c.strong_count() > 0)
            .count()
    }

    /// Queue the answer the next modal dialog returns
    pub fn push_modal_answer(&self, response: ModalResponse) {
        self.registry.modal_answers.borrow_mut().push_back(response);
    }

    /// Every modal request run so far
    pub fn modal_requests(&self) -> Vec<ModalRequest> {
        self.registry.modal_log.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.registry.running.get()
    }

    /// How many times the main loop was entered
    pub fn loops_run(&self) -> u32 {
        self.registry.loops_run.get()
    }

    /// Indented text rendering of every window's widget tree
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let windows = self.registry.windows.borrow().clone();
        for id in windows {
            if let Some(window) = self.widget(id) {
                self.dump_widget(&mut out, &window, 0, None);
            }
        }
        out
    }

    fn make_widget(&self, spec: &'static ClassSpec) -> Rc<HeadlessWidget> {
        let widget = Rc::new(HeadlessWidget {
            id: self.registry.allocate(),
            registry: Rc::downgrade(&self.registry),
            spec,
            properties: RefCell::default(),
            margins: Cell::new((0, 0)),
            expand: Cell::new((false, false)),
            align: Cell::new((Align::Fill, Align::Fill)),
            internal_padding: Cell::new((0, 0)),
            size_request: Cell::new((None, None)),
            handlers: RefCell::default(),
            next_handler: Cell::new(0),
            content: RefCell::new(None),
            destroyed: Cell::new(false),
        });
        self.registry
            .widgets
            .borrow_mut()
            .insert(widget.id, widget.clone());
        widget
    }
}

impl HostToolkit for HeadlessToolkit {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn create_window(&self) -> Result<HostHandle> {
        let spec = class_spec("window")
            .ok_or_else(|| PlatformError::UnknownHostClass("window".into()))?;
        let window = self.make_widget(spec);
        self.registry.windows.borrow_mut().push(window.id);
        Ok(window)
    }

    fn create_widget(&self, host_class: &str) -> Result<HostHandle> {
        let spec = class_spec(host_class)
            .ok_or_else(|| PlatformError::UnknownHostClass(host_class.to_string()))?;
        Ok(self.make_widget(spec))
    }

    fn create_container(&self, kind: ContainerKind) -> ContainerHandle {
        let container = Rc::new(HeadlessContainer {
            id: self.registry.allocate(),
            kind,
            slots: RefCell::default(),
        });
        let mut containers = self.registry.containers.borrow_mut();
        containers.retain(|_, c| c.strong_count() > 0);
        containers.insert(container.id, Rc::downgrade(&container));
        drop(containers);
        container
    }

    fn run_modal(&self, request: &ModalRequest) -> ModalResponse {
        self.registry.modal_log.borrow_mut().push(request.clone());
        let answer = self.registry.modal_answers.borrow_mut().pop_front();
        answer.unwrap_or(ModalResponse::Cancel)
    }

    fn main_loop(&self) {
        // Nothing to wait on headless: enter and leave immediately.
        self.registry.loops_run.set(self.registry.loops_run.get() + 1);
        self.registry.running.set(true);
        tracing::debug!("headless main loop entered");
    }

    fn quit(&self) {
        self.registry.running.set(false);
    }
}

// ============================================================================
// Widget
// ============================================================================

/// Recording control
pub struct HeadlessWidget {
    id: HostId,
    registry: Weak<Registry>,
    spec: &'static ClassSpec,
    properties: RefCell<IndexMap<String, OptionValue>>,
    margins: Cell<(u32, u32)>,
    expand: Cell<(bool, bool)>,
    align: Cell<(Align, Align)>,
    internal_padding: Cell<(u32, u32)>,
    size_request: Cell<(Option<i32>, Option<i32>)>,
    handlers: RefCell<Vec<(HandlerId, HostSignal, SignalHandler)>>,
    next_handler: Cell<u64>,
    content: RefCell<Option<ContainerHandle>>,
    destroyed: Cell<bool>,
}

impl HeadlessWidget {
    pub fn margins(&self) -> (u32, u32) {
        self.margins.get()
    }

    pub fn expand(&self) -> (bool, bool) {
        self.expand.get()
    }

    pub fn align(&self) -> (Align, Align) {
        self.align.get()
    }

    pub fn internal_padding(&self) -> (u32, u32) {
        self.internal_padding.get()
    }

    pub fn size_request(&self) -> (Option<i32>, Option<i32>) {
        self.size_request.get()
    }

    pub fn content(&self) -> Option<ContainerHandle> {
        self.content.borrow().clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Number of handlers connected for `signal`
    pub fn handler_count(&self, signal: HostSignal) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|(_, s, _)| *s == signal)
            .count()
    }

    /// Property value as last stored
    pub fn stored(&self, name: &str) -> Option<OptionValue> {
        self.properties.borrow().get(name).cloned()
    }

    /// Fire every handler connected for `signal`
    ///
    /// Handlers run with no internal borrow held, so they may call back into
    /// this widget.
    pub fn emit(&self, signal: HostSignal, event: &HostEvent) {
        let handlers: Vec<SignalHandler> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(_, s, _)| *s == signal)
            .map(|(_, _, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    /// Simulate a click
    pub fn click(&self) {
        self.emit(HostSignal::Activate, &HostEvent::default());
    }

    /// Simulate the user editing the control's value
    ///
    /// Stores the value in the editable property and emits
    /// [`HostSignal::Changed`]. Fails for non-editable classes.
    pub fn user_edit(&self, value: impl Into<OptionValue>) -> CoreResult<()> {
        let Some(property) = self.spec.editable else {
            return Err(CoreError::validation(
                self.spec.name,
                "control is not user-editable",
            ));
        };
        let value = value.into();
        self.properties
            .borrow_mut()
            .insert(property.to_string(), value.clone());
        self.emit(HostSignal::Changed, &HostEvent::changed(value));
        Ok(())
    }

    fn knows(&self, name: &str) -> bool {
        COMMON_PROPERTIES.contains(&name) || self.spec.properties.contains(&name)
    }
}

impl HostWidget for HeadlessWidget {
    fn host_id(&self) -> HostId {
        self.id
    }

    fn host_class(&self) -> &str {
        self.spec.name
    }

    fn set_margins(&self, horizontal: u32, vertical: u32) {
        self.margins.set((horizontal, vertical));
    }

    fn set_expand(&self, horizontal: bool, vertical: bool) {
        self.expand.set((horizontal, vertical));
    }

    fn set_align(&self, horizontal: Align, vertical: Align) {
        self.align.set((horizontal, vertical));
    }

    fn set_internal_padding(&self, horizontal: u32, vertical: u32) {
        self.internal_padding.set((horizontal, vertical));
    }

    fn set_size_request(&self, width: Option<i32>, height: Option<i32>) {
        self.size_request.set((width, height));
    }

    fn size_hint(&self) -> Option<(i32, i32)> {
        let (w, h) = self.size_request.get();
        let (nw, nh) = self.spec.natural_size;
        Some((w.unwrap_or(nw), h.unwrap_or(nh)))
    }

    fn set_property(&self, name: &str, value: &OptionValue) -> Option<CoreResult<()>> {
        if !self.knows(name) {
            return None;
        }
        let previous = self
            .properties
            .borrow_mut()
            .insert(name.to_string(), value.clone());
        // Like native entries, a programmatic change of the editable value
        // reports Changed; re-setting the same value does not.
        if self.spec.editable == Some(name) && previous.as_ref() != Some(value) {
            self.emit(HostSignal::Changed, &HostEvent::changed(value.clone()));
        }
        Some(Ok(()))
    }

    fn property(&self, name: &str) -> Option<OptionValue> {
        if !self.knows(name) {
            return None;
        }
        Some(self.stored(name).unwrap_or_default())
    }

    fn connect(&self, signal: HostSignal, handler: SignalHandler) -> HandlerId {
        let id = HandlerId(self.next_handler.get() + 1);
        self.next_handler.set(id.0);
        self.handlers.borrow_mut().push((id, signal, handler));
        id
    }

    fn disconnect(&self, handler: HandlerId) {
        self.handlers.borrow_mut().retain(|(id, _, _)| *id != handler);
    }

    fn set_content(&self, content: Option<ContainerHandle>) -> bool {
        if !self.spec.bin {
            return false;
        }
        *self.content.borrow_mut() = content;
        true
    }

    fn destroy(&self) {
        self.destroyed.set(true);
        self.handlers.borrow_mut().clear();
        self.content.borrow_mut().take();
        if let Some(registry) = self.registry.upgrade() {
            registry.release(self.id);
        }
    }
}

// ============================================================================
// Container
// ============================================================================

/// How a child was added to a headless container
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPlacement {
    Start { expand: bool, fill: bool, padding: u32 },
    End { expand: bool, fill: bool, padding: u32 },
    Cell { column: u32, row: u32, columnspan: u32, rowspan: u32 },
    Fixed { x: i32, y: i32 },
}

/// One child of a headless container
#[derive(Clone)]
pub struct Slot {
    pub child: HostHandle,
    pub placement: SlotPlacement,
}

/// Recording container
pub struct HeadlessContainer {
    id: HostId,
    kind: ContainerKind,
    slots: RefCell<Vec<Slot>>,
}

impl HeadlessContainer {
    /// Children together with how they were added, in insertion order
    pub fn slots(&self) -> Vec<Slot> {
        self.slots.borrow().clone()
    }

    /// Placement of one child, if present
    pub fn slot_of(&self, child: HostId) -> Option<SlotPlacement> {
        self.slots
            .borrow()
            .iter()
            .find(|s| s.child.host_id() == child)
            .map(|s| s.placement)
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    fn add(&self, child: &HostHandle, placement: SlotPlacement, accepts: bool) {
        if !accepts {
            tracing::warn!(
                container = %self.id,
                kind = self.kind.name(),
                ?placement,
                "placement call does not match container kind; ignored"
            );
            return;
        }
        let mut slots = self.slots.borrow_mut();
        if slots.iter().any(|s| s.child.host_id() == child.host_id()) {
            tracing::warn!(container = %self.id, child = %child.host_id(), "child added twice");
            return;
        }
        slots.push(Slot {
            child: child.clone(),
            placement,
        });
    }
}

impl HostContainer for HeadlessContainer {
    fn container_id(&self) -> HostId {
        self.id
    }

    fn kind(&self) -> ContainerKind {
        self.kind
    }

    fn pack_start(&self, child: &HostHandle, expand: bool, fill: bool, padding: u32) {
        let placement = SlotPlacement::Start {
            expand,
            fill,
            padding,
        };
        self.add(child, placement, matches!(self.kind, ContainerKind::Box(_)));
    }

    fn pack_end(&self, child: &HostHandle, expand: bool, fill: bool, padding: u32) {
        let placement = SlotPlacement::End {
            expand,
            fill,
            padding,
        };
        self.add(child, placement, matches!(self.kind, ContainerKind::Box(_)));
    }

    fn attach(&self, child: &HostHandle, column: u32, row: u32, columnspan: u32, rowspan: u32) {
        let placement = SlotPlacement::Cell {
            column,
            row,
            columnspan,
            rowspan,
        };
        self.add(child, placement, self.kind == ContainerKind::Grid);
    }

    fn put(&self, child: &HostHandle, x: i32, y: i32) {
        self.add(
            child,
            SlotPlacement::Fixed { x, y },
            self.kind == ContainerKind::Fixed,
        );
    }

    fn remove(&self, child: &HostHandle) {
        let id = child.host_id();
        self.slots.borrow_mut().retain(|s| s.child.host_id() != id);
    }

    fn children(&self) -> Vec<HostHandle> {
        self.slots.borrow().iter().map(|s| s.child.clone()).collect()
    }
}

// ============================================================================
// Dump
// ============================================================================

impl HeadlessToolkit {
    fn dump_widget(
        &self,
        out: &mut String,
        widget: &HeadlessWidget,
        depth: usize,
        slot: Option<SlotPlacement>,
    ) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}{} {}", widget.spec.name, widget.id);
        for key in ["title", "label", "text", "active", "value"] {
            if let Some(value) = widget.stored(key) {
                let _ = write!(out, " {key}={:?}", value.display_text());
            }
        }
        if let Some(slot) = slot {
            let _ = write!(out, " [{}]", describe_slot(&slot));
        }
        out.push('\n');

        let Some(content) = widget.content() else {
            return;
        };
        let _ = writeln!(
            out,
            "{indent}  {} {}",
            content.kind().name(),
            content.container_id()
        );
        let Some(container) = self.container(content.container_id()) else {
            return;
        };
        for slot in container.slots() {
            if let Some(child) = self.widget(slot.child.host_id()) {
                self.dump_widget(out, &child, depth + 2, Some(slot.placement));
            }
        }
    }
}

fn describe_slot(slot: &SlotPlacement) -> String {
    match *slot {
        SlotPlacement::Start {
            expand,
            fill,
            padding,
        } => format!("start expand={expand} fill={fill} padding={padding}"),
        SlotPlacement::End {
            expand,
            fill,
            padding,
        } => format!("end expand={expand} fill={fill} padding={padding}"),
        SlotPlacement::Cell {
            column,
            row,
            columnspan,
            rowspan,
        } => format!("cell row={row} column={column} span={rowspan}x{columnspan}"),
        SlotPlacement::Fixed { x, y } => format!("at {x},{y}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_class() {
        let tk = HeadlessToolkit::new();
        assert!(matches!(
            tk.create_widget("spinner"),
            Err(PlatformError::UnknownHostClass(ref c)) if c == "spinner"
        ));
    }

    #[test]
    fn test_property_levels() {
        let tk = HeadlessToolkit::new();
        let label = tk.create_widget("label").unwrap();
        assert_eq!(label.set_property("label", &"hi".into()), Some(Ok(())));
        assert_eq!(label.property("label"), Some(OptionValue::from("hi")));
        assert_eq!(label.property("wrap"), Some(OptionValue::None));
        assert!(label.set_property("no_such_thing", &OptionValue::Bool(true)).is_none());
        assert!(label.property("no_such_thing").is_none());
    }

    #[test]
    fn test_editable_emits_changed_once() {
        let tk = HeadlessToolkit::new();
        let entry = tk.create_widget("entry").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        entry.connect(
            HostSignal::Changed,
            Rc::new(move |ev: &HostEvent| sink.borrow_mut().push(ev.value.clone())),
        );

        entry.set_property("text", &"a".into());
        entry.set_property("text", &"a".into());
        entry.set_property("text", &"b".into());
        assert_eq!(seen.borrow().len(), 2);

        let concrete = tk.widget(entry.host_id()).unwrap();
        concrete.user_edit("typed").unwrap();
        assert_eq!(seen.borrow().last().cloned().flatten(), Some(OptionValue::from("typed")));
    }

    #[test]
    fn test_user_edit_requires_editable() {
        let tk = HeadlessToolkit::new();
        let label = tk.create_widget("label").unwrap();
        let concrete = tk.widget(label.host_id()).unwrap();
        assert!(concrete.user_edit("x").is_err());
    }

    #[test]
    fn test_container_records_placement() {
        let tk = HeadlessToolkit::new();
        let vbox = tk.create_container(ContainerKind::Box(crate::Orientation::Vertical));
        let a = tk.create_widget("button").unwrap();
        let b = tk.create_widget("button").unwrap();
        vbox.pack_start(&a, false, false, 0);
        vbox.pack_end(&b, true, true, 0);
        // Wrong kind of call for a box
        vbox.put(&a, 1, 1);

        let concrete = tk.container(vbox.container_id()).unwrap();
        assert_eq!(concrete.len(), 2);
        assert_eq!(
            concrete.slot_of(b.host_id()),
            Some(SlotPlacement::End {
                expand: true,
                fill: true,
                padding: 0
            })
        );

        vbox.remove(&a);
        assert!(!vbox.contains(&a));
        assert!(vbox.contains(&b));
    }

    #[test]
    fn test_set_content_only_on_bins() {
        let tk = HeadlessToolkit::new();
        let window = tk.create_window().unwrap();
        let label = tk.create_widget("label").unwrap();
        let grid = tk.create_container(ContainerKind::Grid);
        assert!(window.set_content(Some(grid.clone())));
        assert!(!label.set_content(Some(grid)));
    }

    #[test]
    fn test_registry_drops_dead_entries() {
        let tk = HeadlessToolkit::new();
        let window = tk.create_window().unwrap();
        let label = tk.create_widget("label").unwrap();
        let first = tk.create_container(ContainerKind::Grid);
        window.set_content(Some(first.clone()));
        let first_id = first.container_id();
        drop(first);
        assert!(tk.container(first_id).is_some());

        // Replacing the content releases the old container
        let second = tk.create_container(ContainerKind::Fixed);
        window.set_content(Some(second.clone()));
        assert!(tk.container(first_id).is_none());
        assert_eq!(tk.live_containers(), 1);

        label.destroy();
        assert!(tk.widget(label.host_id()).is_none());
        assert_eq!(tk.live_widgets(), 1);

        window.destroy();
        assert_eq!(tk.live_widgets(), 0);
        assert!(tk.dump().is_empty());
    }

    #[test]
    fn test_modal_answers() {
        let tk = HeadlessToolkit::new();
        let request = ModalRequest::Color {
            title: "Pick".into(),
            initial: None,
        };
        tk.push_modal_answer(ModalResponse::Color("#ff0000".into()));
        assert_eq!(tk.run_modal(&request), ModalResponse::Color("#ff0000".into()));
        assert_eq!(tk.run_modal(&request), ModalResponse::Cancel);
        assert_eq!(tk.modal_requests().len(), 2);
    }

    #[test]
    fn test_dump_lists_tree() {
        let tk = HeadlessToolkit::new();
        let window = tk.create_window().unwrap();
        window.set_property("title", &"Demo".into());
        let vbox = tk.create_container(ContainerKind::Box(crate::Orientation::Vertical));
        window.set_content(Some(vbox.clone()));
        let label = tk.create_widget("label").unwrap();
        label.set_property("label", &"Hello".into());
        vbox.pack_start(&label, false, false, 0);

        let dump = tk.dump();
        assert!(dump.contains("window #1 title=\"Demo\""));
        assert!(dump.contains("vbox"));
        assert!(dump.contains("label"));
        assert!(dump.contains("label=\"Hello\" [start expand=false fill=false padding=0]"));
    }
}
