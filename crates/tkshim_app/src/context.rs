//! Application context
//!
//! There is no global root: the entry point creates one [`AppContext`] and
//! passes it (or a widget created from it) to every constructor. The context
//! owns the host toolkit, the geometry engine, the configuration dispatcher,
//! the registered widget classes and every live widget.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use tkshim_core::{ConfigurationDispatcher, Options, WidgetId};
use tkshim_layout::{ContainerAdapter, GeometryEngine, GeometryMode};
use tkshim_platform::{HeadlessToolkit, HostHandle, HostToolkit};

use crate::class::{ClassRole, WidgetClass};
use crate::classes;
use crate::config::ShimConfig;
use crate::error::{AppError, Result};
use crate::widget::Widget;

pub(crate) struct ContextInner {
    toolkit: Rc<dyn HostToolkit>,
    geometry: RefCell<GeometryEngine>,
    dispatcher: ConfigurationDispatcher,
    config: ShimConfig,
    classes: RefCell<FxHashMap<String, Rc<WidgetClass>>>,
    widgets: RefCell<SlotMap<WidgetId, Widget>>,
    next_serial: Cell<u64>,
}

/// Shared handle to the application state
///
/// Cloning is cheap and yields a handle to the same application.
#[derive(Clone)]
pub struct AppContext {
    inner: Rc<ContextInner>,
}

impl AppContext {
    /// Context over `toolkit` with the default (lenient) configuration
    pub fn new(toolkit: Rc<dyn HostToolkit>) -> Self {
        Self::with_config(toolkit, ShimConfig::default())
    }

    /// Context over `toolkit`; registers the built-in widget classes
    pub fn with_config(toolkit: Rc<dyn HostToolkit>, config: ShimConfig) -> Self {
        let adapter = ContainerAdapter::new(toolkit.clone());
        let ctx = Self {
            inner: Rc::new(ContextInner {
                geometry: RefCell::new(GeometryEngine::new(adapter)),
                dispatcher: ConfigurationDispatcher::new(config.option_policy),
                config,
                toolkit,
                classes: RefCell::default(),
                widgets: RefCell::new(SlotMap::with_key()),
                next_serial: Cell::new(0),
            }),
        };
        for class in classes::builtin() {
            ctx.register_class(class);
        }
        tracing::debug!(
            toolkit = ctx.inner.toolkit.name(),
            policy = ?ctx.inner.config.option_policy,
            "application context created"
        );
        ctx
    }

    /// Context over a fresh headless toolkit, returned alongside it
    pub fn headless(config: ShimConfig) -> (Self, HeadlessToolkit) {
        let toolkit = HeadlessToolkit::new();
        (Self::with_config(Rc::new(toolkit.clone()), config), toolkit)
    }

    pub(crate) fn from_inner(inner: Rc<ContextInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<ContextInner> {
        Rc::downgrade(&self.inner)
    }

    pub fn toolkit(&self) -> &Rc<dyn HostToolkit> {
        &self.inner.toolkit
    }

    pub fn config(&self) -> &ShimConfig {
        &self.inner.config
    }

    pub fn dispatcher(&self) -> ConfigurationDispatcher {
        self.inner.dispatcher
    }

    /// Read access to the geometry engine
    pub fn geometry(&self) -> Ref<'_, GeometryEngine> {
        self.inner.geometry.borrow()
    }

    pub(crate) fn geometry_mut(&self) -> RefMut<'_, GeometryEngine> {
        self.inner.geometry.borrow_mut()
    }

    /// Geometry mode of `master`
    pub fn mode_of(&self, master: &Widget) -> GeometryMode {
        self.inner.geometry.borrow().mode(master.id())
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// Register a widget class, replacing any class of the same name
    pub fn register_class(&self, class: WidgetClass) -> Rc<WidgetClass> {
        let class = Rc::new(class);
        let previous = self
            .inner
            .classes
            .borrow_mut()
            .insert(class.name().to_string(), class.clone());
        if previous.is_some() {
            tracing::debug!(class = class.name(), "widget class replaced");
        }
        class
    }

    pub fn class(&self, name: &str) -> Option<Rc<WidgetClass>> {
        self.inner.classes.borrow().get(name).cloned()
    }

    /// Registered class names, sorted
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.inner.classes.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    // ========================================================================
    // Widgets
    // ========================================================================

    /// Create the main window
    pub fn tk(&self) -> Result<Widget> {
        self.create_window("Tk")
    }

    /// Create an additional toplevel window
    pub fn toplevel(&self) -> Result<Widget> {
        self.create_window("Toplevel")
    }

    fn create_window(&self, class: &str) -> Result<Widget> {
        let class = self.lookup(class)?;
        let host = self.inner.toolkit.create_window()?;
        Ok(self.register_widget(class, host, None))
    }

    /// Create a widget of class `class` under `master` and apply `options`
    ///
    /// Window classes ignore `master` and become toplevels. If an option fails
    /// fatally the half-built widget is destroyed and the error returned.
    pub fn create(&self, class: &str, master: &Widget, options: Options) -> Result<Widget> {
        if master.is_destroyed() {
            return Err(AppError::Destroyed(master.id()));
        }
        let class = self.lookup(class)?;
        let widget = if class.class_role() == ClassRole::Window {
            let host = self.inner.toolkit.create_window()?;
            self.register_widget(class, host, None)
        } else {
            let host = self.inner.toolkit.create_widget(class.host_class())?;
            self.register_widget(class, host, Some(master))
        };
        if let Err(err) = widget.configure(options) {
            widget.destroy();
            return Err(err);
        }
        Ok(widget)
    }

    fn lookup(&self, class: &str) -> Result<Rc<WidgetClass>> {
        self.class(class)
            .ok_or_else(|| AppError::UnknownClass(class.to_string()))
    }

    fn register_widget(
        &self,
        class: Rc<WidgetClass>,
        host: HostHandle,
        master: Option<&Widget>,
    ) -> Widget {
        let serial = self.inner.next_serial.get();
        self.inner.next_serial.set(serial + 1);
        let ctx = self.downgrade();
        let mut widgets = self.inner.widgets.borrow_mut();
        let id = widgets.insert_with_key(|id| Widget::new(id, serial, class, host, master, ctx));
        let widget = widgets[id].clone();
        tracing::trace!(widget = ?id, class = widget.class_name(), "widget created");
        widget
    }

    /// Live widget by id
    pub fn widget(&self, id: WidgetId) -> Option<Widget> {
        self.inner.widgets.borrow().get(id).cloned()
    }

    /// Number of live widgets
    pub fn widget_count(&self) -> usize {
        self.inner.widgets.borrow().len()
    }

    /// Live widgets created with `master` as their master, in creation order
    pub fn children_of(&self, master: WidgetId) -> Vec<Widget> {
        let mut children: Vec<Widget> = self
            .inner
            .widgets
            .borrow()
            .values()
            .filter(|w| w.master_id() == Some(master))
            .cloned()
            .collect();
        children.sort_by_key(Widget::serial);
        children
    }

    pub(crate) fn unregister(&self, id: WidgetId) {
        self.inner.widgets.borrow_mut().remove(id);
    }

    // ========================================================================
    // Main loop
    // ========================================================================

    /// Hand control to the host loop until [`AppContext::quit`]
    pub fn mainloop(&self) {
        tracing::debug!(widgets = self.widget_count(), "entering main loop");
        self.inner.toolkit.main_loop();
    }

    pub fn quit(&self) {
        self.inner.toolkit.quit();
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("toolkit", &self.inner.toolkit.name())
            .field("policy", &self.inner.config.option_policy)
            .field("widgets", &self.widget_count())
            .finish()
    }
}
