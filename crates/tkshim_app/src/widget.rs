//! Widget handle
//!
//! A [`Widget`] wraps one host control. It carries its class (capability
//! set), a weak link to its master, the last-applied option values, and the
//! links it owns: a bound variable, a connected command and event bindings.
//!
//! Widgets stay alive while registered with their [`AppContext`]; dropping a
//! handle never destroys anything. [`Widget::destroy`] is the only teardown.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use smallvec::SmallVec;
use tkshim_core::{
    Configurable, ConfigureReport, CoreError, OptionTable, OptionValue, Options, Resolution,
    Result as CoreResult, Subscription, VariableRef, WidgetId,
};
use tkshim_layout::{
    ChildRef, GeometryEngine, GeometryError, GridOptions, MasterRef, PackOptions, PlaceOptions,
    PlacementEntry,
};
use tkshim_platform::{HandlerId, HostEvent, HostHandle, HostSignal};

use crate::class::WidgetClass;
use crate::context::{AppContext, ContextInner};
use crate::error::{AppError, Result};
use crate::event::EventSequence;

/// Handle to one widget
///
/// Cloning yields another handle to the same widget.
#[derive(Clone)]
pub struct Widget {
    inner: Rc<WidgetInner>,
}

struct WidgetInner {
    id: WidgetId,
    serial: u64,
    class: Rc<WidgetClass>,
    host: HostHandle,
    master: Option<(WidgetId, Weak<WidgetInner>)>,
    ctx: Weak<ContextInner>,
    options: RefCell<IndexMap<String, OptionValue>>,
    links: RefCell<Links>,
    destroyed: Cell<bool>,
}

/// Connections a widget owns and must release on destroy
#[derive(Default)]
struct Links {
    variable: Option<VariableLink>,
    command: Option<HandlerId>,
    events: IndexMap<String, SmallVec<[HandlerId; 2]>>,
}

struct VariableLink {
    variable: VariableRef,
    subscription: Subscription,
    /// Host change handler feeding user edits back into the variable
    on_change: Option<HandlerId>,
}

impl Links {
    fn release(self, host: &HostHandle) {
        if let Some(link) = self.variable {
            link.release(host);
        }
        if let Some(handler) = self.command {
            host.disconnect(handler);
        }
        for handler in self.events.into_values().flatten() {
            host.disconnect(handler);
        }
    }
}

impl VariableLink {
    fn release(self, host: &HostHandle) {
        self.subscription.dispose();
        if let Some(handler) = self.on_change {
            host.disconnect(handler);
        }
    }
}

impl Widget {
    pub(crate) fn new(
        id: WidgetId,
        serial: u64,
        class: Rc<WidgetClass>,
        host: HostHandle,
        master: Option<&Widget>,
        ctx: Weak<ContextInner>,
    ) -> Self {
        Self {
            inner: Rc::new(WidgetInner {
                id,
                serial,
                class,
                host,
                master: master.map(|m| (m.id(), Rc::downgrade(&m.inner))),
                ctx,
                options: RefCell::default(),
                links: RefCell::default(),
                destroyed: Cell::new(false),
            }),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.inner.id
    }

    /// Creation order within the context
    pub(crate) fn serial(&self) -> u64 {
        self.inner.serial
    }

    pub fn class(&self) -> &WidgetClass {
        &self.inner.class
    }

    pub fn class_name(&self) -> &str {
        self.inner.class.name()
    }

    pub fn host(&self) -> &HostHandle {
        &self.inner.host
    }

    pub fn master(&self) -> Option<Widget> {
        let (_, weak) = self.inner.master.as_ref()?;
        weak.upgrade().map(|inner| Widget { inner })
    }

    pub fn master_id(&self) -> Option<WidgetId> {
        self.inner.master.as_ref().map(|(id, _)| *id)
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    pub fn ptr_eq(&self, other: &Widget) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn context(&self) -> Result<AppContext> {
        self.inner
            .ctx
            .upgrade()
            .map(AppContext::from_inner)
            .ok_or(AppError::Destroyed(self.inner.id))
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(AppError::Destroyed(self.inner.id));
        }
        Ok(())
    }

    /// Widgets created with this widget as master
    pub fn children(&self) -> Vec<Widget> {
        self.context()
            .map(|ctx| ctx.children_of(self.id()))
            .unwrap_or_default()
    }

    /// Create a child widget of class `class`
    pub fn create_child(&self, class: &str, options: Options) -> Result<Widget> {
        self.context()?.create(class, self, options)
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Apply options in order through the configuration dispatcher
    pub fn configure(&self, options: Options) -> Result<ConfigureReport> {
        self.ensure_alive()?;
        let report = self.context()?.dispatcher().configure(self, options)?;
        Ok(report)
    }

    /// Alias of [`Widget::configure`]
    pub fn config(&self, options: Options) -> Result<ConfigureReport> {
        self.configure(options)
    }

    /// Apply a single option
    pub fn set(&self, key: &str, value: impl Into<OptionValue>) -> Result<Resolution> {
        self.ensure_alive()?;
        Ok(self.context()?.dispatcher().set(self, key, value.into())?)
    }

    /// Read an option
    pub fn cget(&self, key: &str) -> Result<OptionValue> {
        self.ensure_alive()?;
        Ok(self.context()?.dispatcher().get(self, key)?)
    }

    /// Options this widget's class supports
    pub fn keys(&self) -> Vec<&'static str> {
        self.inner.class.table().names().collect()
    }

    /// Last-applied options, in first-applied order
    pub fn applied_options(&self) -> Vec<(String, OptionValue)> {
        self.inner
            .options
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Current value of the host display property
    pub fn display_value(&self) -> Option<OptionValue> {
        let display = self.inner.class.display_property()?;
        self.inner.host.property(display.name)
    }

    /// Stored option as `T`, if set
    pub(crate) fn recorded<T: tkshim_core::FromOptionValue>(&self, key: &str) -> Option<T> {
        let value = self.inner.options.borrow().get(key).cloned()?;
        T::from_option_value(&value).ok()
    }

    // ========================================================================
    // Variable and command links
    // ========================================================================

    /// Bind `variable` to the display property
    ///
    /// The variable's current value is shown immediately and after every
    /// change. Editable classes also push user edits back into the variable.
    pub(crate) fn bind_variable(&self, variable: VariableRef) -> CoreResult<()> {
        self.unbind_variable();
        self.push_display(&variable.get())?;

        let weak = Rc::downgrade(&self.inner);
        let subscription = variable.subscribe(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let widget = Widget { inner };
            let value = widget.bound_variable().map(|v| v.get());
            if let Some(value) = value {
                if let Err(err) = widget.push_display(&value) {
                    tracing::warn!(widget = ?widget.id(), %err, "failed to display variable");
                }
            }
        });

        let on_change = self.inner.class.is_editable().then(|| {
            let weak = Rc::downgrade(&self.inner);
            self.inner.host.connect(
                HostSignal::Changed,
                Rc::new(move |event: &HostEvent| {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    let widget = Widget { inner };
                    let (Some(variable), Some(value)) = (widget.bound_variable(), &event.value)
                    else {
                        return;
                    };
                    if let Err(err) = variable.set(value) {
                        tracing::warn!(widget = ?widget.id(), %err, "edit rejected by variable");
                    }
                }),
            )
        });

        tracing::trace!(widget = ?self.id(), kind = variable.kind(), "variable bound");
        self.inner.links.borrow_mut().variable = Some(VariableLink {
            variable,
            subscription,
            on_change,
        });
        Ok(())
    }

    pub(crate) fn unbind_variable(&self) {
        let link = self.inner.links.borrow_mut().variable.take();
        if let Some(link) = link {
            link.release(&self.inner.host);
        }
    }

    pub fn bound_variable(&self) -> Option<VariableRef> {
        self.inner
            .links
            .borrow()
            .variable
            .as_ref()
            .map(|l| l.variable.clone())
    }

    fn push_display(&self, value: &OptionValue) -> CoreResult<()> {
        let Some(display) = self.inner.class.display_property() else {
            return Ok(());
        };
        let value = if display.as_text {
            OptionValue::Str(value.display_text())
        } else {
            value.clone()
        };
        self.inner
            .host
            .set_property(display.name, &value)
            .unwrap_or(Ok(()))
    }

    /// Connect `value` to the host activation signal, replacing any
    /// previously connected command. `None` just disconnects.
    pub(crate) fn set_command(&self, value: &OptionValue) -> CoreResult<()> {
        let callback = match value {
            OptionValue::Command(callback) => Some(callback.clone()),
            OptionValue::None => None,
            other => {
                return Err(CoreError::InvalidCallable {
                    option: "command".to_string(),
                    found: other.type_name(),
                })
            }
        };

        let previous = self.inner.links.borrow_mut().command.take();
        if let Some(handler) = previous {
            self.inner.host.disconnect(handler);
        }
        if let Some(callback) = callback {
            let handler = self
                .inner
                .host
                .connect(HostSignal::Activate, Rc::new(move |_: &HostEvent| callback.call()));
            self.inner.links.borrow_mut().command = Some(handler);
        }
        Ok(())
    }

    // ========================================================================
    // Event binding
    // ========================================================================

    /// Connect `handler` to an event sequence such as `<Button-1>`
    ///
    /// Handlers accumulate per sequence. Returns `false` for an unsupported
    /// sequence, which binds nothing.
    pub fn bind<F>(&self, sequence: &str, handler: F) -> bool
    where
        F: Fn(&HostEvent) + 'static,
    {
        let Some(parsed) = EventSequence::parse(sequence) else {
            tracing::warn!(widget = ?self.id(), sequence, "Unsupported event sequence");
            return false;
        };
        let handler_id = self.inner.host.connect(
            parsed.signal(),
            Rc::new(move |event: &HostEvent| {
                if parsed.matches(event) {
                    handler(event);
                }
            }),
        );
        self.inner
            .links
            .borrow_mut()
            .events
            .entry(sequence.to_string())
            .or_default()
            .push(handler_id);
        true
    }

    /// Disconnect every handler bound to `sequence`; returns how many
    pub fn unbind(&self, sequence: &str) -> usize {
        let handlers = self.inner.links.borrow_mut().events.shift_remove(sequence);
        let handlers = handlers.unwrap_or_default();
        for handler in &handlers {
            self.inner.host.disconnect(*handler);
        }
        handlers.len()
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    fn with_geometry<R>(
        &self,
        f: impl FnOnce(
            &mut GeometryEngine,
            MasterRef<'_>,
            ChildRef<'_>,
        ) -> std::result::Result<R, GeometryError>,
    ) -> Result<R> {
        self.ensure_alive()?;
        let Some((master_id, weak)) = &self.inner.master else {
            return Err(AppError::Toplevel(self.id()));
        };
        let master = weak
            .upgrade()
            .map(|inner| Widget { inner })
            .ok_or(AppError::Destroyed(*master_id))?;
        master.ensure_alive()?;
        let ctx = self.context()?;
        let mut engine = ctx.geometry_mut();
        let result = f(
            &mut *engine,
            MasterRef {
                id: master.id(),
                host: master.host(),
                nesting: master.class().nesting(),
            },
            ChildRef {
                id: self.id(),
                host: self.host(),
            },
        )?;
        Ok(result)
    }

    pub fn pack(&self, options: PackOptions) -> Result<()> {
        self.with_geometry(|engine, master, child| engine.pack(master, child, options))
    }

    /// `pack` with loose key/value options
    pub fn pack_with(&self, options: &Options) -> Result<()> {
        self.pack(PackOptions::from_options(options)?)
    }

    pub fn grid(&self, options: GridOptions) -> Result<()> {
        self.with_geometry(|engine, master, child| engine.grid(master, child, options))
    }

    /// `grid` with loose key/value options
    pub fn grid_with(&self, options: &Options) -> Result<()> {
        self.grid(GridOptions::from_options(options)?)
    }

    pub fn place(&self, options: PlaceOptions) -> Result<()> {
        self.with_geometry(|engine, master, child| engine.place(master, child, options))
    }

    /// `place` with loose key/value options
    pub fn place_with(&self, options: &Options) -> Result<()> {
        self.place(PlaceOptions::from_options(options)?)
    }

    /// `place` with positional `(x, y)` or `(x, y, width, height)`
    pub fn place_at(&self, args: &[i32]) -> Result<()> {
        self.place(PlaceOptions::from_args(args)?)
    }

    /// Remove this widget from its master's layout; returns whether it was
    /// placed
    pub fn forget(&self) -> bool {
        match self.context() {
            Ok(ctx) => ctx.geometry_mut().forget(self.id()),
            Err(_) => false,
        }
    }

    pub fn pack_forget(&self) -> bool {
        self.forget()
    }

    pub fn grid_forget(&self) -> bool {
        self.forget()
    }

    pub fn place_forget(&self) -> bool {
        self.forget()
    }

    /// Recorded placement entry
    pub fn placement(&self) -> Option<PlacementEntry> {
        let ctx = self.context().ok()?;
        let entry = ctx.geometry().entry(self.id());
        entry
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Destroy this widget and its descendants
    ///
    /// Releases bound variables, commands and event handlers, removes the
    /// widget from its master's layout and drops its own layout state.
    /// Destroying twice is a no-op.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }
        let ctx = self.context().ok();
        if let Some(ctx) = &ctx {
            for child in ctx.children_of(self.id()) {
                child.destroy();
            }
            let mut engine = ctx.geometry_mut();
            engine.forget(self.id());
            engine.forget_master(self.id(), &self.inner.host);
        }

        let links = std::mem::take(&mut *self.inner.links.borrow_mut());
        links.release(&self.inner.host);
        self.inner.host.destroy();

        if let Some(ctx) = &ctx {
            ctx.unregister(self.id());
        }
        tracing::debug!(widget = ?self.id(), class = self.class_name(), "widget destroyed");
    }
}

impl Configurable for Widget {
    fn option_table(&self) -> &OptionTable<Self> {
        self.inner.class.table()
    }

    fn set_host_property(&self, key: &str, value: &OptionValue) -> Option<CoreResult<()>> {
        self.inner.host.set_property(key, value)
    }

    fn host_property(&self, key: &str) -> Option<OptionValue> {
        self.inner.host.property(key)
    }

    fn record_option(&self, key: &str, value: OptionValue) {
        self.inner.options.borrow_mut().insert(key.to_string(), value);
    }

    fn recorded_option(&self, key: &str) -> Option<OptionValue> {
        self.inner.options.borrow().get(key).cloned()
    }
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("id", &self.inner.id)
            .field("class", &self.class_name())
            .field("host", &self.inner.host.host_id())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
