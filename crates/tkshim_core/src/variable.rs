//! Observable variables
//!
//! A [`Variable<T>`] holds one value and an ordered list of subscribers.
//! Subscribers take no arguments; they re-read the variable with
//! [`Variable::get`] when notified.
//!
//! Notification rules:
//! - `set` with a value equal to the stored one is a no-op and notifies no one
//! - otherwise every subscriber runs once, in subscription order, before
//!   `set` returns
//! - `set` may be called again from inside a subscriber; the equality check is
//!   the only thing that stops a two-way binding from looping
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tkshim_core::variable::StringVar;
//!
//! let name = StringVar::new("ada".to_string());
//! let seen = Rc::new(Cell::new(0));
//! let counter = seen.clone();
//! let _sub = name.subscribe(move || counter.set(counter.get() + 1));
//!
//! name.set("ada".to_string()); // unchanged, no notification
//! name.set("grace".to_string());
//! assert_eq!(seen.get(), 1);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{CoreError, Result};
use crate::value::{same_float, FromOptionValue, OptionValue};

/// Variable holding text
pub type StringVar = Variable<String>;
/// Variable holding an integer
pub type IntVar = Variable<i64>;
/// Variable holding a flag
pub type BooleanVar = Variable<bool>;
/// Variable holding a float
pub type DoubleVar = Variable<f64>;

/// Types that can live inside a [`Variable`]
pub trait VariableValue: Clone + PartialEq + fmt::Debug + 'static {
    /// Kind name used in logs and type errors
    const KIND: &'static str;

    fn to_option(&self) -> OptionValue;

    fn from_option(value: &OptionValue) -> Result<Self>;

    /// Equality used by `set` to decide whether anything changed
    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

impl VariableValue for String {
    const KIND: &'static str = "StringVar";

    fn to_option(&self) -> OptionValue {
        OptionValue::Str(self.clone())
    }

    fn from_option(value: &OptionValue) -> Result<Self> {
        String::from_option_value(value)
    }
}

impl VariableValue for i64 {
    const KIND: &'static str = "IntVar";

    fn to_option(&self) -> OptionValue {
        OptionValue::Int(*self)
    }

    fn from_option(value: &OptionValue) -> Result<Self> {
        match value {
            // Scales report floats; an IntVar truncates them.
            OptionValue::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
            other => i64::from_option_value(other),
        }
    }
}

impl VariableValue for bool {
    const KIND: &'static str = "BooleanVar";

    fn to_option(&self) -> OptionValue {
        OptionValue::Bool(*self)
    }

    fn from_option(value: &OptionValue) -> Result<Self> {
        bool::from_option_value(value)
    }
}

impl VariableValue for f64 {
    const KIND: &'static str = "DoubleVar";

    fn to_option(&self) -> OptionValue {
        OptionValue::Float(*self)
    }

    fn from_option(value: &OptionValue) -> Result<Self> {
        f64::from_option_value(value)
    }

    fn same(&self, other: &Self) -> bool {
        same_float(*self, *other)
    }
}

// ============================================================================
// Subscribers
// ============================================================================

new_key_type! {
    /// Key of one subscriber inside a variable's list
    pub struct SubscriberKey;
}

type SubscriberFn = Rc<dyn Fn()>;

/// Ordered subscriber storage shared by all variable kinds
#[derive(Default)]
struct Subscribers {
    entries: RefCell<SlotMap<SubscriberKey, SubscriberFn>>,
    // registration order
    order: RefCell<Vec<SubscriberKey>>,
}

impl Subscribers {
    fn add(&self, f: SubscriberFn) -> SubscriberKey {
        let key = self.entries.borrow_mut().insert(f);
        self.order.borrow_mut().push(key);
        key
    }

    fn remove(&self, key: SubscriberKey) -> bool {
        let removed = self.entries.borrow_mut().remove(key).is_some();
        if removed {
            self.order.borrow_mut().retain(|k| *k != key);
        }
        removed
    }

    fn contains(&self, key: SubscriberKey) -> bool {
        self.entries.borrow().contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    fn snapshot(&self) -> SmallVec<[(SubscriberKey, SubscriberFn); 4]> {
        let entries = self.entries.borrow();
        self.order
            .borrow()
            .iter()
            .filter_map(|k| entries.get(*k).map(|f| (*k, f.clone())))
            .collect()
    }

    /// Run every subscriber registered at the time of the call.
    ///
    /// No borrow is held while a subscriber runs, so subscribers may read the
    /// variable, set it again, subscribe or dispose.
    fn notify(&self) {
        for (key, subscriber) in self.snapshot() {
            // disposed by an earlier subscriber in this round
            if !self.contains(key) {
                continue;
            }
            subscriber();
        }
    }
}

/// Removal side of a subscriber list, type-erased for [`Subscription`]
trait SubscriberList {
    fn remove_subscriber(&self, key: SubscriberKey) -> bool;
    fn has_subscriber(&self, key: SubscriberKey) -> bool;
}

/// Handle returned by `subscribe`
///
/// Dropping the handle keeps the subscriber alive; call [`Subscription::dispose`]
/// to remove it. Widgets dispose their subscriptions on destroy.
#[must_use = "keep the subscription to be able to dispose it"]
pub struct Subscription {
    key: SubscriberKey,
    list: Weak<dyn SubscriberList>,
}

impl Subscription {
    /// Remove the subscriber. Returns `false` if it was already gone.
    pub fn dispose(self) -> bool {
        match self.list.upgrade() {
            Some(list) => list.remove_subscriber(self.key),
            None => false,
        }
    }

    /// Whether the subscriber is still registered
    pub fn is_active(&self) -> bool {
        self.list
            .upgrade()
            .is_some_and(|list| list.has_subscriber(self.key))
    }

    pub fn key(&self) -> SubscriberKey {
        self.key
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("active", &self.is_active())
            .finish()
    }
}

// ============================================================================
// Variable
// ============================================================================

struct VariableInner<T> {
    value: RefCell<T>,
    subscribers: Subscribers,
}

impl<T: 'static> SubscriberList for VariableInner<T> {
    fn remove_subscriber(&self, key: SubscriberKey) -> bool {
        self.subscribers.remove(key)
    }

    fn has_subscriber(&self, key: SubscriberKey) -> bool {
        self.subscribers.contains(key)
    }
}

/// Observable value holder (cheap to clone, clones share state)
pub struct Variable<T> {
    inner: Rc<VariableInner<T>>,
}

impl<T> Clone for Variable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: VariableValue> Variable<T> {
    /// Create a variable with an initial value
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(VariableInner {
                value: RefCell::new(value),
                subscribers: Subscribers::default(),
            }),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Store `value` and notify subscribers if it differs from the current one
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if current.same(&value) {
                return false;
            }
            *current = value;
        }
        tracing::trace!(
            kind = T::KIND,
            subscribers = self.inner.subscribers.len(),
            "variable changed"
        );
        self.inner.subscribers.notify();
        true
    }

    /// Update the value using a function
    pub fn update(&self, f: impl FnOnce(T) -> T) -> bool {
        self.set(f(self.get()))
    }

    /// Register a subscriber; it runs after every effective `set`
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.subscribe_rc(Rc::new(f))
    }

    fn subscribe_rc(&self, f: SubscriberFn) -> Subscription {
        let key = self.inner.subscribers.add(f);
        let list: Rc<dyn SubscriberList> = self.inner.clone();
        Subscription {
            key,
            list: Rc::downgrade(&list),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Whether both handles share the same storage
    pub fn ptr_eq(&self, other: &Variable<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: VariableValue + Default> Default for Variable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: VariableValue> fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(T::KIND)
            .field("value", &*self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.len())
            .finish()
    }
}

// ============================================================================
// Type-erased access
// ============================================================================

/// Object-safe view of a variable, used by option setters that do not know
/// the concrete value type
pub trait AnyVariable {
    fn kind(&self) -> &'static str;

    fn value(&self) -> OptionValue;

    /// Convert and store; returns whether the value changed
    fn set_value(&self, value: &OptionValue) -> Result<bool>;

    fn subscribe_fn(&self, f: Rc<dyn Fn()>) -> Subscription;

    fn storage_addr(&self) -> *const ();
}

impl<T: VariableValue> AnyVariable for Variable<T> {
    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn value(&self) -> OptionValue {
        self.inner.value.borrow().to_option()
    }

    fn set_value(&self, value: &OptionValue) -> Result<bool> {
        let converted = T::from_option(value).map_err(|err| match err {
            CoreError::TypeMismatch { actual, .. } => CoreError::TypeMismatch {
                expected: T::KIND,
                actual,
            },
            other => other,
        })?;
        Ok(self.set(converted))
    }

    fn subscribe_fn(&self, f: Rc<dyn Fn()>) -> Subscription {
        self.subscribe_rc(f)
    }

    fn storage_addr(&self) -> *const () {
        Rc::as_ptr(&self.inner) as *const ()
    }
}

/// Shared, type-erased handle to a variable (what `textvariable=` carries)
#[derive(Clone)]
pub struct VariableRef(Rc<dyn AnyVariable>);

impl VariableRef {
    pub fn kind(&self) -> &'static str {
        self.0.kind()
    }

    pub fn get(&self) -> OptionValue {
        self.0.value()
    }

    pub fn set(&self, value: &OptionValue) -> Result<bool> {
        self.0.set_value(value)
    }

    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.0.subscribe_fn(Rc::new(f))
    }

    /// Whether both handles refer to the same variable storage
    pub fn ptr_eq(&self, other: &VariableRef) -> bool {
        self.0.storage_addr() == other.0.storage_addr()
    }
}

impl<T: VariableValue> From<&Variable<T>> for VariableRef {
    fn from(var: &Variable<T>) -> Self {
        VariableRef(Rc::new(var.clone()))
    }
}

impl fmt::Debug for VariableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind(), self.get())
    }
}
