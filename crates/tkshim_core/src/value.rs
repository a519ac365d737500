//! Option values
//!
//! [`OptionValue`] is the dynamically typed value carried through
//! `configure`, `cget` and the host property fallback. It mirrors the
//! loose typing of the API being emulated: integers, floats, strings,
//! booleans, lists, callables and bound variables all travel through the
//! same channel and are narrowed by the setter that finally consumes them.
//!
//! [`Options`] is the ordered key/value bag handed to `configure` and to
//! widget constructors. Insertion order is preserved so options apply in the
//! order the caller wrote them.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{CoreError, Result};
use crate::variable::{Variable, VariableRef, VariableValue};

/// A callable attached to a `command`-style option
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self(Rc::new(f))
    }

    /// Invoke the callback
    pub fn call(&self) {
        (self.0)()
    }

    /// Whether both handles point at the same closure
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Dynamically typed option value
#[derive(Clone, Debug, Default)]
pub enum OptionValue {
    /// Explicit absence of a value
    #[default]
    None,
    /// Boolean flag
    Bool(bool),
    /// Integer (pixels, counts, indices)
    Int(i64),
    /// Floating point number
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Ordered list of values (e.g. `resizable = (true, false)`)
    List(Vec<OptionValue>),
    /// A bound reactive variable
    Variable(VariableRef),
    /// A callable
    Command(Callback),
}

impl OptionValue {
    /// Extract as bool
    ///
    /// Integers are accepted as truth values, matching `0`/`1` flags.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(v) => Some(*v),
            OptionValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Extract as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract as f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Float(v) => Some(*v),
            OptionValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Extract as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Extract as list
    pub fn as_list(&self) -> Option<&[OptionValue]> {
        match self {
            OptionValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Extract as bound variable
    pub fn as_variable(&self) -> Option<&VariableRef> {
        match self {
            OptionValue::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Extract as callable
    pub fn as_command(&self) -> Option<&Callback> {
        match self {
            OptionValue::Command(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, OptionValue::None)
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::None => "None",
            OptionValue::Bool(_) => "Bool",
            OptionValue::Int(_) => "Int",
            OptionValue::Float(_) => "Float",
            OptionValue::Str(_) => "Str",
            OptionValue::List(_) => "List",
            OptionValue::Variable(_) => "Variable",
            OptionValue::Command(_) => "Command",
        }
    }

    /// Render the value the way a text display shows it
    pub fn display_text(&self) -> String {
        match self {
            OptionValue::Variable(var) => var.get().display_text(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::None => Ok(()),
            OptionValue::Bool(v) => write!(f, "{}", if *v { 1 } else { 0 }),
            OptionValue::Int(v) => write!(f, "{v}"),
            OptionValue::Float(v) => write!(f, "{v}"),
            OptionValue::Str(v) => f.write_str(v),
            OptionValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            OptionValue::Variable(var) => write!(f, "{}", var.get()),
            OptionValue::Command(cb) => write!(f, "{cb:?}"),
        }
    }
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OptionValue::None, OptionValue::None) => true,
            (OptionValue::Bool(a), OptionValue::Bool(b)) => a == b,
            (OptionValue::Int(a), OptionValue::Int(b)) => a == b,
            (OptionValue::Float(a), OptionValue::Float(b)) => same_float(*a, *b),
            (OptionValue::Str(a), OptionValue::Str(b)) => a == b,
            (OptionValue::List(a), OptionValue::List(b)) => a == b,
            (OptionValue::Variable(a), OptionValue::Variable(b)) => a.ptr_eq(b),
            (OptionValue::Command(a), OptionValue::Command(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Float equality where NaN equals NaN, so storing NaN twice is not a change
pub fn same_float(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

// ============================================================================
// Conversion Traits
// ============================================================================

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Int(v as i64)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<u32> for OptionValue {
    fn from(v: u32) -> Self {
        OptionValue::Int(v as i64)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

impl From<Vec<OptionValue>> for OptionValue {
    fn from(v: Vec<OptionValue>) -> Self {
        OptionValue::List(v)
    }
}

impl From<Callback> for OptionValue {
    fn from(v: Callback) -> Self {
        OptionValue::Command(v)
    }
}

impl From<VariableRef> for OptionValue {
    fn from(v: VariableRef) -> Self {
        OptionValue::Variable(v)
    }
}

impl<T: VariableValue> From<&Variable<T>> for OptionValue {
    fn from(v: &Variable<T>) -> Self {
        OptionValue::Variable(VariableRef::from(v))
    }
}

/// Trait for extracting typed values out of an [`OptionValue`]
pub trait FromOptionValue: Sized {
    fn from_option_value(value: &OptionValue) -> Result<Self>;
}

fn mismatch(expected: &'static str, value: &OptionValue) -> CoreError {
    CoreError::TypeMismatch {
        expected,
        actual: value.type_name().to_string(),
    }
}

impl FromOptionValue for bool {
    fn from_option_value(value: &OptionValue) -> Result<Self> {
        if let Some(v) = value.as_bool() {
            return Ok(v);
        }
        match value.as_str().map(str::to_ascii_lowercase).as_deref() {
            Some("1" | "true" | "yes" | "on") => Ok(true),
            Some("0" | "false" | "no" | "off") => Ok(false),
            _ => Err(mismatch("Bool", value)),
        }
    }
}

impl FromOptionValue for i64 {
    fn from_option_value(value: &OptionValue) -> Result<Self> {
        match value {
            OptionValue::Int(v) => Ok(*v),
            OptionValue::Bool(v) => Ok(*v as i64),
            OptionValue::Str(s) => s.trim().parse().map_err(|_| mismatch("Int", value)),
            _ => Err(mismatch("Int", value)),
        }
    }
}

impl FromOptionValue for i32 {
    fn from_option_value(value: &OptionValue) -> Result<Self> {
        let wide = i64::from_option_value(value)?;
        i32::try_from(wide).map_err(|_| mismatch("Int32", value))
    }
}

impl FromOptionValue for u32 {
    fn from_option_value(value: &OptionValue) -> Result<Self> {
        let wide = i64::from_option_value(value)?;
        u32::try_from(wide).map_err(|_| mismatch("non-negative Int", value))
    }
}

impl FromOptionValue for f64 {
    fn from_option_value(value: &OptionValue) -> Result<Self> {
        match value {
            OptionValue::Float(v) => Ok(*v),
            OptionValue::Int(v) => Ok(*v as f64),
            OptionValue::Str(s) => s.trim().parse().map_err(|_| mismatch("Float", value)),
            _ => Err(mismatch("Float", value)),
        }
    }
}

impl FromOptionValue for String {
    fn from_option_value(value: &OptionValue) -> Result<Self> {
        match value {
            OptionValue::Str(s) => Ok(s.clone()),
            OptionValue::Int(_) | OptionValue::Float(_) | OptionValue::Bool(_) => {
                Ok(value.to_string())
            }
            _ => Err(mismatch("Str", value)),
        }
    }
}

impl FromOptionValue for OptionValue {
    fn from_option_value(value: &OptionValue) -> Result<Self> {
        Ok(value.clone())
    }
}

// ============================================================================
// Options bag
// ============================================================================

/// Ordered option key/value pairs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options {
    entries: IndexMap<String, OptionValue>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option (builder style)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an option, keeping its original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read a typed option, falling back to `default` when absent
    pub fn get_or<T: FromOptionValue>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get_opt(key)?.unwrap_or(default))
    }

    /// Read an optional typed option
    pub fn get_opt<T: FromOptionValue>(&self, key: &str) -> Result<Option<T>> {
        match self.entries.get(key) {
            None | Some(OptionValue::None) => Ok(None),
            Some(value) => T::from_option_value(value)
                .map(Some)
                .map_err(|err| match err {
                    CoreError::TypeMismatch { expected, actual } => {
                        CoreError::validation(key, format!("expected {expected}, got {actual}"))
                    }
                    other => other,
                }),
        }
    }
}

impl IntoIterator for Options {
    type Item = (String, OptionValue);
    type IntoIter = indexmap::map::IntoIter<String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Options::new();
        for (k, v) in iter {
            options.insert(k, v);
        }
        options
    }
}
