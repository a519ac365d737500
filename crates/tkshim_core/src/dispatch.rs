//! Configuration dispatch
//!
//! Resolves an option name to a setter or getter for a widget.
//!
//! # Resolution order
//!
//! `set(widget, key, value)`:
//! 1. the setter registered for `key` in the widget class's [`OptionTable`]
//! 2. the host handle's generic property setter, if it knows `key`
//! 3. nothing matched: log an unknown-option warning and return without
//!    touching the widget ([`OptionPolicy::Lenient`]), or fail with
//!    [`CoreError::UnknownOption`] ([`OptionPolicy::Strict`])
//!
//! `get(widget, key)` walks the same levels with getters, and always fails
//! with [`CoreError::UnknownKey`] when nothing matches. Writes are lenient so
//! partial or speculative configuration never aborts a session; reads are
//! strict because there is no value to fall back to.
//!
//! Option tables are plain function-pointer maps built once per widget class,
//! so the set of supported options can be enumerated and tested.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::value::{OptionValue, Options};

/// Typed setter for one option
pub type Setter<W> = fn(&W, &OptionValue) -> Result<()>;

/// Typed getter for one option
pub type Getter<W> = fn(&W) -> Result<OptionValue>;

/// One entry of an [`OptionTable`]
pub struct OptionSpec<W> {
    name: &'static str,
    setter: Setter<W>,
    getter: Option<Getter<W>>,
}

impl<W> Clone for OptionSpec<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for OptionSpec<W> {}

impl<W> OptionSpec<W> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether reads go through a dedicated getter instead of the
    /// last-applied value
    pub fn has_getter(&self) -> bool {
        self.getter.is_some()
    }
}

/// Enumerated option set of one widget class
pub struct OptionTable<W> {
    class: String,
    specs: IndexMap<&'static str, OptionSpec<W>>,
}

impl<W> OptionTable<W> {
    /// Start building a table for `class`
    pub fn builder(class: impl Into<String>) -> OptionTableBuilder<W> {
        OptionTableBuilder {
            class: class.into(),
            specs: IndexMap::new(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn lookup(&self, name: &str) -> Option<&OptionSpec<W>> {
        self.specs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Supported option names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<W> std::fmt::Debug for OptionTable<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionTable")
            .field("class", &self.class)
            .field("options", &self.specs.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`OptionTable`]
pub struct OptionTableBuilder<W> {
    class: String,
    specs: IndexMap<&'static str, OptionSpec<W>>,
}

impl<W> OptionTableBuilder<W> {
    /// Copy every entry of `base`; later registrations override them
    pub fn inherit(mut self, base: &OptionTable<W>) -> Self {
        for (name, spec) in &base.specs {
            self.specs.insert(*name, *spec);
        }
        self
    }

    /// Register a write-only option; reads return the last-applied value
    pub fn setter(mut self, name: &'static str, setter: Setter<W>) -> Self {
        self.specs.insert(
            name,
            OptionSpec {
                name,
                setter,
                getter: None,
            },
        );
        self
    }

    /// Register an option with a dedicated getter
    pub fn option(mut self, name: &'static str, setter: Setter<W>, getter: Getter<W>) -> Self {
        self.specs.insert(
            name,
            OptionSpec {
                name,
                setter,
                getter: Some(getter),
            },
        );
        self
    }

    pub fn build(self) -> OptionTable<W> {
        OptionTable {
            class: self.class,
            specs: self.specs,
        }
    }
}

/// What a dispatch target must provide
///
/// Implemented by the widget handle. The option table is level 1, the host
/// property accessors are level 2, and the record accessors back the widget's
/// last-applied option table.
pub trait Configurable: Sized {
    fn option_table(&self) -> &OptionTable<Self>;

    /// Host-level generic setter. `None` means the host has no such property.
    fn set_host_property(&self, key: &str, value: &OptionValue) -> Option<Result<()>>;

    /// Host-level generic getter. `None` means the host has no such property.
    fn host_property(&self, key: &str) -> Option<OptionValue>;

    fn record_option(&self, key: &str, value: OptionValue);

    fn recorded_option(&self, key: &str) -> Option<OptionValue>;
}

/// How unknown option writes are treated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionPolicy {
    /// Warn and continue
    #[default]
    Lenient,
    /// Fail with [`CoreError::UnknownOption`]
    Strict,
}

/// Level that handled a `set`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Class option table
    Table,
    /// Host generic property
    Host,
    /// Nobody; a warning was emitted
    Unknown,
}

/// A lenient-mode unknown option
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownOption {
    pub class: String,
    pub option: String,
}

impl std::fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown configuration option '{}' for {}",
            self.option, self.class
        )
    }
}

/// Outcome of a multi-key `configure`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigureReport {
    /// Keys that were applied, in order
    pub applied: Vec<String>,
    /// Keys nobody recognized
    pub warnings: Vec<UnknownOption>,
}

impl ConfigureReport {
    /// No unknown options were seen
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn merge(&mut self, other: ConfigureReport) {
        self.applied.extend(other.applied);
        self.warnings.extend(other.warnings);
    }
}

/// Resolves option reads and writes against a [`Configurable`] target
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfigurationDispatcher {
    policy: OptionPolicy,
}

impl ConfigurationDispatcher {
    pub fn new(policy: OptionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OptionPolicy {
        self.policy
    }

    /// Apply one option
    pub fn set<W: Configurable>(
        &self,
        target: &W,
        key: &str,
        value: OptionValue,
    ) -> Result<Resolution> {
        let table = target.option_table();

        if let Some(spec) = table.lookup(key) {
            (spec.setter)(target, &value)?;
            target.record_option(key, value);
            return Ok(Resolution::Table);
        }

        if let Some(result) = target.set_host_property(key, &value) {
            result?;
            target.record_option(key, value);
            return Ok(Resolution::Host);
        }

        match self.policy {
            OptionPolicy::Lenient => {
                tracing::warn!(
                    class = table.class(),
                    option = key,
                    "Unknown configuration option '{}'",
                    key
                );
                Ok(Resolution::Unknown)
            }
            OptionPolicy::Strict => Err(CoreError::UnknownOption {
                class: table.class().to_string(),
                option: key.to_string(),
            }),
        }
    }

    /// Read one option
    pub fn get<W: Configurable>(&self, target: &W, key: &str) -> Result<OptionValue> {
        let table = target.option_table();

        if let Some(spec) = table.lookup(key) {
            return match spec.getter {
                Some(getter) => getter(target),
                None => Ok(target.recorded_option(key).unwrap_or_default()),
            };
        }

        if let Some(value) = target.host_property(key) {
            return Ok(value);
        }

        Err(CoreError::UnknownKey {
            class: table.class().to_string(),
            option: key.to_string(),
        })
    }

    /// Apply options in order, collecting unknown keys
    ///
    /// The first fatal error stops the walk; options before it stay applied.
    pub fn configure<W: Configurable>(&self, target: &W, options: Options) -> Result<ConfigureReport> {
        let mut report = ConfigureReport::default();
        for (key, value) in options {
            match self.set(target, &key, value)? {
                Resolution::Unknown => report.warnings.push(UnknownOption {
                    class: target.option_table().class().to_string(),
                    option: key,
                }),
                Resolution::Table | Resolution::Host => report.applied.push(key),
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Minimal dispatch target: a label-like widget with one host property
    struct Probe {
        table: OptionTable<Probe>,
        text: RefCell<String>,
        host_visible: RefCell<bool>,
        recorded: RefCell<IndexMap<String, OptionValue>>,
    }

    fn set_text(probe: &Probe, value: &OptionValue) -> Result<()> {
        *probe.text.borrow_mut() = value.display_text();
        Ok(())
    }

    fn get_text(probe: &Probe) -> Result<OptionValue> {
        Ok(OptionValue::Str(probe.text.borrow().clone()))
    }

    fn set_command(_probe: &Probe, value: &OptionValue) -> Result<()> {
        value
            .as_command()
            .map(|_| ())
            .ok_or(CoreError::InvalidCallable {
                option: "command".into(),
                found: value.type_name(),
            })
    }

    impl Probe {
        fn new() -> Self {
            Self {
                table: OptionTable::builder("Probe")
                    .option("text", set_text, get_text)
                    .setter("command", set_command)
                    .build(),
                text: RefCell::new(String::new()),
                host_visible: RefCell::new(true),
                recorded: RefCell::new(IndexMap::new()),
            }
        }
    }

    impl Configurable for Probe {
        fn option_table(&self) -> &OptionTable<Self> {
            &self.table
        }

        fn set_host_property(&self, key: &str, value: &OptionValue) -> Option<Result<()>> {
            (key == "visible").then(|| {
                *self.host_visible.borrow_mut() = value.as_bool().unwrap_or(false);
                Ok(())
            })
        }

        fn host_property(&self, key: &str) -> Option<OptionValue> {
            (key == "visible").then(|| OptionValue::Bool(*self.host_visible.borrow()))
        }

        fn record_option(&self, key: &str, value: OptionValue) {
            self.recorded.borrow_mut().insert(key.to_string(), value);
        }

        fn recorded_option(&self, key: &str) -> Option<OptionValue> {
            self.recorded.borrow().get(key).cloned()
        }
    }

    #[test]
    fn test_table_setter_wins() {
        let probe = Probe::new();
        let dispatcher = ConfigurationDispatcher::default();

        let res = dispatcher.set(&probe, "text", "hi".into()).unwrap();
        assert_eq!(res, Resolution::Table);
        assert_eq!(*probe.text.borrow(), "hi");
        assert_eq!(dispatcher.get(&probe, "text").unwrap(), OptionValue::from("hi"));
        assert_eq!(probe.recorded_option("text"), Some(OptionValue::from("hi")));
    }

    #[test]
    fn test_host_fallback() {
        let probe = Probe::new();
        let dispatcher = ConfigurationDispatcher::default();

        let res = dispatcher.set(&probe, "visible", false.into()).unwrap();
        assert_eq!(res, Resolution::Host);
        assert_eq!(dispatcher.get(&probe, "visible").unwrap(), OptionValue::Bool(false));
    }

    #[test]
    fn test_unknown_write_is_lenient() {
        let probe = Probe::new();
        let dispatcher = ConfigurationDispatcher::new(OptionPolicy::Lenient);

        let report = dispatcher
            .configure(&probe, Options::new().with("bogus_option", "x"))
            .unwrap();
        assert_eq!(
            report.warnings,
            vec![UnknownOption {
                class: "Probe".into(),
                option: "bogus_option".into()
            }]
        );
        assert!(report.applied.is_empty());
        assert!(probe.recorded.borrow().is_empty());
    }

    #[test]
    fn test_unknown_write_strict() {
        let probe = Probe::new();
        let dispatcher = ConfigurationDispatcher::new(OptionPolicy::Strict);

        let err = dispatcher.set(&probe, "bogus_option", "x".into()).unwrap_err();
        assert!(matches!(err, CoreError::UnknownOption { .. }));
        assert!(probe.recorded.borrow().is_empty());
    }

    #[test]
    fn test_unknown_read_is_strict() {
        let probe = Probe::new();
        let dispatcher = ConfigurationDispatcher::default();

        let err = dispatcher.get(&probe, "bogus_option").unwrap_err();
        assert_eq!(
            err,
            CoreError::UnknownKey {
                class: "Probe".into(),
                option: "bogus_option".into()
            }
        );
    }

    #[test]
    fn test_setter_only_reads_last_applied() {
        let probe = Probe::new();
        let dispatcher = ConfigurationDispatcher::default();

        assert_eq!(dispatcher.get(&probe, "command").unwrap(), OptionValue::None);
        let cb = crate::value::Callback::new(|| {});
        dispatcher.set(&probe, "command", cb.clone().into()).unwrap();
        assert_eq!(dispatcher.get(&probe, "command").unwrap(), OptionValue::Command(cb));
    }

    #[test]
    fn test_invalid_callable_is_fatal_and_not_recorded() {
        let probe = Probe::new();
        let dispatcher = ConfigurationDispatcher::default();

        let err = dispatcher
            .configure(
                &probe,
                Options::new().with("text", "kept").with("command", 3),
            )
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidCallable {
                option: "command".into(),
                found: "Int"
            }
        );
        assert_eq!(*probe.text.borrow(), "kept");
        assert_eq!(probe.recorded_option("command"), None);
    }

    #[test]
    fn test_inherit_and_override() {
        fn noop(_: &Probe, _: &OptionValue) -> Result<()> {
            Ok(())
        }
        let base = OptionTable::<Probe>::builder("Base")
            .setter("bg", noop)
            .setter("text", noop)
            .build();
        let derived = OptionTable::<Probe>::builder("Derived")
            .inherit(&base)
            .option("text", set_text, get_text)
            .build();

        assert_eq!(derived.names().collect::<Vec<_>>(), vec!["bg", "text"]);
        assert!(derived.lookup("text").unwrap().has_getter());
        assert!(!derived.lookup("bg").unwrap().has_getter());
    }
}
