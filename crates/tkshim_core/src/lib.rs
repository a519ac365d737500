//! tkshim core
//!
//! Foundational pieces shared by the geometry engine and the application
//! layer:
//!
//! - **Option values**: the dynamically typed values carried by `configure`
//! - **Reactive variables**: `StringVar`/`IntVar`/`BooleanVar`/`DoubleVar`
//!   with equality-guarded change notification
//! - **Configuration dispatch**: per-class option tables with host fallback
//!   and a lenient/strict unknown-option policy
//!
//! # Example
//!
//! ```rust
//! use tkshim_core::variable::IntVar;
//!
//! let clicks = IntVar::new(0);
//! let shown = clicks.clone();
//! let _sub = clicks.subscribe(move || println!("clicks = {}", shown.get()));
//!
//! clicks.set(1); // prints
//! clicks.set(1); // no-op
//! ```

pub mod dispatch;
pub mod error;
pub mod id;
pub mod value;
pub mod variable;

pub use dispatch::{
    Configurable, ConfigurationDispatcher, ConfigureReport, Getter, OptionPolicy, OptionSpec,
    OptionTable, OptionTableBuilder, Resolution, Setter, UnknownOption,
};
pub use error::{CoreError, Result};
pub use id::WidgetId;
pub use value::{Callback, FromOptionValue, OptionValue, Options};
pub use variable::{
    AnyVariable, BooleanVar, DoubleVar, IntVar, StringVar, Subscription, Variable, VariableRef,
    VariableValue,
};
