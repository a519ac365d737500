//! Host signals and events

use std::rc::Rc;

use tkshim_core::OptionValue;

/// Native signals a widget may emit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostSignal {
    /// Button click, menu activation
    Activate,
    /// User edited the value (text typed, box toggled, slider moved)
    Changed,
    ButtonPress,
    ButtonRelease,
    Motion,
    Enter,
    Leave,
    KeyPress,
    FocusIn,
    FocusOut,
}

/// Event payload delivered to signal handlers
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostEvent {
    /// New value for [`HostSignal::Changed`]
    pub value: Option<OptionValue>,
    /// Mouse button number (1 = primary)
    pub button: Option<u32>,
    /// Pointer position relative to the widget
    pub x: f64,
    pub y: f64,
    /// Key name for key events
    pub key: Option<String>,
}

impl HostEvent {
    /// Event carrying a changed value
    pub fn changed(value: impl Into<OptionValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Pointer button event
    pub fn button(button: u32, x: f64, y: f64) -> Self {
        Self {
            button: Some(button),
            x,
            y,
            ..Default::default()
        }
    }

    /// Key event
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Default::default()
        }
    }
}

/// Signal handler callback
pub type SignalHandler = Rc<dyn Fn(&HostEvent)>;
