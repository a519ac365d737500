//! Widget identifiers

use slotmap::{new_key_type, Key};

new_key_type! {
    /// Unique identifier for a widget registered with an application context
    pub struct WidgetId;
}

impl WidgetId {
    /// Convert to raw u64 for logging and host bookkeeping
    pub fn to_raw(&self) -> u64 {
        self.data().as_ffi()
    }

    /// Reconstruct from raw u64
    pub fn from_raw(raw: u64) -> Self {
        slotmap::KeyData::from_ffi(raw).into()
    }
}
