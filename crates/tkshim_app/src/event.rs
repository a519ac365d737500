//! Event sequences for `bind`

use tkshim_platform::{HostEvent, HostSignal};

/// A parsed `<...>` event sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventSequence {
    signal: HostSignal,
    /// Only fire for this mouse button
    button: Option<u32>,
}

impl EventSequence {
    /// Parse a supported sequence
    ///
    /// `<Button-N>`, `<ButtonPress-N>` and `<ButtonRelease-N>` take a button
    /// number from 1 to 5. `<Motion>`, `<Enter>`, `<Leave>`, `<Key>`,
    /// `<KeyPress>`, `<FocusIn>` and `<FocusOut>` take none.
    pub fn parse(sequence: &str) -> Option<Self> {
        let body = sequence.strip_prefix('<')?.strip_suffix('>')?;
        let (name, detail) = match body.split_once('-') {
            Some((name, detail)) => (name, Some(detail)),
            None => (body, None),
        };

        let signal = match name {
            "Button" | "ButtonPress" => HostSignal::ButtonPress,
            "ButtonRelease" => HostSignal::ButtonRelease,
            "Motion" => HostSignal::Motion,
            "Enter" => HostSignal::Enter,
            "Leave" => HostSignal::Leave,
            "Key" | "KeyPress" => HostSignal::KeyPress,
            "FocusIn" => HostSignal::FocusIn,
            "FocusOut" => HostSignal::FocusOut,
            _ => return None,
        };

        let button = match (signal, detail) {
            (HostSignal::ButtonPress | HostSignal::ButtonRelease, Some(detail)) => {
                let n: u32 = detail.parse().ok()?;
                if !(1..=5).contains(&n) {
                    return None;
                }
                Some(n)
            }
            (_, Some(_)) => return None,
            (_, None) => None,
        };

        Some(Self { signal, button })
    }

    pub fn signal(&self) -> HostSignal {
        self.signal
    }

    pub fn button(&self) -> Option<u32> {
        self.button
    }

    /// Whether a host event satisfies this sequence's filter
    pub fn matches(&self, event: &HostEvent) -> bool {
        match self.button {
            Some(button) => event.button == Some(button),
            None => true,
        }
    }
}
