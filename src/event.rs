//! Key events received from the button/GPIO layer.
//!
//! The scanner upstream is responsible for electrical debounce; the core
//! consumes clean edges only and never re-debounces. Events for the same key
//! must arrive strictly in press/release order.

/// A debounced edge of one physical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    /// Physical key slot, in `[0, NUM_KEYS)`
    pub key: u8,
    /// `true` on the press edge, `false` on the release edge
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn press(key: u8) -> Self {
        Self { key, pressed: true }
    }

    pub const fn release(key: u8) -> Self {
        Self { key, pressed: false }
    }
}
