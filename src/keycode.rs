//! HID usage codes used in the mapping tables.
//!
//! Two separate code spaces exist on the wire: the keyboard usage page
//! (`KeyCode`, sent in the boot keyboard report) and the consumer control
//! usage page (`MediaKeyCode`, sent in the media report). A table cell holding
//! `KeyCode::No` / `MediaKeyCode::Zero` is an empty mapping.

use num_enum::FromPrimitive;

/// Keyboard usage page codes (HID usage page 0x07).
///
/// Only the usages a keypad profile can reasonably map are listed; anything
/// else converts to `No` via `from_primitive`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum KeyCode {
    /// Reserved, no-key. Marks an empty mapping cell.
    #[num_enum(default)]
    No = 0x00,
    A = 0x04,
    B = 0x05,
    C = 0x06,
    D = 0x07,
    E = 0x08,
    F = 0x09,
    G = 0x0A,
    H = 0x0B,
    I = 0x0C,
    J = 0x0D,
    K = 0x0E,
    L = 0x0F,
    M = 0x10,
    N = 0x11,
    O = 0x12,
    P = 0x13,
    Q = 0x14,
    R = 0x15,
    S = 0x16,
    T = 0x17,
    U = 0x18,
    V = 0x19,
    W = 0x1A,
    X = 0x1B,
    Y = 0x1C,
    Z = 0x1D,
    Kc1 = 0x1E,
    Kc2 = 0x1F,
    Kc3 = 0x20,
    Kc4 = 0x21,
    Kc5 = 0x22,
    Kc6 = 0x23,
    Kc7 = 0x24,
    Kc8 = 0x25,
    Kc9 = 0x26,
    Kc0 = 0x27,
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    LeftBracket = 0x2F,
    RightBracket = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Grave = 0x35,
    Comma = 0x36,
    Dot = 0x37,
    Slash = 0x38,
    CapsLock = 0x39,
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    Up = 0x52,
}

impl KeyCode {
    /// An empty mapping cell?
    pub fn is_empty(self) -> bool {
        self == KeyCode::No
    }

    /// Convert an ascii character to a keycode, as used when building mapping
    /// tables from character-based profile definitions.
    ///
    /// Returns the keycode and whether the character is the shifted variant of
    /// that usage. The dispatch core sends unmodified usages; the flag is for
    /// table builders that care about casing.
    pub fn from_ascii(ascii: u8) -> (Self, bool) {
        match ascii {
            b'a'..=b'z' => (KeyCode::from_primitive(ascii - b'a' + 0x04), false),
            b'A'..=b'Z' => (KeyCode::from_primitive(ascii - b'A' + 0x04), true),
            b'1'..=b'9' => (KeyCode::from_primitive(ascii - b'1' + 0x1E), false),
            b'0' => (KeyCode::Kc0, false),
            b'\n' | b'\r' => (KeyCode::Enter, false),
            b'\t' => (KeyCode::Tab, false),
            b' ' => (KeyCode::Space, false),
            b'-' => (KeyCode::Minus, false),
            b'_' => (KeyCode::Minus, true),
            b'=' => (KeyCode::Equal, false),
            b'+' => (KeyCode::Equal, true),
            _ => (KeyCode::No, false),
        }
    }
}

/// Consumer control usage page codes (HID usage page 0x0C).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum MediaKeyCode {
    /// No usage. Marks an empty mapping cell.
    #[num_enum(default)]
    Zero = 0x00,
    Play = 0xB0,
    Pause = 0xB1,
    Record = 0xB2,
    FastForward = 0xB3,
    Rewind = 0xB4,
    NextTrack = 0xB5,
    PrevTrack = 0xB6,
    Stop = 0xB7,
    Eject = 0xB8,
    RandomPlay = 0xB9,
    PlayPause = 0xCD,
    Mute = 0xE2,
    VolumeUp = 0xE9,
    VolumeDown = 0xEA,
}

impl MediaKeyCode {
    /// An empty mapping cell?
    pub fn is_empty(self) -> bool {
        self == MediaKeyCode::Zero
    }

    /// The usage id carried in the consumer control report.
    pub fn usage_id(self) -> u16 {
        self as u16
    }
}
