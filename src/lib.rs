#![no_std]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channel;
pub mod config;
pub mod event;
pub mod hid;
pub mod input_device;
pub mod keycode;
pub mod keypad;
pub mod mapping;
pub mod press;
pub mod profile;

use core::sync::atomic::AtomicBool;

/// Capacity of the debounced key event channel
pub const EVENT_CHANNEL_SIZE: usize = 16;
/// Capacity of the HID report channel
pub const REPORT_CHANNEL_SIZE: usize = 16;

/// Raw mutex used by all static channels
pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Whether the wireless link is up. Set by the transport, read by the reporter:
/// reports produced while disconnected are dropped, never retried.
pub static CONNECTION_STATE: AtomicBool = AtomicBool::new(false);
