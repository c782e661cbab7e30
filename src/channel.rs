//! Exposed channels connecting the scanner, the dispatch core and the
//! HID reporter.

use embassy_sync::channel::Channel;

use crate::event::KeyEvent;
use crate::hid::Report;
use crate::{EVENT_CHANNEL_SIZE, REPORT_CHANNEL_SIZE, RawMutex};

/// Channel for debounced key edges from the button scanner
pub static KEY_EVENT_CHANNEL: Channel<RawMutex, KeyEvent, EVENT_CHANNEL_SIZE> = Channel::new();
/// Channel for HID reports from the dispatch core to the transport writer
pub static KEYPAD_REPORT_CHANNEL: Channel<RawMutex, Report, REPORT_CHANNEL_SIZE> = Channel::new();
