//! HID report types and the reporter boundary.
//!
//! The dispatch core produces [`Report`]s; a transport-specific reporter
//! implementing [`HidReporter`] drains them onto the wireless link. Emission
//! is fire-and-forget from the core's perspective: a failed write is the
//! transport's problem, the press cycle has already completed.

use core::future::Future;

use serde::Serialize;
use usbd_hid::descriptor::generator_prelude::*;

use crate::CONNECTION_STATE;

/// KeyboardReport describes a report and its companion descriptor that can be
/// used to send keyboard button presses to a host.
#[gen_hid_descriptor(
    (collection = APPLICATION, usage_page = GENERIC_DESKTOP, usage = KEYBOARD) = {
        (usage_page = KEYBOARD, usage_min = 0xE0, usage_max = 0xE7) = {
            #[packed_bits 8] #[item_settings data,variable,absolute] modifier=input;
        };
        (logical_min = 0,) = {
            #[item_settings constant,variable,absolute] reserved=input;
        };
        (usage_page = KEYBOARD, usage_min = 0x00, usage_max = 0xDD) = {
            #[item_settings data,array,absolute] keycodes=input;
        };
    }
)]
#[allow(dead_code)]
#[derive(Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifier: u8,
    pub reserved: u8,
    pub keycodes: [u8; 6],
}

/// MediaKeyboardReport carries a single consumer control usage id
/// (volume, transport controls).
#[gen_hid_descriptor(
    (collection = APPLICATION, usage_page = CONSUMER, usage = CONSUMER_CONTROL) = {
        (usage_page = CONSUMER, usage_min = 0x00, usage_max = 0x514) = {
            #[item_settings data,array,absolute,not_null] usage_id=input;
        };
    }
)]
#[allow(dead_code)]
#[derive(Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MediaKeyboardReport {
    pub usage_id: u16,
}

/// Reports the dispatch core can emit.
#[derive(Serialize)]
pub enum Report {
    /// Normal keyboard hid report
    KeyboardReport(KeyboardReport),
    /// Consumer control hid report
    MediaKeyboardReport(MediaKeyboardReport),
}

impl AsInputReport for Report {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidError {
    /// The wireless link is down
    Disconnected,
    /// The report could not be serialized for the transport
    ReportSerializeError,
    /// The transport buffer rejected the report
    BufferOverflow,
}

/// HidReporter drains reports onto the host link, via BLE, USB, etc.
pub trait HidReporter {
    /// The report type that the reporter sends to the host.
    type ReportType: AsInputReport;

    /// Get the next report to be sent to the host.
    fn get_report(&mut self) -> impl Future<Output = Self::ReportType>;

    /// Run the reporter task.
    fn run_reporter(&mut self) -> impl Future<Output = ()> {
        async {
            loop {
                let report = self.get_report().await;
                // Only send the report after the connection is established.
                // Reports produced while disconnected are dropped, not queued:
                // re-sending a stale key press is worse than losing it.
                if CONNECTION_STATE.load(core::sync::atomic::Ordering::Acquire) {
                    if let Err(e) = self.write_report(report).await {
                        error!("Report write failed: {:?}", e);
                    }
                }
            }
        }
    }

    /// Write one report to the host, return the number of bytes written.
    fn write_report(&mut self, report: Self::ReportType) -> impl Future<Output = Result<usize, HidError>>;
}
