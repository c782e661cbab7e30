//! Boundary traits for the external collaborators.
//!
//! The button scanner is an [`InputDevice`]: it owns GPIO and debounce and
//! hands clean edges to the core. The dispatch engine is [`Runnable`] and is
//! joined with the device loop and the reporter by the firmware entry point.

use crate::channel::KEY_EVENT_CHANNEL;
use crate::event::KeyEvent;

/// A source of debounced key edges.
pub trait InputDevice {
    /// Wait for and return the next key edge.
    async fn read_event(&mut self) -> KeyEvent;
}

/// A long-running task driven by the executor.
pub trait Runnable {
    async fn run(&mut self);
}

/// Forward events from a device into [`KEY_EVENT_CHANNEL`] forever.
pub async fn run_input_device<D: InputDevice>(device: &mut D) -> ! {
    loop {
        let event = device.read_event().await;
        KEY_EVENT_CHANNEL.send(event).await;
    }
}
