//! Dispatch behavior configuration.

use embassy_time::Duration;

/// Options for configurable dispatch behavior.
#[derive(Debug, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeypadConfig {
    /// Hold duration at which a press is reclassified from short to long.
    /// The boundary is inclusive: a hold of exactly this duration is long.
    pub long_press_threshold: Duration,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self {
            long_press_threshold: Duration::from_millis(600),
        }
    }
}
