//! Short/long press classification.
//!
//! A press is provisionally short while held; once the hold reaches
//! `long_press_threshold` it is promoted to long without waiting for the
//! release edge. The threshold boundary is inclusive: a press held for exactly
//! the threshold classifies as long.

use embassy_time::{Duration, Instant};

/// Classification of a button hold relative to the long-press threshold.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    Short,
    Long,
}

/// Time held since `start`, saturating to zero if the clock sample is not
/// ahead of the press start. A non-monotonic sample therefore degrades to
/// "not yet past the threshold" instead of misclassifying.
pub fn held_for(start: Instant, now: Instant) -> Duration {
    now.checked_duration_since(start).unwrap_or(Duration::from_ticks(0))
}

/// Classify a press that lasted from `start` to `now`.
pub fn classify(start: Instant, now: Instant, threshold: Duration) -> PressKind {
    if held_for(start, now) >= threshold {
        PressKind::Long
    } else {
        PressKind::Short
    }
}

/// The instant at which a still-held press gets promoted to long.
pub fn promotion_deadline(start: Instant, threshold: Duration) -> Instant {
    start + threshold
}
