//! Active profile selection.
//!
//! A profile bundles one row-pair of the mapping tables with a wireless
//! device identity. The selector is written by whatever drives profile
//! switching (a dedicated key combo, a host tool); the dispatch core only
//! reads it, and latches the value for the duration of a press cycle.
//! Switching while a key is mid-cycle is a contract violation on the caller.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::mapping::ConfigError;

/// Wireless identity advertised for one profile.
///
/// Kept per profile because some host applications only accept input from an
/// adapter with a specific name. The transport applies it on profile switch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    pub name: &'static str,
    pub manufacturer: &'static str,
    pub vid: u16,
    pub pid: u16,
}

/// Holds the currently active profile index and the per-profile identities.
pub struct ProfileSelector<'a, const NUM_PROFILES: usize> {
    active: AtomicU8,
    identities: &'a [DeviceIdentity; NUM_PROFILES],
}

impl<'a, const NUM_PROFILES: usize> ProfileSelector<'a, NUM_PROFILES> {
    pub fn new(
        identities: &'a [DeviceIdentity; NUM_PROFILES],
        initial: u8,
    ) -> Result<Self, ConfigError> {
        if (initial as usize) >= NUM_PROFILES {
            return Err(ConfigError::ProfileOutOfRange {
                profile: initial,
                num_profiles: NUM_PROFILES,
            });
        }
        Ok(Self {
            active: AtomicU8::new(initial),
            identities,
        })
    }

    /// The active profile index, in `[0, NUM_PROFILES)`.
    pub fn get(&self) -> u8 {
        self.active.load(Ordering::Relaxed)
    }

    /// Switch the active profile. Out-of-range indices are rejected, the
    /// current profile stays active.
    pub fn select(&self, profile: u8) {
        if (profile as usize) >= NUM_PROFILES {
            warn!(
                "Not a valid profile {}, keypad supports only {} profiles",
                profile, NUM_PROFILES
            );
            return;
        }
        info!("Switching to profile {}", profile);
        self.active.store(profile, Ordering::Relaxed);
    }

    /// Identity advertised for the active profile.
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identities[self.get() as usize]
    }
}
