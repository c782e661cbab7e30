//! Mapping tables and the press resolver.
//!
//! Each profile owns two rows in the normal and media tables: row `p` holds
//! the short-press mappings and row `p + NUM_PROFILES` the long-press
//! mappings. A press resolves against the normal table first and falls back
//! to the media table, so a key acts as a media key only where the normal
//! cell is empty. All profile-specific behavior lives in the table contents;
//! the resolver itself is profile-agnostic.

use crate::keycode::{KeyCode, MediaKeyCode};
use crate::press::PressKind;

/// When a key's resolved code is put on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchMode {
    /// Send the short mapping on the press edge; a long mapping, if the hold
    /// crosses the threshold, follows as a second send.
    #[default]
    Instant,
    /// Send nothing until the release edge, then send the mapping of the
    /// finalized press kind exactly once.
    Deferred,
}

/// Result of resolving one classified press against the active profile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyOutput {
    /// No mapping configured, nothing to send
    Empty,
    /// Keyboard usage page code
    Normal(KeyCode),
    /// Consumer control usage page code
    Media(MediaKeyCode),
}

/// Fatal table shape errors, detected once at startup.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The mapping tables must have one short row and one long row per profile
    RowCountMismatch { rows: usize, expected: usize },
    /// Zero profiles or zero keys cannot resolve anything
    ZeroSized,
    /// Initial profile index outside the configured profile count
    ProfileOutOfRange { profile: u8, num_profiles: usize },
}

/// The three read-only tables the core resolves against.
///
/// The tables are supplied at startup and never mutated; how they are built
/// (flash, const data, a host tool) is the caller's concern.
pub struct ProfileTables<'a, const NUM_PROFILES: usize, const NUM_KEYS: usize, const NUM_ROWS: usize> {
    normal: &'a [[KeyCode; NUM_KEYS]; NUM_ROWS],
    media: &'a [[MediaKeyCode; NUM_KEYS]; NUM_ROWS],
    dispatch: &'a [[DispatchMode; NUM_KEYS]; NUM_PROFILES],
}

impl<'a, const NUM_PROFILES: usize, const NUM_KEYS: usize, const NUM_ROWS: usize>
    ProfileTables<'a, NUM_PROFILES, NUM_KEYS, NUM_ROWS>
{
    /// Validate the table shape and wrap the tables.
    ///
    /// Refuses to construct when `NUM_ROWS != 2 * NUM_PROFILES`: resolving
    /// against an inconsistent table would silently read the wrong profile's
    /// long-press rows.
    pub fn new(
        normal: &'a [[KeyCode; NUM_KEYS]; NUM_ROWS],
        media: &'a [[MediaKeyCode; NUM_KEYS]; NUM_ROWS],
        dispatch: &'a [[DispatchMode; NUM_KEYS]; NUM_PROFILES],
    ) -> Result<Self, ConfigError> {
        if NUM_PROFILES == 0 || NUM_KEYS == 0 {
            return Err(ConfigError::ZeroSized);
        }
        if NUM_ROWS != 2 * NUM_PROFILES {
            return Err(ConfigError::RowCountMismatch {
                rows: NUM_ROWS,
                expected: 2 * NUM_PROFILES,
            });
        }
        Ok(Self {
            normal,
            media,
            dispatch,
        })
    }

    /// Table row holding the mappings for (`profile`, `kind`).
    ///
    /// Short presses read the profile's own row, long presses the row offset
    /// by `NUM_PROFILES`. Callers never index with raw offset arithmetic.
    pub fn row_for(&self, profile: u8, kind: PressKind) -> usize {
        assert!(
            (profile as usize) < NUM_PROFILES,
            "profile index out of range"
        );
        match kind {
            PressKind::Short => profile as usize,
            PressKind::Long => profile as usize + NUM_PROFILES,
        }
    }

    /// Resolve one classified press. Pure: same inputs, same output.
    ///
    /// The fallback order is a hard invariant: a non-empty normal cell always
    /// wins over the media cell at the same position.
    pub fn resolve(&self, profile: u8, kind: PressKind, key: u8) -> KeyOutput {
        assert!((key as usize) < NUM_KEYS, "key index out of range");
        let row = self.row_for(profile, kind);

        let normal = self.normal[row][key as usize];
        if !normal.is_empty() {
            return KeyOutput::Normal(normal);
        }

        let media = self.media[row][key as usize];
        if !media.is_empty() {
            return KeyOutput::Media(media);
        }

        KeyOutput::Empty
    }

    /// Dispatch policy for one key in one profile.
    pub fn dispatch_mode(&self, profile: u8, key: u8) -> DispatchMode {
        assert!(
            (profile as usize) < NUM_PROFILES,
            "profile index out of range"
        );
        assert!((key as usize) < NUM_KEYS, "key index out of range");
        self.dispatch[profile as usize][key as usize]
    }
}
