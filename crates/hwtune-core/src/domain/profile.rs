//! Hardware profile domain entity.
//!
//! A profile is a named bundle of hardware tunables. Tunables are
//! deliberately `Option<T>`: `None` means "this profile does not specify
//! the value", and the daemon leaves the corresponding hardware setting
//! alone. That is not the same thing as setting it to zero, so absent
//! tunables must survive a serialize/deserialize round trip as absent
//! (`skip_serializing_if` below keeps them out of the document entirely).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a profile, derived from UUID v4.
pub type ProfileId = Uuid;

/// Upper bound (inclusive) for every percent-valued tunable.
pub const PERCENT_MAX: u32 = 100;

/// Errors that can occur when validating a profile.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// A percent-valued tunable exceeds [`PERCENT_MAX`].
    #[error("{tunable} out of range: {value} (maximum {PERCENT_MAX})")]
    TunableOutOfRange {
        tunable: &'static str,
        value: u32,
    },

    /// The profile name is empty or whitespace-only.
    #[error("profile name must not be empty")]
    EmptyName,
}

/// A named collection of hardware tunables, uniquely identified.
///
/// Identifiers are unique within a collection and are never reused after a
/// profile is deleted. Names are mutable and not required to be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Stable identifier, unique within a profile collection.
    pub id: ProfileId,
    /// Human-readable display name.
    pub name: String,
    /// Screen brightness in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_brightness: Option<u32>,
    /// Keyboard backlight brightness in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard_brightness: Option<u32>,
    /// Upper fan duty-cycle limit in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan_duty_max: Option<u32>,
    /// Whether the webcam is powered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webcam_enabled: Option<bool>,
}

impl Profile {
    /// Creates a profile with a fresh identifier and no tunables specified.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            screen_brightness: None,
            keyboard_brightness: None,
            fan_duty_max: None,
            webcam_enabled: None,
        }
    }

    /// Validates the profile name and tunable bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::EmptyName`] for a blank name and
    /// [`ProfileError::TunableOutOfRange`] for any percent tunable above
    /// [`PERCENT_MAX`].
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        check_percent("screen_brightness", self.screen_brightness)?;
        check_percent("keyboard_brightness", self.keyboard_brightness)?;
        check_percent("fan_duty_max", self.fan_duty_max)?;
        Ok(())
    }
}

fn check_percent(tunable: &'static str, value: Option<u32>) -> Result<(), ProfileError> {
    match value {
        Some(v) if v > PERCENT_MAX => Err(ProfileError::TunableOutOfRange { tunable, value: v }),
        _ => Ok(()),
    }
}

/// Generates a profile identifier guaranteed distinct from every id in `in_use`.
///
/// UUID v4 collisions are already vanishingly unlikely; the re-draw loop
/// turns "unlikely" into a hard guarantee, which the import reconciler
/// relies on when assigning fresh identities to keep-both profiles.
pub fn fresh_profile_id(in_use: &HashSet<ProfileId>) -> ProfileId {
    loop {
        let id = Uuid::new_v4();
        if !in_use.contains(&id) {
            return id;
        }
    }
}
