//! Global settings domain entity.
//!
//! `Settings` is a singleton document: it is created with defaults on first
//! run, mutated by the caller over the application's life, and never
//! deleted. It holds the default-active profile pointer and the mapping
//! from power states to profile identifiers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::profile::ProfileId;

/// Power-state identifier: running on mains power.
pub const STATE_POWER_AC: &str = "power_ac";
/// Power-state identifier: running on battery.
pub const STATE_POWER_BAT: &str = "power_bat";

/// Name of the profile considered active when no state mapping applies.
const DEFAULT_ACTIVE_PROFILE: &str = "Default";

/// Global application settings.
///
/// `state_map` values *should* reference existing profile identifiers, but
/// that referential integrity is the caller's responsibility; the store
/// persists whatever it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Name of the profile active by default.
    pub active_profile_name: String,
    /// Power-state identifier to assigned profile identifier.
    #[serde(default)]
    pub state_map: HashMap<String, ProfileId>,
}

impl Settings {
    /// Returns the profile assigned to `state_id`, if any.
    pub fn profile_for_state(&self, state_id: &str) -> Option<ProfileId> {
        self.state_map.get(state_id).copied()
    }

    /// Assigns `profile_id` to `state_id`, replacing any previous assignment.
    pub fn assign_state(&mut self, state_id: impl Into<String>, profile_id: ProfileId) {
        self.state_map.insert(state_id.into(), profile_id);
    }

    /// Returns `true` if any power state is mapped to `profile_id`.
    pub fn assigns(&self, profile_id: ProfileId) -> bool {
        self.state_map.values().any(|id| *id == profile_id)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_profile_name: DEFAULT_ACTIVE_PROFILE.to_string(),
            state_map: HashMap::new(),
        }
    }
}
