//! ManageProfilesUseCase: the in-memory profile registry.
//!
//! The registry is the daemon's working copy of every profile, split into
//! two partitions:
//!
//! - **Built-in profiles** ship with the application, carry fixed
//!   identifiers (stable across runs, so `state_map` references survive a
//!   restart), and can never be deleted or modified.
//! - **Custom profiles** are created by copy or import, mutated field by
//!   field, and deleted explicitly.
//!
//! Nothing here touches the filesystem. The shell mutates the registry and
//! then persists `customs()` through the config store; there is no
//! implicit autosave.

use std::collections::HashSet;

use thiserror::Error;
use uuid::Uuid;

use hwtune_core::{fresh_profile_id, Profile, ProfileId, Settings};

/// Fixed identifiers for the built-in profiles.
const BUILTIN_DEFAULT_ID: ProfileId = Uuid::from_u128(0xb1a9_0001);
const BUILTIN_POWERSAVE_ID: ProfileId = Uuid::from_u128(0xb1a9_0002);
const BUILTIN_QUIET_ID: ProfileId = Uuid::from_u128(0xb1a9_0003);

/// Error type for profile registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No profile with the given identifier exists.
    #[error("profile not found: {0}")]
    NotFound(ProfileId),

    /// The operation targets a built-in profile, which cannot be deleted
    /// or modified.
    #[error("built-in profile cannot be deleted or modified: {0}")]
    BuiltinProfile(ProfileId),
}

/// The built-in profiles shipped with the application.
pub fn builtin_profiles() -> Vec<Profile> {
    let mut default = Profile::new("Default");
    default.id = BUILTIN_DEFAULT_ID;

    let mut powersave = Profile::new("Powersave");
    powersave.id = BUILTIN_POWERSAVE_ID;
    powersave.screen_brightness = Some(40);
    powersave.keyboard_brightness = Some(0);
    powersave.webcam_enabled = Some(false);

    let mut quiet = Profile::new("Quiet");
    quiet.id = BUILTIN_QUIET_ID;
    quiet.fan_duty_max = Some(50);

    vec![default, powersave, quiet]
}

/// In-memory registry of built-in and custom profiles.
///
/// Customs keep their insertion order, which is also the order they are
/// persisted in; lookups scan both partitions.
pub struct ProfileRegistry {
    builtins: Vec<Profile>,
    customs: Vec<Profile>,
}

impl ProfileRegistry {
    /// Creates a registry holding only the built-in profiles.
    pub fn new() -> Self {
        Self::with_customs(Vec::new())
    }

    /// Creates a registry from built-ins plus previously persisted customs.
    pub fn with_customs(customs: Vec<Profile>) -> Self {
        Self {
            builtins: builtin_profiles(),
            customs,
        }
    }

    /// Returns all profiles, built-ins first, customs in insertion order.
    pub fn all(&self) -> Vec<Profile> {
        self.builtins.iter().chain(&self.customs).cloned().collect()
    }

    /// The built-in profiles.
    pub fn builtins(&self) -> &[Profile] {
        &self.builtins
    }

    /// The custom profiles, in insertion order.
    pub fn customs(&self) -> &[Profile] {
        &self.customs
    }

    /// Looks up any profile by identifier.
    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.builtins
            .iter()
            .chain(&self.customs)
            .find(|p| p.id == id)
    }

    /// Looks up a custom profile by identifier.
    pub fn get_custom(&self, id: ProfileId) -> Option<&Profile> {
        self.customs.iter().find(|p| p.id == id)
    }

    /// Returns `true` if any profile carries `name`.
    pub fn name_exists(&self, name: &str) -> bool {
        self.builtins
            .iter()
            .chain(&self.customs)
            .any(|p| p.name == name)
    }

    /// Ids currently present in either partition.
    fn ids_in_use(&self) -> HashSet<ProfileId> {
        self.builtins
            .iter()
            .chain(&self.customs)
            .map(|p| p.id)
            .collect()
    }

    /// Creates a custom profile named `new_name` by copying `source`, or by
    /// copying the built-in default profile when `source` is `None`.
    ///
    /// The copy receives a fresh identifier; identifiers are never reused,
    /// even after deletions.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `source` names no profile.
    pub fn copy_profile(
        &mut self,
        source: Option<ProfileId>,
        new_name: &str,
    ) -> Result<ProfileId, RegistryError> {
        let mut profile = match source {
            Some(id) => self.get(id).cloned().ok_or(RegistryError::NotFound(id))?,
            None => self.builtins[0].clone(),
        };
        profile.id = fresh_profile_id(&self.ids_in_use());
        profile.name = new_name.to_string();
        let id = profile.id;
        self.customs.push(profile);
        Ok(id)
    }

    /// Renames a custom profile.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::BuiltinProfile`] for a built-in id and
    /// [`RegistryError::NotFound`] for an unknown one.
    pub fn rename_custom(&mut self, id: ProfileId, new_name: &str) -> Result<(), RegistryError> {
        if self.builtins.iter().any(|p| p.id == id) {
            return Err(RegistryError::BuiltinProfile(id));
        }
        let profile = self
            .customs
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RegistryError::NotFound(id))?;
        profile.name = new_name.to_string();
        Ok(())
    }

    /// Deletes a custom profile and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::BuiltinProfile`] for a built-in id and
    /// [`RegistryError::NotFound`] for an unknown one.
    pub fn delete_custom(&mut self, id: ProfileId) -> Result<Profile, RegistryError> {
        if self.builtins.iter().any(|p| p.id == id) {
            return Err(RegistryError::BuiltinProfile(id));
        }
        let index = self
            .customs
            .iter()
            .position(|p| p.id == id)
            .ok_or(RegistryError::NotFound(id))?;
        Ok(self.customs.remove(index))
    }

    /// Commits a reconciled import result into the custom partition.
    ///
    /// An entry whose identifier already exists replaces the existing
    /// custom profile (the keep-new outcome); all other entries are
    /// appended in order.
    pub fn merge_imported(&mut self, merged: Vec<Profile>) {
        for profile in merged {
            match self.customs.iter_mut().find(|p| p.id == profile.id) {
                Some(existing) => *existing = profile,
                None => self.customs.push(profile),
            }
        }
    }

    /// Assigns `profile_id` to `state_id` in `settings`, after checking the
    /// profile actually exists.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for an unknown profile id.
    pub fn set_active_profile(
        &self,
        settings: &mut Settings,
        profile_id: ProfileId,
        state_id: &str,
    ) -> Result<(), RegistryError> {
        if self.get(profile_id).is_none() {
            return Err(RegistryError::NotFound(profile_id));
        }
        settings.assign_state(state_id, profile_id);
        Ok(())
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}
