//! TOML-based configuration persistence for the daemon.
//!
//! Reads and writes [`Settings`] and the ordered [`Profile`] collection to
//! the platform-appropriate config files:
//! - Windows:  `%APPDATA%\Hwtune\{settings,profiles}.toml`
//! - Linux:    `~/.config/hwtune/{settings,profiles}.toml`
//! - macOS:    `~/Library/Application Support/Hwtune/{settings,profiles}.toml`
//!
//! # The directory/permission contract
//!
//! Config files may be read by unprivileged helper processes, so the store
//! pins the modes explicitly instead of inheriting the process umask:
//! every directory it creates gets mode `0755` and every file it writes
//! gets mode `0644`, set with an explicit chmod after the write. On
//! non-unix targets the chmod step compiles away.
//!
//! # Round-trip guarantee (for beginners)
//!
//! Profile tunables are `Option<T>` and carry
//! `#[serde(skip_serializing_if = "Option::is_none")]`, so an unset tunable
//! is simply absent from the TOML document. On read, an absent key
//! deserializes back to `None`. The store never back-fills defaults: what
//! you wrote is exactly what you read, including the *absence* of values.
//!
//! # Concurrency
//!
//! The store takes no locks. Concurrent writers to the same path race per
//! ordinary filesystem semantics; serializing access is the caller's job.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use hwtune_core::{Profile, Settings};

/// Error type for configuration store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// The requested document does not exist on disk.
    #[error("config document not found: {path}")]
    NotFound { path: PathBuf },

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed into the expected document.
    #[error("failed to parse config document: {0}")]
    Parse(#[from] toml::de::Error),

    /// The document could not be serialized to TOML.
    #[error("failed to serialize config document: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// On-disk wrapper for the ordered profile collection.
///
/// TOML has no top-level arrays, so profiles are stored as a `[[profile]]`
/// array-of-tables. Array order is document order, which preserves the
/// collection order across the round trip.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfilesDocument {
    #[serde(default, rename = "profile")]
    profiles: Vec<Profile>,
}

// ── Config store ──────────────────────────────────────────────────────────────

/// Durable read/write access to the settings and profiles documents.
///
/// Each call is a self-contained transcode to or from the filesystem; the
/// store retains no reference to any document after a call returns. Every
/// operation takes an optional override path and falls back to the
/// configured location when given `None`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    settings_path: PathBuf,
    profiles_path: PathBuf,
}

impl ConfigStore {
    /// Creates a store over explicit settings/profiles paths.
    pub fn new(settings_path: impl Into<PathBuf>, profiles_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            profiles_path: profiles_path.into(),
        }
    }

    /// Creates a store over the platform default locations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoPlatformConfigDir`] when the platform config
    /// base directory cannot be determined from the environment.
    pub fn at_default_location() -> Result<Self, StoreError> {
        let dir = config_dir()?;
        Ok(Self::new(
            dir.join("settings.toml"),
            dir.join("profiles.toml"),
        ))
    }

    /// Path of the settings document.
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Path of the profiles document.
    pub fn profiles_path(&self) -> &Path {
        &self.profiles_path
    }

    /// Persists `settings`, creating missing ancestor directories.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if directory creation, the write, or the
    /// chmod fails, and [`StoreError::Serialize`] if encoding fails. A
    /// failed write is not atomic; the file may be left partially written.
    pub fn write_settings(&self, settings: &Settings, path: Option<&Path>) -> Result<(), StoreError> {
        let path = path.unwrap_or(&self.settings_path);
        let content = toml::to_string_pretty(settings)?;
        write_document(path, &content)?;
        debug!("wrote settings to {}", path.display());
        Ok(())
    }

    /// Reads the settings document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the file is absent,
    /// [`StoreError::Parse`] when it is not a valid settings encoding, and
    /// [`StoreError::Io`] for other filesystem failures. First-run
    /// defaulting is the caller's decision, not the store's.
    pub fn read_settings(&self, path: Option<&Path>) -> Result<Settings, StoreError> {
        let path = path.unwrap_or(&self.settings_path);
        let content = read_document(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Persists the ordered profile collection, preserving order on disk.
    ///
    /// Same directory/permission contract and failure modes as
    /// [`write_settings`](Self::write_settings).
    pub fn write_profiles(&self, profiles: &[Profile], path: Option<&Path>) -> Result<(), StoreError> {
        let path = path.unwrap_or(&self.profiles_path);
        let document = ProfilesDocument {
            profiles: profiles.to_vec(),
        };
        let content = toml::to_string_pretty(&document)?;
        write_document(path, &content)?;
        debug!("wrote {} profiles to {}", profiles.len(), path.display());
        Ok(())
    }

    /// Reads the ordered profile collection.
    ///
    /// Length, order, defined tunables, and *undefined* tunables all come
    /// back exactly as written; the store never substitutes defaults.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`read_settings`](Self::read_settings).
    pub fn read_profiles(&self, path: Option<&Path>) -> Result<Vec<Profile>, StoreError> {
        let path = path.unwrap_or(&self.profiles_path);
        let content = read_document(path)?;
        let document: ProfilesDocument = toml::from_str(&content)?;
        Ok(document.profiles)
    }
}

// ── Filesystem helpers ────────────────────────────────────────────────────────

fn read_document(path: &Path) -> Result<String, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `content` to `path`, creating missing ancestors at mode `0755`
/// and pinning the file to mode `0644` afterwards.
fn write_document(path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        create_missing_ancestors(dir)?;
    }
    fs::write(path, content).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    set_mode(path, 0o644)
}

/// Creates every missing ancestor of `dir` (deepest last), chmodding each
/// newly created directory to `0755` individually.
///
/// Directories that already exist are left untouched, whatever their mode.
/// The parent chain of a relative path ends in the empty path, which stands
/// for the current directory and must not be treated as missing.
fn create_missing_ancestors(dir: &Path) -> Result<(), StoreError> {
    let mut missing: Vec<PathBuf> = Vec::new();
    let mut current = dir;
    while !current.as_os_str().is_empty() && !current.exists() {
        missing.push(current.to_path_buf());
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    for created in missing.iter().rev() {
        match fs::create_dir(created) {
            Ok(()) => set_mode(created, 0o755)?,
            // Lost a race with another writer; the directory is there.
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(source) => {
                return Err(StoreError::Io {
                    path: created.clone(),
                    source,
                })
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), StoreError> {
    Ok(())
}

// ── Default paths ─────────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config files.
///
/// # Errors
///
/// Returns [`StoreError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, StoreError> {
    platform_config_dir().ok_or(StoreError::NoPlatformConfigDir)
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Hwtune"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("hwtune"))
    }

    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/Hwtune
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("Hwtune"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        // Fallback for unsupported platforms.
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> (ConfigStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("hwtune_store_{}", Uuid::new_v4()));
        let store = ConfigStore::new(dir.join("settings.toml"), dir.join("profiles.toml"));
        (store, dir)
    }

    // ── Settings round trip ───────────────────────────────────────────────────

    #[test]
    fn test_settings_round_trip_preserves_every_field() {
        // Arrange
        let (store, dir) = temp_store();
        let mut settings = Settings::default();
        settings.active_profile_name = "quiet".to_string();
        let profile_id = Uuid::new_v4();
        settings.assign_state(hwtune_core::STATE_POWER_AC, profile_id);

        // Act
        store.write_settings(&settings, None).expect("write");
        let restored = store.read_settings(None).expect("read");

        // Assert
        assert_eq!(restored, settings);
        assert_eq!(
            restored.profile_for_state(hwtune_core::STATE_POWER_AC),
            Some(profile_id)
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_settings_returns_not_found_for_absent_file() {
        let (store, _dir) = temp_store();
        let result = store.read_settings(None);
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_read_settings_returns_parse_error_for_garbage_content() {
        // Arrange
        let (store, dir) = temp_store();
        fs::create_dir_all(&dir).unwrap();
        fs::write(store.settings_path(), "[[[ not valid toml").unwrap();

        // Act
        let result = store.read_settings(None);

        // Assert
        assert!(matches!(result, Err(StoreError::Parse(_))));

        fs::remove_dir_all(&dir).ok();
    }

    // ── Profiles round trip ───────────────────────────────────────────────────

    #[test]
    fn test_profiles_round_trip_preserves_order_and_values() {
        // Arrange
        let (store, dir) = temp_store();
        let mut first = Profile::new("some profile");
        first.keyboard_brightness = Some(50);
        first.screen_brightness = Some(12);
        let mut second = Profile::new("some other profile");
        second.keyboard_brightness = Some(30);
        second.screen_brightness = Some(100);
        let profiles = vec![first.clone(), second.clone()];

        // Act
        store.write_profiles(&profiles, None).expect("write");
        let restored = store.read_profiles(None).expect("read");

        // Assert: same length, same order, same values.
        assert_eq!(restored, profiles);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_profiles_round_trip_keeps_unset_tunables_unset() {
        // Arrange: each profile specifies only one tunable.
        let (store, dir) = temp_store();
        let mut first = Profile::new("screen only");
        first.screen_brightness = Some(15);
        let mut second = Profile::new("keyboard only");
        second.keyboard_brightness = Some(25);

        // Act
        store
            .write_profiles(&[first, second], None)
            .expect("write");
        let restored = store.read_profiles(None).expect("read");

        // Assert: absent tunables stay absent, defined ones keep their value.
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].screen_brightness, Some(15));
        assert_eq!(restored[0].keyboard_brightness, None);
        assert_eq!(restored[1].screen_brightness, None);
        assert_eq!(restored[1].keyboard_brightness, Some(25));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_profiles_accepts_empty_collection() {
        let (store, dir) = temp_store();
        store.write_profiles(&[], None).expect("write");
        let restored = store.read_profiles(None).expect("read");
        assert!(restored.is_empty());
        fs::remove_dir_all(&dir).ok();
    }

    // ── Override paths ────────────────────────────────────────────────────────

    #[test]
    fn test_override_path_wins_over_configured_location() {
        // Arrange
        let (store, dir) = temp_store();
        let other = dir.join("elsewhere").join("settings.toml");

        // Act
        store
            .write_settings(&Settings::default(), Some(&other))
            .expect("write");

        // Assert: the configured location was never touched.
        assert!(other.exists());
        assert!(!store.settings_path().exists());
        let restored = store.read_settings(Some(&other)).expect("read");
        assert_eq!(restored, Settings::default());

        fs::remove_dir_all(&dir).ok();
    }

    // ── Permissions ───────────────────────────────────────────────────────────

    #[cfg(unix)]
    #[test]
    fn test_written_file_has_mode_644() {
        use std::os::unix::fs::PermissionsExt;

        let (store, dir) = temp_store();
        store.write_settings(&Settings::default(), None).expect("write");

        let mode = fs::metadata(store.settings_path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);

        fs::remove_dir_all(&dir).ok();
    }

    #[cfg(unix)]
    #[test]
    fn test_created_directory_chain_has_mode_755() {
        use std::os::unix::fs::PermissionsExt;

        // Arrange: a target three directories below anything that exists.
        let (store, dir) = temp_store();
        let deep = dir.join("a").join("b").join("settings.toml");

        // Act
        store
            .write_settings(&Settings::default(), Some(&deep))
            .expect("write");

        // Assert: every created directory carries 0755.
        for created in [&dir, &dir.join("a"), &dir.join("a").join("b")] {
            let mode = fs::metadata(created).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755, "wrong mode on {}", created.display());
        }

        fs::remove_dir_all(&dir).ok();
    }

    // ── Default path formation ────────────────────────────────────────────────

    #[test]
    fn test_default_store_paths_end_with_expected_file_names() {
        if let Ok(store) = ConfigStore::at_default_location() {
            assert!(store.settings_path().ends_with("settings.toml"));
            assert!(store.profiles_path().ends_with("profiles.toml"));
        }
        // NoPlatformConfigDir in a stripped CI env is also acceptable.
    }
}
