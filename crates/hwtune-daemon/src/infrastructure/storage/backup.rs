//! JSON interchange codec for profile backups.
//!
//! Export writes the current custom-profile collection verbatim as a JSON
//! array to a path the user picked; import reads such a payload back. The
//! JSON array shape is the interchange contract: a backup taken on one
//! machine imports on another, and unset tunables stay unset.
//!
//! Malformed payloads are rejected wholesale; there is no partial import.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use hwtune_core::Profile;

/// Error type for backup file operations.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The payload is not a valid profile collection.
    #[error("backup payload is not a valid profile collection: {0}")]
    Format(#[from] serde_json::Error),

    /// A file system I/O error occurred.
    #[error("I/O error accessing backup at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Encodes an ordered profile collection as a JSON backup payload.
///
/// # Errors
///
/// Returns [`BackupError::Format`] if encoding fails.
pub fn encode_backup(profiles: &[Profile]) -> Result<String, BackupError> {
    Ok(serde_json::to_string(profiles)?)
}

/// Decodes a backup payload into an ordered profile collection.
///
/// # Errors
///
/// Returns [`BackupError::Format`] for anything that is not a JSON array
/// of profile records; nothing is imported from a malformed payload.
pub fn decode_backup(payload: &str) -> Result<Vec<Profile>, BackupError> {
    Ok(serde_json::from_str(payload)?)
}

/// Serializes `profiles` verbatim to an externally chosen path.
///
/// The export target is wherever the user pointed the save dialog; no
/// directory creation or permission pinning applies here.
///
/// # Errors
///
/// Returns [`BackupError::Format`] if encoding fails and [`BackupError::Io`]
/// if the write fails.
pub fn export_profiles(profiles: &[Profile], path: &Path) -> Result<(), BackupError> {
    let payload = encode_backup(profiles)?;
    fs::write(path, payload).map_err(|source| BackupError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("exported {} profiles to {}", profiles.len(), path.display());
    Ok(())
}

/// Reads a backup payload from an externally chosen path.
///
/// # Errors
///
/// Returns [`BackupError::Io`] if the file cannot be read and
/// [`BackupError::Format`] if its content is not a profile collection.
pub fn read_backup(path: &Path) -> Result<Vec<Profile>, BackupError> {
    let payload = fs::read_to_string(path).map_err(|source| BackupError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_backup(&payload)
}
