//! Conflict vocabulary for profile import.
//!
//! When an imported profile carries the same identifier as an existing one,
//! an external arbiter (the conflict dialog in the UI shell) is asked what
//! to do. This module defines the reply contract; the dialog's rendering is
//! not this crate's concern.

use serde::{Deserialize, Serialize};

/// Decision for a single identifier collision during import.
///
/// Serializes to the dialog reply shape `{ "action": ..., "newName": ... }`
/// so the UI shell can pass replies through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ConflictAction {
    /// Keep the incoming profile under its original identifier. At commit
    /// time it supersedes the existing entry with that identifier.
    KeepNew,
    /// Discard the incoming profile; the existing one stays as-is.
    KeepOld,
    /// Keep the incoming profile under a freshly generated identifier.
    /// The name is kept, so duplicate names become possible.
    KeepBoth,
    /// Keep the incoming profile under a freshly generated identifier and
    /// the supplied replacement name.
    #[serde(rename_all = "camelCase")]
    NewName {
        new_name: String,
    },
}
