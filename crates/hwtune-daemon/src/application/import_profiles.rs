//! ImportProfilesUseCase: merges an imported profile collection into the
//! existing one, resolving identifier collisions via an external arbiter.
//!
//! # The conflict flow (for beginners)
//!
//! A backup file may contain profiles whose identifiers already exist in
//! this installation (typically: the backup was taken here, then both sides
//! diverged). For every such collision the user is asked what to do, one
//! collision at a time, in the order the profiles appear in the backup:
//!
//! ```text
//! for each incoming profile (in order):
//!     no id collision          → keep as-is
//!     collision, "keepNew"     → keep, id unchanged (replaces at commit)
//!     collision, "keepOld"     → drop the incoming profile
//!     collision, "keepBoth"    → keep under a fresh id, name unchanged
//!     collision, "newName"     → keep under a fresh id and a new name
//!     dialog dismissed         → abandon the whole import
//! ```
//!
//! The reconciler never mutates the existing collection and never touches
//! the filesystem; it returns the list of profiles the caller should merge
//! and persist. Cancellation is all-or-nothing: a dismissal halfway through
//! discards every decision already made.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use hwtune_core::{fresh_profile_id, ConflictAction, Profile, ProfileId};

/// Error type for profile import operations.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The import source is not a valid profile collection; nothing was
    /// imported.
    #[error("import source is not a valid profile collection: {0}")]
    Format(#[from] serde_json::Error),

    /// The user dismissed the conflict dialog before all collisions were
    /// resolved; nothing was imported.
    #[error("profile import cancelled before all conflicts were resolved")]
    Cancelled,
}

/// Decision source for identifier collisions.
///
/// Implemented by the UI shell as a modal dialog; the daemon only sees the
/// contract. `decide` is awaited once per colliding identifier, strictly in
/// input order, one collision at a time. Returning `None` means the user
/// dismissed the prompt and the import must be abandoned.
#[async_trait]
pub trait ConflictArbiter: Send + Sync {
    /// Resolves one collision between `existing` and `incoming`, which
    /// carry the same identifier.
    async fn decide(&self, existing: &Profile, incoming: &Profile) -> Option<ConflictAction>;
}

/// Decodes a backup payload and reconciles it against `existing`.
///
/// # Errors
///
/// Returns [`ImportError::Format`] before any arbitration if the payload is
/// not a profile collection, and [`ImportError::Cancelled`] if the arbiter
/// gives up partway through.
pub async fn import_from_payload(
    existing: &[Profile],
    payload: &str,
    arbiter: &dyn ConflictArbiter,
) -> Result<Vec<Profile>, ImportError> {
    let incoming: Vec<Profile> = serde_json::from_str(payload)?;
    reconcile_profiles(existing, incoming, arbiter).await
}

/// Merges `incoming` into `existing`, resolving collisions via `arbiter`.
///
/// Returns the ordered list of profiles to append when committing. A
/// keep-new decision keeps the colliding identifier; committing such an
/// entry means replacing the existing profile with that identifier. The
/// reconciler itself deletes and overwrites nothing, and `existing` is
/// never mutated.
///
/// # Errors
///
/// Returns [`ImportError::Cancelled`] when the arbiter returns `None`; the
/// partial merge is discarded entirely.
pub async fn reconcile_profiles(
    existing: &[Profile],
    incoming: Vec<Profile>,
    arbiter: &dyn ConflictArbiter,
) -> Result<Vec<Profile>, ImportError> {
    // Ids that a freshly generated identifier must avoid: everything in
    // `existing` plus everything already placed in the merge result.
    let mut in_use: HashSet<ProfileId> = existing.iter().map(|p| p.id).collect();
    let mut merged: Vec<Profile> = Vec::with_capacity(incoming.len());

    for mut profile in incoming {
        let collision = existing.iter().find(|p| p.id == profile.id);
        match collision {
            None => {
                in_use.insert(profile.id);
                merged.push(profile);
            }
            Some(current) => {
                let action = arbiter
                    .decide(current, &profile)
                    .await
                    .ok_or(ImportError::Cancelled)?;
                debug!(
                    "conflict on profile {} ({}): {:?}",
                    profile.id, profile.name, action
                );
                match action {
                    ConflictAction::KeepNew => {
                        merged.push(profile);
                    }
                    ConflictAction::KeepOld => {}
                    ConflictAction::KeepBoth => {
                        profile.id = fresh_profile_id(&in_use);
                        in_use.insert(profile.id);
                        merged.push(profile);
                    }
                    ConflictAction::NewName { new_name } => {
                        profile.id = fresh_profile_id(&in_use);
                        profile.name = new_name;
                        in_use.insert(profile.id);
                        merged.push(profile);
                    }
                }
            }
        }
    }

    Ok(merged)
}

// ── Test arbiter ──────────────────────────────────────────────────────────────

pub mod mock {
    //! Scripted arbiter for unit and integration tests.
    //!
    //! Replays a fixed sequence of decisions without requiring a UI, and
    //! counts how often it was consulted.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use hwtune_core::{ConflictAction, Profile};

    use super::ConflictArbiter;

    /// A [`ConflictArbiter`] that replays a scripted decision sequence.
    ///
    /// `None` entries simulate the user dismissing the dialog.
    pub struct ScriptedArbiter {
        script: Mutex<VecDeque<Option<ConflictAction>>>,
        decisions_requested: Mutex<u32>,
    }

    impl ScriptedArbiter {
        /// Creates an arbiter that will hand out `decisions` in order.
        pub fn new(decisions: Vec<Option<ConflictAction>>) -> Self {
            Self {
                script: Mutex::new(decisions.into()),
                decisions_requested: Mutex::new(0),
            }
        }

        /// Creates an arbiter that must never be consulted.
        pub fn unreachable() -> Self {
            Self::new(Vec::new())
        }

        /// Returns how many times `decide` was awaited.
        pub fn decisions_requested(&self) -> u32 {
            *self.decisions_requested.lock().expect("lock poisoned")
        }
    }

    #[async_trait]
    impl ConflictArbiter for ScriptedArbiter {
        async fn decide(&self, _existing: &Profile, _incoming: &Profile) -> Option<ConflictAction> {
            *self.decisions_requested.lock().expect("lock poisoned") += 1;
            self.script
                .lock()
                .expect("lock poisoned")
                .pop_front()
                .expect("ScriptedArbiter ran out of scripted decisions")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::ScriptedArbiter;
    use super::*;

    fn named(name: &str) -> Profile {
        Profile::new(name)
    }

    /// An incoming profile that collides with `existing` by id.
    fn colliding_with(existing: &Profile, name: &str) -> Profile {
        let mut p = Profile::new(name);
        p.id = existing.id;
        p
    }

    #[tokio::test]
    async fn test_no_conflicts_passes_incoming_through_unchanged() {
        // Arrange
        let existing = vec![named("old")];
        let incoming = vec![named("a"), named("b")];
        let expected = incoming.clone();
        let arbiter = ScriptedArbiter::unreachable();

        // Act
        let merged = reconcile_profiles(&existing, incoming, &arbiter)
            .await
            .expect("merge");

        // Assert: order and content untouched, arbiter never consulted.
        assert_eq!(merged, expected);
        assert_eq!(arbiter.decisions_requested(), 0);
    }

    #[tokio::test]
    async fn test_keep_old_drops_the_incoming_profile() {
        // Arrange
        let existing = vec![named("P1")];
        let incoming = vec![colliding_with(&existing[0], "P2")];
        let arbiter = ScriptedArbiter::new(vec![Some(ConflictAction::KeepOld)]);

        // Act
        let merged = reconcile_profiles(&existing, incoming, &arbiter)
            .await
            .expect("merge");

        // Assert
        assert!(merged.is_empty());
    }

    #[tokio::test]
    async fn test_keep_new_keeps_incoming_under_original_id() {
        // Arrange
        let existing = vec![named("P1")];
        let incoming = vec![colliding_with(&existing[0], "P2")];
        let arbiter = ScriptedArbiter::new(vec![Some(ConflictAction::KeepNew)]);

        // Act
        let merged = reconcile_profiles(&existing, incoming, &arbiter)
            .await
            .expect("merge");

        // Assert: identifier unchanged, so commit replaces the existing entry.
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, existing[0].id);
        assert_eq!(merged[0].name, "P2");
    }

    #[tokio::test]
    async fn test_keep_both_assigns_fresh_id_and_keeps_name() {
        // Arrange
        let existing = vec![named("P1")];
        let incoming = vec![colliding_with(&existing[0], "P2")];
        let arbiter = ScriptedArbiter::new(vec![Some(ConflictAction::KeepBoth)]);

        // Act
        let merged = reconcile_profiles(&existing, incoming, &arbiter)
            .await
            .expect("merge");

        // Assert
        assert_eq!(merged.len(), 1);
        assert_ne!(merged[0].id, existing[0].id);
        assert_eq!(merged[0].name, "P2");
    }

    #[tokio::test]
    async fn test_new_name_assigns_fresh_id_and_replacement_name() {
        // Arrange
        let existing = vec![named("P1")];
        let incoming = vec![colliding_with(&existing[0], "P2")];
        let arbiter = ScriptedArbiter::new(vec![Some(ConflictAction::NewName {
            new_name: "P2-renamed".to_string(),
        })]);

        // Act
        let merged = reconcile_profiles(&existing, incoming, &arbiter)
            .await
            .expect("merge");

        // Assert
        assert_eq!(merged.len(), 1);
        assert_ne!(merged[0].id, existing[0].id);
        assert_eq!(merged[0].name, "P2-renamed");
    }

    #[tokio::test]
    async fn test_cancellation_midway_discards_the_whole_merge() {
        // Arrange: two collisions; the first resolves, the second cancels.
        let existing = vec![named("P1"), named("Q1")];
        let incoming = vec![
            colliding_with(&existing[0], "P2"),
            colliding_with(&existing[1], "Q2"),
        ];
        let arbiter =
            ScriptedArbiter::new(vec![Some(ConflictAction::KeepNew), None]);

        // Act
        let result = reconcile_profiles(&existing, incoming, &arbiter).await;

        // Assert: nothing survives the cancellation.
        assert!(matches!(result, Err(ImportError::Cancelled)));
        assert_eq!(arbiter.decisions_requested(), 2);
    }

    #[tokio::test]
    async fn test_import_from_payload_rejects_malformed_payload_before_arbitration() {
        // Arrange
        let existing = vec![named("P1")];
        let arbiter = ScriptedArbiter::unreachable();

        // Act
        let result = import_from_payload(&existing, "not a profile list", &arbiter).await;

        // Assert
        assert!(matches!(result, Err(ImportError::Format(_))));
        assert_eq!(arbiter.decisions_requested(), 0);
    }

    #[tokio::test]
    async fn test_fresh_ids_are_distinct_across_one_merge() {
        // Arrange: two keep-both decisions on the same collision id plus a
        // pass-through profile; all result ids must be pairwise distinct
        // and distinct from everything in `existing`.
        let existing = vec![named("P1")];
        let incoming = vec![
            colliding_with(&existing[0], "copy one"),
            colliding_with(&existing[0], "copy two"),
            named("untouched"),
        ];
        let arbiter = ScriptedArbiter::new(vec![
            Some(ConflictAction::KeepBoth),
            Some(ConflictAction::KeepBoth),
        ]);

        // Act
        let merged = reconcile_profiles(&existing, incoming, &arbiter)
            .await
            .expect("merge");

        // Assert
        assert_eq!(merged.len(), 3);
        let mut ids: Vec<_> = merged.iter().map(|p| p.id).collect();
        ids.push(existing[0].id);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4, "all ids must be pairwise distinct");
    }
}
