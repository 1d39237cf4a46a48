//! # hwtune-core
//!
//! Shared domain library for hwtune containing the hardware-profile and
//! settings entities plus the import conflict vocabulary.
//!
//! This crate is used by the daemon and by any UI shell built on top of it.
//! It has zero dependencies on OS APIs, UI frameworks, or the filesystem.
//!
//! # Architecture overview (for beginners)
//!
//! hwtune is a hardware-profile control application: the user defines named
//! profiles of hardware tunables (screen brightness, keyboard backlight,
//! fan duty, webcam power) and maps power states (AC, battery) to profiles.
//! The daemon applies the tunables; this crate defines what a profile *is*.
//!
//! - **`domain::profile`** – The [`Profile`] entity. Every tunable is
//!   optional: an absent value means "not specified by this profile", which
//!   is a different thing from a value of zero.
//!
//! - **`domain::settings`** – The singleton [`Settings`] document holding
//!   the active-profile pointer and the power-state → profile mapping.
//!
//! - **`domain::conflict`** – The [`ConflictAction`] reply vocabulary used
//!   when an imported profile collides with an existing identifier.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `hwtune_core::Profile` instead of `hwtune_core::domain::profile::Profile`.
pub use domain::conflict::ConflictAction;
pub use domain::profile::{fresh_profile_id, Profile, ProfileError, ProfileId, PERCENT_MAX};
pub use domain::settings::{Settings, STATE_POWER_AC, STATE_POWER_BAT};
