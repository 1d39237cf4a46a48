//! Application layer use cases for the daemon.
//!
//! Use cases in this layer orchestrate domain objects to fulfil a user
//! goal, depend on abstractions (traits) rather than concrete
//! implementations, and contain no filesystem access. Persisting the
//! results through the config store is always the caller's final step.
//!
//! # Sub-modules
//!
//! - **`manage_profiles`** – Maintains the in-memory registry of built-in
//!   and custom profiles: copy, delete, lookup, name checks, power-state
//!   assignment.
//!
//! - **`import_profiles`** – Merges a profile collection decoded from a
//!   backup into the existing one, resolving identifier collisions through
//!   the [`ConflictArbiter`](import_profiles::ConflictArbiter) boundary
//!   (a modal dialog in the UI shell).

pub mod import_profiles;
pub mod manage_profiles;
