//! Pure domain entities with no OS dependencies.

pub mod conflict;
pub mod profile;
pub mod settings;
