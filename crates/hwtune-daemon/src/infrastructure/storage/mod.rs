//! Durable storage for settings and profile collections.
//!
//! - **`config`** – the [`ConfigStore`](config::ConfigStore): TOML documents
//!   under the platform config directory, with the directory/permission
//!   contract the daemon guarantees (created directories `0755`, written
//!   files `0644`).
//! - **`backup`** – the JSON interchange codec used when the user exports
//!   profiles to a file or imports a previously exported one.

pub mod backup;
pub mod config;
