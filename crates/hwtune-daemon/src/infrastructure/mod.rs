//! Infrastructure layer: everything that touches the filesystem.
//!
//! The application layer depends only on the types exposed here, never on
//! the concrete filesystem paths, so tests can point the store at temp
//! directories.

pub mod storage;
