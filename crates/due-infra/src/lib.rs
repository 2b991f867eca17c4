//! Infrastructure layer for Due.
//!
//! Contains implementations of the ports defined in `due-core`: the JSON
//! episode store, plus the resource manager, configuration loader, and
//! data-directory helpers used by the binary.

pub mod config;
pub mod filesystem;
pub mod persistence;
pub mod resources;
