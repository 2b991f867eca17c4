//! Shared domain types for Due.
//!
//! This crate contains the serializable shapes of the Due domain: agent
//! identifiers, event and episode records, resource records, configuration,
//! and the error types shared across crates.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod agent;
pub mod config;
pub mod episode;
pub mod error;
pub mod event;
pub mod resource;
