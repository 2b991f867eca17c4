//! Episode coordination core for Due.
//!
//! This crate holds the conversation machinery: live events and episodes,
//! the agent callback contract, the extraction utilities that turn
//! transcripts into training pairs, and the "ports" (repository and
//! transport traits) that the infrastructure layer implements. It depends
//! only on `due-types` -- never on `due-infra` or any IO crate.

pub mod action;
pub mod agent;
pub mod episode;
pub mod event;
pub mod extract;
pub mod repository;
pub mod serve;

pub use agent::{Agent, AgentDirectory};
pub use episode::Episode;
pub use event::{Event, EventPayload};
