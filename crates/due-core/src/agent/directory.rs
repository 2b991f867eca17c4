//! Concurrent id -> agent directory used for callback delivery.
//!
//! Episodes only store participant ids; `Episode::add_event` resolves the
//! recipient of each callback through an `AgentDirectory`. The directory
//! does not own agent lifecycles beyond holding an `Arc`.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use due_types::agent::AgentId;
use due_types::error::ValidationError;
use tracing::debug;

use super::Agent;

/// Shared registry of the agents that can receive episode callbacks.
///
/// Cloning the directory shares the underlying map.
#[derive(Clone, Default)]
pub struct AgentDirectory {
    agents: Arc<DashMap<AgentId, Arc<dyn Agent>>>,
}

impl AgentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under its own id.
    ///
    /// Registering a second agent with the same id is a validation error.
    pub fn register(&self, agent: Arc<dyn Agent>) -> Result<(), ValidationError> {
        match self.agents.entry(agent.id().clone()) {
            Entry::Occupied(entry) => Err(ValidationError::DuplicateAgent(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!(agent_id = %entry.key(), "registered agent");
                entry.insert(agent);
                Ok(())
            }
        }
    }

    /// Return the agent registered under `id`, registering the one built by
    /// `make` first if there is none.
    pub fn get_or_register<F>(&self, id: &AgentId, make: F) -> Arc<dyn Agent>
    where
        F: FnOnce() -> Arc<dyn Agent>,
    {
        let entry = self.agents.entry(id.clone()).or_insert_with(|| {
            debug!(agent_id = %id, "registered agent on first contact");
            make()
        });
        Arc::clone(entry.value())
    }

    pub fn get(&self, id: &AgentId) -> Option<Arc<dyn Agent>> {
        self.agents.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove an agent. Returns `true` if it was registered.
    pub fn unregister(&self, id: &AgentId) -> bool {
        let removed = self.agents.remove(id).is_some();
        if removed {
            debug!(agent_id = %id, "unregistered agent");
        }
        removed
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.agents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl std::fmt::Debug for AgentDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentDirectory")
            .field("agents", &self.agents.len())
            .finish()
    }
}
