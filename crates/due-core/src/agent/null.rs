//! Pass-through agent used purely as a callback sink.

use due_types::agent::AgentId;
use due_types::error::AgentError;

use super::Agent;
use crate::episode::Episode;
use crate::event::Event;

/// Participant with no behavior of its own.
///
/// The binding layer registers one per remote sender so episodes have a
/// callback target for the remote side; whatever the remote does next
/// arrives as new inbound messages, not as callback replies.
#[derive(Debug, Clone)]
pub struct NullAgent {
    id: AgentId,
}

impl NullAgent {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self { id: id.into() }
    }
}

impl Agent for NullAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn utterance_callback(&self, _episode: &Episode) -> Result<Vec<Event>, AgentError> {
        Ok(Vec::new())
    }

    fn action_callback(&self, _episode: &Episode) -> Result<Vec<Event>, AgentError> {
        Ok(Vec::new())
    }

    fn leave_callback(&self, _episode: &Episode) -> Result<Vec<Event>, AgentError> {
        Ok(Vec::new())
    }
}
