//! Human-backed agent.
//!
//! A human produces events from outside the framework (a keyboard, a chat
//! client), so the agent itself never replies. It only records which
//! callbacks it received.

use std::sync::atomic::{AtomicUsize, Ordering};

use due_types::agent::AgentId;
use due_types::error::AgentError;

use super::Agent;
use crate::episode::Episode;
use crate::event::Event;

/// Number of callbacks of each kind an agent has received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallbackCounts {
    pub new_episodes: usize,
    pub utterances: usize,
    pub actions: usize,
    pub leaves: usize,
}

/// Agent standing in for a human participant.
#[derive(Debug)]
pub struct HumanAgent {
    id: AgentId,
    new_episodes: AtomicUsize,
    utterances: AtomicUsize,
    actions: AtomicUsize,
    leaves: AtomicUsize,
}

impl HumanAgent {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self {
            id: id.into(),
            new_episodes: AtomicUsize::new(0),
            utterances: AtomicUsize::new(0),
            actions: AtomicUsize::new(0),
            leaves: AtomicUsize::new(0),
        }
    }

    pub fn callback_counts(&self) -> CallbackCounts {
        CallbackCounts {
            new_episodes: self.new_episodes.load(Ordering::SeqCst),
            utterances: self.utterances.load(Ordering::SeqCst),
            actions: self.actions.load(Ordering::SeqCst),
            leaves: self.leaves.load(Ordering::SeqCst),
        }
    }
}

impl Agent for HumanAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn new_episode_callback(&self, _episode: &Episode) -> Result<(), AgentError> {
        self.new_episodes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn utterance_callback(&self, _episode: &Episode) -> Result<Vec<Event>, AgentError> {
        self.utterances.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    fn action_callback(&self, _episode: &Episode) -> Result<Vec<Event>, AgentError> {
        self.actions.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    fn leave_callback(&self, _episode: &Episode) -> Result<Vec<Event>, AgentError> {
        self.leaves.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}
