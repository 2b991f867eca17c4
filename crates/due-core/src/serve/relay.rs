//! Relay: the served agent as seen from inside an episode.

use std::sync::Arc;

use due_types::agent::{AgentId, AgentState};
use due_types::error::AgentError;
use due_types::event::EventKind;
use tracing::{debug, info};

use super::Transport;
use crate::agent::Agent;
use crate::episode::Episode;
use crate::event::Event;

/// Wraps a served agent so that its replies take effect outside the
/// episode: utterances are delivered to the other participant through the
/// transport and actions are run.
///
/// The replies are still returned to the episode, which records them as
/// follow-up events.
pub struct Relay {
    inner: Arc<dyn Agent>,
    transport: Arc<dyn Transport>,
}

impl Relay {
    pub fn new(inner: Arc<dyn Agent>, transport: Arc<dyn Transport>) -> Self {
        Self { inner, transport }
    }

    fn act(&self, episode: &Episode, replies: Vec<Event>) -> Result<Vec<Event>, AgentError> {
        let recipient = episode.counterpart(self.id()).ok_or_else(|| {
            AgentError::Failed(format!(
                "'{}' is not a participant of episode {}",
                self.id(),
                episode.id()
            ))
        })?;

        for reply in &replies {
            match reply.kind() {
                EventKind::Utterance => {
                    if let Some(text) = reply.text() {
                        debug!(episode_id = %episode.id(), %recipient, "delivering reply");
                        self.transport.deliver(recipient, text)?;
                    }
                }
                EventKind::Action => {
                    if let Some(action) = reply.action_payload() {
                        action.run()?;
                    }
                }
                EventKind::Leave => {
                    info!(episode_id = %episode.id(), agent_id = %self.id(), "served agent left the episode");
                }
            }
        }
        Ok(replies)
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay").field("agent", self.inner.id()).finish()
    }
}

impl Agent for Relay {
    fn id(&self) -> &AgentId {
        self.inner.id()
    }

    fn new_episode_callback(&self, episode: &Episode) -> Result<(), AgentError> {
        info!(episode_id = %episode.id(), starter = %episode.starter_id(), "new episode");
        self.inner.new_episode_callback(episode)
    }

    fn utterance_callback(&self, episode: &Episode) -> Result<Vec<Event>, AgentError> {
        let replies = self.inner.utterance_callback(episode)?;
        self.act(episode, replies)
    }

    fn action_callback(&self, episode: &Episode) -> Result<Vec<Event>, AgentError> {
        let replies = self.inner.action_callback(episode)?;
        self.act(episode, replies)
    }

    fn leave_callback(&self, episode: &Episode) -> Result<Vec<Event>, AgentError> {
        info!(episode_id = %episode.id(), events = episode.len(), "remote participant left");
        let replies = self.inner.leave_callback(episode)?;
        self.act(episode, replies)
    }

    fn learn_episodes(&self, episodes: &[Episode]) -> Result<(), AgentError> {
        self.inner.learn_episodes(episodes)
    }

    fn save(&self) -> Result<AgentState, AgentError> {
        self.inner.save()
    }
}
