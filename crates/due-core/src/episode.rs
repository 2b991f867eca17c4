//! Episodes: ordered transcripts of events between two participants.
//!
//! `Episode::add_event` is the single mutation path. It appends the event,
//! stamps it as acted, and synchronously notifies the *other* participant
//! through the matching callback. Follow-up events returned by callbacks are
//! queued and processed in FIFO order once the current dispatch unwinds, so
//! a callback never re-enters `add_event` on the episode it is observing.

use std::collections::VecDeque;

use chrono::Utc;
use due_types::agent::AgentId;
use due_types::episode::EpisodeState;
use due_types::error::{EpisodeError, ValidationError};
use due_types::event::EventKind;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::action::ActionRegistry;
use crate::agent::AgentDirectory;
use crate::event::Event;

/// Maximum number of follow-up events a single `add_event` call processes.
///
/// Two agents that always answer each other would otherwise loop forever.
pub const MAX_FOLLOW_UPS: usize = 64;

/// An ordered, append-only transcript between a starter and an invited agent.
///
/// Participants are stored by id only; callbacks are delivered through an
/// [`AgentDirectory`] supplied at each `add_event` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    id: Uuid,
    starter_id: AgentId,
    invited_id: AgentId,
    events: Vec<Event>,
}

impl Episode {
    /// Create an empty episode with a fresh id.
    pub fn new(starter_id: impl Into<AgentId>, invited_id: impl Into<AgentId>) -> Self {
        Self {
            id: Uuid::now_v7(),
            starter_id: starter_id.into(),
            invited_id: invited_id.into(),
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn starter_id(&self) -> &AgentId {
        &self.starter_id
    }

    pub fn invited_id(&self) -> &AgentId {
        &self.invited_id
    }

    /// Events in the order they were added.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_participant(&self, agent: &AgentId) -> bool {
        *agent == self.starter_id || *agent == self.invited_id
    }

    /// The participant other than `agent`, or `None` if `agent` is not a
    /// participant.
    pub fn counterpart(&self, agent: &AgentId) -> Option<&AgentId> {
        if *agent == self.starter_id {
            Some(&self.invited_id)
        } else if *agent == self.invited_id {
            Some(&self.starter_id)
        } else {
            None
        }
    }

    /// Whether a leave event has been recorded.
    ///
    /// Leave is a marker, not a lock: the episode still accepts events.
    pub fn is_left(&self) -> bool {
        self.last_event(Some(EventKind::Leave)).is_some()
    }

    /// Append `event` and notify the other participant.
    ///
    /// The event's author must be a participant and the recipient must be
    /// registered in `agents`; both are checked before anything is appended.
    /// Callback errors propagate unchanged. Events appended before an error
    /// (including earlier follow-ups) stay in the episode.
    pub fn add_event(&mut self, agents: &AgentDirectory, event: Event) -> Result<(), EpisodeError> {
        let mut pending = VecDeque::from([event]);
        let mut follow_ups = 0usize;

        while let Some(event) = pending.pop_front() {
            let replies = self.append_and_dispatch(agents, event)?;
            follow_ups += replies.len();
            if follow_ups > MAX_FOLLOW_UPS {
                warn!(episode_id = %self.id, limit = MAX_FOLLOW_UPS, "dispatch limit reached, dropping follow-up events");
                return Err(EpisodeError::DispatchLimit {
                    episode: self.id,
                    limit: MAX_FOLLOW_UPS,
                });
            }
            pending.extend(replies);
        }

        Ok(())
    }

    fn append_and_dispatch(
        &mut self,
        agents: &AgentDirectory,
        mut event: Event,
    ) -> Result<Vec<Event>, EpisodeError> {
        if event.acted().is_some() {
            return Err(ValidationError::InvalidState(
                "event has already been added to an episode".to_string(),
            )
            .into());
        }

        let author = event.agent().clone();
        let recipient_id = self
            .counterpart(&author)
            .cloned()
            .ok_or_else(|| EpisodeError::NotParticipant {
                agent: author.clone(),
                episode: self.id,
            })?;

        // Same-agent episodes have nobody else to notify.
        let recipient = if recipient_id == author {
            None
        } else {
            Some(
                agents
                    .get(&recipient_id)
                    .ok_or_else(|| EpisodeError::UnknownAgent(recipient_id.clone()))?,
            )
        };

        let kind = event.kind();
        event.mark_acted(Utc::now());
        self.events.push(event);
        debug!(episode_id = %self.id, %kind, agent = %author, index = self.events.len() - 1, "event appended");

        let Some(recipient) = recipient else {
            warn!(episode_id = %self.id, agent = %author, "starter and invited are the same agent, skipping dispatch");
            return Ok(Vec::new());
        };

        let replies = match kind {
            EventKind::Utterance => recipient.utterance_callback(self)?,
            EventKind::Action => recipient.action_callback(self)?,
            EventKind::Leave => recipient.leave_callback(self)?,
        };
        if !replies.is_empty() {
            debug!(episode_id = %self.id, agent = %recipient_id, count = replies.len(), "callback queued follow-up events");
        }
        Ok(replies)
    }

    /// The most recent event, or the most recent event of `kind`.
    pub fn last_event(&self, kind: Option<EventKind>) -> Option<&Event> {
        self.events
            .iter()
            .rev()
            .find(|event| kind.is_none_or(|k| event.kind() == k))
    }

    /// Snapshot the episode for persistence.
    pub fn save(&self) -> EpisodeState {
        EpisodeState {
            id: self.id,
            starter_id: self.starter_id.clone(),
            invited_id: self.invited_id.clone(),
            events: self.events.iter().map(Event::to_record).collect(),
        }
    }

    /// Rebuild an episode from a snapshot, reviving the built-in actions.
    pub fn load(state: EpisodeState) -> Result<Self, ValidationError> {
        Self::load_with(state, &ActionRegistry::with_builtins())
    }

    /// Rebuild an episode from a snapshot, reviving actions through `actions`.
    pub fn load_with(state: EpisodeState, actions: &ActionRegistry) -> Result<Self, ValidationError> {
        let mut episode = Self {
            id: state.id,
            starter_id: state.starter_id,
            invited_id: state.invited_id,
            events: Vec::with_capacity(state.events.len()),
        };
        for record in state.events {
            if !episode.is_participant(&record.agent) {
                return Err(ValidationError::InvalidState(format!(
                    "event by '{}' in episode {} between '{}' and '{}'",
                    record.agent, episode.id, episode.starter_id, episode.invited_id
                )));
            }
            episode.events.push(Event::from_record(record, actions)?);
        }
        Ok(episode)
    }
}
