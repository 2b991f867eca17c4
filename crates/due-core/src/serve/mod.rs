//! Serving an agent to remote participants.
//!
//! A [`Bridge`] sits between a message transport (a chat network, a
//! console) and one served agent. Each remote sender gets a stand-in
//! identity and at most one live episode; inbound text becomes utterance
//! events and the served agent's replies go back out through the
//! [`Transport`].

pub mod bridge;
pub mod relay;

use due_types::agent::AgentId;
use due_types::episode::EpisodeState;
use due_types::error::{AgentError, EpisodeError, ValidationError};
use thiserror::Error;

pub use bridge::{Bridge, Inbound};
pub use relay::Relay;

/// Prefix marking an inbound message as a directive rather than an utterance.
pub const COMMAND_PREFIX: &str = ",,,";

/// Text sent back to a sender after a `leave` directive.
pub const LEAVE_ACK: &str = "[you left the episode]";

/// Outbound side of a bridge.
pub trait Transport: Send + Sync {
    /// Deliver `text` to the remote participant `recipient`.
    fn deliver(&self, recipient: &AgentId, text: &str) -> Result<(), ServeError>;
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("live episode of '{0}' is poisoned")]
    Poisoned(AgentId),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Episode(#[from] EpisodeError),

    /// The sender left, but the leave callback or the acknowledgement
    /// failed. The episode is closed regardless and carried here.
    #[error("episode {} closed with an error: {source}", episode.id)]
    LeaveFailed {
        episode: Box<EpisodeState>,
        #[source]
        source: Box<ServeError>,
    },
}

impl ServeError {
    /// The episode closed by a failed leave, if that is what this error is.
    pub fn closed_episode(&self) -> Option<&EpisodeState> {
        match self {
            ServeError::LeaveFailed { episode, .. } => Some(episode),
            _ => None,
        }
    }
}

impl From<ServeError> for AgentError {
    fn from(err: ServeError) -> Self {
        match err {
            ServeError::Agent(inner) => inner,
            other => AgentError::Transport(other.to_string()),
        }
    }
}
