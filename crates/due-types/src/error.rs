use thiserror::Error;
use uuid::Uuid;

use crate::agent::AgentId;
use crate::event::EventKind;

/// Malformed input rejected at the point of the offending call.
///
/// Validation errors are never retried; the caller decides what to do.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("unrecognized event kind: '{0}'")]
    UnknownEventKind(String),

    #[error("{kind} event requires {expected}")]
    PayloadMismatch {
        kind: EventKind,
        expected: &'static str,
    },

    #[error("agent '{0}' is already registered")]
    DuplicateAgent(AgentId),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised by the actions carried in action events.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    #[error("no runnable implementation registered for action '{0}'")]
    Unresolved(String),

    #[error("invalid parameters for action '{kind}': {reason}")]
    InvalidParams { kind: String, reason: String },
}

/// Errors raised by agent capabilities.
///
/// `NotImplemented` marks a missing capability (programmer error), not a
/// transient condition: it must propagate unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AgentError {
    #[error("agent '{agent}' does not implement {capability}")]
    NotImplemented {
        agent: AgentId,
        capability: &'static str,
    },

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("agent failure: {0}")]
    Failed(String),
}

impl AgentError {
    pub fn not_implemented(agent: &AgentId, capability: &'static str) -> Self {
        AgentError::NotImplemented {
            agent: agent.clone(),
            capability,
        }
    }
}

/// Errors from `Episode::add_event` and related episode operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EpisodeError {
    #[error("agent '{agent}' is not a participant of episode {episode}")]
    NotParticipant { agent: AgentId, episode: Uuid },

    #[error("agent '{0}' is not registered in the agent directory")]
    UnknownAgent(AgentId),

    #[error("episode {episode} exceeded {limit} follow-up events in a single dispatch")]
    DispatchLimit { episode: Uuid, limit: usize },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Errors from the episode persistence adapters.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("episode {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Errors from the resource store.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("cannot overwrite existing resource '{0}'")]
    AlreadyRegistered(String),

    #[error("filename '{filename}' is already used by resource '{existing}'")]
    FilenameTaken { filename: String, existing: String },

    #[error("resource '{0}' is not registered")]
    Unregistered(String),

    #[error("resource not found: {name} (download it from {url} into {path})")]
    Missing {
        name: String,
        url: String,
        path: String,
    },

    #[error("resource '{name}' is not a ZIP archive: {reason}")]
    UnsupportedFormat { name: String, reason: String },

    #[error("resource '{name}' has no member '{filename}'")]
    MemberNotFound { name: String, filename: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::PayloadMismatch {
            kind: EventKind::Utterance,
            expected: "a text payload",
        };
        assert_eq!(err.to_string(), "utterance event requires a text payload");
    }

    #[test]
    fn test_not_implemented_display() {
        let err = AgentError::not_implemented(&AgentId::from("bot"), "save");
        assert_eq!(err.to_string(), "agent 'bot' does not implement save");
    }

    #[test]
    fn test_episode_error_wraps_agent_error_transparently() {
        let inner = AgentError::not_implemented(&AgentId::from("bot"), "action_callback");
        let err: EpisodeError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        assert!(matches!(
            err,
            EpisodeError::Agent(AgentError::NotImplemented { capability: "action_callback", .. })
        ));
    }

    #[test]
    fn test_resource_error_display() {
        let err = ResourceError::AlreadyRegistered("corpora.toy".to_string());
        assert_eq!(err.to_string(), "cannot overwrite existing resource 'corpora.toy'");
    }
}
