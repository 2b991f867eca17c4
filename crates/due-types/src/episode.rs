//! Persisted episode state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::AgentId;
use crate::event::EventRecord;

/// Everything needed to rebuild an episode: identity, participants, and the
/// full ordered event list.
///
/// Produced by `Episode::save` and consumed by `Episode::load`. The
/// persistence adapters write this shape verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeState {
    pub id: Uuid,
    /// The participant who initiated the episode.
    pub starter_id: AgentId,
    pub invited_id: AgentId,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_episode_state_roundtrip() {
        let state = EpisodeState {
            id: Uuid::now_v7(),
            starter_id: AgentId::from("Alice"),
            invited_id: AgentId::from("Bob"),
            events: Vec::new(),
        };
        let json = serde_json::to_string(&state).unwrap();
        let parsed: EpisodeState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_missing_events_defaults_to_empty() {
        let id = Uuid::now_v7();
        let json = format!(r#"{{"id":"{id}","starter_id":"a","invited_id":"b"}}"#);
        let parsed: EpisodeState = serde_json::from_str(&json).unwrap();
        assert!(parsed.events.is_empty());
        assert_eq!(parsed.starter_id.as_str(), "a");
    }
}
