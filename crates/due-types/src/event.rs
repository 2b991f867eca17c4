//! Event kinds and the persisted form of episode events.
//!
//! The live `Event` (with a runnable action payload) lives in `due-core`;
//! this module holds the serializable record it is saved as.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::agent::AgentId;
use crate::error::ValidationError;

/// The kind of a turn-level occurrence within an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Utterance,
    Action,
    Leave,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Utterance => write!(f, "utterance"),
            EventKind::Action => write!(f, "action"),
            EventKind::Leave => write!(f, "leave"),
        }
    }
}

impl FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utterance" => Ok(EventKind::Utterance),
            "action" => Ok(EventKind::Action),
            "leave" => Ok(EventKind::Leave),
            other => Err(ValidationError::UnknownEventKind(other.to_string())),
        }
    }
}

/// Self-description of an action, used to persist and revive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Registry key of the action implementation (e.g. "log").
    pub kind: String,
    /// Implementation-specific parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl ActionRecord {
    pub fn new(kind: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }
}

/// Persisted event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayloadRecord {
    Text { text: String },
    Action { action: ActionRecord },
    Empty,
}

/// Persisted form of a single episode event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub agent: AgentId,
    pub payload: PayloadRecord,
    /// When the event was appended to its episode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acted: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_kind_roundtrip() {
        for kind in [EventKind::Utterance, EventKind::Action, EventKind::Leave] {
            let parsed: EventKind = kind.to_string().parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_event_kind_parse_is_case_insensitive() {
        assert_eq!("Utterance".parse::<EventKind>().unwrap(), EventKind::Utterance);
        assert_eq!("LEAVE".parse::<EventKind>().unwrap(), EventKind::Leave);
    }

    #[test]
    fn test_event_kind_rejects_unknown() {
        let err = "shout".parse::<EventKind>().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownEventKind(ref k) if k == "shout"));
    }

    #[test]
    fn test_payload_record_tagging() {
        let payload = PayloadRecord::Action {
            action: ActionRecord::new("log", json!({"message": "hi"})),
        };
        let json_str = serde_json::to_string(&payload).unwrap();
        assert!(json_str.contains("\"type\":\"action\""));
        assert!(json_str.contains("\"kind\":\"log\""));

        let empty = serde_json::to_string(&PayloadRecord::Empty).unwrap();
        assert_eq!(empty, "{\"type\":\"empty\"}");
    }

    #[test]
    fn test_event_record_omits_missing_acted() {
        let record = EventRecord {
            kind: EventKind::Leave,
            timestamp: Utc::now(),
            agent: AgentId::from("Alice"),
            payload: PayloadRecord::Empty,
            acted: None,
        };
        let json_str = serde_json::to_string(&record).unwrap();
        assert!(!json_str.contains("acted"));

        let parsed: EventRecord = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed, record);
    }
}
