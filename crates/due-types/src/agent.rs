//! Agent identity types.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Stable, opaque identifier of an episode participant.
///
/// Local agents pick their own id (e.g. `"Alice"`); remote participants get
/// the address the binding layer knows them by (e.g. a chat handle).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AgentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Snapshot of an agent's learned state, as produced by `Agent::save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub id: AgentId,
    /// Agent implementation tag (e.g. "replay").
    pub kind: String,
    /// Implementation-specific payload.
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_display() {
        let id = AgentId::from("Alice");
        assert_eq!(id.to_string(), "Alice");
        assert_eq!(id.as_str(), "Alice");
    }

    #[test]
    fn test_agent_id_serializes_as_plain_string() {
        let id = AgentId::new("default@human.im");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"default@human.im\"");
        let parsed: AgentId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
