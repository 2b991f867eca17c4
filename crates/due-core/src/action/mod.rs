//! Runnable action payloads carried by action events.
//!
//! The episode core treats actions opaquely: all it needs is that an action
//! can be run and can describe itself as an [`ActionRecord`] for
//! persistence. The [`ActionRegistry`] turns records back into runnable
//! actions when an episode is reloaded.

pub mod registry;

use std::fmt;

use due_types::error::ActionError;
use due_types::event::ActionRecord;
use serde_json::json;

pub use registry::ActionRegistry;

/// A unit of work an agent can perform as a turn in an episode.
pub trait Action: fmt::Debug + Send + Sync {
    /// Describe this action so it can be persisted and revived.
    fn record(&self) -> ActionRecord;

    /// Execute the action's effect.
    fn run(&self) -> Result<(), ActionError>;
}

/// An action reloaded from storage whose kind has no registered
/// implementation.
///
/// Keeps the original record so saving it again loses nothing. Running it
/// fails with [`ActionError::Unresolved`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAction {
    record: ActionRecord,
}

impl StoredAction {
    pub fn new(record: ActionRecord) -> Self {
        Self { record }
    }
}

impl Action for StoredAction {
    fn record(&self) -> ActionRecord {
        self.record.clone()
    }

    fn run(&self) -> Result<(), ActionError> {
        Err(ActionError::Unresolved(self.record.kind.clone()))
    }
}

/// Built-in action that writes a message to the log when run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogAction {
    message: String,
}

impl LogAction {
    pub const KIND: &'static str = "log";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn from_params(params: &serde_json::Value) -> Result<Self, ActionError> {
        params
            .get("message")
            .and_then(|m| m.as_str())
            .map(Self::new)
            .ok_or_else(|| ActionError::InvalidParams {
                kind: Self::KIND.to_string(),
                reason: "missing string field 'message'".to_string(),
            })
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Action for LogAction {
    fn record(&self) -> ActionRecord {
        ActionRecord::new(Self::KIND, json!({ "message": self.message }))
    }

    fn run(&self) -> Result<(), ActionError> {
        tracing::info!(message = %self.message, "log action ran");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_action_keeps_record_and_refuses_to_run() {
        let record = ActionRecord::new("open_door", json!({"door": 3}));
        let action = StoredAction::new(record.clone());
        assert_eq!(action.record(), record);
        assert_eq!(
            action.run().unwrap_err(),
            ActionError::Unresolved("open_door".to_string())
        );
    }

    #[test]
    fn log_action_record_roundtrip() {
        let action = LogAction::new("lights on");
        let record = action.record();
        assert_eq!(record.kind, "log");
        let revived = LogAction::from_params(&record.params).unwrap();
        assert_eq!(revived, action);
        assert!(revived.run().is_ok());
    }

    #[test]
    fn log_action_rejects_missing_message() {
        let err = LogAction::from_params(&json!({"msg": 1})).unwrap_err();
        assert!(matches!(err, ActionError::InvalidParams { ref kind, .. } if kind == "log"));
    }
}
