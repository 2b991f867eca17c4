//! Live episode events.
//!
//! An [`Event`] is immutable after construction except for its `acted`
//! stamp, which `Episode::add_event` sets exactly once when the event is
//! appended. Events convert to and from the serializable
//! [`EventRecord`] for persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use due_types::agent::AgentId;
use due_types::error::ValidationError;
use due_types::event::{EventKind, EventRecord, PayloadRecord};

use crate::action::{Action, ActionRegistry};

/// What an event carries, depending on its kind.
#[derive(Debug, Clone)]
pub enum EventPayload {
    /// The text of an utterance.
    Text(String),
    /// The action performed.
    Action(Arc<dyn Action>),
    /// No payload (leave events).
    Empty,
}

impl EventPayload {
    fn fits(&self, kind: EventKind) -> bool {
        matches!(
            (kind, self),
            (EventKind::Utterance, EventPayload::Text(_))
                | (EventKind::Action, EventPayload::Action(_))
                | (EventKind::Leave, EventPayload::Empty)
        )
    }

    fn expected_for(kind: EventKind) -> &'static str {
        match kind {
            EventKind::Utterance => "a text payload",
            EventKind::Action => "an action payload",
            EventKind::Leave => "no payload",
        }
    }

    fn to_record(&self) -> PayloadRecord {
        match self {
            EventPayload::Text(text) => PayloadRecord::Text { text: text.clone() },
            EventPayload::Action(action) => PayloadRecord::Action {
                action: action.record(),
            },
            EventPayload::Empty => PayloadRecord::Empty,
        }
    }

    fn from_record(record: PayloadRecord, actions: &ActionRegistry) -> Self {
        match record {
            PayloadRecord::Text { text } => EventPayload::Text(text),
            PayloadRecord::Action { action } => EventPayload::Action(actions.revive(action)),
            PayloadRecord::Empty => EventPayload::Empty,
        }
    }
}

/// A single timestamped occurrence within an episode.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    timestamp: DateTime<Utc>,
    agent: AgentId,
    payload: EventPayload,
    acted: Option<DateTime<Utc>>,
}

impl Event {
    /// Build an event, checking that the payload fits the kind.
    pub fn new(
        kind: EventKind,
        timestamp: DateTime<Utc>,
        agent: impl Into<AgentId>,
        payload: EventPayload,
    ) -> Result<Self, ValidationError> {
        if !payload.fits(kind) {
            return Err(ValidationError::PayloadMismatch {
                kind,
                expected: EventPayload::expected_for(kind),
            });
        }
        Ok(Self {
            kind,
            timestamp,
            agent: agent.into(),
            payload,
            acted: None,
        })
    }

    /// An utterance by `agent`, timestamped now.
    pub fn utterance(agent: impl Into<AgentId>, text: impl Into<String>) -> Self {
        Self::unchecked(EventKind::Utterance, agent.into(), EventPayload::Text(text.into()))
    }

    /// An action performed by `agent`, timestamped now.
    pub fn action(agent: impl Into<AgentId>, action: Arc<dyn Action>) -> Self {
        Self::unchecked(EventKind::Action, agent.into(), EventPayload::Action(action))
    }

    /// A leave notice from `agent`, timestamped now.
    pub fn leave(agent: impl Into<AgentId>) -> Self {
        Self::unchecked(EventKind::Leave, agent.into(), EventPayload::Empty)
    }

    fn unchecked(kind: EventKind, agent: AgentId, payload: EventPayload) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            agent,
            payload,
            acted: None,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The originating agent.
    pub fn agent(&self) -> &AgentId {
        &self.agent
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// When the event was appended to an episode, if it has been.
    pub fn acted(&self) -> Option<DateTime<Utc>> {
        self.acted
    }

    /// The utterance text, for utterance events.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The action, for action events.
    pub fn action_payload(&self) -> Option<&Arc<dyn Action>> {
        match &self.payload {
            EventPayload::Action(action) => Some(action),
            _ => None,
        }
    }

    pub(crate) fn mark_acted(&mut self, at: DateTime<Utc>) {
        self.acted = Some(at);
    }

    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            kind: self.kind,
            timestamp: self.timestamp,
            agent: self.agent.clone(),
            payload: self.payload.to_record(),
            acted: self.acted,
        }
    }

    /// Rebuild an event from its persisted record, `acted` stamp included.
    pub fn from_record(
        record: EventRecord,
        actions: &ActionRegistry,
    ) -> Result<Self, ValidationError> {
        let payload = EventPayload::from_record(record.payload, actions);
        let mut event = Self::new(record.kind, record.timestamp, record.agent, payload)?;
        event.acted = record.acted;
        Ok(event)
    }
}

/// Events are equal when their persisted forms are equal; actions compare
/// by their records.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.to_record() == other.to_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::LogAction;

    #[test]
    fn new_rejects_mismatched_payload() {
        let err = Event::new(
            EventKind::Utterance,
            Utc::now(),
            "Alice",
            EventPayload::Empty,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::PayloadMismatch {
                kind: EventKind::Utterance,
                expected: "a text payload",
            }
        );

        let err = Event::new(
            EventKind::Leave,
            Utc::now(),
            "Alice",
            EventPayload::Text("bye".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::PayloadMismatch { kind: EventKind::Leave, .. }));
    }

    #[test]
    fn new_accepts_matching_payloads() {
        let now = Utc::now();
        let u = Event::new(EventKind::Utterance, now, "Alice", EventPayload::Text("hi".into()))
            .unwrap();
        assert_eq!(u.text(), Some("hi"));
        assert_eq!(u.timestamp(), now);
        assert!(u.acted().is_none());

        let a = Event::new(
            EventKind::Action,
            now,
            "Alice",
            EventPayload::Action(Arc::new(LogAction::new("x"))),
        )
        .unwrap();
        assert!(a.action_payload().is_some());
        assert!(a.text().is_none());
    }

    #[test]
    fn unknown_kind_name_fails_validation() {
        let err = "wave".parse::<EventKind>().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownEventKind(_)));
    }

    #[test]
    fn record_roundtrip_preserves_acted() {
        let mut event = Event::utterance("Alice", "First utterance");
        event.mark_acted(Utc::now());

        let record = event.to_record();
        let restored = Event::from_record(record, &ActionRegistry::new()).unwrap();
        assert_eq!(restored, event);
        assert_eq!(restored.acted(), event.acted());
    }

    #[test]
    fn action_events_compare_by_record() {
        let a = Event::action("Alice", Arc::new(LogAction::new("x")));
        let restored = Event::from_record(a.to_record(), &ActionRegistry::new()).unwrap();
        assert_eq!(restored, a);
    }
}
