//! Replay agent: answers with what was said after the same utterance in the
//! episodes it learned from.
//!
//! Lookup is an exact match on normalized text (see `extract::normalize`).
//! When several episodes answer the same input, the first one learned wins.

use std::collections::BTreeMap;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use due_types::agent::{AgentId, AgentState};
use due_types::error::{AgentError, ValidationError};
use due_types::event::EventKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Agent;
use crate::episode::Episode;
use crate::event::Event;
use crate::extract::{extract_utterance_pairs, identity, normalize};

/// Learning agent backed by utterance pairs extracted from past episodes.
#[derive(Debug)]
pub struct ReplayAgent {
    id: AgentId,
    /// normalized input -> recorded answer
    answers: DashMap<String, String>,
    fallback: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct ReplayData {
    #[serde(default)]
    fallback: Option<String>,
    #[serde(default)]
    answers: BTreeMap<String, String>,
}

impl ReplayAgent {
    pub const KIND: &'static str = "replay";

    pub fn new(id: impl Into<AgentId>) -> Self {
        Self {
            id: id.into(),
            answers: DashMap::new(),
            fallback: None,
        }
    }

    /// Reply with `fallback` when no learned input matches.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Learn index-aligned input/output pairs. Returns how many new inputs
    /// were added.
    pub fn learn_pairs(&self, inputs: &[String], outputs: &[String]) -> usize {
        let mut added = 0;
        for (input, output) in inputs.iter().zip(outputs) {
            let key = normalize(input);
            if key.is_empty() {
                continue;
            }
            if let Entry::Vacant(entry) = self.answers.entry(key) {
                entry.insert(output.clone());
                added += 1;
            }
        }
        added
    }

    /// The learned answer to `utterance`, if any.
    pub fn answer(&self, utterance: &str) -> Option<String> {
        self.answers
            .get(&normalize(utterance))
            .map(|entry| entry.value().clone())
    }

    /// Number of distinct inputs learned.
    pub fn known_inputs(&self) -> usize {
        self.answers.len()
    }

    /// Rebuild an agent from a snapshot produced by `save`.
    pub fn from_state(state: AgentState) -> Result<Self, ValidationError> {
        if state.kind != Self::KIND {
            return Err(ValidationError::InvalidState(format!(
                "expected agent state of kind '{}', got '{}'",
                Self::KIND,
                state.kind
            )));
        }
        let data: ReplayData = serde_json::from_value(state.data)
            .map_err(|e| ValidationError::InvalidState(format!("replay agent state: {e}")))?;
        Ok(Self {
            id: state.id,
            answers: data.answers.into_iter().collect(),
            fallback: data.fallback,
        })
    }
}

impl Agent for ReplayAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn utterance_callback(&self, episode: &Episode) -> Result<Vec<Event>, AgentError> {
        let Some(heard) = episode
            .last_event(Some(EventKind::Utterance))
            .and_then(Event::text)
        else {
            return Ok(Vec::new());
        };

        match self.answer(heard).or_else(|| self.fallback.clone()) {
            Some(reply) => {
                debug!(agent_id = %self.id, episode_id = %episode.id(), "replaying learned answer");
                Ok(vec![Event::utterance(self.id.clone(), reply)])
            }
            None => {
                debug!(agent_id = %self.id, episode_id = %episode.id(), "no learned answer");
                Ok(Vec::new())
            }
        }
    }

    fn action_callback(&self, _episode: &Episode) -> Result<Vec<Event>, AgentError> {
        Ok(Vec::new())
    }

    fn leave_callback(&self, episode: &Episode) -> Result<Vec<Event>, AgentError> {
        info!(agent_id = %self.id, episode_id = %episode.id(), "other participant left");
        Ok(Vec::new())
    }

    fn learn_episodes(&self, episodes: &[Episode]) -> Result<(), AgentError> {
        let mut added = 0;
        for episode in episodes {
            let (inputs, outputs) = extract_utterance_pairs(episode, identity);
            added += self.learn_pairs(&inputs, &outputs);
        }
        info!(agent_id = %self.id, episodes = episodes.len(), added, "learned episodes");
        Ok(())
    }

    fn save(&self) -> Result<AgentState, AgentError> {
        let data = ReplayData {
            fallback: self.fallback.clone(),
            answers: self
                .answers
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect(),
        };
        let data = serde_json::to_value(data).map_err(|e| AgentError::Failed(e.to_string()))?;
        Ok(AgentState {
            id: self.id.clone(),
            kind: Self::KIND.to_string(),
            data,
        })
    }
}
