//! Action registry: maps persisted action kinds back to implementations.

use std::collections::HashMap;
use std::sync::Arc;

use due_types::error::{ActionError, ValidationError};
use due_types::event::ActionRecord;
use tracing::{debug, warn};

use super::{Action, LogAction, StoredAction};

/// Builds a runnable action from persisted parameters.
pub type ActionFactory =
    Box<dyn Fn(&serde_json::Value) -> Result<Arc<dyn Action>, ActionError> + Send + Sync>;

/// Registry of action kinds that can be revived from an [`ActionRecord`].
///
/// Kinds without a registered factory (or whose factory rejects the stored
/// parameters) are revived as [`StoredAction`], so a reload never fails or
/// drops data because of an unknown action.
#[derive(Default)]
pub struct ActionRegistry {
    factories: HashMap<String, ActionFactory>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in actions (`log`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.factories.insert(
            LogAction::KIND.to_string(),
            Box::new(|params: &serde_json::Value| {
                Ok(Arc::new(LogAction::from_params(params)?) as Arc<dyn Action>)
            }),
        );
        registry
    }

    /// Register a factory for an action kind.
    ///
    /// Registering the same kind twice is a validation error.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> Result<(), ValidationError>
    where
        F: Fn(&serde_json::Value) -> Result<Arc<dyn Action>, ActionError> + Send + Sync + 'static,
    {
        let kind = kind.into();
        if self.factories.contains_key(&kind) {
            return Err(ValidationError::InvalidState(format!(
                "action kind '{kind}' is already registered"
            )));
        }
        debug!(%kind, "registered action kind");
        self.factories.insert(kind, Box::new(factory));
        Ok(())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Turn a persisted record back into a runnable action.
    pub fn revive(&self, record: ActionRecord) -> Arc<dyn Action> {
        let Some(factory) = self.factories.get(&record.kind) else {
            return Arc::new(StoredAction::new(record));
        };
        match factory(&record.params) {
            Ok(action) => action,
            Err(e) => {
                warn!(kind = %record.kind, error = %e, "could not revive action, keeping stored record");
                Arc::new(StoredAction::new(record))
            }
        }
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&String> = self.factories.keys().collect();
        kinds.sort();
        f.debug_struct("ActionRegistry").field("kinds", &kinds).finish()
    }
}
