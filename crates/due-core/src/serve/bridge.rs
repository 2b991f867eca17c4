//! Bridge: remote senders, their live episodes, and inbound routing.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use due_types::agent::AgentId;
use due_types::episode::EpisodeState;
use due_types::error::ValidationError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{COMMAND_PREFIX, LEAVE_ACK, Relay, ServeError, Transport};
use crate::agent::{Agent, AgentDirectory, NullAgent};
use crate::episode::Episode;
use crate::event::Event;

/// What an inbound message turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// The message was added as an utterance to the sender's live episode.
    Utterance { episode_id: Uuid },
    /// The sender left; this is the closed episode.
    Left(EpisodeState),
    /// A directive that did nothing (unknown, or `leave` without a live
    /// episode).
    Ignored,
}

/// Serves one agent to any number of remote senders.
///
/// Every sender is registered as a [`NullAgent`] on first contact and has at
/// most one live episode, started by the sender with the served agent as
/// invited participant. Each live episode sits behind its own mutex.
pub struct Bridge {
    bot: Arc<dyn Agent>,
    agents: AgentDirectory,
    live: DashMap<AgentId, Arc<Mutex<Episode>>>,
    transport: Arc<dyn Transport>,
    command_prefix: String,
}

impl Bridge {
    /// Serve `agent`, delivering its replies through `transport`.
    pub fn new(agent: Arc<dyn Agent>, transport: Arc<dyn Transport>) -> Result<Self, ValidationError> {
        let bot: Arc<dyn Agent> = Arc::new(Relay::new(agent, Arc::clone(&transport)));
        let agents = AgentDirectory::new();
        agents.register(Arc::clone(&bot))?;
        info!(agent_id = %bot.id(), "serving agent");

        Ok(Self {
            bot,
            agents,
            live: DashMap::new(),
            transport,
            command_prefix: COMMAND_PREFIX.to_string(),
        })
    }

    pub fn with_command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.command_prefix = prefix.into();
        self
    }

    pub fn bot_id(&self) -> &AgentId {
        self.bot.id()
    }

    /// Directory of the served agent and every sender seen so far.
    pub fn agents(&self) -> &AgentDirectory {
        &self.agents
    }

    /// Route one inbound message from `sender`.
    ///
    /// Messages starting with the command prefix are directives; anything
    /// else is an utterance, starting a new episode if the sender has none.
    pub fn handle_inbound(&self, sender: &AgentId, body: &str) -> Result<Inbound, ServeError> {
        if sender == self.bot.id() {
            return Err(ValidationError::InvalidState(format!(
                "sender '{sender}' uses the served agent's id"
            ))
            .into());
        }
        let human = self
            .agents
            .get_or_register(sender, || Arc::new(NullAgent::new(sender.clone())));

        if let Some(directive) = body.strip_prefix(self.command_prefix.as_str()) {
            return self.handle_directive(sender, directive.trim());
        }

        let handle = self.live_or_start(sender, human.as_ref())?;
        let mut episode = handle
            .lock()
            .map_err(|_| ServeError::Poisoned(sender.clone()))?;
        episode.add_event(&self.agents, Event::utterance(sender.clone(), body))?;
        Ok(Inbound::Utterance {
            episode_id: episode.id(),
        })
    }

    fn handle_directive(&self, sender: &AgentId, directive: &str) -> Result<Inbound, ServeError> {
        match directive {
            "leave" => {
                let Some(handle) = self.live.get(sender).map(|entry| Arc::clone(entry.value())) else {
                    debug!(%sender, "leave without a live episode");
                    return Ok(Inbound::Ignored);
                };
                let mut episode = handle
                    .lock()
                    .map_err(|_| ServeError::Poisoned(sender.clone()))?;
                let still_live = self
                    .live
                    .get(sender)
                    .is_some_and(|entry| Arc::ptr_eq(entry.value(), &handle));
                if !still_live {
                    debug!(%sender, "episode already closed by a concurrent leave");
                    return Ok(Inbound::Ignored);
                }
                let added = episode.add_event(&self.agents, Event::leave(sender.clone()));
                self.live.remove_if(sender, |_, live| Arc::ptr_eq(live, &handle));
                let closed = episode.save();

                let outcome = added
                    .map_err(ServeError::from)
                    .and_then(|()| self.transport.deliver(sender, LEAVE_ACK));
                if let Err(source) = outcome {
                    warn!(%sender, episode_id = %closed.id, error = %source, "episode closed with an error");
                    return Err(ServeError::LeaveFailed {
                        episode: Box::new(closed),
                        source: Box::new(source),
                    });
                }
                info!(%sender, episode_id = %closed.id, events = closed.events.len(), "episode closed");
                Ok(Inbound::Left(closed))
            }
            other => {
                debug!(%sender, directive = other, "ignoring unknown directive");
                Ok(Inbound::Ignored)
            }
        }
    }

    fn live_or_start(&self, sender: &AgentId, human: &dyn Agent) -> Result<Arc<Mutex<Episode>>, ServeError> {
        match self.live.entry(sender.clone()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let episode = human.start_episode(self.bot.as_ref())?;
                info!(%sender, episode_id = %episode.id(), "episode started");
                let handle = Arc::new(Mutex::new(episode));
                entry.insert(Arc::clone(&handle));
                Ok(handle)
            }
        }
    }

    /// Senders that currently have a live episode.
    pub fn live_senders(&self) -> Vec<AgentId> {
        self.live.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Snapshot of `sender`'s live episode, if any.
    pub fn live_episode(&self, sender: &AgentId) -> Result<Option<EpisodeState>, ServeError> {
        let Some(handle) = self.live.get(sender).map(|entry| Arc::clone(entry.value())) else {
            return Ok(None);
        };
        let episode = handle
            .lock()
            .map_err(|_| ServeError::Poisoned(sender.clone()))?;
        Ok(Some(episode.save()))
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("bot", self.bot.id())
            .field("live", &self.live.len())
            .field("command_prefix", &self.command_prefix)
            .finish()
    }
}
