//! Agent capability contract and the built-in participant kinds.
//!
//! - `Agent`: the callback interface every episode participant implements
//! - `AgentDirectory`: id -> agent lookup used by `Episode::add_event`
//! - `HumanAgent`: records the callbacks it receives
//! - `NullAgent`: callback sink standing in for a remote identity
//! - `ReplayAgent`: learns utterance pairs and replays the recorded answers

pub mod directory;
pub mod human;
pub mod null;
pub mod replay;

use due_types::agent::{AgentId, AgentState};
use due_types::error::AgentError;
use tracing::debug;

use crate::episode::Episode;
use crate::event::Event;

pub use directory::AgentDirectory;
pub use human::{CallbackCounts, HumanAgent};
pub use null::NullAgent;
pub use replay::ReplayAgent;

/// Any participant that can join episodes and receive event callbacks.
///
/// Callbacks are invoked by `Episode::add_event` on the participant who did
/// *not* author the triggering event, after that event has been appended,
/// so `episode.last_event(None)` is always the trigger. A callback answers
/// with the follow-up events it wants appended to the same episode; the
/// episode processes them once the current dispatch has unwound.
pub trait Agent: Send + Sync {
    /// Stable identity of this agent.
    fn id(&self) -> &AgentId;

    /// Start a new episode with `self` as starter and `other` as invited.
    ///
    /// `other` is told about the episode through `new_episode_callback`.
    fn start_episode(&self, other: &dyn Agent) -> Result<Episode, AgentError> {
        let episode = Episode::new(self.id().clone(), other.id().clone());
        debug!(episode_id = %episode.id(), starter = %self.id(), invited = %other.id(), "starting episode");
        other.new_episode_callback(&episode)?;
        Ok(episode)
    }

    /// Called on the invited agent when another agent starts an episode.
    fn new_episode_callback(&self, _episode: &Episode) -> Result<(), AgentError> {
        Ok(())
    }

    /// The other participant added an utterance.
    fn utterance_callback(&self, episode: &Episode) -> Result<Vec<Event>, AgentError>;

    /// The other participant added an action.
    fn action_callback(&self, episode: &Episode) -> Result<Vec<Event>, AgentError>;

    /// The other participant left.
    fn leave_callback(&self, episode: &Episode) -> Result<Vec<Event>, AgentError>;

    /// Learn from a set of past episodes.
    fn learn_episodes(&self, _episodes: &[Episode]) -> Result<(), AgentError> {
        Err(AgentError::not_implemented(self.id(), "learn_episodes"))
    }

    /// Snapshot the agent's learned state.
    fn save(&self) -> Result<AgentState, AgentError> {
        Err(AgentError::not_implemented(self.id(), "save"))
    }
}
