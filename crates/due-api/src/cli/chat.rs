//! Console chat: serves a replay agent over stdin/stdout.
//!
//! Each input line goes through a [`Bridge`] exactly like a message from a
//! remote chat network would. Episodes are saved when the user leaves, and
//! end of input counts as leaving.

use std::sync::Arc;

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use due_core::action::ActionRegistry;
use due_core::agent::{Agent, ReplayAgent};
use due_core::repository::{EpisodeRepository, load_all};
use due_core::serve::{Bridge, Inbound, ServeError, Transport};
use due_types::agent::AgentId;
use due_types::episode::EpisodeState;

use crate::corpus;
use crate::state::AppState;

/// Prints the served agent's messages to stdout.
struct ConsoleTransport {
    speaker: String,
}

impl Transport for ConsoleTransport {
    fn deliver(&self, _recipient: &AgentId, text: &str) -> Result<(), ServeError> {
        println!("  {} {}", style(format!("{}>", self.speaker)).cyan().bold(), text);
        Ok(())
    }
}

/// Build the agent: learn from recorded episodes, or from the toy corpus
/// when nothing has been recorded yet.
async fn build_agent(state: &AppState) -> Result<ReplayAgent> {
    let mut agent = ReplayAgent::new(state.config.bot_id.as_str());
    if let Some(fallback) = &state.config.fallback_reply {
        agent = agent.with_fallback(fallback.clone());
    }

    let recorded = load_all(&state.store, &ActionRegistry::with_builtins()).await?;
    let episodes = if recorded.is_empty() {
        tracing::info!("no recorded episodes, learning from the toy corpus");
        corpus::episodes()?
    } else {
        recorded
    };
    agent.learn_episodes(&episodes)?;
    Ok(agent)
}

async fn save_closed(state: &AppState, closed: &EpisodeState) -> Result<()> {
    state.store.save_episode(closed).await?;
    println!(
        "  {} Episode saved: {}",
        style("✓").green(),
        style(closed.id).dim()
    );
    Ok(())
}

/// Route one line from `user`, saving the episode it closes. On failure the
/// episode is still saved, whether the failed leave closed it or it is
/// still live, before the error is returned.
async fn handle_line(state: &AppState, bridge: &Bridge, user: &AgentId, line: &str) -> Result<()> {
    let err = match bridge.handle_inbound(user, line) {
        Ok(Inbound::Left(closed)) => return save_closed(state, &closed).await,
        Ok(_) => return Ok(()),
        Err(err) => err,
    };

    let unsaved = match err.closed_episode() {
        Some(closed) => Some(closed.clone()),
        None => bridge.live_episode(user).ok().flatten(),
    };
    if let Some(episode) = unsaved {
        if let Err(save_err) = state.store.save_episode(&episode).await {
            tracing::warn!(episode_id = %episode.id, error = %save_err, "could not save episode");
        } else {
            tracing::info!(episode_id = %episode.id, "saved episode before stopping");
        }
    }
    Err(err.into())
}

/// Run the interactive chat loop until end of input.
pub async fn run(state: &AppState, user: &str) -> Result<()> {
    let agent = build_agent(state).await?;
    let known = agent.known_inputs();
    let transport = Arc::new(ConsoleTransport {
        speaker: state.config.bot_id.clone(),
    });
    let bridge = Bridge::new(Arc::new(agent), transport)?
        .with_command_prefix(state.config.command_prefix.clone());
    let user = AgentId::from(user);
    let leave = format!("{}leave", state.config.command_prefix);

    println!();
    println!(
        "  {} Chatting with '{}' ({} learned utterances). Type {} to end the episode.",
        style("💬").bold(),
        style(bridge.bot_id()).cyan(),
        known,
        style(&leave).yellow()
    );
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        handle_line(state, &bridge, &user, line).await?;
    }

    // End of input: close whatever is still open.
    if bridge.live_episode(&user)?.is_some() {
        handle_line(state, &bridge, &user, &leave).await?;
    }
    Ok(())
}
