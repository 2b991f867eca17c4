//! Built-in toy corpus used to bootstrap the chat agent before any episode
//! has been recorded.

use std::sync::Arc;

use due_core::agent::{AgentDirectory, NullAgent};
use due_core::{Episode, Event};
use due_types::error::EpisodeError;

const HUMAN: &str = "human@toy.corpus";
const BOT: &str = "bot@toy.corpus";

const DIALOGUES: &[&[&str]] = &[
    &["Hi", "Hello!", "How are you?", "I'm fine, thanks. And you?", "Good."],
    &["Hello", "Hi there!", "What's your name?", "I'm Due."],
    &["Nice to meet you", "Nice to meet you too!"],
    &["What can you do?", "I repeat what I learned from past conversations."],
    &["Thank you", "You're welcome."],
    &["Bye", "Goodbye!"],
];

/// Toy episodes, each an exchange alternating between a human and a bot.
pub fn episodes() -> Result<Vec<Episode>, EpisodeError> {
    let agents = AgentDirectory::new();
    agents.register(Arc::new(NullAgent::new(HUMAN)))?;
    agents.register(Arc::new(NullAgent::new(BOT)))?;

    DIALOGUES
        .iter()
        .map(|lines| -> Result<Episode, EpisodeError> {
            let mut episode = Episode::new(HUMAN, BOT);
            for (turn, line) in lines.iter().enumerate() {
                let speaker = if turn % 2 == 0 { HUMAN } else { BOT };
                episode.add_event(&agents, Event::utterance(speaker, *line))?;
            }
            Ok(episode)
        })
        .collect()
}
