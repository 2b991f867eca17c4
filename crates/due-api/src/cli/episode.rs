//! Episode CLI commands: list, show, extract, delete.

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use due_core::action::Action;
use due_core::episode::Episode;
use due_core::event::{Event, EventPayload};
use due_core::extract::{extract_utterance_pairs, extract_utterances, identity, normalize};
use due_core::repository::{EpisodeRepository, require_episode};
use due_types::episode::EpisodeState;

use crate::state::AppState;

async fn load(state: &AppState, id: Uuid) -> Result<EpisodeState> {
    require_episode(&state.store, &id)
        .await
        .with_context(|| format!("cannot load from {}", state.store.dir().display()))
}

fn describe(event: &Event) -> String {
    match event.payload() {
        EventPayload::Text(text) => text.clone(),
        EventPayload::Action(action) => format!("<action: {}>", action.record().kind),
        EventPayload::Empty => "(left the episode)".to_string(),
    }
}

/// Print one episode as a transcript.
pub async fn show(state: &AppState, id: Uuid, json: bool) -> Result<()> {
    let saved = load(state, id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
        return Ok(());
    }

    let episode = Episode::load(saved).with_context(|| format!("Episode {id} is invalid"))?;
    println!();
    println!(
        "  {} Episode {} between {} and {}",
        style("📜").bold(),
        style(episode.id()).dim(),
        style(episode.starter_id()).cyan(),
        style(episode.invited_id()).cyan()
    );
    println!();
    for event in episode.events() {
        println!(
            "  {} {} {}",
            style(event.timestamp().format("%Y-%m-%d %H:%M:%S")).dim(),
            style(format!("{}>", event.agent())).bold(),
            describe(event)
        );
    }
    if episode.is_empty() {
        println!("  {}", style("(no events)").dim());
    }
    println!();
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub pairs: bool,
    pub normalize: bool,
    pub keep_holes: bool,
}

fn preprocessor(options: ExtractOptions) -> fn(&str) -> String {
    if options.normalize { normalize } else { identity }
}

/// Extraction output as JSON: `{"inputs": [..], "outputs": [..]}` for pairs,
/// otherwise an array of texts with `null` holes.
fn extract_json(episode: &Episode, options: ExtractOptions) -> serde_json::Value {
    let preprocess = preprocessor(options);
    if options.pairs {
        let (inputs, outputs) = extract_utterance_pairs(episode, preprocess);
        serde_json::json!({ "inputs": inputs, "outputs": outputs })
    } else {
        serde_json::json!(extract_utterances(episode, preprocess, options.keep_holes))
    }
}

/// Print the utterances or training pairs of one episode.
pub async fn extract(state: &AppState, id: Uuid, options: ExtractOptions, json: bool) -> Result<()> {
    let episode = Episode::load(load(state, id).await?).with_context(|| format!("Episode {id} is invalid"))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&extract_json(&episode, options))?);
        return Ok(());
    }

    let preprocess = preprocessor(options);
    if options.pairs {
        let (inputs, outputs) = extract_utterance_pairs(&episode, preprocess);
        for (input, output) in inputs.iter().zip(&outputs) {
            println!("  {} {}", style(">").cyan(), input);
            println!("  {} {}", style("<").green(), output);
            println!();
        }
    } else {
        for text in extract_utterances(&episode, preprocess, options.keep_holes) {
            match text {
                Some(text) => println!("  {text}"),
                None => println!("  {}", style("(hole)").dim()),
            }
        }
    }
    Ok(())
}

/// List recorded episodes.
pub async fn list(state: &AppState, json: bool) -> Result<()> {
    let ids = state.store.list_episodes().await?;
    let mut episodes = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(saved) = state.store.load_episode(&id).await? {
            episodes.push(saved);
        }
    }

    if json {
        let rows: Vec<_> = episodes
            .iter()
            .map(|e| {
                serde_json::json!({
                    "id": e.id,
                    "starter_id": e.starter_id,
                    "invited_id": e.invited_id,
                    "events": e.events.len(),
                    "started_at": e.events.first().map(|ev| ev.timestamp),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if episodes.is_empty() {
        println!();
        println!(
            "  {} No episodes recorded yet. Start one with: {}",
            style("i").blue().bold(),
            style("due chat").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Id").fg(Color::White),
        Cell::new("Started").fg(Color::White),
        Cell::new("Starter").fg(Color::White),
        Cell::new("Invited").fg(Color::White),
        Cell::new("Events").fg(Color::White),
    ]);
    for e in &episodes {
        let started = e
            .events
            .first()
            .map(|ev| ev.timestamp.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(e.id),
            Cell::new(started),
            Cell::new(&e.starter_id),
            Cell::new(&e.invited_id),
            Cell::new(e.events.len()),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Delete a recorded episode.
pub async fn delete(state: &AppState, id: Uuid, json: bool) -> Result<()> {
    let deleted = state.store.delete_episode(&id).await?;
    if json {
        println!("{}", serde_json::json!({ "id": id, "deleted": deleted }));
        return Ok(());
    }
    if !deleted {
        bail!("Episode {id} not found");
    }
    println!("  {} Deleted episode {}", style("✓").green(), style(id).dim());
    Ok(())
}
