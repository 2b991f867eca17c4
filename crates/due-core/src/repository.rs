//! EpisodeRepository trait definition.
//!
//! Storage for episode snapshots. Implementations live in due-infra
//! (e.g. `JsonEpisodeStore`).

use due_types::episode::EpisodeState;
use due_types::error::PersistenceError;
use tracing::debug;
use uuid::Uuid;

use crate::action::ActionRegistry;
use crate::episode::Episode;

/// Repository trait for episode persistence.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait EpisodeRepository: Send + Sync {
    /// Store a snapshot, replacing any previous snapshot with the same id.
    fn save_episode(
        &self,
        state: &EpisodeState,
    ) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;

    /// Load a snapshot by episode id.
    fn load_episode(
        &self,
        episode_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<EpisodeState>, PersistenceError>> + Send;

    /// Ids of all stored episodes, oldest first.
    fn list_episodes(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Uuid>, PersistenceError>> + Send;

    /// Delete a snapshot. Returns whether anything was removed.
    fn delete_episode(
        &self,
        episode_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, PersistenceError>> + Send;
}

/// Load a snapshot that must exist.
pub async fn require_episode<R: EpisodeRepository>(
    repo: &R,
    episode_id: &Uuid,
) -> Result<EpisodeState, PersistenceError> {
    repo.load_episode(episode_id)
        .await?
        .ok_or(PersistenceError::NotFound(*episode_id))
}

/// Load and revive every stored episode.
pub async fn load_all<R: EpisodeRepository>(
    repo: &R,
    actions: &ActionRegistry,
) -> Result<Vec<Episode>, PersistenceError> {
    let ids = repo.list_episodes().await?;
    let mut episodes = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(state) = repo.load_episode(&id).await? else {
            // Deleted between listing and loading.
            continue;
        };
        episodes.push(Episode::load_with(state, actions)?);
    }
    debug!(count = episodes.len(), "loaded stored episodes");
    Ok(episodes)
}
