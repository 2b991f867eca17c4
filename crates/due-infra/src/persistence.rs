//! JSON persistence for episode snapshots.
//!
//! `serialize`/`deserialize` work on any byte stream. [`JsonEpisodeStore`]
//! implements the core `EpisodeRepository` over a directory with one
//! `<episode id>.json` file per episode.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use due_core::repository::EpisodeRepository;
use due_types::episode::EpisodeState;
use due_types::error::PersistenceError;
use tracing::debug;
use uuid::Uuid;

/// Write `state` as JSON to `writer`.
pub fn serialize<W: Write>(state: &EpisodeState, writer: W) -> Result<(), PersistenceError> {
    serde_json::to_writer_pretty(writer, state).map_err(codec_error)
}

/// Read a JSON snapshot from `reader`.
pub fn deserialize<R: Read>(reader: R) -> Result<EpisodeState, PersistenceError> {
    serde_json::from_reader(reader).map_err(codec_error)
}

fn codec_error(err: serde_json::Error) -> PersistenceError {
    if err.is_io() {
        PersistenceError::Io(err.into())
    } else {
        PersistenceError::Codec(err.to_string())
    }
}

/// Episode repository backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct JsonEpisodeStore {
    dir: PathBuf,
}

impl JsonEpisodeStore {
    /// Store episodes under `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding episode `id`.
    pub fn episode_path(&self, id: &Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl EpisodeRepository for JsonEpisodeStore {
    async fn save_episode(&self, state: &EpisodeState) -> Result<(), PersistenceError> {
        let mut bytes = Vec::new();
        serialize(state, &mut bytes)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.episode_path(&state.id);
        // Write-then-rename so readers never see a half-written file.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(episode_id = %state.id, events = state.events.len(), path = %path.display(), "saved episode");
        Ok(())
    }

    async fn load_episode(&self, episode_id: &Uuid) -> Result<Option<EpisodeState>, PersistenceError> {
        let bytes = match tokio::fs::read(self.episode_path(episode_id)).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let state = deserialize(bytes.as_slice())?;
        if state.id != *episode_id {
            return Err(PersistenceError::Codec(format!(
                "file for episode {episode_id} holds episode {}",
                state.id
            )));
        }
        Ok(Some(state))
    }

    async fn list_episodes(&self) -> Result<Vec<Uuid>, PersistenceError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| Uuid::parse_str(stem).ok())
            {
                ids.push(id);
            }
        }
        // v7 ids sort by creation time.
        ids.sort();
        Ok(ids)
    }

    async fn delete_episode(&self, episode_id: &Uuid) -> Result<bool, PersistenceError> {
        match tokio::fs::remove_file(self.episode_path(episode_id)).await {
            Ok(()) => {
                debug!(%episode_id, "deleted episode");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use due_core::action::{ActionRegistry, LogAction};
    use due_core::agent::{AgentDirectory, NullAgent};
    use due_core::repository::load_all;
    use due_core::{Episode, Event};
    use tempfile::TempDir;

    fn sample_episode() -> Episode {
        let directory = AgentDirectory::new();
        directory.register(Arc::new(NullAgent::new("Alice"))).unwrap();
        directory.register(Arc::new(NullAgent::new("Bob"))).unwrap();
        let mut episode = Episode::new("Alice", "Bob");
        episode.add_event(&directory, Event::utterance("Alice", "hello")).unwrap();
        episode
            .add_event(&directory, Event::action("Bob", Arc::new(LogAction::new("waves"))))
            .unwrap();
        episode.add_event(&directory, Event::leave("Alice")).unwrap();
        episode
    }

    #[test]
    fn stream_round_trip() {
        let episode = sample_episode();
        let mut buf = Vec::new();
        serialize(&episode.save(), &mut buf).unwrap();

        let state = deserialize(buf.as_slice()).unwrap();
        assert_eq!(Episode::load(state).unwrap(), episode);
    }

    #[test]
    fn empty_episode_round_trip() {
        let episode = Episode::new("Alice", "Bob");
        let mut buf = Vec::new();
        serialize(&episode.save(), &mut buf).unwrap();
        assert_eq!(Episode::load(deserialize(buf.as_slice()).unwrap()).unwrap(), episode);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        let err = deserialize("{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, PersistenceError::Codec(_)));

        let err = deserialize(r#"{"id": "nope"}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, PersistenceError::Codec(_)));
    }

    #[tokio::test]
    async fn store_save_load_list_delete() {
        let tmp = TempDir::new().unwrap();
        let store = JsonEpisodeStore::new(tmp.path().join("episodes"));
        assert!(store.list_episodes().await.unwrap().is_empty());

        let first = sample_episode();
        let second = Episode::new("Alice", "Bob");
        store.save_episode(&first.save()).await.unwrap();
        store.save_episode(&second.save()).await.unwrap();
        assert!(store.episode_path(&first.id()).exists());

        assert_eq!(store.list_episodes().await.unwrap(), vec![first.id(), second.id()]);
        let loaded = store.load_episode(&first.id()).await.unwrap().unwrap();
        assert_eq!(Episode::load(loaded).unwrap(), first);

        assert!(store.delete_episode(&first.id()).await.unwrap());
        assert!(!store.delete_episode(&first.id()).await.unwrap());
        assert!(store.load_episode(&first.id()).await.unwrap().is_none());
        assert_eq!(store.list_episodes().await.unwrap(), vec![second.id()]);
    }

    #[tokio::test]
    async fn store_overwrites_on_resave() {
        let tmp = TempDir::new().unwrap();
        let store = JsonEpisodeStore::new(tmp.path());
        let mut state = Episode::new("Alice", "Bob").save();
        store.save_episode(&state).await.unwrap();

        let events = sample_episode().save().events;
        state.events = events;
        store.save_episode(&state).await.unwrap();

        let loaded = store.load_episode(&state.id).await.unwrap().unwrap();
        assert_eq!(loaded.events.len(), 3);
        assert_eq!(store.list_episodes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn store_skips_foreign_files() {
        let tmp = TempDir::new().unwrap();
        let store = JsonEpisodeStore::new(tmp.path());
        tokio::fs::write(tmp.path().join("notes.txt"), "hi").await.unwrap();
        tokio::fs::write(tmp.path().join("config.json"), "{}").await.unwrap();
        let episode = sample_episode();
        store.save_episode(&episode.save()).await.unwrap();

        assert_eq!(store.list_episodes().await.unwrap(), vec![episode.id()]);
        let all = load_all(&store, &ActionRegistry::with_builtins()).await.unwrap();
        assert_eq!(all, vec![episode]);
    }

    #[tokio::test]
    async fn store_rejects_mismatched_file() {
        let tmp = TempDir::new().unwrap();
        let store = JsonEpisodeStore::new(tmp.path());
        let a = Episode::new("Alice", "Bob").save();
        let b = Uuid::now_v7();
        let mut buf = Vec::new();
        serialize(&a, &mut buf).unwrap();
        tokio::fs::write(store.episode_path(&b), buf).await.unwrap();

        let err = store.load_episode(&b).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Codec(_)));
    }
}
