//! Application state shared by the CLI commands.

use std::path::PathBuf;

use anyhow::Context;
use due_infra::config::{episodes_dir, load_global_config, resource_folder};
use due_infra::filesystem::resolve_data_dir;
use due_infra::persistence::JsonEpisodeStore;
use due_infra::resources::ResourceManager;
use due_types::config::GlobalConfig;

/// Configuration plus the concrete storage adapters.
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: GlobalConfig,
    pub store: JsonEpisodeStore,
    pub resources: ResourceManager,
}

impl AppState {
    /// Resolve the data directory, load `config.toml`, and open storage.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("cannot create data directory {}", data_dir.display()))?;
        Self::open(data_dir).await
    }

    pub async fn open(data_dir: PathBuf) -> anyhow::Result<Self> {
        let config = load_global_config(&data_dir).await;
        let store = JsonEpisodeStore::new(episodes_dir(&data_dir, &config));

        let mut resources = ResourceManager::new(resource_folder(&data_dir, &config))?;
        for record in &config.resources {
            resources.register(record.clone())?;
        }

        Ok(Self {
            data_dir,
            config,
            store,
            resources,
        })
    }
}
