//! Global configuration loader for Due.
//!
//! Reads `config.toml` from the data directory (`~/.due/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use due_types::config::GlobalConfig;

use crate::filesystem::resolve_dir;

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Directory where episodes are stored.
pub fn episodes_dir(data_dir: &Path, config: &GlobalConfig) -> PathBuf {
    resolve_dir(data_dir, &config.episodes_dir)
}

/// Directory where resource files are looked up.
pub fn resource_folder(data_dir: &Path, config: &GlobalConfig) -> PathBuf {
    resolve_dir(data_dir, &config.resource_folder)
}
