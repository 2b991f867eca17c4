//! Global configuration types for Due.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls where
//! episodes and resources live, how the console binding recognizes
//! directives, and which resources are known by name.

use serde::{Deserialize, Serialize};

use crate::resource::ResourceRecord;

/// Top-level configuration for Due.
///
/// Loaded from `~/.due/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Id the served agent uses inside episodes.
    #[serde(default = "default_bot_id")]
    pub bot_id: String,

    /// Prefix that marks an inbound message as a directive (e.g. `,,,leave`).
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,

    /// Reply used by the replay agent when no learned utterance matches.
    #[serde(default)]
    pub fallback_reply: Option<String>,

    /// Directory holding saved episodes, relative to the data directory
    /// unless absolute or `~`-prefixed.
    #[serde(default = "default_episodes_dir")]
    pub episodes_dir: String,

    /// Directory holding resource files, resolved like `episodes_dir`.
    #[serde(default = "default_resource_folder")]
    pub resource_folder: String,

    /// Resources registered at startup.
    #[serde(default)]
    pub resources: Vec<ResourceRecord>,
}

fn default_bot_id() -> String {
    "due".to_string()
}

fn default_command_prefix() -> String {
    ",,,".to_string()
}

fn default_episodes_dir() -> String {
    "episodes".to_string()
}

fn default_resource_folder() -> String {
    "resources".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            bot_id: default_bot_id(),
            command_prefix: default_command_prefix(),
            fallback_reply: None,
            episodes_dir: default_episodes_dir(),
            resource_folder: default_resource_folder(),
            resources: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.bot_id, "due");
        assert_eq!(config.command_prefix, ",,,");
        assert_eq!(config.episodes_dir, "episodes");
        assert_eq!(config.resource_folder, "resources");
        assert!(config.fallback_reply.is_none());
        assert!(config.resources.is_empty());
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.bot_id, "due");
        assert_eq!(config.command_prefix, ",,,");
        assert!(config.resources.is_empty());
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
bot_id = "luna"
fallback_reply = "I don't follow."
episodes_dir = "/var/lib/due/episodes"

[[resources]]
name = "corpora.toy"
description = "A toy corpus"
url = "https://example.com/toy.json"
filename = "toy.json"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot_id, "luna");
        assert_eq!(config.fallback_reply.as_deref(), Some("I don't follow."));
        assert_eq!(config.episodes_dir, "/var/lib/due/episodes");
        assert_eq!(config.resource_folder, "resources");
        assert_eq!(config.resources.len(), 1);
        assert_eq!(config.resources[0].filename, "toy.json");
    }

    #[test]
    fn test_resource_record_optional_fields() {
        let toml_str = r#"
[[resources]]
name = "models.replay"
filename = "replay.json"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.resources[0].description, "");
        assert_eq!(config.resources[0].url, "");
    }
}
