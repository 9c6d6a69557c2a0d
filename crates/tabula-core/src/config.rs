//! Configuration types.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so a missing file means a fully default configuration.

use crate::generate::GenerateOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the Tabula workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabulaConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Local inference server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the local inference server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name as known to the server.
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Sampling options applied to every generation call.
    #[serde(default)]
    pub options: GenerateOptions,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model_name: default_model_name(),
            options: GenerateOptions::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model_name() -> String {
    "mistral:7b-instruct".to_string()
}

/// Dataset slot settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the platform-default slot file location.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TabulaConfig::default();
        assert_eq!(config.model.base_url, "http://localhost:11434");
        assert_eq!(config.model.options.max_tokens, 512);
        assert!(config.storage.dataset_path.is_none());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: TabulaConfig =
            serde_json::from_str(r#"{"model": {"model_name": "llama3"}}"#).unwrap();
        assert_eq!(config.model.model_name, "llama3");
        assert_eq!(config.model.base_url, "http://localhost:11434");
        assert_eq!(config.model.options.context_window, 4096);
    }
}
