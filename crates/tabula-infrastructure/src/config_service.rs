//! Configuration loading.

use crate::paths::TabulaPaths;
use std::path::Path;
use tabula_core::config::TabulaConfig;
use tabula_core::error::{Result, TabulaError};

/// Loads configuration from the platform default location.
///
/// A missing file yields the default configuration; a present but malformed
/// file is an error, so a typo never silently falls back to defaults.
pub fn load_config() -> Result<TabulaConfig> {
    load_config_from(&TabulaPaths::config_file()?)
}

/// Loads configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<TabulaConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(TabulaConfig::default());
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|e| TabulaError::parse(format!("TOML: {e}")))
}
