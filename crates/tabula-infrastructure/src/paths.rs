//! Unified path management for Tabula files.
//!
//! The configuration file lives under the platform config directory and the
//! dataset slot under the platform data directory, resolved with `dirs`.
//!
//! ```text
//! ~/.config/tabula/
//! └── config.toml              # model endpoint + sampling options
//!
//! ~/.local/share/tabula/
//! └── dataset.csv              # the single dataset slot
//! ```

use std::path::PathBuf;
use tabula_core::error::{Result, TabulaError};

/// Path resolution for Tabula's config file and dataset slot.
pub struct TabulaPaths;

impl TabulaPaths {
    /// Returns the Tabula configuration directory.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::Io`] when the platform config directory cannot
    /// be determined.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("tabula"))
            .ok_or_else(|| TabulaError::io("cannot determine config directory"))
    }

    /// Returns the Tabula data directory (used for the dataset slot).
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("tabula"))
            .ok_or_else(|| TabulaError::io("cannot determine data directory"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default dataset slot path.
    pub fn dataset_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("dataset.csv"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_is_under_config_dir() {
        let config_file = TabulaPaths::config_file().unwrap();
        assert!(config_file.ends_with("tabula/config.toml") || config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(TabulaPaths::config_dir().unwrap()));
    }

    #[test]
    fn test_dataset_file_is_under_data_dir() {
        let dataset_file = TabulaPaths::dataset_file().unwrap();
        assert!(dataset_file.ends_with("dataset.csv"));
        assert!(dataset_file.starts_with(TabulaPaths::data_dir().unwrap()));
    }
}
