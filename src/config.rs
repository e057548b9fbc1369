//! Configuration management for Mentor

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::openai::ChatModel;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Textbook used when no --textbook flag is given
    pub default_textbook: Option<String>,

    /// Chat model for tutoring and Q&A
    pub model: ChatModel,

    /// Number of chunks retrieved per query
    pub top_k: usize,

    /// Target chunk size in characters when ingesting
    pub chunk_size: usize,

    /// Chunk overlap in characters when ingesting
    pub overlap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_textbook: None,
            model: ChatModel::default(),
            top_k: 3,
            chunk_size: crate::textbook::DEFAULT_CHUNK_SIZE,
            overlap: crate::textbook::DEFAULT_OVERLAP,
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "mentor").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "mentor").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Get the chunk store directory path
    pub fn store_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("store"))
    }

    /// Get the student profiles directory path
    pub fn profiles_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("profiles"))
    }

    /// Get the saved sessions directory path
    pub fn sessions_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("sessions"))
    }

    /// Get the run logs directory path
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.overlap, 100);
        assert!(config.default_textbook.is_none());
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = Config::default();
        config.default_textbook = Some("chip_huyen_ch_1".into());
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.default_textbook.as_deref(), Some("chip_huyen_ch_1"));
    }
}
