//! Filesystem season data.
//!
//! Layout under the data directory:
//! - `seasons/season-<n>/matches.json`: division-keyed fixtures
//! - `seasons/season-<n>/names.json`: optional id to display-name map
//! - `seasons/season-<n>/teams.jsonl`: team records and rosters
//! - `lft_players.jsonl`: looking-for-team sign-ups
//! - `templates/*.toml`: extra bracket templates

mod jsonl;
mod registration;
mod season;

pub use jsonl::*;
pub use registration::*;
pub use season::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::ingest::IngestError;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn seasons_dir(&self) -> PathBuf {
        self.data_dir.join("seasons")
    }

    pub fn season_dir(&self, season: u32) -> PathBuf {
        self.seasons_dir().join(format!("season-{}", season))
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.data_dir.join("templates")
    }

    pub fn lft_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::LftPlayer.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.seasons_dir(), PathBuf::from("/data/seasons"));
        assert_eq!(config.season_dir(5), PathBuf::from("/data/seasons/season-5"));
        assert_eq!(config.templates_dir(), PathBuf::from("/data/templates"));
        assert_eq!(config.lft_path(), PathBuf::from("/data/lft_players.jsonl"));
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}
