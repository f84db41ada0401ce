//! Configuration loading and validation.
//!
//! Settings come from a TOML file, then `IDL__`-prefixed environment
//! variables on top (`IDL__SERVER__PORT=9000`, `IDL__LEAGUE__BYE_TEAM_ID=bye`).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{ParticipantRules, TeamNames, BYE_TEAM_ID, PLACEHOLDER_PREFIXES};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "IDL";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to apply environment overrides: {0}")]
    LayerError(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Directory served at `/img` (team logos live under `teams/`)
    #[serde(default)]
    pub image_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            image_dir: None,
        }
    }
}

/// One league season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonConfig {
    pub id: u32,

    #[serde(default)]
    pub name: Option<String>,

    /// Registration open, no fixtures yet
    #[serde(default)]
    pub upcoming: bool,

    #[serde(default)]
    pub divisions: Vec<u32>,

    /// League id on the game's stats service
    #[serde(default)]
    pub league_id: Option<u64>,

    /// Display names for the season's team ids
    #[serde(default)]
    pub team_names: TeamNames,
}

impl SeasonConfig {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: None,
            upcoming: false,
            divisions: Vec::new(),
            league_id: None,
            team_names: TeamNames::new(),
        }
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Season {}", self.id))
    }
}

/// League rules and seasons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueConfig {
    #[serde(default = "default_bye_team_id")]
    pub bye_team_id: String,

    #[serde(default = "default_placeholder_prefixes")]
    pub placeholder_prefixes: Vec<String>,

    /// Extra bracket templates; defaults to `<data_dir>/templates`
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,

    #[serde(default)]
    pub seasons: Vec<SeasonConfig>,
}

fn default_bye_team_id() -> String {
    BYE_TEAM_ID.to_string()
}

fn default_placeholder_prefixes() -> Vec<String> {
    PLACEHOLDER_PREFIXES.iter().map(|p| p.to_string()).collect()
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            bye_team_id: default_bye_team_id(),
            placeholder_prefixes: default_placeholder_prefixes(),
            templates_dir: None,
            seasons: Vec::new(),
        }
    }
}

impl LeagueConfig {
    pub fn participant_rules(&self) -> ParticipantRules {
        ParticipantRules {
            bye_team_id: self.bye_team_id.clone(),
            placeholder_prefixes: self.placeholder_prefixes.clone(),
        }
    }

    pub fn season(&self, id: u32) -> Option<&SeasonConfig> {
        self.seasons.iter().find(|s| s.id == id)
    }

    /// Latest season that is not marked upcoming.
    pub fn current_season(&self) -> Option<&SeasonConfig> {
        self.seasons
            .iter()
            .filter(|s| !s.upcoming)
            .max_by_key(|s| s.id)
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub league: LeagueConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            league: LeagueConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file if there is one, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut base = match path {
            Some(path) => Self::parse_file(path)?,
            None => Self::default(),
        };

        // The layering lowercases map keys, and team ids are case-sensitive.
        let team_names: Vec<(u32, TeamNames)> = base
            .league
            .seasons
            .iter_mut()
            .map(|s| (s.id, std::mem::take(&mut s.team_names)))
            .collect();

        let mut config: AppConfig = ::config::Config::builder()
            .add_source(::config::Config::try_from(&base)?)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        for (id, names) in team_names {
            if let Some(season) = config.league.seasons.iter_mut().find(|s| s.id == id) {
                season.team_names = names;
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Where extra bracket templates are loaded from.
    pub fn templates_dir(&self) -> PathBuf {
        self.league
            .templates_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("templates"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.league.bye_team_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Bye team id must not be empty".to_string(),
            ));
        }

        if self.league.placeholder_prefixes.is_empty()
            || self.league.placeholder_prefixes.iter().any(|p| p.is_empty())
        {
            return Err(ConfigError::ValidationError(
                "Placeholder prefixes must be a non-empty list of non-empty strings".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for season in &self.league.seasons {
            if !seen.insert(season.id) {
                return Err(ConfigError::ValidationError(format!(
                    "Season {} is configured twice",
                    season.id
                )));
            }
        }

        Ok(())
    }
}
