use std::sync::Arc;

use crate::api::ApiError;
use crate::bracket::BracketBuilder;
use crate::calculate::StandingsCalculator;
use crate::config::{AppConfig, SeasonConfig};
use crate::models::TeamNames;
use crate::storage::{SeasonData, SeasonStore, StorageConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<SeasonStore>,
    pub calculator: Arc<StandingsCalculator>,
    pub builder: Arc<BracketBuilder>,
}

impl AppState {
    pub fn new(config: AppConfig, builder: BracketBuilder) -> Self {
        let store = SeasonStore::new(StorageConfig::new(config.data_dir.clone()));
        let calculator = StandingsCalculator::new(config.league.participant_rules());
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            calculator: Arc::new(calculator),
            builder: Arc::new(builder),
        }
    }

    /// Load a season that is configured or has data on disk.
    pub fn load_season(&self, season: u32) -> Result<SeasonData, ApiError> {
        let configured = self.config.league.season(season);
        if configured.is_none() && !self.store.exists(season) {
            return Err(ApiError::NotFound(format!("Season {}", season)));
        }

        let names = configured
            .map(|s| s.team_names.clone())
            .unwrap_or_else(TeamNames::new);
        Ok(self.store.load(season, &names)?)
    }

    /// Load a season and check the division belongs to it.
    ///
    /// A season configured without a division list accepts any division.
    pub fn load_division(&self, season: u32, division: u32) -> Result<SeasonData, ApiError> {
        let data = self.load_season(season)?;
        let known = match self.config.league.season(season) {
            Some(SeasonConfig { divisions, .. }) if !divisions.is_empty() => {
                divisions.contains(&division)
            }
            _ => true,
        };
        if !known {
            return Err(ApiError::NotFound(format!(
                "Division {} of season {}",
                division, season
            )));
        }
        Ok(data)
    }
}
