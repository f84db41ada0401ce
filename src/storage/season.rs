//! Per-season data loading.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use tracing::{debug, info, warn};

use super::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::calculate::StandingsCalculator;
use crate::ingest::{
    normalize_teams, parse_division_matches, parse_teams, Diagnostic, IngestReport, RawTeam,
};
use crate::models::{sort_lft_newest_first, LftPlayer, Match, Record, Standing, Team, TeamNames};

pub const MATCHES_FILE: &str = "matches.json";
pub const NAMES_FILE: &str = "names.json";

/// Everything stored for one season.
#[derive(Debug, Clone, Default)]
pub struct SeasonData {
    pub season: u32,

    /// Fixtures keyed by division
    pub matches: BTreeMap<u32, Vec<Match>>,

    /// Configured names overlaid with the season's `names.json`
    pub names: TeamNames,

    /// Team snapshot with rosters
    pub teams: Vec<Team>,

    /// Problems found while reading the files
    pub diagnostics: Vec<Diagnostic>,
}

impl SeasonData {
    /// Fixtures for one division, empty when the division has none.
    pub fn division_matches(&self, division: u32) -> &[Match] {
        self.matches
            .get(&division)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Divisions that have fixtures or registered teams.
    pub fn divisions(&self) -> Vec<u32> {
        let mut divisions: BTreeSet<u32> = self.matches.keys().copied().collect();
        divisions.extend(self.teams.iter().map(|t| t.division_id));
        divisions.into_iter().collect()
    }

    /// Teams registered in one division, in snapshot order.
    pub fn division_teams(&self, division: u32) -> Vec<&Team> {
        self.teams
            .iter()
            .filter(|t| t.division_id == division)
            .collect()
    }

    /// Ranked table for one division from the match file.
    pub fn standings(&self, calculator: &StandingsCalculator, division: u32) -> Vec<Standing> {
        calculator.compute(self.division_matches(division), &self.names, division)
    }

    /// Team snapshot with records recomputed from the match file.
    ///
    /// Rosters and images are kept. Teams without any counted match are
    /// reset to an empty record; teams that only appear in the fixtures are
    /// added.
    pub fn refreshed_teams(&self, calculator: &StandingsCalculator) -> Vec<Team> {
        let mut teams = self.teams.clone();
        for team in &mut teams {
            team.record = Record::default();
        }

        for (division, matches) in &self.matches {
            for standing in calculator.compute(matches, &self.names, *division) {
                match teams
                    .iter_mut()
                    .find(|t| t.id == *standing.id() && t.division_id == *division)
                {
                    Some(team) => team.record = standing.team.record,
                    None => teams.push(standing.into()),
                }
            }
        }

        teams
    }
}

/// Reads and writes season directories.
#[derive(Debug, Clone)]
pub struct SeasonStore {
    config: StorageConfig,
}

impl SeasonStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn exists(&self, season: u32) -> bool {
        self.config.season_dir(season).is_dir()
    }

    /// Fail with [`StorageError::PathNotFound`] when the season has no
    /// directory.
    pub fn require(&self, season: u32) -> Result<(), StorageError> {
        if self.exists(season) {
            Ok(())
        } else {
            Err(StorageError::PathNotFound(self.config.season_dir(season)))
        }
    }

    /// Load a season. Missing files read as empty, so an upcoming season
    /// with no data yet loads cleanly.
    pub fn load(&self, season: u32, configured_names: &TeamNames) -> Result<SeasonData, StorageError> {
        let dir = self.config.season_dir(season);
        let mut diagnostics = Vec::new();

        let matches_path = dir.join(MATCHES_FILE);
        let matches = if matches_path.exists() {
            let contents = fs::read_to_string(&matches_path)?;
            let (matches, mut found) = parse_division_matches(&contents)?.into_parts();
            diagnostics.append(&mut found);
            matches
        } else {
            debug!("No match file at {:?}", matches_path);
            BTreeMap::new()
        };

        let mut names = configured_names.clone();
        let names_path = dir.join(NAMES_FILE);
        if names_path.exists() {
            let contents = fs::read_to_string(&names_path)?;
            let file_names: TeamNames = serde_json::from_str(&contents)?;
            names.merge(&file_names);
        }

        let (teams, mut found) = self.read_teams(season)?.into_parts();
        diagnostics.append(&mut found);

        if !diagnostics.is_empty() {
            warn!(
                "Season {} loaded with {} data problems",
                season,
                diagnostics.len()
            );
        }
        info!(
            "Loaded season {}: {} divisions, {} teams",
            season,
            matches.len(),
            teams.len()
        );

        Ok(SeasonData {
            season,
            matches,
            names,
            teams,
            diagnostics,
        })
    }

    /// Read the season's team snapshot.
    pub fn read_teams(&self, season: u32) -> Result<IngestReport<Vec<Team>>, StorageError> {
        let reader: JsonlReader<RawTeam> =
            JsonlReader::for_season(&self.config, EntityType::Team, season);
        Ok(normalize_teams(reader.read_all()?))
    }

    /// Replace the season's team snapshot.
    pub fn write_teams(&self, season: u32, teams: &[Team]) -> Result<usize, StorageError> {
        JsonlWriter::for_season(&self.config, EntityType::Team, season).write_all(teams)
    }

    /// Replace the season's team snapshot with a JSON array of team rows,
    /// such as an export from the hosted database.
    pub fn import_teams(&self, season: u32, json: &str) -> Result<IngestReport<usize>, StorageError> {
        let (teams, diagnostics) = parse_teams(json)?.into_parts();
        let count = self.write_teams(season, &teams)?;
        Ok(IngestReport::new(count, diagnostics))
    }

    /// Looking-for-team sign-ups, newest first.
    pub fn read_lft_players(&self) -> Result<Vec<LftPlayer>, StorageError> {
        let mut players = JsonlReader::new(self.config.lft_path()).read_all()?;
        sort_lft_newest_first(&mut players);
        Ok(players)
    }
}
