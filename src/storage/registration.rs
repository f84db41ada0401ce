//! Team registration, roster joins and LFT sign-ups.
//!
//! Each operation reads the current JSONL file, checks the league's
//! roster rules and writes the whole file back.

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use super::{JsonlReader, JsonlWriter, SeasonStore, StorageError};
use crate::models::{
    find_team_for_player, sanitize_team_name, suggested_image_path, LftPlayer, Player, Team,
    TeamId,
};

/// Players allowed on one roster.
pub const MAX_ROSTER_SIZE: usize = 5;

/// Positions a player can sign up for.
pub const POSITIONS: [&str; 5] = ["Carry", "Mid", "Offlane", "Support", "Hard Support"];

/// Reasons a registration is refused.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Team name must contain a letter or digit")]
    InvalidTeamName,

    #[error("A team with id {0} is already registered")]
    DuplicateTeam(TeamId),

    #[error("Team {0} not found")]
    TeamNotFound(TeamId),

    #[error("Team {0} is already full")]
    TeamFull(TeamId),

    #[error("Player is already a member of team {0}")]
    AlreadyMember(TeamId),

    #[error("Player is already on team \"{0}\"")]
    OnAnotherTeam(String),

    #[error("Player name must not be empty")]
    MissingPlayerName,

    #[error("Select at least one position")]
    NoPositions,

    #[error("Unknown position {0:?}")]
    UnknownPosition(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A new team with its captain.
#[derive(Debug, Clone)]
pub struct TeamRegistration {
    pub name: String,
    pub division_id: u32,
    pub captain: Player,

    /// Extension of the uploaded logo (`png`, `jpg`), if there is one
    pub logo_extension: Option<String>,
}

impl SeasonStore {
    /// Register a team with a zero record and the captain as its only player.
    pub fn register_team(
        &self,
        season: u32,
        registration: TeamRegistration,
        auth_id: &str,
    ) -> Result<Team, RegistrationError> {
        let name = registration.name.trim();
        let slug = sanitize_team_name(name);
        if slug.is_empty() {
            return Err(RegistrationError::InvalidTeamName);
        }
        let captain = roster_player(registration.captain, auth_id)?;

        let mut teams = self.read_teams(season)?.value;
        if let Some(current) = find_team_for_player(&teams, auth_id) {
            return Err(RegistrationError::OnAnotherTeam(current.name.clone()));
        }
        let id = TeamId::from(slug);
        if teams.iter().any(|t| t.id == id) {
            return Err(RegistrationError::DuplicateTeam(id));
        }

        let mut team = Team::new(id, name.to_string(), registration.division_id);
        team.captain_name = Some(captain.name.clone());
        team.local_image = registration
            .logo_extension
            .as_deref()
            .map(|ext| suggested_image_path(name, ext.trim_start_matches('.')));
        team.players.push(captain);

        teams.push(team.clone());
        self.write_teams(season, &teams)?;

        info!(
            "Registered team {} ({}) in season {} division {}",
            team.name, team.id, season, team.division_id
        );
        Ok(team)
    }

    /// Add a player to an existing roster.
    pub fn join_team(
        &self,
        season: u32,
        team_id: &TeamId,
        player: Player,
        auth_id: &str,
    ) -> Result<Team, RegistrationError> {
        let player = roster_player(player, auth_id)?;

        let mut teams = self.read_teams(season)?.value;
        let index = teams
            .iter()
            .position(|t| t.id == *team_id)
            .ok_or_else(|| RegistrationError::TeamNotFound(team_id.clone()))?;

        if teams[index].players.len() >= MAX_ROSTER_SIZE {
            return Err(RegistrationError::TeamFull(team_id.clone()));
        }
        if teams[index].has_player(auth_id) {
            return Err(RegistrationError::AlreadyMember(team_id.clone()));
        }
        if let Some(current) = find_team_for_player(&teams, auth_id) {
            return Err(RegistrationError::OnAnotherTeam(current.name.clone()));
        }

        teams[index].players.push(player);
        let team = teams[index].clone();
        self.write_teams(season, &teams)?;

        info!(
            "{} joined {} ({} players)",
            auth_id,
            team.name,
            team.players.len()
        );
        Ok(team)
    }

    /// Record a looking-for-team sign-up, stamped with the current time.
    pub fn add_lft_player(
        &self,
        mut player: LftPlayer,
        auth_id: &str,
    ) -> Result<LftPlayer, RegistrationError> {
        player.name = player.name.trim().to_string();
        if player.name.is_empty() {
            return Err(RegistrationError::MissingPlayerName);
        }
        if player.roles.is_empty() {
            return Err(RegistrationError::NoPositions);
        }
        player.roles = canonical_positions(&player.roles)?;
        player.auth_id = Some(auth_id.to_string());
        if player.created_at.is_none() {
            player.created_at = Some(Utc::now());
        }

        let path = self.config().lft_path();
        let mut players: Vec<LftPlayer> = JsonlReader::new(path.clone()).read_all()?;
        players.push(player.clone());
        JsonlWriter::new(path).write_all(&players)?;

        info!("{} is looking for a team as {}", player.name, player.roles_label());
        Ok(player)
    }
}

fn roster_player(mut player: Player, auth_id: &str) -> Result<Player, RegistrationError> {
    player.name = player.name.trim().to_string();
    if player.name.is_empty() {
        return Err(RegistrationError::MissingPlayerName);
    }
    player.roles = canonical_positions(&player.roles)?;
    player.auth_id = Some(auth_id.to_string());
    Ok(player)
}

/// Map each role onto its `POSITIONS` spelling, ignoring case.
fn canonical_positions(roles: &[String]) -> Result<Vec<String>, RegistrationError> {
    roles
        .iter()
        .map(|role| {
            POSITIONS
                .iter()
                .find(|p| p.eq_ignore_ascii_case(role.trim()))
                .map(|p| p.to_string())
                .ok_or_else(|| RegistrationError::UnknownPosition(role.clone()))
        })
        .collect()
}
