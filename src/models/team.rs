//! Team model, win/draw/loss records and display-name lookups.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::warn;

use super::{Outcome, Player, TeamId};

/// Points awarded for a group-stage win.
pub const WIN_POINTS: u32 = 3;

/// Points awarded to each side for a group-stage draw.
pub const DRAW_POINTS: u32 = 1;

/// Directory the site serves team logos from.
pub const TEAM_IMAGE_DIR: &str = "/img/teams/";

/// Cumulative group-stage record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u32,
}

impl Record {
    /// Apply one result to the record.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => {
                self.wins += 1;
                self.points += WIN_POINTS;
            }
            Outcome::Draw => {
                self.draws += 1;
                self.points += DRAW_POINTS;
            }
            Outcome::Loss => {
                self.losses += 1;
            }
        }
    }

    /// Games accounted for by this record.
    pub fn games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// Points implied by the wins and draws.
    pub fn expected_points(&self) -> u32 {
        WIN_POINTS * self.wins + DRAW_POINTS * self.draws
    }

    /// Ranking comparator: points desc, wins desc, draws desc, losses asc.
    ///
    /// `Ordering::Less` means `self` ranks above `other`.
    pub fn rank_cmp(&self, other: &Record) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then_with(|| other.wins.cmp(&self.wins))
            .then_with(|| other.draws.cmp(&self.draws))
            .then_with(|| self.losses.cmp(&other.losses))
    }
}

/// A team registered in a division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,

    /// Display name
    pub name: String,

    /// Division the team plays in
    pub division_id: u32,

    #[serde(flatten)]
    pub record: Record,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captain_name: Option<String>,

    /// Path to a logo under the site's image directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_image: Option<String>,

    /// Legacy image URL from the old hosted store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(id: TeamId, name: String, division_id: u32) -> Self {
        Self {
            id,
            name,
            division_id,
            record: Record::default(),
            captain_name: None,
            local_image: None,
            image_url: None,
            players: Vec::new(),
        }
    }

    /// Builder method to set the record.
    pub fn with_record(mut self, record: Record) -> Self {
        self.record = record;
        self
    }

    /// Builder method to set the roster.
    pub fn with_players(mut self, players: Vec<Player>) -> Self {
        self.players = players;
        self
    }

    /// Whether a signed-in user (by auth id) is on this roster.
    pub fn has_player(&self, auth_id: &str) -> bool {
        self.players
            .iter()
            .any(|p| p.auth_id.as_deref() == Some(auth_id))
    }

    /// Case-insensitive, whitespace-trimmed name comparison.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Logo path for the team, if one is hosted locally.
    pub fn image_path(&self) -> Option<&str> {
        if let Some(local) = self.local_image.as_deref() {
            return Some(local);
        }

        let url = self.image_url.as_deref()?;
        if url.starts_with(TEAM_IMAGE_DIR) {
            return Some(url);
        }
        if url.contains("supabase") {
            warn!(
                "Team {} still has a hosted-store image URL; migrate it to {}",
                self.name, TEAM_IMAGE_DIR
            );
        }
        None
    }

    /// First letter of the name, used when there is no logo.
    pub fn initial(&self) -> char {
        team_initial(&self.name)
    }
}

/// Find the team whose roster contains the given auth id.
pub fn find_team_for_player<'a>(teams: &'a [Team], auth_id: &str) -> Option<&'a Team> {
    teams.iter().find(|t| t.has_player(auth_id))
}

/// Lower-case a team name and collapse everything that is not `[a-z0-9]`
/// into single underscores, for use as a filename.
pub fn sanitize_team_name(name: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static pattern"));

    re.replace_all(&name.to_lowercase(), "_")
        .trim_matches('_')
        .to_string()
}

/// Where an uploaded logo for `name` should be saved.
pub fn suggested_image_path(name: &str, extension: &str) -> String {
    format!("{}{}.{}", TEAM_IMAGE_DIR, sanitize_team_name(name), extension)
}

/// Upper-cased first character of a name, `?` when empty.
pub fn team_initial(name: &str) -> char {
    name.chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}

/// Display names for team ids, supplied per season.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamNames(BTreeMap<String, String>);

impl TeamNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.0.insert(id.into(), name.into());
    }

    pub fn get(&self, id: &TeamId) -> Option<&str> {
        self.0.get(id.as_str()).map(String::as_str)
    }

    /// Name for the id, falling back to the raw id.
    pub fn display_name(&self, id: &TeamId) -> String {
        self.get(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.as_str().to_string())
    }

    /// Add every entry of `other`, overriding existing ones.
    pub fn merge(&mut self, other: &TeamNames) {
        for (id, name) in &other.0 {
            self.0.insert(id.clone(), name.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TeamNames {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
