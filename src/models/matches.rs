//! Scheduled league matches and their results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{MatchId, TeamId};

/// Result of a match from one side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn reversed(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Draw => Outcome::Draw,
            Outcome::Loss => Outcome::Win,
        }
    }
}

/// One game of a best-of series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// 1-based game number within the series
    pub number: u8,

    pub played: bool,

    /// Team id of the game winner
    pub winner: Option<TeamId>,

    /// Match id on the game's own servers, for stats lookups
    pub dota2_match_id: Option<String>,
}

/// A scheduled fixture between two team ids.
///
/// Team ids may be placeholders (`seed1`, `winner_qf2`) or the bye id for
/// knockout and bye-week entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,

    pub team1_id: TeamId,

    pub team2_id: TeamId,

    /// League week, starting at 1
    pub week: u32,

    pub date: Option<NaiveDate>,

    pub completed: bool,

    /// Series score as (team1, team2)
    pub score: Option<(u32, u32)>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub games: Vec<Game>,

    pub is_bye_week: bool,

    pub is_knockout: bool,
}

impl Match {
    /// Create an unplayed group-stage match with a derived id.
    pub fn new(week: u32, team1_id: TeamId, team2_id: TeamId) -> Self {
        let id = MatchId::generate(&[&week.to_string(), team1_id.as_str(), team2_id.as_str()]);

        Self {
            id,
            team1_id,
            team2_id,
            week,
            date: None,
            completed: false,
            score: None,
            games: Vec::new(),
            is_bye_week: false,
            is_knockout: false,
        }
    }

    /// Builder method to record a final score and mark the match completed.
    pub fn with_score(mut self, team1: u32, team2: u32) -> Self {
        self.score = Some((team1, team2));
        self.completed = true;
        self
    }

    /// Builder method to mark the match as a bye week.
    pub fn bye(mut self) -> Self {
        self.is_bye_week = true;
        self
    }

    /// Builder method to mark the match as a knockout-stage match.
    pub fn knockout(mut self) -> Self {
        self.is_knockout = true;
        self
    }

    /// Builder method to set the date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Whether this match contributes to group-stage standings.
    pub fn counts_for_standings(&self) -> bool {
        self.completed && !self.is_bye_week && !self.is_knockout && self.score.is_some()
    }

    /// Outcome for team 1, when a score is recorded.
    pub fn team1_outcome(&self) -> Option<Outcome> {
        let (s1, s2) = self.score?;
        Some(match s1.cmp(&s2) {
            Ordering::Greater => Outcome::Win,
            Ordering::Equal => Outcome::Draw,
            Ordering::Less => Outcome::Loss,
        })
    }

    /// Whether `team` is on either side of the fixture.
    pub fn involves(&self, team: &TeamId) -> bool {
        &self.team1_id == team || &self.team2_id == team
    }
}
