//! Computed standings rows.

use serde::{Deserialize, Serialize};

use super::{Outcome, Team, TeamId};

/// A team's position data for one division, recomputed from the match list
/// on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    #[serde(flatten)]
    pub team: Team,

    /// Group-stage matches that produced a result
    pub matches_played: u32,
}

impl Standing {
    /// A zeroed row.
    pub fn new(id: TeamId, name: String, division_id: u32) -> Self {
        Self {
            team: Team::new(id, name, division_id),
            matches_played: 0,
        }
    }

    /// Count one played match for this side.
    pub fn record(&mut self, outcome: Outcome) {
        self.matches_played += 1;
        self.team.record.apply(outcome);
    }

    pub fn id(&self) -> &TeamId {
        &self.team.id
    }

    pub fn name(&self) -> &str {
        &self.team.name
    }
}

impl From<Standing> for Team {
    fn from(standing: Standing) -> Self {
        standing.team
    }
}
