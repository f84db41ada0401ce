//! Team and match identifiers.
//!
//! Team ids are the machine keys used by the season data files
//! (`monkey_kings`, `creep_enjoyers`, ...). Match ids are either taken from
//! the data file or derived deterministically from the fixture itself.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Team id used by the season data files for the "no opponent" side.
pub const BYE_TEAM_ID: &str = "bye_week";

/// Prefixes of symbolic ids that stand in for a team not yet known.
pub const PLACEHOLDER_PREFIXES: &[&str] = &["seed", "winner"];

/// Machine key of a team.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TeamId({})", self.0)
    }
}

impl From<String> for TeamId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a scheduled match.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a MatchId from input fields.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchId({})", self.0)
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which ids in a match list denote real participants.
///
/// The bye id and placeholder ids never become teams in a standings
/// table; placeholders only make sense inside bracket templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRules {
    pub bye_team_id: String,
    pub placeholder_prefixes: Vec<String>,
}

impl Default for ParticipantRules {
    fn default() -> Self {
        Self {
            bye_team_id: BYE_TEAM_ID.to_string(),
            placeholder_prefixes: PLACEHOLDER_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ParticipantRules {
    pub fn is_bye(&self, id: &TeamId) -> bool {
        id.as_str() == self.bye_team_id
    }

    pub fn is_placeholder(&self, id: &TeamId) -> bool {
        self.placeholder_prefixes
            .iter()
            .any(|prefix| id.as_str().starts_with(prefix.as_str()))
    }

    /// True when the id names a real team.
    pub fn is_participant(&self, id: &TeamId) -> bool {
        !self.is_bye(id) && !self.is_placeholder(id)
    }
}
