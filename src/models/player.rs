//! Roster players and looking-for-team (LFT) sign-ups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Steam profile URL the registration form pre-fills.
const STEAM_PROFILE_STUB: &str = "https://steamcommunity.com/my/";

/// Dotabuff profile URL the registration form pre-fills.
const DOTABUFF_PROFILE_STUB: &str = "https://www.dotabuff.com/players/";

/// A player on a team roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,

    /// Medal / rank as entered by the player
    #[serde(default)]
    pub rank: Option<String>,

    #[serde(default, alias = "steam_profile")]
    pub steam_profile: Option<String>,

    #[serde(default, alias = "dotabuff_profile")]
    pub dotabuff_profile: Option<String>,

    /// Registration forms send a single `position`
    #[serde(default, alias = "position", deserialize_with = "deserialize_roles")]
    pub roles: Vec<String>,

    #[serde(default, alias = "auth_id")]
    pub auth_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Player {
    pub fn new(name: String) -> Self {
        Self {
            name,
            rank: None,
            steam_profile: None,
            dotabuff_profile: None,
            roles: Vec::new(),
            auth_id: None,
            country: None,
        }
    }

    pub fn steam_link(&self) -> Option<&str> {
        profile_link(self.steam_profile.as_deref(), STEAM_PROFILE_STUB)
    }

    pub fn dotabuff_link(&self) -> Option<&str> {
        profile_link(self.dotabuff_profile.as_deref(), DOTABUFF_PROFILE_STUB)
    }

    pub fn rank_label(&self) -> &str {
        self.rank.as_deref().filter(|r| !r.is_empty()).unwrap_or("N/A")
    }
}

/// A free agent looking for a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LftPlayer {
    pub name: String,

    #[serde(default)]
    pub rank: Option<String>,

    #[serde(default, deserialize_with = "deserialize_roles")]
    pub roles: Vec<String>,

    #[serde(default, alias = "steam_profile")]
    pub steam_profile: Option<String>,

    #[serde(default, alias = "dotabuff_profile")]
    pub dotabuff_profile: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, alias = "auth_id", skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<String>,
}

impl LftPlayer {
    pub fn new(name: String) -> Self {
        Self {
            name,
            rank: None,
            roles: Vec::new(),
            steam_profile: None,
            dotabuff_profile: None,
            notes: None,
            created_at: None,
            auth_id: None,
        }
    }

    pub fn steam_link(&self) -> Option<&str> {
        profile_link(self.steam_profile.as_deref(), STEAM_PROFILE_STUB)
    }

    pub fn dotabuff_link(&self) -> Option<&str> {
        profile_link(self.dotabuff_profile.as_deref(), DOTABUFF_PROFILE_STUB)
    }

    /// Preferred positions, "Flexible" when none were given.
    pub fn roles_label(&self) -> String {
        if self.roles.is_empty() {
            "Flexible".to_string()
        } else {
            self.roles.join(", ")
        }
    }
}

/// Newest sign-ups first; entries without a timestamp go last.
pub fn sort_lft_newest_first(players: &mut [LftPlayer]) {
    players.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn profile_link<'a>(url: Option<&'a str>, stub: &str) -> Option<&'a str> {
    url.map(str::trim).filter(|u| !u.is_empty() && *u != stub)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Roles arrive either as a list or as one comma-separated string.
fn deserialize_roles<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let roles = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect(),
        Some(OneOrMany::Many(v)) => v,
    };
    Ok(roles)
}
