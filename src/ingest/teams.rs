//! Team record ingest.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{Diagnostic, IngestError, IngestReport};
use crate::models::{sanitize_team_name, Player, Record, Team, TeamId};

/// A team row as exported from the hosted database or a snapshot file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTeam {
    /// Text id, or a numeric database key
    #[serde(default)]
    pub id: Value,

    pub name: String,

    pub division_id: u32,

    #[serde(flatten)]
    pub record: Record,

    #[serde(default)]
    pub captain_name: Option<String>,

    #[serde(default)]
    pub local_image: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,

    /// Player objects, or JSON strings encoding them
    #[serde(default)]
    pub players: Option<Vec<Value>>,
}

/// Build a [`Team`], decoding string-encoded players and dropping entries
/// that are not players.
pub fn normalize_team(raw: RawTeam) -> IngestReport<Team> {
    let id = match &raw.id {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => sanitize_team_name(&raw.name),
    };

    let mut diagnostics = Vec::new();
    let mut players = Vec::new();
    for (index, entry) in raw.players.unwrap_or_default().into_iter().enumerate() {
        match decode_player(entry) {
            Ok(Some(player)) => players.push(player),
            Ok(None) => {}
            Err(reason) => {
                warn!("Team {} player {} unreadable: {}", id, index, reason);
                diagnostics.push(Diagnostic::UnreadablePlayer {
                    team_id: id.clone(),
                    index,
                    reason,
                });
            }
        }
    }

    let mut team = Team::new(TeamId::new(id), raw.name, raw.division_id)
        .with_record(raw.record)
        .with_players(players);
    team.captain_name = raw.captain_name.filter(|c| !c.trim().is_empty());
    team.local_image = raw.local_image.filter(|p| !p.trim().is_empty());
    team.image_url = raw.image_url.filter(|u| !u.trim().is_empty());

    IngestReport::new(team, diagnostics)
}

fn decode_player(entry: Value) -> Result<Option<Player>, String> {
    match entry {
        Value::Null => Ok(None),
        Value::String(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| e.to_string()),
        object @ Value::Object(_) => serde_json::from_value(object)
            .map(Some)
            .map_err(|e| e.to_string()),
        other => Err(format!("expected object or JSON string, got {}", other)),
    }
}

/// Parse a JSON array of team rows.
pub fn parse_teams(json: &str) -> Result<IngestReport<Vec<Team>>, IngestError> {
    let rows: Vec<RawTeam> = serde_json::from_str(json)?;
    Ok(normalize_teams(rows))
}

/// Normalize a batch of rows, collecting every diagnostic.
pub fn normalize_teams(rows: Vec<RawTeam>) -> IngestReport<Vec<Team>> {
    let mut teams = Vec::with_capacity(rows.len());
    let mut diagnostics = Vec::new();
    for row in rows {
        let (team, mut found) = normalize_team(row).into_parts();
        diagnostics.append(&mut found);
        teams.push(team);
    }
    IngestReport::new(teams, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(value: Value) -> RawTeam {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_team_with_mixed_players() {
        let report = normalize_team(raw(json!({
            "id": "creep_enjoyers",
            "name": "Creep Enjoyers",
            "division_id": 2,
            "points": 9,
            "wins": 3,
            "losses": 1,
            "players": [
                { "name": "Alice", "rank": "Ancient", "auth_id": "auth|1" },
                "{\"name\":\"Bob\",\"roles\":\"Carry, Mid\"}",
                "{not json",
                null
            ]
        })));

        let team = &report.value;
        assert_eq!(team.id.as_str(), "creep_enjoyers");
        assert_eq!(team.record.points, 9);
        assert_eq!(team.record.draws, 0);
        assert_eq!(team.players.len(), 2);
        assert_eq!(team.players[1].roles, vec!["Carry", "Mid"]);
        assert!(team.has_player("auth|1"));

        assert_eq!(report.diagnostics.len(), 1);
        assert!(matches!(
            report.diagnostics[0],
            Diagnostic::UnreadablePlayer { index: 2, .. }
        ));
    }

    #[test]
    fn test_numeric_and_missing_ids() {
        let numeric = normalize_team(raw(json!({ "id": 42, "name": "VOID", "division_id": 1 })));
        assert_eq!(numeric.value.id.as_str(), "42");

        let missing = normalize_team(raw(json!({ "name": "Mike's Army", "division_id": 2 })));
        assert_eq!(missing.value.id.as_str(), "mike_s_army");
        assert!(missing.is_clean());
    }

    #[test]
    fn test_blank_optional_fields_dropped() {
        let report = normalize_team(raw(json!({
            "id": "bdc",
            "name": "BDC",
            "division_id": 2,
            "captain_name": "",
            "image_url": " ",
            "local_image": "/img/teams/bdc.png",
            "players": null
        })));

        let team = report.value;
        assert_eq!(team.captain_name, None);
        assert_eq!(team.image_url, None);
        assert_eq!(team.image_path(), Some("/img/teams/bdc.png"));
        assert!(team.players.is_empty());
    }

    #[test]
    fn test_parse_teams() {
        let report = parse_teams(
            r#"[
                { "id": "a", "name": "A", "division_id": 1, "players": [42] },
                { "id": "b", "name": "B", "division_id": 1 }
            ]"#,
        )
        .unwrap();

        assert_eq!(report.value.len(), 2);
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_serialized_team_reads_back() {
        let team = Team::new("bdc".into(), "BDC".to_string(), 2).with_players(vec![
            serde_json::from_value(json!({ "name": "Cara", "roles": ["Support"] })).unwrap(),
        ]);
        let json = serde_json::to_value(&team).unwrap();

        let report = normalize_team(serde_json::from_value(json).unwrap());
        assert!(report.is_clean());
        assert_eq!(report.value, team);
    }
}
