//! Match file ingest.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{Diagnostic, IngestError, IngestReport};
use crate::models::{Game, Match, MatchId, TeamId};

/// A match as written in a season's match file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatch {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(alias = "team1_id")]
    pub team1_id: String,

    #[serde(alias = "team2_id")]
    pub team2_id: String,

    #[serde(default)]
    pub week: Option<u32>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub completed: bool,

    /// Expected `[team1, team2]`; kept loose until normalized
    #[serde(default)]
    pub score: Option<Value>,

    /// Object keyed `game1..game5`, or an array
    #[serde(default)]
    pub games: Option<Value>,

    #[serde(default, alias = "is_bye_week")]
    pub is_bye_week: bool,

    #[serde(default, alias = "is_knockout")]
    pub is_knockout: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGame {
    #[serde(default)]
    played: bool,

    #[serde(default)]
    winner: Option<String>,

    #[serde(default, alias = "dota2_match_id")]
    dota2_match_id: Option<Value>,
}

/// Turn a raw match into a [`Match`], recording anything that was dropped.
pub fn normalize_match(raw: RawMatch) -> IngestReport<Match> {
    let mut diagnostics = Vec::new();

    let week = raw.week.filter(|w| *w > 0);
    let mut m = Match::new(
        week.unwrap_or(1),
        TeamId::from(raw.team1_id),
        TeamId::from(raw.team2_id),
    );
    if let Some(id) = raw.id.filter(|id| !id.trim().is_empty()) {
        m.id = MatchId::new(id);
    }
    let match_id = m.id.to_string();

    if week.is_none() {
        diagnostics.push(Diagnostic::InvalidWeek {
            match_id: match_id.clone(),
        });
    }

    m.completed = raw.completed;
    m.is_bye_week = raw.is_bye_week;
    m.is_knockout = raw.is_knockout;

    if let Some(text) = raw.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        m.date = parse_date(text);
        if m.date.is_none() {
            diagnostics.push(Diagnostic::UnparseableDate {
                match_id: match_id.clone(),
                raw: text.to_string(),
            });
        }
    }

    match raw.score {
        None | Some(Value::Null) => {}
        Some(value) => {
            m.score = parse_score(&value);
            if m.score.is_none() {
                diagnostics.push(Diagnostic::MalformedScore {
                    match_id: match_id.clone(),
                    raw: value.to_string(),
                });
            }
        }
    }

    if let Some(games) = raw.games {
        m.games = parse_games(&games, &match_id, &mut diagnostics);
    }

    IngestReport::new(m, diagnostics)
}

/// A score is exactly two non-negative integers. Integral floats and
/// numeric strings are accepted.
pub fn parse_score(value: &Value) -> Option<(u32, u32)> {
    match value.as_array()?.as_slice() {
        [a, b] => Some((score_component(a)?, score_component(b)?)),
        _ => None,
    }
}

fn score_component(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

fn parse_games(value: &Value, match_id: &str, diagnostics: &mut Vec<Diagnostic>) -> Vec<Game> {
    let entries: Vec<(String, Option<u8>, &Value)> = match value {
        Value::Null => return Vec::new(),
        Value::Object(map) => map
            .iter()
            .map(|(key, v)| (key.clone(), game_number(key), v))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| ((i + 1).to_string(), u8::try_from(i + 1).ok(), v))
            .collect(),
        other => {
            diagnostics.push(Diagnostic::MalformedGame {
                match_id: match_id.to_string(),
                game: "games".to_string(),
                reason: format!("expected object or array, got {}", other),
            });
            return Vec::new();
        }
    };

    let mut games = Vec::new();
    for (key, number, v) in entries {
        let Some(number) = number else {
            diagnostics.push(Diagnostic::MalformedGame {
                match_id: match_id.to_string(),
                game: key,
                reason: "key is not gameN".to_string(),
            });
            continue;
        };

        match RawGame::deserialize(v) {
            Ok(raw) => games.push(Game {
                number,
                played: raw.played,
                winner: raw
                    .winner
                    .filter(|w| !w.trim().is_empty())
                    .map(TeamId::from),
                dota2_match_id: raw.dota2_match_id.and_then(|id| match id {
                    Value::String(s) if !s.trim().is_empty() => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                }),
            }),
            Err(e) => diagnostics.push(Diagnostic::MalformedGame {
                match_id: match_id.to_string(),
                game: key,
                reason: e.to_string(),
            }),
        }
    }

    games.sort_by_key(|g| g.number);
    games
}

fn game_number(key: &str) -> Option<u8> {
    key.strip_prefix("game")?.parse().ok().filter(|n| *n > 0)
}

/// Parse a division-keyed match file: `{ "1": [match, ...], "2": [...] }`.
///
/// Entries that are not match objects are skipped with a diagnostic so one
/// bad line does not hide a whole division.
pub fn parse_division_matches(
    json: &str,
) -> Result<IngestReport<BTreeMap<u32, Vec<Match>>>, IngestError> {
    let raw: BTreeMap<String, Vec<Value>> = serde_json::from_str(json)?;

    let mut divisions = BTreeMap::new();
    let mut diagnostics = Vec::new();

    for (key, entries) in raw {
        let division: u32 = key
            .trim()
            .parse()
            .map_err(|_| IngestError::InvalidDivisionKey(key.clone()))?;

        let mut matches = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<RawMatch>(entry) {
                Ok(raw) => {
                    let (m, mut found) = normalize_match(raw).into_parts();
                    diagnostics.append(&mut found);
                    matches.push(m);
                }
                Err(e) => {
                    warn!("Division {} entry {} is not a match: {}", division, index, e);
                    diagnostics.push(Diagnostic::UnreadableMatch {
                        division,
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!("Division {}: {} matches", division, matches.len());
        divisions.insert(division, matches);
    }

    Ok(IngestReport::new(divisions, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(value: Value) -> RawMatch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score(&json!([2, 1])), Some((2, 1)));
        assert_eq!(parse_score(&json!(["2", " 0 "])), Some((2, 0)));
        assert_eq!(parse_score(&json!([1.0, 1])), Some((1, 1)));

        assert_eq!(parse_score(&json!([2])), None);
        assert_eq!(parse_score(&json!([2, 1, 0])), None);
        assert_eq!(parse_score(&json!([-1, 2])), None);
        assert_eq!(parse_score(&json!([1.5, 2])), None);
        assert_eq!(parse_score(&json!("2-1")), None);
        assert_eq!(parse_score(&json!([null, 1])), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-10-06"),
            NaiveDate::from_ymd_opt(2024, 10, 6)
        );
        assert_eq!(
            parse_date("2024-10-06T19:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 10, 6)
        );
        assert_eq!(parse_date("next tuesday"), None);
    }

    #[test]
    fn test_normalize_full_match() {
        let report = normalize_match(raw(json!({
            "id": "s5-d1-w1-1",
            "team1Id": "bdc",
            "team2Id": "mms",
            "week": 1,
            "date": "2024-10-06",
            "completed": true,
            "score": [2, 0],
            "games": {
                "game2": { "played": true, "winner": "bdc", "dota2MatchId": 8012345678u64 },
                "game1": { "played": true, "winner": "bdc", "dota2MatchId": "8012340000" }
            }
        })));

        assert!(report.is_clean());
        let m = report.value;
        assert_eq!(m.id.as_str(), "s5-d1-w1-1");
        assert_eq!(m.score, Some((2, 0)));
        assert!(m.counts_for_standings());
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 10, 6));

        assert_eq!(m.games.len(), 2);
        assert_eq!(m.games[0].number, 1);
        assert_eq!(m.games[0].dota2_match_id.as_deref(), Some("8012340000"));
        assert_eq!(m.games[1].dota2_match_id.as_deref(), Some("8012345678"));
        assert_eq!(m.games[1].winner, Some(TeamId::from("bdc")));
    }

    #[test]
    fn test_normalize_snake_case_fields() {
        let report = normalize_match(raw(json!({
            "team1_id": "a",
            "team2_id": "bye_week",
            "week": 3,
            "is_bye_week": true
        })));

        assert!(report.value.is_bye_week);
        assert_eq!(report.value.team1_id.as_str(), "a");
    }

    #[test]
    fn test_malformed_score_becomes_none() {
        let report = normalize_match(raw(json!({
            "id": "m1",
            "team1Id": "a",
            "team2Id": "b",
            "week": 1,
            "completed": true,
            "score": [3]
        })));

        assert_eq!(report.value.score, None);
        assert!(!report.value.counts_for_standings());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::MalformedScore {
                match_id: "m1".to_string(),
                raw: "[3]".to_string(),
            }]
        );
    }

    #[test]
    fn test_null_score_is_clean() {
        let report = normalize_match(raw(json!({
            "id": "m1", "team1Id": "a", "team2Id": "b", "week": 2, "score": null
        })));
        assert!(report.is_clean());
        assert_eq!(report.value.score, None);
    }

    #[test]
    fn test_missing_id_is_generated_deterministically() {
        let a = normalize_match(raw(json!({ "team1Id": "a", "team2Id": "b", "week": 2 })));
        let b = normalize_match(raw(json!({ "id": "", "team1Id": "a", "team2Id": "b", "week": 2 })));
        assert_eq!(a.value.id, b.value.id);
        assert_eq!(a.value.id.as_str().len(), 16);
    }

    #[test]
    fn test_missing_week_defaults_to_one() {
        let report = normalize_match(raw(json!({ "id": "m1", "team1Id": "a", "team2Id": "b" })));
        assert_eq!(report.value.week, 1);
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::InvalidWeek {
                match_id: "m1".to_string()
            }]
        );
    }

    #[test]
    fn test_bad_date_and_game_keys() {
        let report = normalize_match(raw(json!({
            "id": "m1",
            "team1Id": "a",
            "team2Id": "b",
            "week": 1,
            "date": "soon",
            "games": { "game1": { "played": false }, "bonus": {} }
        })));

        assert_eq!(report.value.date, None);
        assert_eq!(report.value.games.len(), 1);
        assert!(!report.value.games[0].played);
        assert_eq!(report.diagnostics.len(), 2);
        assert!(matches!(
            report.diagnostics[0],
            Diagnostic::UnparseableDate { .. }
        ));
        assert!(matches!(
            &report.diagnostics[1],
            Diagnostic::MalformedGame { game, .. } if game == "bonus"
        ));
    }

    #[test]
    fn test_games_as_array() {
        let report = normalize_match(raw(json!({
            "id": "m1", "team1Id": "a", "team2Id": "b", "week": 1,
            "games": [ { "played": true, "winner": "b" }, { "played": false, "winner": "" } ]
        })));

        let games = &report.value.games;
        assert_eq!(games.len(), 2);
        assert_eq!(games[1].number, 2);
        assert_eq!(games[1].winner, None);
    }

    #[test]
    fn test_parse_division_matches() {
        let json = r#"{
            "1": [
                { "id": "a", "team1Id": "x", "team2Id": "y", "week": 1, "completed": true, "score": [2, 1] },
                { "id": "b", "team1Id": "x", "week": 2 },
                { "id": "c", "team1Id": "y", "team2Id": "x", "week": 2, "completed": true, "score": "2-0" }
            ],
            "2": []
        }"#;

        let report = parse_division_matches(json).unwrap();
        let divisions = &report.value;

        assert_eq!(divisions.len(), 2);
        assert_eq!(divisions[&1].len(), 2);
        assert!(divisions[&2].is_empty());
        assert_eq!(divisions[&1][1].score, None);

        assert_eq!(report.diagnostics.len(), 2);
        assert!(matches!(
            report.diagnostics[0],
            Diagnostic::UnreadableMatch { division: 1, index: 1, .. }
        ));
        assert!(matches!(
            report.diagnostics[1],
            Diagnostic::MalformedScore { .. }
        ));
    }

    #[test]
    fn test_parse_division_matches_bad_key() {
        let err = parse_division_matches(r#"{ "one": [] }"#).unwrap_err();
        assert!(matches!(err, IngestError::InvalidDivisionKey(k) if k == "one"));
    }

    #[test]
    fn test_parse_division_matches_not_json() {
        assert!(matches!(
            parse_division_matches("not json"),
            Err(IngestError::Json(_))
        ));
    }
}
