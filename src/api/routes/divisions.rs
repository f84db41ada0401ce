use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{clamp_week, matches_for_week, max_week, rank_teams, week_has_knockout};
use crate::models::{Bracket, Match, Standing, Team};

// ── Standings ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RankedStanding {
    pub rank: usize,

    #[serde(flatten)]
    pub standing: Standing,
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub season: u32,
    pub division: u32,
    pub standings: Vec<RankedStanding>,
}

pub async fn standings(
    State(state): State<AppState>,
    Path((season, division)): Path<(u32, u32)>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let data = state.load_division(season, division)?;
    let standings = data
        .standings(&state.calculator, division)
        .into_iter()
        .enumerate()
        .map(|(i, standing)| RankedStanding {
            rank: i + 1,
            standing,
        })
        .collect();

    Ok(Json(StandingsResponse {
        season,
        division,
        standings,
    }))
}

// ── Bracket ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BracketParams {
    /// `standings` (default) or `teams` for the stored team records
    pub source: Option<String>,
}

pub async fn bracket(
    State(state): State<AppState>,
    Path((season, division)): Path<(u32, u32)>,
    Query(params): Query<BracketParams>,
) -> Result<Json<Bracket>, ApiError> {
    let data = state.load_division(season, division)?;

    let ranked: Vec<Team> = match params.source.as_deref() {
        None | Some("standings") => data
            .standings(&state.calculator, division)
            .into_iter()
            .map(Team::from)
            .collect(),
        Some("teams") => rank_teams(&data.teams, division),
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "Unknown bracket source {:?}, expected standings or teams",
                other
            )))
        }
    };

    debug!(
        "Building bracket for season {} division {} from {} teams",
        season,
        division,
        ranked.len()
    );
    Ok(Json(state.builder.build(&ranked, season, division)))
}

// ── Matches ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchesParams {
    pub week: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub fixture: Match,
    pub team1_name: String,
    pub team2_name: String,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub season: u32,
    pub division: u32,
    pub week: u32,
    pub max_week: u32,
    pub has_knockout: bool,
    pub matches: Vec<MatchView>,
}

pub async fn matches(
    State(state): State<AppState>,
    Path((season, division)): Path<(u32, u32)>,
    Query(params): Query<MatchesParams>,
) -> Result<Json<MatchesResponse>, ApiError> {
    let data = state.load_division(season, division)?;
    let all = data.division_matches(division);
    let week = clamp_week(all, params.week.unwrap_or(1));

    let matches = matches_for_week(all, week)
        .into_iter()
        .map(|m| MatchView {
            team1_name: data.names.display_name(&m.team1_id),
            team2_name: data.names.display_name(&m.team2_id),
            fixture: m.clone(),
        })
        .collect();

    Ok(Json(MatchesResponse {
        season,
        division,
        week,
        max_week: max_week(all),
        has_knockout: week_has_knockout(all, week),
        matches,
    }))
}

// ── Teams ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TeamView {
    pub rank: usize,

    #[serde(flatten)]
    pub team: Team,

    /// Logo to show, absent when the UI should fall back to the initial
    pub image_path: Option<String>,

    pub initial: char,
}

#[derive(Debug, Serialize)]
pub struct TeamsResponse {
    pub season: u32,
    pub division: u32,
    pub teams: Vec<TeamView>,
}

pub async fn teams(
    State(state): State<AppState>,
    Path((season, division)): Path<(u32, u32)>,
) -> Result<Json<TeamsResponse>, ApiError> {
    let data = state.load_division(season, division)?;
    let teams = rank_teams(&data.teams, division)
        .into_iter()
        .enumerate()
        .map(|(i, team)| TeamView {
            rank: i + 1,
            image_path: team.image_path().map(str::to_string),
            initial: team.initial(),
            team,
        })
        .collect();

    Ok(Json(TeamsResponse {
        season,
        division,
        teams,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::get;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn column<'a>(rows: &'a Value, key: &str) -> Vec<&'a str> {
        rows.as_array()
            .unwrap()
            .iter()
            .map(|r| r[key].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_standings() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, json) = get(tmp.path(), "/api/seasons/5/divisions/3/standings").await;

        assert_eq!(status, StatusCode::OK);
        let rows = &json["standings"];
        assert_eq!(
            column(rows, "id"),
            vec!["bdc", "joonsquad", "ausgang", "mms"]
        );
        assert_eq!(column(rows, "name"), vec!["BDC", "joonsquad", "ausgang", "M&M's"]);
        assert_eq!(rows[0]["rank"], 1);
        assert_eq!(rows[0]["points"], 6);
        assert_eq!(rows[0]["wins"], 2);
        assert_eq!(rows[0]["matches_played"], 2);
        assert_eq!(rows[3]["losses"], 1);
    }

    #[tokio::test]
    async fn test_standings_empty_division() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, json) = get(tmp.path(), "/api/seasons/5/divisions/1/standings").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["standings"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unknown_season_and_division() {
        let tmp = tempfile::tempdir().unwrap();

        let (status, json) = get(tmp.path(), "/api/seasons/9/divisions/1/standings").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");

        let (status, _) = get(tmp.path(), "/api/seasons/5/divisions/7/standings").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bracket_from_standings() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, json) = get(tmp.path(), "/api/seasons/5/divisions/3/bracket").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["template"], "season-5-division-3");
        assert_eq!(json["nodes"][0]["id"], "sf-1");
        assert_eq!(json["nodes"][0]["team1"]["name"], "BDC");
        assert_eq!(json["nodes"][0]["team2"]["name"], "M&M's");
        assert_eq!(json["nodes"][1]["team1"]["id"], "joonsquad");
        assert_eq!(json["nodes"][3]["stage"], "champion");
        assert_eq!(json["edges"][2]["id"], "e-final-champion");
    }

    #[tokio::test]
    async fn test_bracket_from_team_records() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, json) = get(
            tmp.path(),
            "/api/seasons/5/divisions/3/bracket?source=teams",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["nodes"][0]["team1"]["name"], "M&M's");
        assert_eq!(json["nodes"][0]["team2"]["name"], "Joonsquad");
    }

    #[tokio::test]
    async fn test_bracket_bad_source() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, json) = get(
            tmp.path(),
            "/api/seasons/5/divisions/3/bracket?source=vibes",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_bracket_upcoming_season_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, json) = get(tmp.path(), "/api/seasons/6/divisions/1/bracket").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["nodes"], serde_json::json!([]));
        assert_eq!(json["template"], Value::Null);
    }

    #[tokio::test]
    async fn test_matches_by_week() {
        let tmp = tempfile::tempdir().unwrap();

        let (status, json) = get(tmp.path(), "/api/seasons/5/divisions/3/matches").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["week"], 1);
        assert_eq!(json["max_week"], 5);
        assert_eq!(column(&json["matches"], "id"), vec!["w1-1", "w1-2"]);
        assert_eq!(json["matches"][0]["team2_name"], "M&M's");
        assert_eq!(json["matches"][0]["score"], serde_json::json!([2, 0]));

        let (_, json) = get(tmp.path(), "/api/seasons/5/divisions/3/matches?week=2").await;
        assert_eq!(column(&json["matches"], "id"), vec!["w2-1"]);
        assert_eq!(json["has_knockout"], false);

        let (_, json) = get(tmp.path(), "/api/seasons/5/divisions/3/matches?week=9").await;
        assert_eq!(json["week"], 5);
        assert_eq!(json["has_knockout"], true);
    }

    #[tokio::test]
    async fn test_teams_ranked_with_images() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, json) = get(tmp.path(), "/api/seasons/5/divisions/3/teams").await;

        assert_eq!(status, StatusCode::OK);
        let teams = &json["teams"];
        assert_eq!(
            column(teams, "id"),
            vec!["mms", "bdc", "ausgang", "joonsquad"]
        );
        assert_eq!(teams[0]["image_path"], Value::Null);
        assert_eq!(teams[0]["initial"], "M");
        assert_eq!(teams[1]["image_path"], "/img/teams/bdc.png");
        assert_eq!(teams[1]["players"][0]["name"], "Cap");
    }
}
