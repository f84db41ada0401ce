use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{find_team_for_player, Team};

#[derive(Debug, Serialize)]
pub struct SeasonSummary {
    pub id: u32,
    pub name: String,
    pub upcoming: bool,
    pub current: bool,
    pub divisions: Vec<u32>,
    pub league_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SeasonsResponse {
    pub seasons: Vec<SeasonSummary>,
}

/// Configured seasons, newest first. Divisions fall back to whatever the
/// season's data files contain when none are configured.
pub async fn list_seasons(
    State(state): State<AppState>,
) -> Result<Json<SeasonsResponse>, ApiError> {
    let league = &state.config.league;
    let current = league.current_season().map(|s| s.id);

    let mut seasons = Vec::with_capacity(league.seasons.len());
    for season in &league.seasons {
        let divisions = if season.divisions.is_empty() {
            state.load_season(season.id)?.divisions()
        } else {
            season.divisions.clone()
        };

        seasons.push(SeasonSummary {
            id: season.id,
            name: season.display_name(),
            upcoming: season.upcoming,
            current: current == Some(season.id),
            divisions,
            league_id: season.league_id,
        });
    }
    seasons.sort_by(|a, b| b.id.cmp(&a.id));

    Ok(Json(SeasonsResponse { seasons }))
}

/// The team whose roster holds the signed-in player.
pub async fn player_team(
    State(state): State<AppState>,
    Path((season, auth_id)): Path<(u32, String)>,
) -> Result<Json<Team>, ApiError> {
    let data = state.load_season(season)?;
    find_team_for_player(&data.teams, &auth_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No season {} team for player", season)))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::get;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_seasons() {
        let tmp = tempfile::tempdir().unwrap();
        let (status, json) = get(tmp.path(), "/api/seasons").await;

        assert_eq!(status, StatusCode::OK);
        let seasons = &json["seasons"];
        assert_eq!(seasons[0]["id"], 6);
        assert_eq!(seasons[0]["name"], "Season 6");
        assert_eq!(seasons[0]["upcoming"], true);
        assert_eq!(seasons[0]["divisions"], json!([]));

        assert_eq!(seasons[1]["id"], 5);
        assert_eq!(seasons[1]["current"], true);
        assert_eq!(seasons[1]["divisions"], json!([1, 2, 3]));
        assert_eq!(seasons[1]["league_id"], 18171);
    }

    #[tokio::test]
    async fn test_player_team() {
        let tmp = tempfile::tempdir().unwrap();

        let (status, json) = get(tmp.path(), "/api/seasons/5/players/auth%7Ccap/team").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "bdc");

        let (status, _) = get(tmp.path(), "/api/seasons/5/players/auth%7Cnobody/team").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
