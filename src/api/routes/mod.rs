pub mod divisions;
pub mod lft;
pub mod seasons;

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::bracket::BracketBuilder;
    use crate::config::{AppConfig, SeasonConfig};

    pub const SEASON5_MATCHES: &str = r#"{
        "3": [
            { "id": "w1-1", "team1Id": "bdc", "team2Id": "mms", "week": 1, "completed": true, "score": [2, 0] },
            { "id": "w1-2", "team1Id": "ausgang", "team2Id": "joonsquad", "week": 1, "completed": true, "score": [1, 1] },
            { "id": "w2-1", "team1Id": "bdc", "team2Id": "ausgang", "week": 2, "completed": true, "score": [2, 1] },
            { "id": "w2-2", "team1Id": "mms", "team2Id": "bye_week", "week": 2, "isByeWeek": true },
            { "id": "w3-1", "team1Id": "joonsquad", "team2Id": "mms", "week": 3, "completed": false },
            { "id": "ko-1", "team1Id": "seed1", "team2Id": "seed4", "week": 5, "isKnockout": true }
        ]
    }"#;

    pub const SEASON5_TEAMS: &str = concat!(
        r#"{"id":"bdc","name":"BDC","division_id":3,"points":3,"wins":1,"local_image":"/img/teams/bdc.png","players":[{"name":"Cap","auth_id":"auth|cap"}]}"#,
        "\n",
        r#"{"id":"mms","name":"M&M's","division_id":3,"points":6,"wins":2,"image_url":"https://x.supabase.co/mms.png"}"#,
        "\n",
        r#"{"id":"ausgang","name":"Ausgang","division_id":3,"points":1,"draws":1,"losses":1}"#,
        "\n",
        r#"{"id":"joonsquad","name":"Joonsquad","division_id":3}"#,
        "\n"
    );

    /// Season 5 with division 3 on disk, season 6 configured but empty.
    pub fn setup_state(dir: &Path) -> AppState {
        let season_dir = dir.join("seasons").join("season-5");
        std::fs::create_dir_all(&season_dir).unwrap();
        std::fs::write(season_dir.join("matches.json"), SEASON5_MATCHES).unwrap();
        std::fs::write(season_dir.join("teams.jsonl"), SEASON5_TEAMS).unwrap();
        std::fs::write(
            dir.join("lft_players.jsonl"),
            concat!(
                r#"{"name":"Old","roles":"Support","created_at":"2025-01-05T12:00:00Z"}"#,
                "\n",
                r#"{"name":"New","created_at":"2025-02-05T12:00:00Z"}"#,
                "\n"
            ),
        )
        .unwrap();

        let mut season5 = SeasonConfig::new(5);
        season5.name = Some("Season 5".to_string());
        season5.divisions = vec![1, 2, 3];
        season5.league_id = Some(18171);
        season5.team_names.insert("bdc", "BDC");
        season5.team_names.insert("mms", "M&M's");

        let mut season6 = SeasonConfig::new(6);
        season6.upcoming = true;

        let mut config = AppConfig::default();
        config.data_dir = dir.to_path_buf();
        config.league.seasons = vec![season5, season6];

        AppState::new(config, BracketBuilder::default())
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(dir: &Path, uri: &str) -> (StatusCode, Value) {
        get_json(build_router(setup_state(dir)), uri).await
    }
}
