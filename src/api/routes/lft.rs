use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::LftPlayer;

#[derive(Debug, Serialize)]
pub struct LftEntry {
    #[serde(flatten)]
    pub player: LftPlayer,

    /// Roles joined for display, "Flexible" when none
    pub roles_label: String,

    pub steam_link: Option<String>,
    pub dotabuff_link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LftResponse {
    pub players: Vec<LftEntry>,
}

/// Looking-for-team sign-ups, newest first.
pub async fn list_lft_players(
    State(state): State<AppState>,
) -> Result<Json<LftResponse>, ApiError> {
    let players = state
        .store
        .read_lft_players()?
        .into_iter()
        .map(|player| LftEntry {
            roles_label: player.roles_label(),
            steam_link: player.steam_link().map(str::to_string),
            dotabuff_link: player.dotabuff_link().map(str::to_string),
            player,
        })
        .collect();

    Ok(Json(LftResponse { players }))
}
