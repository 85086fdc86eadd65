use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::{AppState, ServiceError, ServiceResult},
    player::PlayerRecord,
};

#[derive(Deserialize, Validate)]
pub struct JsonStorePlayerRequest {
    #[validate(length(min = 1, message = "player must not be empty"))]
    player: String,
}

#[derive(Serialize)]
pub struct JsonMessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
pub struct JsonPlayersResponse {
    players: Vec<PlayerRecord>,
}

pub async fn store_username(
    State(app_state): State<AppState>,
    body: Result<Json<JsonStorePlayerRequest>, JsonRejection>,
) -> ServiceResult<Json<JsonMessageResponse>> {
    let Json(request) = body.map_err(|e| ServiceError::BadRequest(e.body_text()))?;
    if let Err(e) = request.validate() {
        return ServiceError::bad_request(format!("Invalid request: {}", e));
    }

    app_state.player_service.store_player(&request.player).await?;

    Ok(Json(JsonMessageResponse {
        message: "player stored successfully",
    }))
}

pub async fn get_all_usernames(
    State(app_state): State<AppState>,
) -> ServiceResult<Json<JsonPlayersResponse>> {
    let players = app_state.player_service.get_all_players().await?;
    Ok(Json(JsonPlayersResponse { players }))
}
