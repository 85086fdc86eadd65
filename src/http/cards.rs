use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    app::AppState,
    deck::{Character, DECK_SIZE},
};

#[derive(Serialize)]
pub struct JsonCardsResponse {
    cards: [Character; DECK_SIZE],
}

pub async fn get_random_cards(State(app_state): State<AppState>) -> Json<JsonCardsResponse> {
    Json(JsonCardsResponse {
        cards: app_state.deck_generator.generate_deck(),
    })
}
