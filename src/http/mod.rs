use axum::{
    Router,
    routing::{get, post},
};
use log::info;
use tower_http::cors::CorsLayer;

use crate::app::AppState;

mod cards;
mod players;

pub const GREETING: &str = "Hello, this is a kitten deck backend server with CORS support!";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(greeting))
        .route("/store-username", post(players::store_username))
        .route("/get-all-usernames", get(players::get_all_usernames))
        .route("/get-random-cards", get(cards::get_random_cards))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn greeting() -> &'static str {
    GREETING
}

pub async fn run(
    state: AppState,
    address: &str,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;

    info!("HTTP server listening on {}", address);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP server shut down gracefully");
    Ok(())
}
