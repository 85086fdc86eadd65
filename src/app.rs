use std::sync::Arc;

use axum::response::IntoResponse;
use thiserror::Error;

use crate::{
    deck::{ArcDeckGenerator, DeckGenerator},
    persistence::{ArcPlayerRepository, StoreError},
    player::{ArcPlayerService, PlayerServiceImpl},
};

#[derive(Clone)]
pub struct AppState {
    pub player_service: ArcPlayerService,
    pub deck_generator: ArcDeckGenerator,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0}: {1}")]
    Store(String, #[source] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn bad_request<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::BadRequest(msg.into()))
    }

    pub fn internal<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Internal(msg.into()))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        // Store details stay in the log; callers only see the summary.
        let (status, msg) = match self {
            ServiceError::BadRequest(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            ServiceError::Store(msg, _) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            ServiceError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub fn construct_app(
    player_repository: ArcPlayerRepository,
    deck_generator: DeckGenerator,
) -> AppState {
    let player_service: ArcPlayerService =
        Arc::new(Box::new(PlayerServiceImpl::new(player_repository)));

    AppState {
        player_service,
        deck_generator: Arc::new(deck_generator),
    }
}
