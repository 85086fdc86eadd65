use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::{
    app::{ServiceError, ServiceResult},
    persistence::{ArcPlayerRepository, RecordFields, RecordKind, StoreError, player_key},
};

pub type PlayerId = String;

/// A player as returned to clients. `total` is always derived from the
/// counters and never read from the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    #[serde(rename = "player")]
    pub name: String,
    pub wins: i64,
    pub losses: i64,
    pub total: i64,
    pub created: String,
}

impl PlayerRecord {
    pub fn from_fields(fields: &RecordFields) -> Self {
        let text = |name: &str| fields.get(name).cloned().unwrap_or_default();
        let wins = parse_counter(fields.get("wins").map(String::as_str));
        let losses = parse_counter(fields.get("losses").map(String::as_str));
        Self {
            id: text("id"),
            name: text("player"),
            wins,
            losses,
            total: wins.saturating_add(losses),
            created: text("created"),
        }
    }
}

/// Counters are read best-effort: anything missing or non-numeric counts as
/// zero instead of failing the record. Surrounding whitespace is not numeric.
pub fn parse_counter(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// Reasons a single record is dropped from a listing.
#[derive(Debug, Error)]
pub enum PartialRecordError {
    #[error("key {0} is not a hash (found {1})")]
    NotAHash(String, String),
    #[error("key {0} vanished before it could be read")]
    Missing(String),
    #[error("failed to check type of key {0}: {1}")]
    TypeLookup(String, StoreError),
    #[error("failed to read fields of key {0}: {1}")]
    FieldLookup(String, StoreError),
}

pub type ArcPlayerService = Arc<Box<dyn PlayerService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PlayerService {
    async fn store_player(&self, name: &str) -> ServiceResult<PlayerId>;
    async fn get_all_players(&self) -> ServiceResult<Vec<PlayerRecord>>;
}

pub struct PlayerServiceImpl {
    player_repository: ArcPlayerRepository,
}

impl PlayerServiceImpl {
    pub fn new(player_repository: ArcPlayerRepository) -> Self {
        Self { player_repository }
    }

    async fn fetch_record(&self, key: &str) -> Result<PlayerRecord, PartialRecordError> {
        let kind = self
            .player_repository
            .get_record_kind(key)
            .await
            .map_err(|e| PartialRecordError::TypeLookup(key.to_string(), e))?;
        match kind {
            RecordKind::Hash => {}
            RecordKind::Missing => return Err(PartialRecordError::Missing(key.to_string())),
            RecordKind::Other(found) => {
                return Err(PartialRecordError::NotAHash(key.to_string(), found));
            }
        }
        let fields = self
            .player_repository
            .get_player_fields(key)
            .await
            .map_err(|e| PartialRecordError::FieldLookup(key.to_string(), e))?;
        Ok(PlayerRecord::from_fields(&fields))
    }
}

fn new_player_id(now: &DateTime<Utc>) -> ServiceResult<PlayerId> {
    match now.timestamp_nanos_opt() {
        Some(nanos) => Ok(nanos.to_string()),
        None => ServiceError::internal("System clock is out of range"),
    }
}

#[async_trait::async_trait]
impl PlayerService for PlayerServiceImpl {
    async fn store_player(&self, name: &str) -> ServiceResult<PlayerId> {
        let now = Utc::now();
        let id = new_player_id(&now)?;
        let fields = [
            ("id", id.clone()),
            ("player", name.to_string()),
            ("wins", "0".to_string()),
            ("losses", "0".to_string()),
            ("created", now.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ];
        self.player_repository
            .create_player(&player_key(&id), &fields)
            .await
            .map_err(|e| {
                error!("Error storing player {}: {}", name, e);
                ServiceError::Store("Failed to store player".to_string(), e)
            })?;
        info!("Stored player {} with id {}", name, id);
        Ok(id)
    }

    async fn get_all_players(&self) -> ServiceResult<Vec<PlayerRecord>> {
        let keys = self
            .player_repository
            .get_player_keys()
            .await
            .map_err(|e| {
                error!("Error listing player keys: {}", e);
                ServiceError::Store("Failed to retrieve players".to_string(), e)
            })?;

        let mut players = Vec::with_capacity(keys.len());
        for key in keys {
            match self.fetch_record(&key).await {
                Ok(record) => players.push(record),
                Err(e) => warn!("Skipping player record: {}", e),
            }
        }
        debug!("Retrieved {} players", players.len());
        Ok(players)
    }
}
