use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use thiserror::Error;

pub mod players;

pub type StoreResult<T> = Result<T, StoreError>;

pub type ArcPlayerRepository = Arc<Box<dyn PlayerRepository + Send + Sync + 'static>>;

pub const PLAYER_KEY_PREFIX: &str = "player:";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

/// Store-level classification of a key, as reported by `TYPE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    Hash,
    Other(String),
    Missing,
}

impl RecordKind {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "hash" => RecordKind::Hash,
            "none" => RecordKind::Missing,
            other => RecordKind::Other(other.to_string()),
        }
    }
}

/// Flat string fields of one stored hash record.
pub type RecordFields = HashMap<String, String>;

#[async_trait::async_trait]
pub trait PlayerRepository {
    async fn create_player(&self, key: &str, fields: &[(&str, String)]) -> StoreResult<()>;
    async fn get_player_keys(&self) -> StoreResult<Vec<String>>;
    async fn get_record_kind(&self, key: &str) -> StoreResult<RecordKind>;
    async fn get_player_fields(&self, key: &str) -> StoreResult<RecordFields>;
}

pub fn player_key(id: &str) -> String {
    format!("{}{}", PLAYER_KEY_PREFIX, id)
}

pub fn player_key_pattern() -> String {
    format!("{}*", PLAYER_KEY_PREFIX)
}

/// Runs a store call under the configured deadline.
pub async fn with_timeout<T, F>(timeout: Duration, call: F) -> StoreResult<T>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(StoreError::Redis),
        Err(_) => Err(StoreError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kind_from_type_name() {
        assert_eq!(RecordKind::from_type_name("hash"), RecordKind::Hash);
        assert_eq!(RecordKind::from_type_name("none"), RecordKind::Missing);
        assert_eq!(
            RecordKind::from_type_name("string"),
            RecordKind::Other("string".to_string())
        );
    }

    #[test]
    fn test_player_keys() {
        assert_eq!(player_key("42"), "player:42");
        assert_eq!(player_key_pattern(), "player:*");
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result: StoreResult<()> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<(), redis::RedisError>(())
        })
        .await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_result() {
        let result =
            with_timeout(Duration::from_secs(1), async { Ok::<_, redis::RedisError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
