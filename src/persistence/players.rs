use std::time::Duration;

use log::info;
use redis::{AsyncCommands, IntoConnectionInfo, aio::ConnectionManager};

use crate::persistence::{
    PlayerRepository, RecordFields, RecordKind, StoreResult, player_key_pattern, with_timeout,
};

pub struct PlayerRepositoryImpl {
    connection: ConnectionManager,
    timeout: Duration,
}

impl PlayerRepositoryImpl {
    pub async fn connect(url: &str, db: i64, timeout: Duration) -> StoreResult<Self> {
        let mut connection_info = url.into_connection_info()?;
        connection_info.redis.db = db;
        let client = redis::Client::open(connection_info)?;
        let connection = with_timeout(timeout, ConnectionManager::new(client)).await?;
        info!("Connected to redis (db {})", db);
        Ok(Self {
            connection,
            timeout,
        })
    }
}

#[async_trait::async_trait]
impl PlayerRepository for PlayerRepositoryImpl {
    async fn create_player(&self, key: &str, fields: &[(&str, String)]) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        with_timeout(self.timeout, conn.hset_multiple::<_, _, _, ()>(key, fields)).await
    }

    async fn get_player_keys(&self) -> StoreResult<Vec<String>> {
        let mut conn = self.connection.clone();
        with_timeout(self.timeout, conn.keys(player_key_pattern())).await
    }

    async fn get_record_kind(&self, key: &str) -> StoreResult<RecordKind> {
        let mut conn = self.connection.clone();
        let type_name: String =
            with_timeout(self.timeout, redis::cmd("TYPE").arg(key).query_async(&mut conn)).await?;
        Ok(RecordKind::from_type_name(&type_name))
    }

    async fn get_player_fields(&self, key: &str) -> StoreResult<RecordFields> {
        let mut conn = self.connection.clone();
        with_timeout(self.timeout, conn.hgetall(key)).await
    }
}

#[cfg(test)]
pub use mock::{MockPlayerRepository, MockRecord};

#[cfg(test)]
mod mock {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    use dashmap::{DashMap, DashSet};

    use crate::persistence::{
        PLAYER_KEY_PREFIX, PlayerRepository, RecordFields, RecordKind, StoreError, StoreResult,
    };

    #[derive(Clone, Debug)]
    pub enum MockRecord {
        Hash(RecordFields),
        Text(String),
    }

    /// In-memory stand-in for redis with switchable failures. Clones share
    /// state, so a test can keep one handle while the app owns another.
    #[derive(Clone, Default)]
    pub struct MockPlayerRepository {
        records: Arc<DashMap<String, MockRecord>>,
        fail_writes: Arc<AtomicBool>,
        fail_listing: Arc<AtomicBool>,
        unreadable_keys: Arc<DashSet<String>>,
        untypeable_keys: Arc<DashSet<String>>,
    }

    fn simulated_failure() -> StoreError {
        StoreError::Redis(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "simulated store failure",
        )))
    }

    impl MockPlayerRepository {
        pub fn insert(&self, key: &str, record: MockRecord) {
            self.records.insert(key.to_string(), record);
        }

        pub fn insert_hash(&self, key: &str, fields: &[(&str, &str)]) {
            let fields = fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            self.insert(key, MockRecord::Hash(fields));
        }

        pub fn record(&self, key: &str) -> Option<MockRecord> {
            self.records.get(key).map(|r| r.clone())
        }

        pub fn len(&self) -> usize {
            self.records.len()
        }

        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn set_fail_listing(&self, fail: bool) {
            self.fail_listing.store(fail, Ordering::SeqCst);
        }

        pub fn make_unreadable(&self, key: &str) {
            self.unreadable_keys.insert(key.to_string());
        }

        pub fn make_untypeable(&self, key: &str) {
            self.untypeable_keys.insert(key.to_string());
        }
    }

    #[async_trait::async_trait]
    impl PlayerRepository for MockPlayerRepository {
        async fn create_player(&self, key: &str, fields: &[(&str, String)]) -> StoreResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(simulated_failure());
            }
            let mut entry = self
                .records
                .entry(key.to_string())
                .or_insert_with(|| MockRecord::Hash(RecordFields::new()));
            if let MockRecord::Hash(existing) = entry.value_mut() {
                for (field, value) in fields {
                    existing.insert(field.to_string(), value.clone());
                }
            }
            Ok(())
        }

        async fn get_player_keys(&self) -> StoreResult<Vec<String>> {
            if self.fail_listing.load(Ordering::SeqCst) {
                return Err(simulated_failure());
            }
            Ok(self
                .records
                .iter()
                .map(|entry| entry.key().clone())
                .filter(|key| key.starts_with(PLAYER_KEY_PREFIX))
                .collect())
        }

        async fn get_record_kind(&self, key: &str) -> StoreResult<RecordKind> {
            if self.untypeable_keys.contains(key) {
                return Err(simulated_failure());
            }
            Ok(match self.records.get(key).as_deref() {
                Some(MockRecord::Hash(_)) => RecordKind::Hash,
                Some(MockRecord::Text(_)) => RecordKind::Other("string".to_string()),
                None => RecordKind::Missing,
            })
        }

        async fn get_player_fields(&self, key: &str) -> StoreResult<RecordFields> {
            if self.unreadable_keys.contains(key) {
                return Err(simulated_failure());
            }
            Ok(match self.records.get(key).as_deref() {
                Some(MockRecord::Hash(fields)) => fields.clone(),
                _ => RecordFields::new(),
            })
        }
    }
}
