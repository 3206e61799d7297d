//! Redis session store
//!
//! One key per identity, `{prefix}:{user_id}`, holding the current refresh
//! token with the refresh lifetime as its TTL. Compare-and-swap and
//! compare-and-delete run as Lua scripts so the read and the write are a
//! single server-side step.

use std::sync::Arc;
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError, Script};

use crate::domain::repository::{SessionStore, StoreError};
use crate::domain::value_object::user_id::UserId;

const COMPARE_AND_SWAP: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[2], 'EX', ARGV[3])
    return 1
end
return 0
"#;

const COMPARE_AND_DELETE: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('DEL', KEYS[1])
    return 1
end
return 0
"#;

#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    key_prefix: String,
    cas_script: Arc<Script>,
    cad_script: Arc<Script>,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
            cas_script: Arc::new(Script::new(COMPARE_AND_SWAP)),
            cad_script: Arc::new(Script::new(COMPARE_AND_DELETE)),
        }
    }

    /// Open a managed connection that reconnects on its own
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let conn = ConnectionManager::new(client).await.map_err(unavailable)?;
        Ok(Self::new(conn, key_prefix))
    }

    fn key(&self, user_id: &UserId) -> String {
        session_key(&self.key_prefix, user_id)
    }
}

pub fn session_key(prefix: &str, user_id: &UserId) -> String {
    format!("{prefix}:{user_id}")
}

fn unavailable(err: RedisError) -> StoreError {
    tracing::error!(error = %err, "Redis session store error");
    StoreError::Unavailable(err.to_string())
}

/// Redis rejects `EX 0`
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

impl SessionStore for RedisSessionStore {
    async fn save(
        &self,
        user_id: &UserId,
        refresh_token: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(self.key(user_id), refresh_token, ttl_secs(ttl))
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn get(&self, user_id: &UserId) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let token: Option<String> = conn.get(self.key(user_id)).await.map_err(unavailable)?;
        Ok(token)
    }

    async fn remove(&self, user_id: &UserId) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(self.key(user_id)).await.map_err(unavailable)?;
        Ok(())
    }

    async fn remove_if(&self, user_id: &UserId, expected: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let deleted: i64 = self
            .cad_script
            .key(self.key(user_id))
            .arg(expected)
            .invoke_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(deleted == 1)
    }

    async fn compare_and_swap(
        &self,
        user_id: &UserId,
        expected: &str,
        replacement: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let swapped: i64 = self
            .cas_script
            .key(self.key(user_id))
            .arg(expected)
            .arg(replacement)
            .arg(ttl_secs(ttl))
            .invoke_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(swapped == 1)
    }
}
