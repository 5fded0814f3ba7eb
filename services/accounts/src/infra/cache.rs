use deadpool_redis::Pool;
use deadpool_redis::redis::{AsyncCommands, RedisError};

use crate::domain::repository::LookupCache;

#[derive(Clone)]
pub struct RedisLookupCache {
    pub pool: Pool,
}

fn cache_key(key: &str) -> String {
    format!("accounts:{}", key)
}

impl LookupCache for RedisLookupCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, key, "cache unavailable");
                return None;
            }
        };
        let value: Result<Option<String>, RedisError> = conn.get(cache_key(key)).await;
        value.unwrap_or_else(|e| {
            tracing::warn!(error = %e, key, "cache read failed");
            None
        })
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) {
        if ttl_secs == 0 {
            return;
        }
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, key, "cache unavailable");
                return;
            }
        };
        let result: Result<(), RedisError> = conn.set_ex(cache_key(key), value, ttl_secs).await;
        if let Err(e) = result {
            tracing::warn!(error = %e, key, "cache write failed");
        }
    }

    async fn remove(&self, key: &str) {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, key, "cache unavailable");
                return;
            }
        };
        let result: Result<(), RedisError> = conn.del(cache_key(key)).await;
        if let Err(e) = result {
            tracing::warn!(error = %e, key, "cache delete failed");
        }
    }
}
