//! Redis session revocation store

use crate::config::RedisConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;

/// Cache key prefixes
mod keys {
    pub const REVOKED_SESSION: &str = "owl:revoked_session";
}

fn revoked_session_key(session_id: &str) -> String {
    format!("{}:{}", keys::REVOKED_SESSION, session_id)
}

/// Operations the request pipeline needs from the cache
#[async_trait]
pub trait CacheOperations: Send + Sync {
    async fn ping(&self) -> Result<()>;
    /// Mark a session revoked until its token would have expired anyway
    async fn revoke_session(&self, session_id: &str, ttl: Duration) -> Result<()>;
    async fn is_session_revoked(&self, session_id: &str) -> Result<bool>;
}

/// Cache manager for Redis operations
#[derive(Clone)]
pub struct CacheManager {
    conn: ConnectionManager,
}

impl CacheManager {
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str()).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to create Redis client: {}", e))
        })?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to connect to Redis: {}", e))
        })?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheOperations for CacheManager {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn revoke_session(&self, session_id: &str, ttl: Duration) -> Result<()> {
        // SETEX rejects a zero TTL
        let secs = ttl.as_secs().max(1);
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(revoked_session_key(session_id), "1", secs)
            .await?;
        Ok(())
    }

    async fn is_session_revoked(&self, session_id: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(revoked_session_key(session_id)).await?;
        Ok(exists)
    }
}
