//! Redis-backed [`CacheClient`].

use crate::services::cache::{CacheClient, CacheResult};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::info;

/// Redis always listens on the conventional port; only the host is configurable.
pub const REDIS_PORT: u16 = 6379;

/// Cache client over a multiplexed, auto-reconnecting Redis connection.
///
/// No auth and no TLS. Responses are decoded to UTF-8 strings.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(host: &str) -> CacheResult<Self> {
        let url = redis_url(host);
        let client = redis::Client::open(url.as_str())?;
        let conn = ConnectionManager::new(client).await?;
        info!("Connected to redis at {}", url);
        Ok(Self { conn })
    }
}

fn redis_url(host: &str) -> String {
    format!("redis://{}:{}/", host, REDIS_PORT)
}

#[async_trait]
impl CacheClient for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value = conn.get::<_, Option<String>>(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        conn.expire::<_, ()>(key, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}
