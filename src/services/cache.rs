//! Key-value cache abstraction and cache-key layout.
//!
//! The facade only needs string `get`/`set`/`expire`/`delete`. Cache errors
//! are never swallowed: a cache that is down aborts the calling operation.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Dispositions whose signed-URL entries are invalidated on delete.
pub const KNOWN_DISPOSITIONS: [&str; 2] = ["inline", "attachment"];

const METADATA_SUFFIX: &str = "metadata";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Redis(#[from] redis::RedisError),
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CacheClient: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` without a deadline; pair with [`CacheClient::expire`].
    async fn set(&self, key: &str, value: &str) -> CacheResult<()>;

    /// Give an existing key a time to live. Missing keys are ignored.
    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<()>;

    async fn delete(&self, key: &str) -> CacheResult<()>;
}

/// Cache key of a signed URL for `object_key` served with `disposition`.
pub fn signed_url_key(object_key: &str, disposition: &str) -> String {
    format!("{}_{}", object_key, disposition)
}

/// Cache key of the head-object projection of `object_key`.
pub fn metadata_key(object_key: &str) -> String {
    format!("{}_{}", object_key, METADATA_SUFFIX)
}

/// Every cache entry derived from `object_key` that a delete invalidates:
/// the raw key, the metadata entry and the signed URLs for the standard
/// dispositions.
pub fn derived_keys(object_key: &str) -> Vec<String> {
    let mut keys = Vec::with_capacity(2 + KNOWN_DISPOSITIONS.len());
    keys.push(object_key.to_string());
    keys.push(metadata_key(object_key));
    keys.extend(
        KNOWN_DISPOSITIONS
            .iter()
            .map(|disposition| signed_url_key(object_key, disposition)),
    );
    keys
}

#[derive(Debug)]
struct Entry {
    value: String,
    deadline: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.deadline.is_none_or(|deadline| now < deadline)
    }
}

/// In-process cache with per-entry deadlines, for local runs and tests.
///
/// Expired entries are dropped lazily on access.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CacheResult<std::sync::MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Unavailable("memory cache lock poisoned".into()))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|e| e.is_live(now)).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        self.lock()?.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                deadline: None,
            },
        );
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<()> {
        if let Some(entry) = self.lock()?.get_mut(key) {
            entry.deadline = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
