//! Object store abstraction used by the facade.
//!
//! The facade depends on seven calls only: put, get, head, delete, list,
//! presigned-URL generation and a reachability check. Implementations: [`S3ObjectStore`] for any
//! S3-compatible service and [`MemoryObjectStore`] for local runs and tests.
//!
//! [`S3ObjectStore`]: crate::services::s3_store::S3ObjectStore
//! [`MemoryObjectStore`]: crate::services::memory_store::MemoryObjectStore

use crate::models::{ObjectMetadata, PutObject};
use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object `{key}` not found")]
    NotFound { key: String },
    #[error("access to object `{key}` denied")]
    PermissionDenied { key: String },
    #[error("store request failed: {0}")]
    Request(String),
    #[error("failed to read object body: {0}")]
    Body(String),
    #[error("failed to presign request: {0}")]
    Presign(String),
    #[error("invalid store configuration: {0}")]
    Config(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operations the facade needs from an object store bound to one bucket.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write (or fully replace) an object.
    async fn put_object(&self, object: PutObject) -> StoreResult<()>;

    /// Read the full object body.
    async fn get_object(&self, key: &str) -> StoreResult<Bytes>;

    /// Fetch object metadata without the body.
    async fn head_object(&self, key: &str) -> StoreResult<ObjectMetadata>;

    async fn delete_object(&self, key: &str) -> StoreResult<()>;

    /// Every key in the bucket. An empty bucket is `Ok(vec![])`.
    async fn list_objects(&self) -> StoreResult<Vec<String>>;

    /// Generate a time-limited GET URL that answers with the given
    /// `Content-Disposition`.
    async fn presign_get(
        &self,
        key: &str,
        expires_in: Duration,
        disposition: &str,
    ) -> StoreResult<String>;

    /// Single cheap request proving the bucket is reachable with the
    /// configured credentials. Must not enumerate the bucket.
    async fn ping(&self) -> StoreResult<()>;

    /// Backend identifier for logging.
    fn name(&self) -> &'static str;
}
