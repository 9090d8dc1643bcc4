//! Cache-accelerated facade over an S3-compatible bucket.
//!
//! [`StorageService`] composes an [`ObjectStore`] with a [`CacheClient`]:
//! signed URLs and object metadata are served cache-aside, writes and
//! deletes invalidate the derived cache entries, and object bodies always
//! come straight from the store.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use config::{AppConfig, StorageConfig};
pub use models::{ObjectMetadata, UploadRequest};
pub use services::cache::{CacheClient, CacheError, MemoryCache};
pub use services::memory_store::MemoryObjectStore;
pub use services::object_store::{ObjectStore, StoreError};
pub use services::redis_cache::RedisCache;
pub use services::s3_store::S3ObjectStore;
pub use services::storage_service::{FacadeError, FacadeResult, StorageService};
