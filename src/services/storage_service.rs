//! src/services/storage_service.rs
//!
//! StorageService — cache-accelerated facade over one object-store bucket.
//! Signed URLs and head-object metadata are served cache-aside with a fixed
//! TTL; object bodies are never cached. A missing object reads as an empty
//! result; other store failures and all cache failures propagate.

use crate::config::{ONE_DAY, StorageConfig};
use crate::models::{
    DEFAULT_CONTENT_TYPE, DEFAULT_STORAGE_CLASS, ObjectMetadata, PutObject, UploadRequest,
    computed_metadata, merge_metadata,
};
use crate::services::cache::{
    CacheClient, CacheError, derived_keys, metadata_key, signed_url_key,
};
use crate::services::object_store::{ObjectStore, StoreError, StoreResult};
use bytes::Bytes;
use std::{collections::HashMap, io, path::Path, sync::Arc, time::Duration};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Errors the facade lets through. A missing object is not one of them: reads
/// turn `StoreError::NotFound` into `None` or empty metadata.
#[derive(Debug, Error)]
pub enum FacadeError {
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("object store unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("no object key given and none could be derived from the upload")]
    MissingObjectKey,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to serialize cache entry: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type FacadeResult<T> = Result<T, FacadeError>;

/// StorageService provides the facade operations:
/// - signed download URLs, cached per (key, disposition)
/// - object metadata, cached per key
/// - uploads from memory or from a local path, with computed metadata
/// - delete, replace, list and fetch straight against the store
///
/// Concurrent misses for the same key are not coordinated: each caller hits
/// the store and writes the cache, last writer wins.
#[derive(Clone)]
pub struct StorageService {
    store: Arc<dyn ObjectStore>,
    cache: Arc<dyn CacheClient>,
    /// Validity baked into generated URLs.
    signed_url_expiration: Duration,
    /// TTL of every cache entry the facade writes. Never exceeds
    /// `signed_url_expiration`.
    cache_ttl: Duration,
}

impl StorageService {
    /// Create a facade with the default windows: URLs valid for two days,
    /// cache entries kept for one.
    pub fn new(store: Arc<dyn ObjectStore>, cache: Arc<dyn CacheClient>) -> Self {
        Self {
            store,
            cache,
            signed_url_expiration: 2 * ONE_DAY,
            cache_ttl: ONE_DAY,
        }
    }

    pub fn from_config(
        store: Arc<dyn ObjectStore>,
        cache: Arc<dyn CacheClient>,
        cfg: &StorageConfig,
    ) -> Self {
        Self::new(store, cache).with_ttls(cfg.signed_url_expiration, cfg.cache_ttl)
    }

    /// Override both windows. A cache TTL longer than the URL validity is
    /// clamped down so a cached URL cannot outlive itself.
    pub fn with_ttls(mut self, signed_url_expiration: Duration, cache_ttl: Duration) -> Self {
        if cache_ttl > signed_url_expiration {
            warn!(
                "cache TTL {:?} exceeds signed URL validity {:?}; clamping",
                cache_ttl, signed_url_expiration
            );
        }
        self.signed_url_expiration = signed_url_expiration;
        self.cache_ttl = cache_ttl.min(signed_url_expiration);
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn signed_url_expiration(&self) -> Duration {
        self.signed_url_expiration
    }

    /// Generate a signed GET URL straight from the store, bypassing the cache.
    ///
    /// Returns `None` (and logs) when the store rejects the request.
    pub async fn create_signed_url(
        &self,
        key: &str,
        expires_in: Duration,
        disposition: &str,
    ) -> Option<String> {
        match self.store.presign_get(key, expires_in, disposition).await {
            Ok(url) => Some(url),
            Err(err) => {
                error!(key, disposition, error = %err, "failed to create signed url");
                None
            }
        }
    }

    /// Cache-aside signed URL lookup.
    ///
    /// A hit is returned as-is; the cache TTL being shorter than the URL
    /// validity is what keeps it usable. On a miss a fresh URL is generated
    /// and cached. Failed generations are not cached, so the next call
    /// retries the store: a missing object gives `Ok(None)`, any other store
    /// failure `FacadeError::Store`.
    pub async fn get_signed_url(
        &self,
        key: &str,
        disposition: &str,
    ) -> FacadeResult<Option<String>> {
        let cache_key = signed_url_key(key, disposition);
        if let Some(url) = self.cache.get(&cache_key).await?.filter(|v| !v.is_empty()) {
            debug!(cache_key = %cache_key, "signed url cache hit");
            return Ok(Some(url));
        }

        debug!(cache_key = %cache_key, "signed url cache miss");
        match self
            .store
            .presign_get(key, self.signed_url_expiration, disposition)
            .await
        {
            Ok(url) => {
                self.cache_with_ttl(&cache_key, &url).await?;
                Ok(Some(url))
            }
            Err(StoreError::NotFound { .. }) => {
                warn!(cache_key = %cache_key, "no object to sign; not caching the miss");
                Ok(None)
            }
            Err(err) => {
                error!(cache_key = %cache_key, error = %err, "failed to create signed url");
                Err(err.into())
            }
        }
    }

    /// Cache-aside head-object lookup.
    ///
    /// A missing object yields the empty projection, other store failures
    /// are returned. Neither is cached.
    pub async fn get_metadata(&self, key: &str) -> FacadeResult<ObjectMetadata> {
        let cache_key = metadata_key(key);
        if let Some(raw) = self.cache.get(&cache_key).await? {
            match serde_json::from_str::<ObjectMetadata>(&raw) {
                Ok(meta) => {
                    debug!(cache_key = %cache_key, "metadata cache hit");
                    return Ok(meta);
                }
                Err(err) => {
                    warn!(cache_key = %cache_key, error = %err, "discarding unreadable metadata cache entry");
                }
            }
        }

        let meta = match self.store.head_object(key).await {
            Ok(meta) => meta,
            Err(StoreError::NotFound { .. }) => {
                debug!(key, "no metadata for missing object");
                return Ok(ObjectMetadata::default());
            }
            Err(err) => {
                error!(key, error = %err, "failed to fetch object metadata");
                return Err(err.into());
            }
        };

        let serialized = serde_json::to_string(&meta)?;
        self.cache_with_ttl(&cache_key, &serialized).await?;
        Ok(meta)
    }

    /// Upload an in-memory payload.
    ///
    /// The key is the explicit one, else the base name of the source file.
    /// Stored metadata is `filesize`, `extension` and `name` computed from
    /// the key, overlaid with the caller's entries (caller wins).
    ///
    /// Returns the key written, or `None` when the store rejected the write.
    pub async fn upload(&self, request: UploadRequest) -> FacadeResult<Option<String>> {
        let key = request.resolve_key().ok_or(FacadeError::MissingObjectKey)?;
        let content_type = request
            .content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let metadata = merge_metadata(
            computed_metadata(&key, request.content.len()),
            request.metadata,
        );

        self.put(PutObject {
            key,
            body: request.content,
            content_type,
            storage_class: request.storage_class,
            metadata,
        })
        .await
    }

    /// Upload a local file. The key defaults to the path itself and the
    /// content type is guessed from the key's extension.
    ///
    /// Local read failures are returned; store failures are logged.
    pub async fn upload_from_path(
        &self,
        path: impl AsRef<Path>,
        key: Option<&str>,
        metadata: Option<HashMap<String, String>>,
    ) -> FacadeResult<Option<String>> {
        let path = path.as_ref();
        let key = key
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let content = fs::read(path).await?;
        let content_type = mime_guess::from_path(&key)
            .first_raw()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let metadata = merge_metadata(
            computed_metadata(&key, content.len()),
            metadata.unwrap_or_default(),
        );

        self.put(PutObject {
            key,
            body: Bytes::from(content),
            content_type,
            storage_class: DEFAULT_STORAGE_CLASS.to_string(),
            metadata,
        })
        .await
    }

    /// Write to the store and drop the now stale metadata entry.
    async fn put(&self, object: PutObject) -> FacadeResult<Option<String>> {
        let key = object.key.clone();
        let size = object.body.len();
        if let Err(err) = self.store.put_object(object).await {
            error!(key = %key, error = %err, "failed to upload object");
            return Ok(None);
        }

        self.cache.delete(&metadata_key(&key)).await?;
        info!(key = %key, size, backend = self.store.name(), "uploaded object");
        Ok(Some(key))
    }

    /// Invalidate the cache entries derived from `key`, then delete the
    /// object.
    ///
    /// Signed URLs cached for dispositions other than `inline` and
    /// `attachment` are not tracked and stay until their TTL.
    pub async fn delete(&self, key: &str) -> FacadeResult<()> {
        for cache_key in derived_keys(key) {
            self.cache.delete(&cache_key).await?;
        }

        match self.store.delete_object(key).await {
            Ok(()) => info!(key, "deleted object"),
            Err(err) => error!(key, error = %err, "failed to delete object"),
        }
        Ok(())
    }

    /// Delete `old_key`, then upload `request` under `new_key`.
    ///
    /// Not atomic: if the upload fails after the delete, the object is gone.
    pub async fn replace(
        &self,
        request: UploadRequest,
        old_key: &str,
        new_key: &str,
    ) -> FacadeResult<Option<String>> {
        self.delete(old_key).await?;
        let written = self.upload(request.key(new_key)).await?;
        if written.is_none() {
            error!(old_key, new_key, "replace lost the object: delete succeeded, upload failed");
        }
        Ok(written)
    }

    /// All keys in the bucket; empty when the bucket is empty or the store
    /// cannot be listed.
    pub async fn list(&self) -> Vec<String> {
        match self.store.list_objects().await {
            Ok(keys) => keys,
            Err(err) => {
                error!(error = %err, "failed to list bucket");
                Vec::new()
            }
        }
    }

    /// Object body straight from the store; `None` if there is no such
    /// object.
    pub async fn fetch(&self, key: &str) -> FacadeResult<Option<Bytes>> {
        match self.store.get_object(key).await {
            Ok(body) => Ok(Some(body)),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(err) => {
                error!(key, error = %err, "failed to fetch object");
                Err(err.into())
            }
        }
    }

    /// Round-trip a throwaway key through the cache.
    pub async fn check_cache(&self) -> FacadeResult<()> {
        let key = format!(".readyz-{}", Uuid::new_v4());
        self.cache.set(&key, "readyz").await?;
        self.cache.expire(&key, Duration::from_secs(60)).await?;
        let value = self.cache.get(&key).await?;
        self.cache.delete(&key).await?;
        if value.as_deref() != Some("readyz") {
            return Err(CacheError::Unavailable("cache read back a different value".into()).into());
        }
        Ok(())
    }

    /// One request against the bucket; never walks the listing.
    pub async fn check_store(&self) -> StoreResult<()> {
        self.store.ping().await
    }

    async fn cache_with_ttl(&self, key: &str, value: &str) -> FacadeResult<()> {
        self.cache.set(key, value).await?;
        self.cache.expire(key, self.cache_ttl).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::{MemoryCache, MockCacheClient};
    use crate::services::object_store::MockObjectStore;

    fn service(store: MockObjectStore, cache: Arc<MemoryCache>) -> StorageService {
        StorageService::new(Arc::new(store), cache)
    }

    fn not_found(key: &str) -> StoreError {
        StoreError::NotFound {
            key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn signed_url_is_served_from_cache_on_second_call() {
        let mut store = MockObjectStore::new();
        store
            .expect_presign_get()
            .times(1)
            .returning(|key, expires, disposition| {
                assert_eq!(expires, Duration::from_secs(2 * 86_400));
                Ok(format!("https://s3.local/{}?d={}", key, disposition))
            });
        let cache = Arc::new(MemoryCache::new());
        let svc = service(store, cache.clone());

        let first = svc.get_signed_url("a.pdf", "inline").await.unwrap();
        let second = svc.get_signed_url("a.pdf", "inline").await.unwrap();
        assert_eq!(first.as_deref(), Some("https://s3.local/a.pdf?d=inline"));
        assert_eq!(first, second);
        assert_eq!(
            cache.get("a.pdf_inline").await.unwrap().as_deref(),
            Some("https://s3.local/a.pdf?d=inline")
        );
    }

    #[tokio::test]
    async fn signed_url_for_missing_object_is_none_and_not_cached() {
        let mut store = MockObjectStore::new();
        store
            .expect_presign_get()
            .times(2)
            .returning(|key, _, _| Err(not_found(key)));
        let cache = Arc::new(MemoryCache::new());
        let svc = service(store, cache.clone());

        assert_eq!(svc.get_signed_url("a.pdf", "inline").await.unwrap(), None);
        assert_eq!(svc.get_signed_url("a.pdf", "inline").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn denied_signed_url_is_an_error_and_not_cached() {
        let mut store = MockObjectStore::new();
        store
            .expect_presign_get()
            .times(2)
            .returning(|key, _, _| Err(StoreError::PermissionDenied { key: key.into() }));
        let cache = Arc::new(MemoryCache::new());
        let svc = service(store, cache.clone());

        for _ in 0..2 {
            assert!(matches!(
                svc.get_signed_url("a.pdf", "inline").await,
                Err(FacadeError::Store(StoreError::PermissionDenied { .. }))
            ));
        }
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn create_signed_url_swallows_store_errors() {
        let mut store = MockObjectStore::new();
        store
            .expect_presign_get()
            .returning(|_, _, _| Err(StoreError::Presign("expiry too long".into())));
        let svc = service(store, Arc::new(MemoryCache::new()));

        let url = svc
            .create_signed_url("a.pdf", Duration::from_secs(30 * 86_400), "inline")
            .await;
        assert_eq!(url, None);
    }

    #[tokio::test]
    async fn metadata_is_fetched_once_within_ttl() {
        let mut store = MockObjectStore::new();
        store.expect_head_object().times(1).returning(|_| {
            Ok(ObjectMetadata {
                content_length: Some(10),
                content_type: Some("application/pdf".into()),
                ..Default::default()
            })
        });
        let cache = Arc::new(MemoryCache::new());
        let svc = service(store, cache.clone());

        let first = svc.get_metadata("a.pdf").await.unwrap();
        let second = svc.get_metadata("a.pdf").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.content_length, Some(10));
        assert!(cache.get("a.pdf_metadata").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn metadata_of_missing_object_is_empty_and_not_cached() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_object()
            .times(2)
            .returning(|key| Err(not_found(key)));
        let cache = Arc::new(MemoryCache::new());
        let svc = service(store, cache.clone());

        assert!(svc.get_metadata("missing").await.unwrap().is_empty());
        assert!(svc.get_metadata("missing").await.unwrap().is_empty());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn metadata_request_failure_is_an_error_and_not_cached() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_object()
            .times(1)
            .returning(|_| Err(StoreError::Request("connection reset".into())));
        let cache = Arc::new(MemoryCache::new());
        let svc = service(store, cache.clone());

        assert!(matches!(
            svc.get_metadata("a.pdf").await,
            Err(FacadeError::Store(StoreError::Request(_)))
        ));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn unreadable_metadata_entry_counts_as_miss() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_object()
            .times(1)
            .returning(|_| Ok(ObjectMetadata {
                etag: Some("\"abc\"".into()),
                ..Default::default()
            }));
        let cache = Arc::new(MemoryCache::new());
        cache.set("a.pdf_metadata", "not json").await.unwrap();
        let svc = service(store, cache.clone());

        let meta = svc.get_metadata("a.pdf").await.unwrap();
        assert_eq!(meta.etag.as_deref(), Some("\"abc\""));
    }

    #[tokio::test]
    async fn cache_failures_propagate_before_touching_the_store() {
        let mut store = MockObjectStore::new();
        store.expect_presign_get().times(0);
        store.expect_head_object().times(0);
        let mut cache = MockCacheClient::new();
        cache
            .expect_get()
            .returning(|_| Err(CacheError::Unavailable("connection refused".into())));
        let svc = StorageService::new(Arc::new(store), Arc::new(cache));

        assert!(matches!(
            svc.get_signed_url("a.pdf", "inline").await,
            Err(FacadeError::Cache(_))
        ));
        assert!(matches!(
            svc.get_metadata("a.pdf").await,
            Err(FacadeError::Cache(_))
        ));
    }

    #[tokio::test]
    async fn upload_merges_computed_and_caller_metadata() {
        let mut store = MockObjectStore::new();
        store
            .expect_put_object()
            .withf(|obj: &PutObject| {
                obj.key == "report.pdf"
                    && obj.content_type == "application/octet-stream"
                    && obj.storage_class == "COLD"
                    && obj.metadata.get("filesize").map(String::as_str) == Some("4")
                    && obj.metadata.get("extension").map(String::as_str) == Some("pdf")
                    && obj.metadata.get("name").map(String::as_str) == Some("final")
                    && obj.metadata.get("author").map(String::as_str) == Some("alice")
            })
            .times(1)
            .returning(|_| Ok(()));
        store.expect_name().return_const("mock");
        let svc = service(store, Arc::new(MemoryCache::new()));

        let request = UploadRequest::new("%PDF")
            .file_name("/home/alice/report.pdf")
            .storage_class("COLD")
            .metadata(HashMap::from([
                ("author".to_string(), "alice".to_string()),
                ("name".to_string(), "final".to_string()),
            ]));
        let written = svc.upload(request).await.unwrap();
        assert_eq!(written.as_deref(), Some("report.pdf"));
    }

    #[tokio::test]
    async fn upload_invalidates_cached_metadata() {
        let mut store = MockObjectStore::new();
        store.expect_put_object().returning(|_| Ok(()));
        store.expect_name().return_const("mock");
        let cache = Arc::new(MemoryCache::new());
        cache.set("a.txt_metadata", "{}").await.unwrap();
        let svc = service(store, cache.clone());

        svc.upload(UploadRequest::new("new").key("a.txt"))
            .await
            .unwrap();
        assert_eq!(cache.get("a.txt_metadata").await.unwrap(), None);
    }

    #[tokio::test]
    async fn upload_without_a_key_is_rejected() {
        let mut store = MockObjectStore::new();
        store.expect_put_object().times(0);
        let svc = service(store, Arc::new(MemoryCache::new()));

        assert!(matches!(
            svc.upload(UploadRequest::new("bytes")).await,
            Err(FacadeError::MissingObjectKey)
        ));
    }

    #[tokio::test]
    async fn upload_store_failure_is_logged_not_raised() {
        let mut store = MockObjectStore::new();
        store
            .expect_put_object()
            .returning(|_| Err(StoreError::Request("throttled".into())));
        let svc = service(store, Arc::new(MemoryCache::new()));

        let written = svc
            .upload(UploadRequest::new("x").key("a.txt"))
            .await
            .unwrap();
        assert_eq!(written, None);
    }

    #[tokio::test]
    async fn upload_from_path_guesses_content_type_from_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();
        let expected_key = path.to_string_lossy().into_owned();

        let mut store = MockObjectStore::new();
        let key_check = expected_key.clone();
        store
            .expect_put_object()
            .withf(move |obj: &PutObject| {
                obj.key == key_check
                    && obj.content_type == "application/pdf"
                    && obj.storage_class == "STANDARD"
                    && obj.metadata.get("filesize").map(String::as_str) == Some("8")
            })
            .times(1)
            .returning(|_| Ok(()));
        store
            .expect_put_object()
            .withf(|obj: &PutObject| {
                obj.key == "blobs/data.zzunknown"
                    && obj.content_type == "application/octet-stream"
                    && obj.metadata.get("owner").map(String::as_str) == Some("ops")
            })
            .times(1)
            .returning(|_| Ok(()));
        store.expect_name().return_const("mock");
        let svc = service(store, Arc::new(MemoryCache::new()));

        let written = svc.upload_from_path(&path, None, None).await.unwrap();
        assert_eq!(written, Some(expected_key));

        let owner = HashMap::from([("owner".to_string(), "ops".to_string())]);
        svc.upload_from_path(&path, Some("blobs/data.zzunknown"), Some(owner))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn upload_from_missing_path_returns_io_error() {
        let mut store = MockObjectStore::new();
        store.expect_put_object().times(0);
        let svc = service(store, Arc::new(MemoryCache::new()));

        let result = svc
            .upload_from_path("/definitely/not/here.txt", None, None)
            .await;
        assert!(matches!(result, Err(FacadeError::Io(_))));
    }

    #[tokio::test]
    async fn delete_invalidates_derived_entries_even_if_store_fails() {
        let mut store = MockObjectStore::new();
        store
            .expect_delete_object()
            .times(1)
            .returning(|_| Err(StoreError::Request("timeout".into())));
        let cache = Arc::new(MemoryCache::new());
        for key in ["a.pdf", "a.pdf_metadata", "a.pdf_inline", "a.pdf_attachment"] {
            cache.set(key, "x").await.unwrap();
        }
        cache.set("a.pdf_attachment; filename=a.pdf", "x").await.unwrap();
        let svc = service(store, cache.clone());

        svc.delete("a.pdf").await.unwrap();
        assert_eq!(cache.len(), 1);
        assert!(
            cache
                .get("a.pdf_attachment; filename=a.pdf")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn replace_deletes_old_then_uploads_new() {
        let mut seq = mockall::Sequence::new();
        let mut store = MockObjectStore::new();
        store
            .expect_delete_object()
            .withf(|key: &str| key == "old.txt")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        store
            .expect_put_object()
            .withf(|obj: &PutObject| obj.key == "new.txt")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        store.expect_name().return_const("mock");
        let svc = service(store, Arc::new(MemoryCache::new()));

        let written = svc
            .replace(UploadRequest::new("v2"), "old.txt", "new.txt")
            .await
            .unwrap();
        assert_eq!(written.as_deref(), Some("new.txt"));
    }

    #[tokio::test]
    async fn list_degrades_and_fetch_tells_missing_from_failing() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|| Err(StoreError::Request("unreachable".into())));
        store
            .expect_get_object()
            .withf(|key: &str| key == "a.txt")
            .returning(|key| Err(not_found(key)));
        store
            .expect_get_object()
            .withf(|key: &str| key == "secret.txt")
            .returning(|key| Err(StoreError::PermissionDenied { key: key.into() }));
        let svc = service(store, Arc::new(MemoryCache::new()));

        assert!(svc.list().await.is_empty());
        assert_eq!(svc.fetch("a.txt").await.unwrap(), None);
        assert!(matches!(
            svc.fetch("secret.txt").await,
            Err(FacadeError::Store(StoreError::PermissionDenied { .. }))
        ));
    }

    #[tokio::test]
    async fn cache_ttl_is_clamped_to_url_validity() {
        let svc = service(MockObjectStore::new(), Arc::new(MemoryCache::new()))
            .with_ttls(Duration::from_secs(600), Duration::from_secs(3600));
        assert_eq!(svc.signed_url_expiration(), Duration::from_secs(600));
        assert_eq!(svc.cache_ttl(), Duration::from_secs(600));
    }

    #[tokio::test]
    async fn readiness_checks_use_a_single_store_request() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().times(0);
        store.expect_ping().times(1).returning(|| Ok(()));
        let cache = Arc::new(MemoryCache::new());
        let svc = service(store, cache.clone());

        svc.check_cache().await.unwrap();
        svc.check_store().await.unwrap();
        assert!(cache.is_empty());
    }
}
