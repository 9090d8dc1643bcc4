//! In-memory object store for local development and tests.

use crate::models::{ObjectMetadata, PutObject};
use crate::services::object_store::{ObjectStore, StoreError, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::time::Duration;

#[derive(Clone, Debug)]
struct StoredObject {
    body: Bytes,
    content_type: String,
    storage_class: String,
    metadata: HashMap<String, String>,
    etag: String,
    last_modified: DateTime<Utc>,
}

/// Objects are kept in key order so listings come back sorted, like S3.
///
/// Data does not survive the process.
#[derive(Debug)]
pub struct MemoryObjectStore {
    bucket: String,
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    fn poisoned() -> StoreError {
        StoreError::Request("memory store lock poisoned".into())
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new("local")
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, object: PutObject) -> StoreResult<()> {
        let etag = format!("\"{:x}\"", md5::compute(&object.body));
        let stored = StoredObject {
            body: object.body,
            content_type: object.content_type,
            storage_class: object.storage_class,
            metadata: object.metadata,
            etag,
            last_modified: Utc::now(),
        };
        self.objects
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(object.key, stored);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> StoreResult<Bytes> {
        self.objects
            .read()
            .map_err(|_| Self::poisoned())?
            .get(key)
            .map(|obj| obj.body.clone())
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }

    async fn head_object(&self, key: &str) -> StoreResult<ObjectMetadata> {
        let objects = self.objects.read().map_err(|_| Self::poisoned())?;
        let obj = objects.get(key).ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })?;
        Ok(ObjectMetadata {
            content_length: Some(obj.body.len() as i64),
            content_type: Some(obj.content_type.clone()),
            last_modified: Some(obj.last_modified),
            etag: Some(obj.etag.clone()),
            storage_class: Some(obj.storage_class.clone()),
            metadata: obj.metadata.clone(),
        })
    }

    /// Deleting a missing key succeeds, as it does on S3.
    async fn delete_object(&self, key: &str) -> StoreResult<()> {
        self.objects
            .write()
            .map_err(|_| Self::poisoned())?
            .remove(key);
        Ok(())
    }

    async fn list_objects(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .objects
            .read()
            .map_err(|_| Self::poisoned())?
            .keys()
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.objects
            .read()
            .map(|_| ())
            .map_err(|_| Self::poisoned())
    }

    async fn presign_get(
        &self,
        key: &str,
        expires_in: Duration,
        disposition: &str,
    ) -> StoreResult<String> {
        if !self
            .objects
            .read()
            .map_err(|_| Self::poisoned())?
            .contains_key(key)
        {
            return Err(StoreError::NotFound {
                key: key.to_string(),
            });
        }
        Ok(format!(
            "memory://{}/{}?response-content-disposition={}&X-Expires={}",
            self.bucket,
            key,
            urlencoding::encode(disposition),
            expires_in.as_secs()
        ))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
