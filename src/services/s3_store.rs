//! S3-compatible object store client built on `aws-sdk-s3`.

use crate::config::StorageConfig;
use crate::models::{ObjectMetadata, PutObject};
use crate::services::object_store::{ObjectStore, StoreError, StoreResult};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, retry::RetryConfig};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::{ByteStream, DateTime as SmithyDateTime};
use aws_sdk_s3::types::StorageClass;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Only S3-compatible services can back the facade.
const SUPPORTED_SERVICE: &str = "s3";

#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Arc<Client>,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client for `cfg.bucket`.
    ///
    /// Credentials come from the default provider chain. Retries use the
    /// standard mode with `cfg.max_attempts` attempts; timeouts are the
    /// SDK's own.
    pub async fn connect(cfg: &StorageConfig) -> StoreResult<Self> {
        if !cfg.service_name.eq_ignore_ascii_case(SUPPORTED_SERVICE) {
            return Err(StoreError::Config(format!(
                "unsupported service `{}`, expected `{}`",
                cfg.service_name, SUPPORTED_SERVICE
            )));
        }
        if cfg.bucket.is_empty() {
            return Err(StoreError::Config("bucket name is not set".into()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .retry_config(RetryConfig::standard().with_max_attempts(cfg.max_attempts));
        if let Some(endpoint) = &cfg.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        // Path-style keeps custom endpoints (MinIO, Yandex, localstack) working.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Ok(Self::from_client(Client::from_conf(s3_config), cfg.bucket.clone()))
    }

    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, object: PutObject) -> StoreResult<()> {
        let PutObject {
            key,
            body,
            content_type,
            storage_class,
            metadata,
        } = object;
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .storage_class(StorageClass::from(storage_class.as_str()))
            .set_metadata(Some(metadata))
            .send()
            .await
            .map_err(|err| classify(&key, err))?;

        debug!(bucket = %self.bucket, key = %key, size, "put object");
        Ok(())
    }

    async fn get_object(&self, key: &str) -> StoreResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| classify(key, err))?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|err| StoreError::Body(err.to_string()))?
            .into_bytes();

        debug!(bucket = %self.bucket, key, size = data.len(), "got object");
        Ok(data)
    }

    async fn head_object(&self, key: &str) -> StoreResult<ObjectMetadata> {
        let output = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| classify(key, err))?;

        Ok(ObjectMetadata {
            content_length: output.content_length(),
            content_type: output.content_type().map(str::to_string),
            last_modified: output.last_modified().and_then(to_chrono),
            etag: output.e_tag().map(str::to_string),
            storage_class: output.storage_class().map(|c| c.as_str().to_string()),
            metadata: output.metadata().cloned().unwrap_or_default(),
        })
    }

    async fn delete_object(&self, key: &str) -> StoreResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| classify(key, err))?;
        debug!(bucket = %self.bucket, key, "deleted object");
        Ok(())
    }

    async fn list_objects(&self) -> StoreResult<Vec<String>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| classify(&self.bucket, err))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );
        }
        Ok(keys)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(1)
            .send()
            .await
            .map_err(|err| classify(&self.bucket, err))?;
        Ok(())
    }

    async fn presign_get(
        &self,
        key: &str,
        expires_in: Duration,
        disposition: &str,
    ) -> StoreResult<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|err| StoreError::Presign(err.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .response_content_disposition(disposition)
            .presigned(presigning)
            .await
            .map_err(|err| classify(key, err))?;

        Ok(request.uri().to_string())
    }

    fn name(&self) -> &'static str {
        SUPPORTED_SERVICE
    }
}

/// Map an SDK failure onto the store taxonomy by HTTP status.
fn classify<E>(key: &str, err: SdkError<E>) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    match err.raw_response().map(|resp| resp.status().as_u16()) {
        Some(404) => StoreError::NotFound {
            key: key.to_string(),
        },
        Some(403) => StoreError::PermissionDenied {
            key: key.to_string(),
        },
        _ => StoreError::Request(DisplayErrorContext(err).to_string()),
    }
}

fn to_chrono(ts: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}
