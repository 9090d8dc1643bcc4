//! HTTP handlers for object operations.
//! Bodies are buffered (the facade works on whole payloads) and every
//! storage concern is delegated to `StorageService`.

use crate::{
    errors::AppError,
    models::{ObjectMetadata, UploadRequest},
    services::storage_service::StorageService,
};
use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const META_HEADER_PREFIX: &str = "x-amz-meta-";
const STORAGE_CLASS_HEADER: &str = "x-amz-storage-class";

#[derive(Debug, Deserialize)]
pub struct SignedUrlQuery {
    pub disposition: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceQuery {
    pub from: String,
}

#[derive(Debug, Serialize)]
pub struct SignedUrlResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub key: String,
}

/// GET `/objects` — every key in the bucket.
pub async fn list_objects(State(service): State<StorageService>) -> Json<Vec<String>> {
    Json(service.list().await)
}

/// PUT `/objects/{*key}` — upload the raw request body.
///
/// `Content-Type`, `x-amz-storage-class` and `x-amz-meta-*` headers are
/// carried onto the object.
pub async fn upload_object(
    State(service): State<StorageService>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = request_from_headers(&headers, body).key(key);
    written_response(service.upload(request).await?)
}

/// POST `/objects` — multipart upload.
///
/// The `file` part supplies the payload, and its file name and content type
/// when present. Optional `key` and `storage_class` text parts; any other
/// text part becomes object metadata under its lowercased name, matching
/// how S3 stores `x-amz-meta-*` keys.
pub async fn upload_form(
    State(service): State<StorageService>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut content = None;
    let mut file_name = None;
    let mut content_type = None;
    let mut key = None;
    let mut storage_class = None;
    let mut metadata = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(str::to_string);
                content_type = field.content_type().map(str::to_string);
                content = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|err| AppError::bad_request(err.to_string()))?,
                );
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::bad_request(err.to_string()))?;
                match name.as_str() {
                    "key" => key = Some(value),
                    "storage_class" => storage_class = Some(value),
                    _ => {
                        metadata.insert(name.to_ascii_lowercase(), value);
                    }
                }
            }
        }
    }

    let content = content.ok_or_else(|| AppError::bad_request("missing `file` part"))?;
    let mut request = UploadRequest::new(content).metadata(metadata);
    if let Some(name) = file_name {
        request = request.file_name(name);
    }
    if let Some(ct) = content_type {
        request = request.content_type(ct);
    }
    if let Some(key) = key {
        request = request.key(key);
    }
    if let Some(class) = storage_class {
        request = request.storage_class(class);
    }

    written_response(service.upload(request).await?)
}

/// GET `/objects/{*key}` — download an object body.
pub async fn get_object(
    State(service): State<StorageService>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let body = service
        .fetch(&key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("object `{}` not available", key)))?;
    let meta = service.get_metadata(&key).await?;

    let mut response = Response::new(Body::empty());
    set_object_headers(response.headers_mut(), &meta, body.len());
    *response.body_mut() = Body::from(body);
    Ok(response)
}

/// DELETE `/objects/{*key}`
pub async fn delete_object(
    State(service): State<StorageService>,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/metadata/{*key}` — `{}` when there is no such object.
pub async fn get_metadata(
    State(service): State<StorageService>,
    Path(key): Path<String>,
) -> Result<Json<ObjectMetadata>, AppError> {
    Ok(Json(service.get_metadata(&key).await?))
}

/// GET `/signed-url/{*key}?disposition=attachment` — disposition defaults to
/// `inline`.
pub async fn get_signed_url(
    State(service): State<StorageService>,
    Path(key): Path<String>,
    Query(q): Query<SignedUrlQuery>,
) -> Result<Json<SignedUrlResponse>, AppError> {
    let disposition = q.disposition.unwrap_or_else(|| "inline".into());
    let url = service
        .get_signed_url(&key, &disposition)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no signed url for `{}`", key)))?;
    Ok(Json(SignedUrlResponse { url }))
}

/// POST `/replace/{*key}?from=old` — delete `old`, then store the body at `key`.
pub async fn replace_object(
    State(service): State<StorageService>,
    Path(key): Path<String>,
    Query(q): Query<ReplaceQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = request_from_headers(&headers, body);
    written_response(service.replace(request, &q.from, &key).await?)
}

fn request_from_headers(headers: &HeaderMap, body: Bytes) -> UploadRequest {
    let mut request = UploadRequest::new(body);
    if let Some(ct) = header_str(headers, header::CONTENT_TYPE.as_str()) {
        request = request.content_type(ct);
    }
    if let Some(class) = header_str(headers, STORAGE_CLASS_HEADER) {
        request = request.storage_class(class);
    }

    let metadata = headers
        .iter()
        .filter_map(|(name, value)| {
            let meta_key = name.as_str().strip_prefix(META_HEADER_PREFIX)?;
            let value = value.to_str().ok()?;
            Some((meta_key.to_string(), value.to_string()))
        })
        .collect();
    request.metadata(metadata)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// 201 with the key, or 502 when the store rejected the write.
fn written_response(written: Option<String>) -> Result<Response, AppError> {
    match written {
        Some(key) => Ok((StatusCode::CREATED, Json(UploadResponse { key })).into_response()),
        None => Err(AppError::new(
            StatusCode::BAD_GATEWAY,
            "object store rejected the upload",
        )),
    }
}

fn set_object_headers(headers: &mut HeaderMap, meta: &ObjectMetadata, len: usize) {
    let content_type = meta
        .content_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".into());
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));

    if let Some(etag) = meta.etag.as_ref() {
        if let Ok(value) = HeaderValue::from_str(etag) {
            headers.insert(header::ETAG, value);
        }
    }

    if let Some(last_modified) = meta.last_modified {
        if let Ok(value) = HeaderValue::from_str(&last_modified.to_rfc2822()) {
            headers.insert(header::LAST_MODIFIED, value);
        }
    }
}
