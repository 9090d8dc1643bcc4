//! Defines routes for the facade operations.
//!
//! ## Structure
//! - **Collection endpoints**
//!   - `GET    /objects` — list every key in the bucket
//!   - `POST   /objects` — multipart upload (`file`, `key`, `storage_class`, metadata parts)
//!
//! - **Object-level endpoints**
//!   - `PUT    /objects/{*key}` — upload raw body
//!   - `GET    /objects/{*key}` — download object
//!   - `DELETE /objects/{*key}` — delete object and its cache entries
//!   - `GET    /metadata/{*key}` — cached head-object metadata
//!   - `GET    /signed-url/{*key}` — cached signed download URL (`?disposition=`)
//!   - `POST   /replace/{*key}` — replace `?from=` with the body at `key`
//!
//! The wildcard `*key` allows nested keys like `photos/2025/img.jpg`.
//! Upload bodies are buffered whole and are not capped by axum's default
//! 2 MiB body limit.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        object_handlers::{
            delete_object, get_metadata, get_object, get_signed_url, list_objects,
            replace_object, upload_form, upload_object,
        },
    },
    services::storage_service::StorageService,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

/// Build and return the router for all facade routes.
///
/// The router carries shared state (`StorageService`) to all handlers.
pub fn routes() -> Router<StorageService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Collection routes
        .route("/objects", get(list_objects).post(upload_form))
        // Object-level routes
        .route(
            "/objects/{*key}",
            put(upload_object).get(get_object).delete(delete_object),
        )
        .route("/metadata/{*key}", get(get_metadata))
        .route("/signed-url/{*key}", get(get_signed_url))
        .route("/replace/{*key}", post(replace_object))
        .layer(DefaultBodyLimit::disable())
}
