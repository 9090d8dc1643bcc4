//! Represents an object (file) stored in a bucket, as seen through a
//! head-object request.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Content type used when neither the caller nor the extension lookup
/// resolves one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Storage class attached to uploads unless the caller picks another one.
pub const DEFAULT_STORAGE_CLASS: &str = "STANDARD";

/// Metadata of a single object, as returned by a head-object request.
///
/// This is what the facade caches under `{key}_metadata`. Timestamps
/// serialize as RFC 3339 strings. `ObjectMetadata::default()` is the empty
/// projection returned when the store could not be queried.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<i64>,

    /// Content type (MIME type).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Timestamp when object was last modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// Entity tag reported by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Storage class (e.g., STANDARD, COLD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// User-defined metadata (`x-amz-meta-*`), including the computed
    /// `filesize`, `extension` and `name` entries written on upload.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl ObjectMetadata {
    /// True for the empty projection, i.e. nothing was learned about the object.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A fully resolved write, ready to be handed to an object store.
#[derive(Clone, Debug)]
pub struct PutObject {
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    pub storage_class: String,
    pub metadata: HashMap<String, String>,
}
