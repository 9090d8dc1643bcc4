//! Upload input accepted by the facade.

use super::object::DEFAULT_STORAGE_CLASS;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::Path;

/// An object payload plus everything the caller knows about it.
///
/// The content type is resolved by whoever builds the request (for example
/// from a multipart field or a `Content-Type` header); the facade never
/// inspects the payload for one.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub content: Bytes,
    pub key: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub metadata: HashMap<String, String>,
    pub storage_class: String,
}

impl UploadRequest {
    pub fn new(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
            key: None,
            file_name: None,
            content_type: None,
            metadata: HashMap::new(),
            storage_class: DEFAULT_STORAGE_CLASS.to_string(),
        }
    }

    /// Explicit object key. Takes precedence over the file name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Name of the source file; its base name is the fallback key.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn storage_class(mut self, storage_class: impl Into<String>) -> Self {
        self.storage_class = storage_class.into();
        self
    }

    /// Key the object will be stored under: the explicit key, else the base
    /// name of the source file. Empty strings count as absent.
    pub fn resolve_key(&self) -> Option<String> {
        if let Some(key) = self.key.as_deref().filter(|k| !k.is_empty()) {
            return Some(key.to_string());
        }
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).file_name())
            .map(|base| base.to_string_lossy().into_owned())
            .filter(|base| !base.is_empty())
    }
}
