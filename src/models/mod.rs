//! Plain data types shared by the object-store clients, the cache layer and
//! the facade.
//!
//! None of these types own state of their own: an `ObjectMetadata` is a
//! projection of a head-object response, and an `UploadRequest` is resolved
//! into a `PutObject` right before it reaches the store.

pub mod metadata;
pub mod object;
pub mod upload;

pub use metadata::{computed_metadata, extension_from_path, merge_metadata, name_from_path};
pub use object::{DEFAULT_CONTENT_TYPE, DEFAULT_STORAGE_CLASS, ObjectMetadata, PutObject};
pub use upload::UploadRequest;
