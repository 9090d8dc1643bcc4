//! Service layer: object-store clients, cache clients and the facade that
//! composes them.

pub mod cache;
pub mod memory_store;
pub mod object_store;
pub mod redis_cache;
pub mod s3_store;
pub mod storage_service;
