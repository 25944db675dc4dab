//! Object storage for the service
//!
//! This module provides:
//! - The `ObjectStore` seam over put/get/list primitives
//! - An S3-compatible implementation (AWS S3, MinIO, ...)
//! - `ObjectAccessor`, the facade the web layer calls into

pub mod accessor;
pub mod error;
pub mod s3_client;

#[cfg(test)]
pub(crate) mod memory;

pub use accessor::ObjectAccessor;
pub use error::{StorageError, StorageResult};
pub use s3_client::{S3Store, StoreHandle};

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

/// The three request shapes the accessor needs from an object store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, replacing whatever was there.
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> StorageResult<()>;

    /// Open the object's body as a stream.
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<ByteStream>;

    /// Keys in the bucket, in listing order.
    ///
    /// Only a single listing page is returned.
    async fn list_objects(&self, bucket: &str) -> StorageResult<Vec<String>>;
}
