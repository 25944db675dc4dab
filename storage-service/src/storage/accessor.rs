//! Facade over an object store: upload and download bytes or files, serve an
//! object as an HTTP attachment, and resolve a logical name to a full key.
//!
//! Every call is independent. The accessor holds nothing but the store it was
//! given, so one instance can be shared freely across request handlers.

use std::path::Path;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, info};

use super::{ObjectStore, StorageError, StorageResult};
use crate::error::ApiError;

pub struct ObjectAccessor {
    store: Arc<dyn ObjectStore>,
}

impl ObjectAccessor {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload `data` as the contents of `key`, overwriting any existing object.
    pub async fn put_bytes(
        &self,
        bucket: &str,
        key: &str,
        data: impl Into<Bytes>,
    ) -> StorageResult<()> {
        let data = data.into();
        let size = data.len();

        self.store.put_object(bucket, key, data).await?;

        info!(bucket = %bucket, key = %key, size, "Object uploaded");
        Ok(())
    }

    /// Read the whole local file at `path` and upload it under `key`.
    ///
    /// The file is buffered in memory before the transfer starts.
    pub async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: impl AsRef<Path>,
    ) -> StorageResult<()> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;

        debug!("Read {} bytes from {}", data.len(), path.display());
        self.put_bytes(bucket, key, data).await
    }

    /// Stream the object into the local file at `path`, creating or truncating it.
    ///
    /// If the transfer fails partway the partial content is left on disk.
    pub async fn get_to_file(
        &self,
        bucket: &str,
        key: &str,
        path: impl AsRef<Path>,
    ) -> StorageResult<()> {
        let path = path.as_ref();

        // The handle is owned by this scope and closed on every return path.
        let mut file = File::create(path).await?;

        let mut body = self.store.get_object(bucket, key).await?;
        let mut written = 0u64;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| StorageError::Transfer(format!("{}/{}: {}", bucket, key, e)))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        info!(
            bucket = %bucket,
            key = %key,
            path = %path.display(),
            size = written,
            "Object downloaded to file"
        );
        Ok(())
    }

    /// Fetch the object and buffer its entire content in memory.
    pub async fn get_bytes(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let body = self.store.get_object(bucket, key).await?;

        let data = body
            .collect()
            .await
            .map_err(|e| StorageError::Read(format!("{}/{}: {}", bucket, key, e)))?
            .into_bytes();

        debug!("Fetched {}/{} ({} bytes)", bucket, key, data.len());
        Ok(data)
    }

    /// Respond with the object as a download named `name`.
    ///
    /// Any storage failure becomes the generic server error response; no object
    /// bytes are written in that case. A name that cannot be carried in a header
    /// is rejected before the store is contacted.
    pub async fn serve_file(&self, bucket: &str, key: &str, name: &str) -> Response {
        let disposition =
            match HeaderValue::from_str(&format!("attachment; filename=\"{}\"", name)) {
                Ok(value) => value,
                Err(_) => {
                    return ApiError::BadRequest(format!("Invalid download name: {:?}", name))
                        .into_response()
                }
            };

        let data = match self.get_bytes(bucket, key).await {
            Ok(data) => data,
            Err(e) => return ApiError::from(e).into_response(),
        };

        ([(header::CONTENT_DISPOSITION, disposition)], data).into_response()
    }

    /// Find the first object whose key, up to its first `.`, equals `name`.
    ///
    /// `Ok(None)` means the listing succeeded but nothing matched. Only the
    /// first listing page is scanned, so very large buckets can miss matches.
    pub async fn find_object(&self, bucket: &str, name: &str) -> StorageResult<Option<String>> {
        let keys = self.store.list_objects(bucket).await?;

        let found = keys.into_iter().find(|key| logical_name(key) == name);
        if let Some(key) = &found {
            info!(bucket = %bucket, key = %key, "Found key {}", name);
        }

        Ok(found)
    }
}

/// Segment of `key` before the first `.`, or the whole key when it has none.
fn logical_name(key: &str) -> &str {
    key.split('.').next().unwrap_or(key)
}
