//! In-memory object store used by the accessor and handler tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::{ObjectStore, StorageError, StorageResult};

#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<(String, String), Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_objects(bucket: &str, objects: &[(&str, &[u8])]) -> Self {
        let store = Self::new();
        for (key, data) in objects {
            store
                .put_object(bucket, key, Bytes::copy_from_slice(data))
                .await
                .expect("memory put never fails");
        }
        store
    }

    pub async fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> StorageResult<()> {
        self.objects
            .write()
            .await
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<ByteStream> {
        self.object(bucket, key)
            .await
            .map(ByteStream::from)
            .ok_or_else(|| StorageError::Transfer(format!("NoSuchKey: {}/{}", bucket, key)))
    }

    async fn list_objects(&self, bucket: &str) -> StorageResult<Vec<String>> {
        Ok(self
            .objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, key)| key.clone())
            .collect())
    }
}
