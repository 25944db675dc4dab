//! S3-compatible object store backed by `aws-sdk-s3`
//!
//! Works against AWS S3 or compatible services (MinIO, DigitalOcean Spaces, ...).
//! A fresh client is built from the shared `StoreHandle` for every request, the
//! handle itself is never mutated after construction.

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::{
    config::Credentials,
    error::{DisplayErrorContext, SdkError},
    primitives::ByteStream,
    Client,
};
use bytes::Bytes;
use tracing::{debug, error, info};

use super::{ObjectStore, StorageError, StorageResult};
use crate::config::StorageConfig;

/// Long-lived store configuration (region, credentials, endpoint).
#[derive(Debug, Clone)]
pub struct StoreHandle {
    sdk_config: SdkConfig,
    force_path_style: bool,
}

impl StoreHandle {
    /// Resolve the SDK configuration for the configured store.
    ///
    /// Static credentials are used when both halves are configured, otherwise
    /// the default AWS provider chain (env, profile, IMDS, ...) applies.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "storage-service",
            ));
        }

        let sdk_config = loader.load().await;

        info!(
            region = %config.region,
            endpoint = ?config.endpoint,
            path_style = config.force_path_style,
            "S3 store handle initialized"
        );

        Self::new(sdk_config, config.force_path_style)
    }

    pub fn new(sdk_config: SdkConfig, force_path_style: bool) -> Self {
        Self {
            sdk_config,
            force_path_style,
        }
    }

    pub fn sdk_config(&self) -> &SdkConfig {
        &self.sdk_config
    }

    pub fn force_path_style(&self) -> bool {
        self.force_path_style
    }
}

/// Object store that talks to S3 through a per-call client.
#[derive(Clone)]
pub struct S3Store {
    handle: Arc<StoreHandle>,
}

impl S3Store {
    pub fn new(handle: Arc<StoreHandle>) -> Self {
        Self { handle }
    }

    fn client(&self) -> Client {
        let conf = aws_sdk_s3::config::Builder::from(self.handle.sdk_config())
            .force_path_style(self.handle.force_path_style())
            .build();
        Client::from_conf(conf)
    }
}

fn transfer_error<E, R>(operation: &str, bucket: &str, key: &str, err: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    let message = format!("{} {}/{}: {}", operation, bucket, key, DisplayErrorContext(&err));
    error!("S3 request failed: {}", message);
    StorageError::Transfer(message)
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> StorageResult<()> {
        debug!("Uploading object to S3: {}/{} ({} bytes)", bucket, key, body.len());

        self.client()
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| transfer_error("PutObject", bucket, key, e))?;

        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<ByteStream> {
        debug!("Fetching object from S3: {}/{}", bucket, key);

        let output = self
            .client()
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| transfer_error("GetObject", bucket, key, e))?;

        Ok(output.body)
    }

    async fn list_objects(&self, bucket: &str) -> StorageResult<Vec<String>> {
        debug!("Listing objects in bucket: {}", bucket);

        // Single page; continuation tokens are not followed.
        let output = self
            .client()
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| transfer_error("ListObjectsV2", bucket, "", e))?;

        if output.is_truncated().unwrap_or(false) {
            debug!("Listing for bucket {} is truncated to the first page", bucket);
        }

        Ok(output
            .contents()
            .iter()
            .filter_map(|object| object.key())
            .map(str::to_string)
            .collect())
    }
}
