//! S3-compatible blob store.
//!
//! Works against MinIO in development and any S3 endpoint in production.
//! Uploads run under a hard deadline so a stalled store turns into a
//! [`StorageError::Timeout`] instead of hanging the request.

use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use bytes::Bytes;

use crate::{keys, BlobStore, StorageConfig, StorageError};

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
    upload_timeout: Duration,
}

impl S3BlobStore {
    /// Build a client for the configured endpoint.
    ///
    /// Uses path-style addressing: MinIO and most self-hosted stores do not
    /// resolve virtual-host bucket names.
    pub async fn connect(config: &StorageConfig) -> Self {
        let credentials = aws_credential_types::Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "wardrobe-env",
        );
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .load()
            .await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            upload_timeout: Duration::from_secs(config.upload_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        let size = data.len();
        let upload = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send();

        match tokio::time::timeout(self.upload_timeout, upload).await {
            Ok(Ok(_)) => {
                tracing::debug!(key, size, "Uploaded object");
                Ok(())
            }
            Ok(Err(e)) => Err(StorageError::Backend(e.to_string())),
            Err(_) => Err(StorageError::Timeout(self.upload_timeout.as_secs())),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        tracing::debug!(key, "Deleted object");
        Ok(())
    }

    async fn delete_many(&self, objects: &[String]) -> Result<(), StorageError> {
        if objects.is_empty() {
            return Ok(());
        }
        let identifiers = objects
            .iter()
            .map(|key| {
                ObjectIdentifier::builder()
                    .key(key)
                    .build()
                    .map_err(|e| StorageError::Backend(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .build()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        self.client
            .delete_objects()
            .bucket(&self.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        tracing::debug!(count = objects.len(), "Deleted objects");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }

    fn key_for(&self, url: &str) -> Option<String> {
        keys::strip_base(url, &self.public_base_url).map(str::to_string)
    }
}
