//! Blob storage for wardrobe images.
//!
//! Item photos and outfit snapshots live in an S3-compatible object store
//! (MinIO in development); the database only holds their public URLs. The
//! [`BlobStore`] trait abstracts the store so request handlers and tests do
//! not depend on a live endpoint.

pub mod keys;
pub mod memory;
pub mod s3;

pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

use bytes::Bytes;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The upload did not finish within the configured deadline.
    #[error("Storage upload timed out after {0}s")]
    Timeout(u64),

    /// Any other failure reported by the backing store.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Connection settings for the S3-compatible object store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base URL prepended to object keys in public URLs. Usually
    /// `{endpoint}/{bucket}`, but a CDN host works too.
    pub public_base_url: String,
    /// Per-upload deadline in seconds.
    pub upload_timeout_secs: u64,
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Write/delete access to the image store.
///
/// Reads go through the public URL directly (clients fetch images from the
/// store, not through the API), so the trait has no `get`.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload one object. Subject to the store's upload deadline.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// Delete one object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Delete several objects. The default loops [`BlobStore::delete`];
    /// backends with a batch API override it.
    async fn delete_many(&self, objects: &[String]) -> Result<(), StorageError> {
        for key in objects {
            self.delete(key).await?;
        }
        Ok(())
    }

    /// Public URL under which `key` is served.
    fn public_url(&self, key: &str) -> String;

    /// Inverse of [`BlobStore::public_url`]: the key behind a public URL,
    /// or `None` when the URL does not point into this store.
    fn key_for(&self, url: &str) -> Option<String>;
}
