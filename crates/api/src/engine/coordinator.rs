//! Upload/transaction sequencing for mutations that touch both stores.
//!
//! Item and outfit mutations write an image to object storage and rows to
//! Postgres, but there is no two-phase commit across the two. The ordering
//! here makes the failure modes safe:
//!
//! - [`upload_then_commit`]: the blob goes up first, so a slow or failing
//!   upload aborts the request before any relational work starts. If the
//!   relational transaction then fails, the freshly uploaded object is
//!   deleted again (compensating delete). A failed compensation is logged
//!   and the relational error is what the caller sees.
//! - [`commit_then_cleanup`]: deletions commit the relational transaction
//!   first and only then remove the now-unreferenced objects, so a storage
//!   hiccup can orphan a blob but never leave a row pointing at nothing.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use wardrobe_storage::BlobStore;

use crate::error::AppError;

/// An image waiting to be uploaded as part of a mutation.
pub struct PendingUpload {
    /// Object key within the store.
    pub key: String,
    pub bytes: Bytes,
    pub content_type: String,
}

/// Run a mutation that may carry an image upload.
///
/// When `upload` is `Some`, the object is uploaded before `txn` runs and
/// `txn` receives its public URL; when `None`, `txn` receives `None` and
/// no storage call is made. If `txn` fails after an upload, the object is
/// deleted again on a best-effort basis.
pub async fn upload_then_commit<T, F, Fut>(
    store: &Arc<dyn BlobStore>,
    upload: Option<PendingUpload>,
    txn: F,
) -> Result<T, AppError>
where
    F: FnOnce(Option<String>) -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let uploaded_key = match upload {
        Some(pending) => {
            store
                .put(&pending.key, pending.bytes, &pending.content_type)
                .await?;
            Some(pending.key)
        }
        None => None,
    };

    let public_url = uploaded_key.as_deref().map(|key| store.public_url(key));

    match txn(public_url).await {
        Ok(value) => Ok(value),
        Err(err) => {
            if let Some(key) = uploaded_key {
                match store.delete(&key).await {
                    Ok(()) => {
                        tracing::warn!(
                            key = %key,
                            "Rolled back uploaded object after transaction failure"
                        );
                    }
                    Err(cleanup_err) => {
                        // The object is now orphaned in the store.
                        tracing::error!(
                            key = %key,
                            error = %cleanup_err,
                            "Compensating delete failed after transaction failure"
                        );
                    }
                }
            }
            Err(err)
        }
    }
}

/// Run a deletion that leaves objects unreferenced.
///
/// `txn` commits the relational work and returns the object keys that are
/// no longer referenced by any row. Those are then deleted best-effort:
/// a storage failure is logged but does not fail the request, since the
/// relational state is already consistent.
pub async fn commit_then_cleanup<T, F, Fut>(
    store: &Arc<dyn BlobStore>,
    txn: F,
) -> Result<T, AppError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(T, Vec<String>), AppError>>,
{
    let (value, stale_keys) = txn().await?;

    if !stale_keys.is_empty() {
        if let Err(err) = store.delete_many(&stale_keys).await {
            tracing::error!(
                count = stale_keys.len(),
                error = %err,
                "Cleanup delete failed, objects are orphaned"
            );
        }
    }

    Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicBool, Ordering};
    use wardrobe_core::error::CoreError;
    use wardrobe_storage::MemoryBlobStore;

    use super::*;

    fn test_store() -> (Arc<MemoryBlobStore>, Arc<dyn BlobStore>) {
        let memory = Arc::new(MemoryBlobStore::new());
        let store: Arc<dyn BlobStore> = Arc::clone(&memory) as Arc<dyn BlobStore>;
        (memory, store)
    }

    fn pending(key: &str) -> PendingUpload {
        PendingUpload {
            key: key.to_string(),
            bytes: Bytes::from_static(b"img"),
            content_type: "image/jpeg".to_string(),
        }
    }

    #[tokio::test]
    async fn successful_transaction_keeps_the_object() {
        let (memory, store) = test_store();

        let url = upload_then_commit(&store, Some(pending("1/a.jpg")), |url| async move {
            Ok::<_, AppError>(url)
        })
        .await
        .unwrap();

        assert_eq!(url.as_deref(), Some("memory://blobs/1/a.jpg"));
        assert!(memory.contains("1/a.jpg"));
        assert_eq!(memory.delete_calls(), 0);
    }

    #[tokio::test]
    async fn failed_transaction_deletes_the_uploaded_object() {
        let (memory, store) = test_store();

        let result: Result<(), _> =
            upload_then_commit(&store, Some(pending("1/a.jpg")), |_url| async move {
                Err(AppError::BadRequest("forced failure".into()))
            })
            .await;

        // The caller sees the transaction error, not the cleanup outcome.
        assert_matches!(result, Err(AppError::BadRequest(_)));
        assert!(!memory.contains("1/a.jpg"));
        assert_eq!(memory.delete_calls(), 1);
    }

    #[tokio::test]
    async fn no_upload_means_no_storage_calls() {
        let (memory, store) = test_store();

        let result: Result<(), _> = upload_then_commit(&store, None, |url| async move {
            assert!(url.is_none());
            Err(AppError::Core(CoreError::Validation("nope".into())))
        })
        .await;

        assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));
        assert_eq!(memory.object_count(), 0);
        assert_eq!(memory.delete_calls(), 0);
    }

    #[tokio::test]
    async fn upload_failure_skips_the_transaction() {
        let (memory, store) = test_store();
        memory.fail_puts(true);

        let txn_ran = AtomicBool::new(false);
        let result: Result<(), _> =
            upload_then_commit(&store, Some(pending("1/a.jpg")), |_url| async {
                txn_ran.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert_matches!(result, Err(AppError::Storage(_)));
        assert!(!txn_ran.load(Ordering::SeqCst));
        assert_eq!(memory.delete_calls(), 0);
    }

    #[tokio::test]
    async fn failed_compensation_still_surfaces_the_original_error() {
        let (memory, store) = test_store();
        memory.fail_deletes(true);

        let result: Result<(), _> =
            upload_then_commit(&store, Some(pending("1/a.jpg")), |_url| async move {
                Err(AppError::BadRequest("forced failure".into()))
            })
            .await;

        assert_matches!(result, Err(AppError::BadRequest(_)));
        // Delete was attempted but the object is stuck.
        assert_eq!(memory.delete_calls(), 1);
        assert!(memory.contains("1/a.jpg"));
    }

    #[tokio::test]
    async fn cleanup_runs_after_a_successful_commit() {
        let (memory, store) = test_store();
        memory
            .put("1/old.jpg", Bytes::from_static(b"img"), "image/jpeg")
            .await
            .unwrap();

        let n = commit_then_cleanup(&store, || async {
            Ok::<_, AppError>((1_u64, vec!["1/old.jpg".to_string()]))
        })
        .await
        .unwrap();

        assert_eq!(n, 1);
        assert!(!memory.contains("1/old.jpg"));
    }

    #[tokio::test]
    async fn cleanup_failure_does_not_fail_the_request() {
        let (memory, store) = test_store();
        memory
            .put("1/old.jpg", Bytes::from_static(b"img"), "image/jpeg")
            .await
            .unwrap();
        memory.fail_deletes(true);

        let n = commit_then_cleanup(&store, || async {
            Ok::<_, AppError>((1_u64, vec!["1/old.jpg".to_string()]))
        })
        .await
        .unwrap();

        assert_eq!(n, 1);
        assert!(memory.contains("1/old.jpg"));
    }

    #[tokio::test]
    async fn failed_commit_skips_cleanup() {
        let (memory, store) = test_store();
        memory
            .put("1/old.jpg", Bytes::from_static(b"img"), "image/jpeg")
            .await
            .unwrap();

        let result: Result<u64, _> = commit_then_cleanup(&store, || async {
            Err(AppError::BadRequest("forced failure".into()))
        })
        .await;

        assert_matches!(result, Err(AppError::BadRequest(_)));
        assert!(memory.contains("1/old.jpg"));
        assert_eq!(memory.delete_calls(), 0);
    }
}
