use etrap_types::Batch;

use crate::keys::object_key;
use crate::store::ObjectStore;

/// Publishes one sealed batch's artifacts (§4.7): the four supporting
/// documents (merkle-tree, three indices) uploaded concurrently, then
/// `batch-data.json` uploaded last once every supporting upload has
/// succeeded, so a reader that sees `batch-data.json` can trust the
/// rest of the prefix is complete (§5: "object-store uploads of the
/// artifact set may be issued concurrently"). On any upload failure,
/// attempts to delete every object already written for this batch
/// before reporting failure.
pub async fn publish(
    store: &dyn ObjectStore,
    bucket: &str,
    batch: &Batch,
    artifacts: &etrap_artifacts::ArtifactSet,
) -> etrap_utils::Result<()> {
    let uploads = artifacts.uploads();
    let (batch_data, supporting) = uploads.split_last().expect("uploads() is never empty");

    let results = futures::future::join_all(supporting.iter().map(|(relative, bytes)| {
        let key = object_key(batch, relative);
        async move {
            let result = store.put_object(bucket, &key, bytes).await;
            (key, result)
        }
    }))
    .await;

    let mut written = Vec::new();
    let mut first_error = None;
    for (key, result) in results {
        match result {
            Ok(()) => written.push(key),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    if first_error.is_none() {
        let (relative, bytes) = batch_data;
        let key = object_key(batch, relative);
        match store.put_object(bucket, &key, bytes).await {
            Ok(()) => written.push(key),
            Err(e) => first_error = Some(e),
        }
    }

    if let Some(e) = first_error {
        tracing::warn!(
            batch_id = %batch.batch_id,
            error = %e,
            "artifact upload failed, cleaning up partial batch"
        );
        for partial_key in &written {
            if let Err(cleanup_err) = store.delete_object(bucket, partial_key).await {
                tracing::warn!(
                    batch_id = %batch.batch_id,
                    key = %partial_key,
                    error = %cleanup_err,
                    "best-effort cleanup of partial artifact failed"
                );
            }
        }
        return Err(etrap_utils::Error::ObjectStoreUploadFailed {
            batch_id: batch.batch_id.clone(),
            reason: e.to_string(),
        });
    }
    Ok(())
}
