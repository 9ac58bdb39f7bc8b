use async_trait::async_trait;

/// C7's capability seam onto the object store (§4.7): upload and,
/// for best-effort cleanup on partial failure, delete.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, bucket: &str, key: &str, bytes: &[u8]) -> etrap_utils::Result<()>;
    async fn delete_object(&self, bucket: &str, key: &str) -> etrap_utils::Result<()>;
}
