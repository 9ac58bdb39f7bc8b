use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::store::ObjectStore;

/// Production [`ObjectStore`] backed by an S3-compatible endpoint.
pub struct S3ObjectStore {
    client: Client,
    region: String,
}

impl S3ObjectStore {
    pub async fn connect(region: &str) -> Self {
        let config = aws_config::from_env()
            .region(aws_sdk_s3::config::Region::new(region.to_string()))
            .load()
            .await;
        Self {
            client: Client::new(&config),
            region: region.to_string(),
        }
    }

    /// Creates `bucket` if it doesn't already exist (§4.7: "the bucket
    /// itself is created on first use if absent; region rules are
    /// followed for the create call").
    pub async fn ensure_bucket(&self, bucket: &str) -> etrap_utils::Result<()> {
        if self.client.head_bucket().bucket(bucket).send().await.is_ok() {
            return Ok(());
        }
        let mut create = self.client.create_bucket().bucket(bucket);
        if self.region != "us-east-1" {
            let constraint =
                aws_sdk_s3::types::BucketLocationConstraint::from(self.region.as_str());
            create = create.create_bucket_configuration(
                aws_sdk_s3::types::CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }
        create
            .send()
            .await
            .map(|_| ())
            .or_else(|e| {
                if e.to_string().contains("BucketAlreadyOwnedByYou") {
                    Ok(())
                } else {
                    Err(e)
                }
            })
            .map_err(|e| etrap_utils::Error::Other(e.into()))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, bytes: &[u8]) -> etrap_utils::Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type("application/json")
            .send()
            .await
            .map(|_| ())
            .map_err(|e| etrap_utils::Error::Other(e.into()))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> etrap_utils::Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| etrap_utils::Error::Other(e.into()))
    }
}
