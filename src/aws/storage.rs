use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;

use crate::core::error::QueryError;
use crate::core::resources::StorageApi;

const API: &str = "s3";

pub struct S3Storage {
    client: aws_sdk_s3::Client,
}

impl S3Storage {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
        }
    }
}

#[async_trait]
impl StorageApi for S3Storage {
    async fn list_buckets(&self) -> Result<Vec<String>, QueryError> {
        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|err| QueryError::upstream(API, DisplayErrorContext(err)))?;

        // Unnamed buckets still count toward the total
        Ok(response
            .buckets()
            .iter()
            .map(|bucket| bucket.name().unwrap_or_default().to_string())
            .collect())
    }
}
