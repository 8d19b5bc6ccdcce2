use async_trait::async_trait;
use aws_sdk_rds::error::DisplayErrorContext;

use crate::core::error::QueryError;
use crate::core::models::resources::DbInstance;
use crate::core::resources::DatabaseApi;

const API: &str = "rds";

pub struct RdsDatabase {
    client: aws_sdk_rds::Client,
}

impl RdsDatabase {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_rds::Client::new(config),
        }
    }
}

#[async_trait]
impl DatabaseApi for RdsDatabase {
    // First page only; pagination is out of scope for this report.
    async fn describe_db_instances(&self) -> Result<Vec<DbInstance>, QueryError> {
        let response = self
            .client
            .describe_db_instances()
            .send()
            .await
            .map_err(|err| QueryError::upstream(API, DisplayErrorContext(err)))?;

        Ok(response
            .db_instances()
            .iter()
            .map(|db| DbInstance {
                status: db.db_instance_status().unwrap_or_default().to_string(),
            })
            .collect())
    }
}
