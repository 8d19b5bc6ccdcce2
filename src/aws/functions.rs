use async_trait::async_trait;
use aws_sdk_lambda::error::DisplayErrorContext;

use crate::core::error::QueryError;
use crate::core::resources::FunctionsApi;

const API: &str = "lambda";

pub struct LambdaFunctions {
    client: aws_sdk_lambda::Client,
}

impl LambdaFunctions {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_lambda::Client::new(config),
        }
    }
}

#[async_trait]
impl FunctionsApi for LambdaFunctions {
    // First page only; pagination is out of scope for this report.
    async fn list_functions(&self) -> Result<Vec<String>, QueryError> {
        let response = self
            .client
            .list_functions()
            .send()
            .await
            .map_err(|err| QueryError::upstream(API, DisplayErrorContext(err)))?;

        Ok(response
            .functions()
            .iter()
            .map(|function| function.function_name().unwrap_or_default().to_string())
            .collect())
    }
}
