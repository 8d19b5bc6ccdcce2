use async_trait::async_trait;
use aws_sdk_sns::error::DisplayErrorContext;

use crate::core::error::QueryError;
use crate::core::handler::{MessageId, Notifier};

const API: &str = "sns";

pub struct SnsNotifier {
    client: aws_sdk_sns::Client,
}

impl SnsNotifier {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_sns::Client::new(config),
        }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(
        &self,
        topic_arn: &str,
        subject: &str,
        body: &str,
    ) -> Result<MessageId, QueryError> {
        let response = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .subject(subject)
            .message(body)
            .send()
            .await
            .map_err(|err| QueryError::upstream(API, DisplayErrorContext(err)))?;

        Ok(MessageId(
            response.message_id().unwrap_or_default().to_string(),
        ))
    }
}

/// Dry-run stand-in: prints the report to stdout instead of publishing.
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn publish(
        &self,
        _topic_arn: &str,
        subject: &str,
        body: &str,
    ) -> Result<MessageId, QueryError> {
        println!("Subject: {subject}\n\n{body}");
        Ok(MessageId("dry-run".to_string()))
    }
}
