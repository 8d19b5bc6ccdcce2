use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::core::config::ReportConfig;
use crate::core::cost::{self, BillingApi};
use crate::core::error::QueryError;
use crate::core::report;
use crate::core::resources::{self, ComputeApi, DatabaseApi, FunctionsApi, StorageApi};

pub const OK_BODY: &str = "Report sent successfully";
pub const MISSING_TOPIC_BODY: &str = "SNS_TOPIC_ARN not configured";
pub const DISPATCH_FAILED_BODY: &str = "Failed to send report";

/// Delivery acknowledgment from the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(pub String);

/// Notification dispatch collaborator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(
        &self,
        topic_arn: &str,
        subject: &str,
        body: &str,
    ) -> Result<MessageId, QueryError>;
}

/// Structured invocation result; serializes to
/// `{"statusCode": ..., "body": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    fn sent(body: &str) -> Self {
        Self {
            status_code: 200,
            body: body.to_string(),
        }
    }

    fn failed(body: &str) -> Self {
        Self {
            status_code: 500,
            body: body.to_string(),
        }
    }
}

/// External collaborator handles, injected by the caller.
pub struct Collaborators<'a> {
    pub billing: &'a dyn BillingApi,
    pub compute: &'a dyn ComputeApi,
    pub database: &'a dyn DatabaseApi,
    pub storage: &'a dyn StorageApi,
    pub functions: &'a dyn FunctionsApi,
    pub notifier: &'a dyn Notifier,
}

/// Run one report invocation: validate configuration, gather cost and
/// resource data, render, dispatch.
///
/// Collaborator failures never escape: billing failure degrades the cost
/// section, inventory failures degrade their counts, and only a dispatch
/// failure (or missing configuration) turns into a 500.
pub async fn run(
    deps: &Collaborators<'_>,
    config: &ReportConfig,
    now: DateTime<Utc>,
) -> HandlerResponse {
    info!("starting daily cost and resource report generation");

    // Checked before any upstream query is issued
    let topic_arn = match &config.topic_arn {
        Some(arn) => arn,
        None => {
            error!("SNS_TOPIC_ARN is not set");
            return HandlerResponse::failed(MISSING_TOPIC_BODY);
        }
    };

    let today = now.date_naive();

    info!(days = config.days, "fetching cost data");
    let series = cost::fetch_cost_series(deps.billing, config.days, today).await;
    let breakdown = series.as_ref().map(cost::summarize);

    info!("fetching resource inventories");
    let counts =
        resources::take_census(deps.compute, deps.database, deps.storage, deps.functions).await;

    let body = report::render(breakdown.as_ref(), &counts, config.days, now);
    let subject = report::subject_line(today);

    info!("dispatching report");
    match deps.notifier.publish(topic_arn, &subject, &body).await {
        Ok(message_id) => {
            info!(message_id = %message_id.0, "report dispatched");
            HandlerResponse::sent(OK_BODY)
        }
        Err(err) => {
            error!("failed to dispatch report: {err}");
            HandlerResponse::failed(DISPATCH_FAILED_BODY)
        }
    }
}
