use async_trait::async_trait;
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::types::{
    DateInterval, Granularity, GroupDefinition, GroupDefinitionType, ResultByTime,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::cost::BillingApi;
use crate::core::error::QueryError;
use crate::core::models::cost::{CostSeries, DayCosts, ServiceCost};

const API: &str = "cost explorer";
const METRIC: &str = "UnblendedCost";
const SERVICE_DIMENSION: &str = "SERVICE";

pub struct CostExplorerBilling {
    client: aws_sdk_costexplorer::Client,
}

impl CostExplorerBilling {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_costexplorer::Client::new(config),
        }
    }
}

#[async_trait]
impl BillingApi for CostExplorerBilling {
    async fn daily_service_costs(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CostSeries, QueryError> {
        let period = DateInterval::builder()
            .start(start.format("%Y-%m-%d").to_string())
            .end(end.format("%Y-%m-%d").to_string())
            .build()
            .map_err(|err| QueryError::malformed(API, err))?;

        let group_by = GroupDefinition::builder()
            .r#type(GroupDefinitionType::Dimension)
            .key(SERVICE_DIMENSION)
            .build();

        let response = self
            .client
            .get_cost_and_usage()
            .time_period(period)
            .granularity(Granularity::Daily)
            .metrics(METRIC)
            .group_by(group_by)
            .send()
            .await
            .map_err(|err| QueryError::upstream(API, DisplayErrorContext(err)))?;

        Ok(convert_series(response.results_by_time()))
    }
}

/// Flatten the grouped time-series into the core model. Entries without a
/// parsable date, a service key, or a parsable amount are skipped.
fn convert_series(results: &[ResultByTime]) -> CostSeries {
    let mut days = Vec::with_capacity(results.len());

    for result in results {
        let Some(date) = result
            .time_period()
            .and_then(|period| NaiveDate::parse_from_str(period.start(), "%Y-%m-%d").ok())
        else {
            continue;
        };

        let mut groups = Vec::new();
        for group in result.groups() {
            let Some(service) = group.keys().first() else {
                continue;
            };
            let Some(amount) = group
                .metrics()
                .and_then(|metrics| metrics.get(METRIC))
                .and_then(|value| value.amount())
                .and_then(|raw| raw.parse::<Decimal>().ok())
            else {
                continue;
            };
            groups.push(ServiceCost {
                service: service.clone(),
                amount,
            });
        }

        days.push(DayCosts { date, groups });
    }

    CostSeries { days }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_costexplorer::types::{Group, MetricValue};

    fn interval(start: &str, end: &str) -> DateInterval {
        DateInterval::builder()
            .start(start)
            .end(end)
            .build()
            .unwrap()
    }

    fn group(service: &str, amount: &str) -> Group {
        Group::builder()
            .keys(service)
            .metrics(
                METRIC,
                MetricValue::builder().amount(amount).unit("USD").build(),
            )
            .build()
    }

    #[test]
    fn convert_series_parses_days_and_groups() {
        let results = vec![
            ResultByTime::builder()
                .time_period(interval("2026-08-01", "2026-08-02"))
                .groups(group("Amazon Elastic Compute Cloud - Compute", "10.50"))
                .groups(group("Amazon Relational Database Service", "5.25"))
                .build(),
            ResultByTime::builder()
                .time_period(interval("2026-08-02", "2026-08-03"))
                .groups(group("Amazon Elastic Compute Cloud - Compute", "11.0000000132"))
                .build(),
        ];

        let series = convert_series(&results);
        assert_eq!(series.days.len(), 2);
        assert_eq!(series.days[0].groups.len(), 2);
        assert_eq!(
            series.days[0].groups[0].service,
            "Amazon Elastic Compute Cloud - Compute"
        );
        assert_eq!(series.days[0].groups[1].amount, "5.25".parse().unwrap());
        // Amount strings keep their full precision until display
        assert_eq!(
            series.days[1].groups[0].amount,
            "11.0000000132".parse().unwrap()
        );
    }

    #[test]
    fn convert_series_skips_unparsable_amounts() {
        let results = vec![ResultByTime::builder()
            .time_period(interval("2026-08-01", "2026-08-02"))
            .groups(group("AWS Lambda", "not-a-number"))
            .groups(group("Amazon S3", "0.50"))
            .build()];

        let series = convert_series(&results);
        assert_eq!(series.days.len(), 1);
        assert_eq!(series.days[0].groups.len(), 1);
        assert_eq!(series.days[0].groups[0].service, "Amazon S3");
    }

    #[test]
    fn convert_series_skips_entries_without_a_period() {
        let results = vec![ResultByTime::builder()
            .groups(group("Amazon S3", "0.50"))
            .build()];

        let series = convert_series(&results);
        assert!(series.days.is_empty());
    }

    #[test]
    fn convert_series_keeps_day_with_no_groups() {
        let results = vec![ResultByTime::builder()
            .time_period(interval("2026-08-01", "2026-08-02"))
            .build()];

        let series = convert_series(&results);
        assert_eq!(series.days.len(), 1);
        assert!(series.days[0].groups.is_empty());
    }
}
