use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::core::error::QueryError;
use crate::core::models::cost::{CostBreakdown, CostSeries, ServiceTotal};

/// Per-service-per-day amounts at or below this threshold are rounding
/// noise and excluded from both totals. 0.01 currency units.
const NOISE_THRESHOLD: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Date-range-bounded, per-service daily cost breakdown collaborator.
#[async_trait]
pub trait BillingApi: Send + Sync {
    /// Daily per-service costs for `[start, end)` — the billing API treats
    /// the end date as exclusive.
    async fn daily_service_costs(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CostSeries, QueryError>;
}

/// Lookback range ending today: `[today - days, today)`.
pub fn lookback_range(days: u32, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(i64::from(days)), today)
}

/// Fetch the raw cost series for the lookback window.
///
/// Returns `None` when the billing query fails; the caller renders the
/// cost section as unavailable instead of aborting the pipeline.
pub async fn fetch_cost_series(
    billing: &dyn BillingApi,
    days: u32,
    today: NaiveDate,
) -> Option<CostSeries> {
    let (start, end) = lookback_range(days, today);
    match billing.daily_service_costs(start, end).await {
        Ok(series) => Some(series),
        Err(err) => {
            warn!("cost query failed, report will omit cost figures: {err}");
            None
        }
    }
}

/// Reduce the raw series to per-day and per-service totals.
///
/// Amounts at or below the noise threshold are dropped from both totals,
/// but a day whose every group is dropped still appears with a zero
/// total — zero spend, not missing data.
pub fn summarize(series: &CostSeries) -> CostBreakdown {
    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    let mut services: Vec<ServiceTotal> = Vec::new();
    let mut service_index: HashMap<String, usize> = HashMap::new();

    for day in &series.days {
        let mut day_total = Decimal::ZERO;
        for group in &day.groups {
            if group.amount <= NOISE_THRESHOLD {
                continue;
            }
            day_total += group.amount;
            match service_index.get(group.service.as_str()) {
                Some(&idx) => services[idx].amount += group.amount,
                None => {
                    service_index.insert(group.service.clone(), services.len());
                    services.push(ServiceTotal {
                        service: group.service.clone(),
                        amount: group.amount,
                    });
                }
            }
        }
        daily.insert(day.date, day_total);
    }

    CostBreakdown { daily, services }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::cost::{DayCosts, ServiceCost};
    use crate::core::test_support::{usd, MockBilling};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn day(s: &str, groups: Vec<(&str, &str)>) -> DayCosts {
        DayCosts {
            date: date(s),
            groups: groups
                .into_iter()
                .map(|(service, amount)| ServiceCost {
                    service: service.to_string(),
                    amount: usd(amount),
                })
                .collect(),
        }
    }

    #[test]
    fn lookback_range_ends_today() {
        let (start, end) = lookback_range(7, date("2026-08-07"));
        assert_eq!(start, date("2026-07-31"));
        assert_eq!(end, date("2026-08-07"));
    }

    #[test]
    fn summarize_drops_noise_amounts() {
        // 0.01 itself is not "above" the threshold and must be dropped too
        let series = CostSeries {
            days: vec![day(
                "2026-08-01",
                vec![("EC2", "10.50"), ("Tax", "0.01"), ("Dust", "0.005"), ("S3", "0.011")],
            )],
        };
        let breakdown = summarize(&series);

        assert_eq!(breakdown.daily[&date("2026-08-01")], usd("10.511"));
        let names: Vec<&str> = breakdown
            .services
            .iter()
            .map(|s| s.service.as_str())
            .collect();
        assert_eq!(names, vec!["EC2", "S3"]);
    }

    #[test]
    fn summarize_keeps_all_filtered_day_as_zero() {
        let series = CostSeries {
            days: vec![
                day("2026-08-01", vec![("EC2", "10.50")]),
                day("2026-08-02", vec![("Tax", "0.004"), ("Dust", "0.01")]),
            ],
        };
        let breakdown = summarize(&series);

        // The near-zero day is present with a zero total, not missing
        assert_eq!(breakdown.daily.len(), 2);
        assert_eq!(breakdown.daily[&date("2026-08-02")], Decimal::ZERO);
    }

    #[test]
    fn summarize_accumulates_service_totals_across_days() {
        let series = CostSeries {
            days: vec![
                day("2026-08-01", vec![("EC2", "10.50"), ("RDS", "5.25")]),
                day("2026-08-02", vec![("EC2", "11.00")]),
            ],
        };
        let breakdown = summarize(&series);

        assert_eq!(breakdown.services.len(), 2);
        assert_eq!(breakdown.services[0].service, "EC2");
        assert_eq!(breakdown.services[0].amount, usd("21.50"));
        assert_eq!(breakdown.services[1].amount, usd("5.25"));
        assert_eq!(breakdown.window_total(), usd("27.25"));
    }

    #[test]
    fn summarize_services_keep_first_seen_order() {
        let series = CostSeries {
            days: vec![
                day("2026-08-01", vec![("Zeta", "1.00"), ("Alpha", "1.00")]),
                day("2026-08-02", vec![("Alpha", "2.00"), ("Mu", "1.00")]),
            ],
        };
        let breakdown = summarize(&series);

        let names: Vec<&str> = breakdown
            .services
            .iter()
            .map(|s| s.service.as_str())
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn summarize_sums_exactly() {
        // The classic binary-float trap: 0.10 + 0.20 must be exactly 0.30
        let series = CostSeries {
            days: vec![day("2026-08-01", vec![("A", "0.10"), ("B", "0.20")])],
        };
        let breakdown = summarize(&series);
        assert_eq!(breakdown.daily[&date("2026-08-01")], usd("0.30"));
    }

    #[tokio::test]
    async fn fetch_returns_series_on_success() {
        let series = CostSeries {
            days: vec![day("2026-08-01", vec![("EC2", "1.00")])],
        };
        let billing = MockBilling::ok(series.clone());

        let fetched = fetch_cost_series(&billing, 7, date("2026-08-07")).await;
        assert_eq!(fetched, Some(series));
        assert_eq!(billing.call_count(), 1);
    }

    #[tokio::test]
    async fn fetch_returns_absence_on_failure() {
        let billing = MockBilling::failing();
        let fetched = fetch_cost_series(&billing, 7, date("2026-08-07")).await;
        assert_eq!(fetched, None);
        assert_eq!(billing.call_count(), 1);
    }
}
