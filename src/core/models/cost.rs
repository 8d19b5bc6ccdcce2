use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One service's spend for a single day, in the order the billing API
/// grouped it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCost {
    pub service: String,
    pub amount: Decimal,
}

/// All per-service cost groups for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCosts {
    pub date: NaiveDate,
    pub groups: Vec<ServiceCost>,
}

/// Raw grouped time-series returned by the billing collaborator.
///
/// Lives only for the duration of one invocation; the renderer consumes
/// the reduced [`CostBreakdown`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSeries {
    pub days: Vec<DayCosts>,
}

/// A service's total spend across the whole queried period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTotal {
    pub service: String,
    pub amount: Decimal,
}

/// Reduced cost data: per-day totals plus per-service totals.
///
/// `daily` is keyed by date, so iteration is already ascending. `services`
/// keeps first-seen grouping order, which is what makes the descending
/// ranking stable on ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub daily: BTreeMap<NaiveDate, Decimal>,
    pub services: Vec<ServiceTotal>,
}

impl CostBreakdown {
    /// Total spend for the whole window (sum of the daily totals).
    pub fn window_total(&self) -> Decimal {
        self.daily.values().copied().sum()
    }
}
