//! Shared test doubles for the collaborator seams, with call counters so
//! tests can assert exactly which upstream queries an invocation issued.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::core::cost::BillingApi;
use crate::core::error::QueryError;
use crate::core::handler::{MessageId, Notifier};
use crate::core::models::cost::{CostSeries, DayCosts, ServiceCost};
use crate::core::models::resources::{DbInstance, Instance, InstanceGroup};
use crate::core::resources::{ComputeApi, DatabaseApi, FunctionsApi, StorageApi};

pub fn usd(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn instance_group(states: &[&str]) -> InstanceGroup {
    InstanceGroup {
        instances: states
            .iter()
            .map(|state| Instance {
                state: state.to_string(),
            })
            .collect(),
    }
}

pub fn db_instances(statuses: &[&str]) -> Vec<DbInstance> {
    statuses
        .iter()
        .map(|status| DbInstance {
            status: status.to_string(),
        })
        .collect()
}

/// The cost fixture used across the pipeline tests: two days, three
/// services, EC2 appearing on both days.
pub fn sample_series() -> CostSeries {
    let day = |s: &str, groups: Vec<(&str, &str)>| DayCosts {
        date: NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap(),
        groups: groups
            .into_iter()
            .map(|(service, amount)| ServiceCost {
                service: service.to_string(),
                amount: usd(amount),
            })
            .collect(),
    };

    CostSeries {
        days: vec![
            day(
                "2026-08-01",
                vec![("EC2", "10.50"), ("RDS", "5.25"), ("S3", "0.50")],
            ),
            day("2026-08-02", vec![("EC2", "11.00")]),
        ],
    }
}

pub fn sample_resource_counts() -> crate::core::models::resources::ResourceCounts {
    use crate::core::models::resources::*;
    ResourceCounts {
        compute: ComputeCounts { total: 3, running: 2 },
        database: DatabaseCounts { total: 1, available: 1 },
        storage: StorageCounts { total_buckets: 5 },
        functions: FunctionCounts { total_functions: 2 },
    }
}

fn injected(api: &'static str) -> QueryError {
    QueryError::upstream(api, "injected failure")
}

pub struct MockBilling {
    series: Option<CostSeries>,
    calls: AtomicUsize,
}

impl MockBilling {
    pub fn ok(series: CostSeries) -> Self {
        Self {
            series: Some(series),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            series: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BillingApi for MockBilling {
    async fn daily_service_costs(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<CostSeries, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.series.clone().ok_or_else(|| injected("cost explorer"))
    }
}

pub struct MockCompute {
    groups: Option<Vec<InstanceGroup>>,
    calls: AtomicUsize,
}

impl MockCompute {
    pub fn ok(groups: Vec<InstanceGroup>) -> Self {
        Self {
            groups: Some(groups),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            groups: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ComputeApi for MockCompute {
    async fn describe_instances(&self) -> Result<Vec<InstanceGroup>, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.groups.clone().ok_or_else(|| injected("ec2"))
    }
}

pub struct MockDatabase {
    instances: Option<Vec<DbInstance>>,
    calls: AtomicUsize,
}

impl MockDatabase {
    pub fn ok(instances: Vec<DbInstance>) -> Self {
        Self {
            instances: Some(instances),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            instances: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseApi for MockDatabase {
    async fn describe_db_instances(&self) -> Result<Vec<DbInstance>, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.instances.clone().ok_or_else(|| injected("rds"))
    }
}

pub struct MockStorage {
    buckets: Option<Vec<String>>,
    calls: AtomicUsize,
}

impl MockStorage {
    pub fn ok(count: usize) -> Self {
        Self {
            buckets: Some((0..count).map(|i| format!("bucket-{i}")).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            buckets: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageApi for MockStorage {
    async fn list_buckets(&self) -> Result<Vec<String>, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.buckets.clone().ok_or_else(|| injected("s3"))
    }
}

pub struct MockFunctions {
    functions: Option<Vec<String>>,
    calls: AtomicUsize,
}

impl MockFunctions {
    pub fn ok(count: usize) -> Self {
        Self {
            functions: Some((0..count).map(|i| format!("function-{i}")).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            functions: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FunctionsApi for MockFunctions {
    async fn list_functions(&self) -> Result<Vec<String>, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.functions.clone().ok_or_else(|| injected("lambda"))
    }
}

pub struct MockNotifier {
    fail: bool,
    published: Mutex<Vec<(String, String, String)>>,
    calls: AtomicUsize,
}

impl MockNotifier {
    pub fn ok() -> Self {
        Self {
            fail: false,
            published: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            published: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every (topic, subject, body) triple this notifier accepted.
    pub fn published(&self) -> Vec<(String, String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn publish(
        &self,
        topic_arn: &str,
        subject: &str,
        body: &str,
    ) -> Result<MessageId, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(injected("sns"));
        }
        self.published.lock().unwrap().push((
            topic_arn.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        Ok(MessageId("mock-message-id".to_string()))
    }
}
