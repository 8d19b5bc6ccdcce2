use async_trait::async_trait;
use tracing::warn;

use crate::core::error::QueryError;
use crate::core::models::resources::{
    ComputeCounts, DatabaseCounts, DbInstance, FunctionCounts, InstanceGroup, ResourceCounts,
    StorageCounts,
};

// Exact, case-sensitive state matches; "stopped", "pending", "terminated"
// and anything else do not qualify.
const RUNNING_STATE: &str = "running";
const AVAILABLE_STATUS: &str = "available";

/// Compute inventory, preserving the API's reservation grouping.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    async fn describe_instances(&self) -> Result<Vec<InstanceGroup>, QueryError>;
}

#[async_trait]
pub trait DatabaseApi: Send + Sync {
    async fn describe_db_instances(&self) -> Result<Vec<DbInstance>, QueryError>;
}

#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<String>, QueryError>;
}

#[async_trait]
pub trait FunctionsApi: Send + Sync {
    async fn list_functions(&self) -> Result<Vec<String>, QueryError>;
}

fn count_compute(groups: &[InstanceGroup]) -> ComputeCounts {
    let mut counts = ComputeCounts::default();
    for group in groups {
        for instance in &group.instances {
            counts.total += 1;
            if instance.state == RUNNING_STATE {
                counts.running += 1;
            }
        }
    }
    counts
}

fn count_database(instances: &[DbInstance]) -> DatabaseCounts {
    DatabaseCounts {
        total: instances.len(),
        available: instances
            .iter()
            .filter(|db| db.status == AVAILABLE_STATUS)
            .count(),
    }
}

/// Query all four inventories, sequentially.
///
/// Each query's failure is isolated: it logs a diagnostic and contributes
/// that provider's all-zero counts, and the remaining providers still run.
/// The census always completes.
pub async fn take_census(
    compute: &dyn ComputeApi,
    database: &dyn DatabaseApi,
    storage: &dyn StorageApi,
    functions: &dyn FunctionsApi,
) -> ResourceCounts {
    let compute_counts = match compute.describe_instances().await {
        Ok(groups) => count_compute(&groups),
        Err(err) => {
            warn!("compute inventory query failed, reporting zero: {err}");
            ComputeCounts::default()
        }
    };

    let database_counts = match database.describe_db_instances().await {
        Ok(instances) => count_database(&instances),
        Err(err) => {
            warn!("database inventory query failed, reporting zero: {err}");
            DatabaseCounts::default()
        }
    };

    let storage_counts = match storage.list_buckets().await {
        Ok(buckets) => StorageCounts {
            total_buckets: buckets.len(),
        },
        Err(err) => {
            warn!("storage inventory query failed, reporting zero: {err}");
            StorageCounts::default()
        }
    };

    let function_counts = match functions.list_functions().await {
        Ok(functions) => FunctionCounts {
            total_functions: functions.len(),
        },
        Err(err) => {
            warn!("function inventory query failed, reporting zero: {err}");
            FunctionCounts::default()
        }
    };

    ResourceCounts {
        compute: compute_counts,
        database: database_counts,
        storage: storage_counts,
        functions: function_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::resources::Instance;
    use crate::core::test_support::{
        db_instances, instance_group, MockCompute, MockDatabase, MockFunctions, MockStorage,
    };

    #[test]
    fn count_compute_iterates_every_group() {
        let groups = vec![
            instance_group(&["running", "stopped"]),
            instance_group(&["running"]),
        ];
        let counts = count_compute(&groups);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.running, 2);
    }

    #[test]
    fn count_compute_matches_state_exactly() {
        let groups = vec![instance_group(&[
            "running",
            "Running",
            "RUNNING",
            "pending",
            "terminated",
        ])];
        let counts = count_compute(&groups);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.running, 1);
    }

    #[test]
    fn count_compute_handles_empty_groups() {
        let groups = vec![InstanceGroup { instances: vec![] }];
        assert_eq!(count_compute(&groups), ComputeCounts::default());

        let one = vec![InstanceGroup {
            instances: vec![Instance {
                state: "running".into(),
            }],
        }];
        assert_eq!(count_compute(&one).running, 1);
    }

    #[test]
    fn count_database_matches_status_exactly() {
        let instances = db_instances(&["available", "backing-up", "available", "Available"]);
        let counts = count_database(&instances);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.available, 2);
    }

    #[tokio::test]
    async fn census_counts_all_providers() {
        let compute = MockCompute::ok(vec![instance_group(&["running", "running", "stopped"])]);
        let database = MockDatabase::ok(db_instances(&["available"]));
        let storage = MockStorage::ok(5);
        let functions = MockFunctions::ok(2);

        let counts = take_census(&compute, &database, &storage, &functions).await;

        assert_eq!(counts.compute, ComputeCounts { total: 3, running: 2 });
        assert_eq!(counts.database, DatabaseCounts { total: 1, available: 1 });
        assert_eq!(counts.storage, StorageCounts { total_buckets: 5 });
        assert_eq!(counts.functions, FunctionCounts { total_functions: 2 });
    }

    #[tokio::test]
    async fn one_failing_provider_zeroes_only_itself() {
        let compute = MockCompute::failing();
        let database = MockDatabase::ok(db_instances(&["available"]));
        let storage = MockStorage::ok(5);
        let functions = MockFunctions::ok(2);

        let counts = take_census(&compute, &database, &storage, &functions).await;

        assert_eq!(counts.compute, ComputeCounts::default());
        assert_eq!(counts.database, DatabaseCounts { total: 1, available: 1 });
        assert_eq!(counts.storage, StorageCounts { total_buckets: 5 });
        assert_eq!(counts.functions, FunctionCounts { total_functions: 2 });

        // The failure did not short-circuit the later queries
        assert_eq!(database.call_count(), 1);
        assert_eq!(storage.call_count(), 1);
        assert_eq!(functions.call_count(), 1);
    }

    #[tokio::test]
    async fn all_failing_providers_yield_all_zeroes() {
        let compute = MockCompute::failing();
        let database = MockDatabase::failing();
        let storage = MockStorage::failing();
        let functions = MockFunctions::failing();

        let counts = take_census(&compute, &database, &storage, &functions).await;
        assert_eq!(counts, ResourceCounts::default());
    }
}
