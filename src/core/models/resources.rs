use serde::{Deserialize, Serialize};

/// A group of compute instances as the inventory API returns them (EC2
/// nests instances under reservations).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceGroup {
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbInstance {
    pub status: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeCounts {
    pub total: usize,
    pub running: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseCounts {
    pub total: usize,
    pub available: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCounts {
    pub total_buckets: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCounts {
    pub total_functions: usize,
}

/// Combined census result. A provider whose query failed contributes its
/// `Default` (all-zero) record; there is no separate error channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCounts {
    pub compute: ComputeCounts,
    pub database: DatabaseCounts,
    pub storage: StorageCounts,
    pub functions: FunctionCounts,
}
