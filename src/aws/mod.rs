pub mod billing;
pub mod compute;
pub mod database;
pub mod functions;
pub mod notify;
pub mod storage;

use aws_config::BehaviorVersion;

/// Production collaborator set, built once from the shared credential
/// chain and handed to the handler by the caller.
pub struct AwsClients {
    pub billing: billing::CostExplorerBilling,
    pub compute: compute::Ec2Compute,
    pub database: database::RdsDatabase,
    pub storage: storage::S3Storage,
    pub functions: functions::LambdaFunctions,
    pub notifier: notify::SnsNotifier,
}

impl AwsClients {
    pub async fn new() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        Self {
            billing: billing::CostExplorerBilling::new(&config),
            compute: compute::Ec2Compute::new(&config),
            database: database::RdsDatabase::new(&config),
            storage: storage::S3Storage::new(&config),
            functions: functions::LambdaFunctions::new(&config),
            notifier: notify::SnsNotifier::new(&config),
        }
    }
}
