use async_trait::async_trait;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::Reservation;

use crate::core::error::QueryError;
use crate::core::models::resources::{Instance, InstanceGroup};
use crate::core::resources::ComputeApi;

const API: &str = "ec2";

pub struct Ec2Compute {
    client: aws_sdk_ec2::Client,
}

impl Ec2Compute {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_ec2::Client::new(config),
        }
    }
}

#[async_trait]
impl ComputeApi for Ec2Compute {
    // First page only; pagination is out of scope for this report.
    async fn describe_instances(&self) -> Result<Vec<InstanceGroup>, QueryError> {
        let response = self
            .client
            .describe_instances()
            .send()
            .await
            .map_err(|err| QueryError::upstream(API, DisplayErrorContext(err)))?;

        Ok(flatten_reservations(response.reservations()))
    }
}

/// Keep the reservation grouping but reduce each instance to its state
/// string, which is all the census looks at.
fn flatten_reservations(reservations: &[Reservation]) -> Vec<InstanceGroup> {
    reservations
        .iter()
        .map(|reservation| InstanceGroup {
            instances: reservation
                .instances()
                .iter()
                .map(|instance| Instance {
                    state: instance
                        .state()
                        .and_then(|state| state.name())
                        .map(|name| name.as_str().to_string())
                        .unwrap_or_default(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::{InstanceState, InstanceStateName};

    fn reservation(states: &[InstanceStateName]) -> Reservation {
        let mut builder = Reservation::builder();
        for state in states {
            builder = builder.instances(
                aws_sdk_ec2::types::Instance::builder()
                    .state(InstanceState::builder().name(state.clone()).build())
                    .build(),
            );
        }
        builder.build()
    }

    #[test]
    fn flatten_keeps_reservation_grouping() {
        let reservations = vec![
            reservation(&[InstanceStateName::Running, InstanceStateName::Stopped]),
            reservation(&[InstanceStateName::Running]),
        ];

        let groups = flatten_reservations(&reservations);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].instances.len(), 2);
        assert_eq!(groups[0].instances[0].state, "running");
        assert_eq!(groups[0].instances[1].state, "stopped");
        assert_eq!(groups[1].instances[0].state, "running");
    }

    #[test]
    fn flatten_defaults_missing_state_to_empty() {
        let reservations = vec![Reservation::builder()
            .instances(aws_sdk_ec2::types::Instance::builder().build())
            .build()];

        let groups = flatten_reservations(&reservations);
        assert_eq!(groups[0].instances[0].state, "");
    }
}
