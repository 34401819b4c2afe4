use aws_sdk_ec2::types::{Filter, NetworkInterfaceAttachmentChanges};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use mgmt_interface_core::contract::MANAGEMENT_DEVICE_INDEX;
use mgmt_interface_lambda::adapters::network::{InstancePlacement, NetworkApi};
use mgmt_interface_lambda::adapters::scaling::{LifecycleCompletion, LifecycleHookApi};
use mgmt_interface_lambda::handlers::launch::{
    handle_launch_event, LaunchHandlerConfig, LaunchOutcome,
};
use serde_json::Value;

struct Ec2NetworkApi {
    ec2_client: aws_sdk_ec2::Client,
}

impl NetworkApi for Ec2NetworkApi {
    fn instance_placement(&self, instance_id: &str) -> Result<InstancePlacement, String> {
        let client = self.ec2_client.clone();
        let instance_id = instance_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .describe_instances()
                    .instance_ids(instance_id.clone())
                    .send()
                    .await
                    .map_err(|error| {
                        format!("failed to describe instance {instance_id}: {error}")
                    })?;

                let instance = output
                    .reservations()
                    .first()
                    .and_then(|reservation| reservation.instances().first())
                    .ok_or_else(|| format!("no reservation found for instance {instance_id}"))?;

                let subnet_id = instance
                    .subnet_id()
                    .ok_or_else(|| format!("instance {instance_id} carries no subnet id"))?
                    .to_string();
                let availability_zone = instance
                    .placement()
                    .and_then(|placement| placement.availability_zone())
                    .map(str::to_string);

                Ok(InstancePlacement {
                    subnet_id,
                    availability_zone,
                })
            })
        })
    }

    fn subnet_name_tag(&self, subnet_id: &str) -> Result<Option<String>, String> {
        let client = self.ec2_client.clone();
        let subnet_id = subnet_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .describe_subnets()
                    .filters(
                        Filter::builder()
                            .name("subnet-id")
                            .values(subnet_id.clone())
                            .build(),
                    )
                    .send()
                    .await
                    .map_err(|error| format!("failed to describe subnet {subnet_id}: {error}"))?;

                let Some(subnet) = output.subnets().first() else {
                    return Ok(None);
                };

                Ok(subnet
                    .tags()
                    .iter()
                    .find(|tag| tag.key() == Some("Name"))
                    .and_then(|tag| tag.value())
                    .map(str::to_string))
            })
        })
    }

    fn subnet_id_by_name_tag(&self, subnet_name: &str) -> Result<Option<String>, String> {
        let client = self.ec2_client.clone();
        let subnet_name = subnet_name.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .describe_subnets()
                    .filters(
                        Filter::builder()
                            .name("tag:Name")
                            .values(subnet_name.clone())
                            .build(),
                    )
                    .send()
                    .await
                    .map_err(|error| {
                        format!("failed to describe subnet named {subnet_name}: {error}")
                    })?;

                Ok(output
                    .subnets()
                    .first()
                    .and_then(|subnet| subnet.subnet_id())
                    .map(str::to_string))
            })
        })
    }

    fn create_interface(
        &self,
        subnet_id: &str,
        security_group_ids: &[String],
    ) -> Result<String, String> {
        let client = self.ec2_client.clone();
        let subnet_id = subnet_id.to_string();
        let security_group_ids = security_group_ids.to_vec();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .create_network_interface()
                    .subnet_id(subnet_id)
                    .set_groups(Some(security_group_ids))
                    .send()
                    .await
                    .map_err(|error| format!("failed to create network interface: {error}"))?;

                output
                    .network_interface()
                    .and_then(|interface| interface.network_interface_id())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        "create-network-interface response carried no interface id".to_string()
                    })
            })
        })
    }

    fn attach_interface(
        &self,
        interface_id: &str,
        instance_id: &str,
        device_index: i32,
    ) -> Result<String, String> {
        let client = self.ec2_client.clone();
        let interface_id = interface_id.to_string();
        let instance_id = instance_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .attach_network_interface()
                    .network_interface_id(interface_id)
                    .instance_id(instance_id)
                    .device_index(device_index)
                    .send()
                    .await
                    .map_err(|error| format!("failed to attach network interface: {error}"))?;

                output
                    .attachment_id()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        "attach-network-interface response carried no attachment id".to_string()
                    })
            })
        })
    }

    fn enable_delete_on_termination(
        &self,
        interface_id: &str,
        attachment_id: &str,
    ) -> Result<(), String> {
        let client = self.ec2_client.clone();
        let interface_id = interface_id.to_string();
        let attachment_id = attachment_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .modify_network_interface_attribute()
                    .network_interface_id(interface_id)
                    .attachment(
                        NetworkInterfaceAttachmentChanges::builder()
                            .attachment_id(attachment_id)
                            .delete_on_termination(true)
                            .build(),
                    )
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        format!("failed to set delete-on-termination on attachment: {error}")
                    })
            })
        })
    }

    fn delete_interface(&self, interface_id: &str) -> Result<(), String> {
        let client = self.ec2_client.clone();
        let interface_id = interface_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .delete_network_interface()
                    .network_interface_id(interface_id.clone())
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        format!("failed to delete network interface {interface_id}: {error}")
                    })
            })
        })
    }
}

struct AsgLifecycleApi {
    asg_client: aws_sdk_autoscaling::Client,
}

impl LifecycleHookApi for AsgLifecycleApi {
    fn complete_lifecycle_action(&self, completion: &LifecycleCompletion) -> Result<(), String> {
        let client = self.asg_client.clone();
        let completion = completion.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .complete_lifecycle_action()
                    .lifecycle_hook_name(completion.lifecycle_hook_name)
                    .auto_scaling_group_name(completion.auto_scaling_group_name)
                    .lifecycle_action_token(completion.lifecycle_action_token)
                    .lifecycle_action_result(completion.lifecycle_action_result)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to complete lifecycle action: {error}"))
            })
        })
    }
}

fn security_group_ids_from_env() -> Result<Vec<String>, Error> {
    let raw = std::env::var("security_group_ids")
        .map_err(|_| Error::from("security_group_ids must be configured"))?;

    let ids = raw
        .split(',')
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>();

    if ids.is_empty() {
        return Err(Error::from(
            "security_group_ids must contain at least one security group id",
        ));
    }

    Ok(ids)
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<LaunchOutcome, Error> {
    let config = LaunchHandlerConfig {
        security_group_ids: security_group_ids_from_env()?,
        device_index: MANAGEMENT_DEVICE_INDEX,
    };

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let network = Ec2NetworkApi {
        ec2_client: aws_sdk_ec2::Client::new(&aws_config),
    };
    let hooks = AsgLifecycleApi {
        asg_client: aws_sdk_autoscaling::Client::new(&aws_config),
    };

    handle_launch_event(event.payload, &config, &network, &hooks)
        .map_err(|error| Error::from(error.message().to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
