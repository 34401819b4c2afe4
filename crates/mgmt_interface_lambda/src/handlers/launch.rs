use mgmt_interface_core::contract::{
    parse_launch_event, LaunchDetail, ValidationError, LIFECYCLE_RESULT_CONTINUE,
};
use mgmt_interface_core::subnet_naming::management_subnet_name;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::network::NetworkApi;
use crate::adapters::scaling::{LifecycleCompletion, LifecycleHookApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchHandlerConfig {
    pub security_group_ids: Vec<String>,
    pub device_index: i32,
}

pub const STATUS_ATTACHED: &str = "attached";
pub const STATUS_DEGRADED: &str = "degraded";
pub const STATUS_IGNORED: &str = "ignored";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_id: Option<String>,
    pub interface_deleted: bool,
    pub lifecycle_completed: bool,
}

impl LaunchOutcome {
    fn ignored() -> Self {
        Self {
            status: STATUS_IGNORED.to_string(),
            instance_id: None,
            management_subnet_id: None,
            interface_id: None,
            attachment_id: None,
            interface_deleted: false,
            lifecycle_completed: false,
        }
    }
}

/// Orchestrates the instance-launch lifecycle action.
///
/// Every provisioning step is individually fenced: a failed call is logged
/// and leaves its identifier absent, which makes the remaining steps skip
/// themselves. The lifecycle hook is acknowledged with `CONTINUE` on every
/// path that reaches it, even when provisioning failed; the instance is
/// allowed to proceed and the degraded outcome is only logged.
pub fn handle_launch_event(
    event: Value,
    config: &LaunchHandlerConfig,
    network: &dyn NetworkApi,
    hooks: &dyn LifecycleHookApi,
) -> Result<LaunchOutcome, ValidationError> {
    let Some(detail) = parse_launch_event(event)? else {
        log_info(
            "event_ignored",
            json!({"reason": "detail-type is not an instance-launch lifecycle action"}),
        );
        return Ok(LaunchOutcome::ignored());
    };

    let management_subnet_id = resolve_management_subnet(&detail.instance_id, network);
    let interface_id = create_management_interface(management_subnet_id.as_deref(), config, network);
    let attachment_id = attach_management_interface(
        interface_id.as_deref(),
        &detail.instance_id,
        config,
        network,
    );

    if let (Some(interface_id), Some(attachment_id)) = (&interface_id, &attachment_id) {
        match network.enable_delete_on_termination(interface_id, attachment_id) {
            Ok(()) => log_info(
                "delete_on_termination_enabled",
                json!({
                    "interface_id": interface_id,
                    "attachment_id": attachment_id,
                }),
            ),
            Err(error) => log_error(
                "delete_on_termination_failed",
                json!({
                    "interface_id": interface_id,
                    "attachment_id": attachment_id,
                    "error": error,
                }),
            ),
        }
    }

    let mut interface_deleted = false;
    if let (Some(interface_id), None) = (&interface_id, &attachment_id) {
        log_info(
            "interface_cleanup_started",
            json!({"interface_id": interface_id}),
        );
        match network.delete_interface(interface_id) {
            Ok(()) => {
                interface_deleted = true;
                log_info("interface_deleted", json!({"interface_id": interface_id}));
            }
            Err(error) => log_error(
                "interface_delete_failed",
                json!({"interface_id": interface_id, "error": error}),
            ),
        }
    }

    let lifecycle_completed = acknowledge_lifecycle(&detail, attachment_id.is_some(), hooks);

    let status = if attachment_id.is_some() {
        STATUS_ATTACHED
    } else {
        STATUS_DEGRADED
    };

    Ok(LaunchOutcome {
        status: status.to_string(),
        instance_id: Some(detail.instance_id),
        management_subnet_id,
        interface_id,
        attachment_id,
        interface_deleted,
        lifecycle_completed,
    })
}

fn resolve_management_subnet(instance_id: &str, network: &dyn NetworkApi) -> Option<String> {
    let placement = match network.instance_placement(instance_id) {
        Ok(value) => value,
        Err(error) => {
            log_error(
                "describe_instance_failed",
                json!({"instance_id": instance_id, "error": error}),
            );
            return None;
        }
    };

    let data_subnet_name = match network.subnet_name_tag(&placement.subnet_id) {
        Ok(Some(value)) => value,
        Ok(None) => {
            log_error(
                "subnet_name_missing",
                json!({"instance_id": instance_id, "subnet_id": placement.subnet_id}),
            );
            return None;
        }
        Err(error) => {
            log_error(
                "describe_subnet_failed",
                json!({
                    "instance_id": instance_id,
                    "subnet_id": placement.subnet_id,
                    "error": error,
                }),
            );
            return None;
        }
    };

    let management_name = management_subnet_name(&data_subnet_name);
    match network.subnet_id_by_name_tag(&management_name) {
        Ok(Some(subnet_id)) => {
            log_info(
                "management_subnet_resolved",
                json!({
                    "instance_id": instance_id,
                    "availability_zone": placement.availability_zone,
                    "subnet_name": management_name,
                    "subnet_id": subnet_id,
                }),
            );
            Some(subnet_id)
        }
        Ok(None) => {
            log_error(
                "management_subnet_not_found",
                json!({"instance_id": instance_id, "subnet_name": management_name}),
            );
            None
        }
        Err(error) => {
            log_error(
                "describe_subnet_failed",
                json!({
                    "instance_id": instance_id,
                    "subnet_name": management_name,
                    "error": error,
                }),
            );
            None
        }
    }
}

fn create_management_interface(
    subnet_id: Option<&str>,
    config: &LaunchHandlerConfig,
    network: &dyn NetworkApi,
) -> Option<String> {
    let subnet_id = subnet_id?;
    match network.create_interface(subnet_id, &config.security_group_ids) {
        Ok(interface_id) => {
            log_info(
                "interface_created",
                json!({"subnet_id": subnet_id, "interface_id": interface_id}),
            );
            Some(interface_id)
        }
        Err(error) => {
            log_error(
                "interface_create_failed",
                json!({"subnet_id": subnet_id, "error": error}),
            );
            None
        }
    }
}

fn attach_management_interface(
    interface_id: Option<&str>,
    instance_id: &str,
    config: &LaunchHandlerConfig,
    network: &dyn NetworkApi,
) -> Option<String> {
    let interface_id = interface_id?;
    match network.attach_interface(interface_id, instance_id, config.device_index) {
        Ok(attachment_id) => {
            log_info(
                "interface_attached",
                json!({
                    "interface_id": interface_id,
                    "instance_id": instance_id,
                    "attachment_id": attachment_id,
                }),
            );
            Some(attachment_id)
        }
        Err(error) => {
            log_error(
                "interface_attach_failed",
                json!({
                    "interface_id": interface_id,
                    "instance_id": instance_id,
                    "error": error,
                }),
            );
            None
        }
    }
}

fn acknowledge_lifecycle(
    detail: &LaunchDetail,
    attachment_exists: bool,
    hooks: &dyn LifecycleHookApi,
) -> bool {
    let completion = LifecycleCompletion {
        lifecycle_hook_name: detail.lifecycle_hook_name.clone(),
        auto_scaling_group_name: detail.auto_scaling_group_name.clone(),
        lifecycle_action_token: detail.lifecycle_action_token.clone(),
        lifecycle_action_result: LIFECYCLE_RESULT_CONTINUE.to_string(),
    };

    match hooks.complete_lifecycle_action(&completion) {
        Ok(()) => {
            if attachment_exists {
                log_info(
                    "management_interface_provisioned",
                    json!({"instance_id": detail.instance_id}),
                );
            } else {
                log_error(
                    "management_interface_provisioning_failed",
                    json!({"instance_id": detail.instance_id}),
                );
            }
            true
        }
        Err(error) => {
            log_error(
                "lifecycle_completion_failed",
                json!({"instance_id": detail.instance_id, "error": error}),
            );
            println!("{}", json!({"Error": "1"}));
            false
        }
    }
}

fn log_info(event: &str, details: Value) {
    println!(
        "{}",
        json!({
            "component": "launch_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_error(event: &str, details: Value) {
    println!(
        "{}",
        json!({
            "component": "launch_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
