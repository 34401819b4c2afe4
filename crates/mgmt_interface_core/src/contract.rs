use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LAUNCH_DETAIL_TYPE: &str = "EC2 Instance-launch Lifecycle Action";
pub const LIFECYCLE_RESULT_CONTINUE: &str = "CONTINUE";
pub const MANAGEMENT_DEVICE_INDEX: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LifecycleEvent {
    #[serde(rename = "detail-type")]
    pub detail_type: String,
    pub detail: LaunchDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchDetail {
    #[serde(rename = "EC2InstanceId")]
    pub instance_id: String,
    #[serde(rename = "LifecycleHookName")]
    pub lifecycle_hook_name: String,
    #[serde(rename = "AutoScalingGroupName")]
    pub auto_scaling_group_name: String,
    #[serde(rename = "LifecycleActionToken")]
    pub lifecycle_action_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Classifies and validates an incoming lifecycle event.
///
/// Returns `Ok(None)` when the event carries a detail-type other than the
/// instance-launch lifecycle action; such events are not an error, they are
/// simply not ours to act on. Launch events with missing or blank identifier
/// fields are rejected.
pub fn parse_launch_event(event: Value) -> Result<Option<LaunchDetail>, ValidationError> {
    if !event.is_object() {
        return Err(ValidationError::new("Event payload must be a JSON object"));
    }

    let Some(detail_type) = event.get("detail-type").and_then(Value::as_str) else {
        return Err(ValidationError::new(
            "Event payload must carry a detail-type string",
        ));
    };

    if detail_type != LAUNCH_DETAIL_TYPE {
        return Ok(None);
    }

    let event: LifecycleEvent = serde_json::from_value(event)
        .map_err(|error| ValidationError::new(format!("Malformed lifecycle event: {error}")))?;

    let detail = event.detail;
    require_field(&detail.instance_id, "EC2InstanceId")?;
    require_field(&detail.lifecycle_hook_name, "LifecycleHookName")?;
    require_field(&detail.auto_scaling_group_name, "AutoScalingGroupName")?;
    require_field(&detail.lifecycle_action_token, "LifecycleActionToken")?;

    Ok(Some(detail))
}

fn require_field(value: &str, name: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!("{name} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn launch_event() -> Value {
        json!({
            "detail-type": LAUNCH_DETAIL_TYPE,
            "detail": {
                "EC2InstanceId": "i-0abc123",
                "LifecycleHookName": "launch-hook",
                "AutoScalingGroupName": "vmseries-asg",
                "LifecycleActionToken": "token-1",
            }
        })
    }

    #[test]
    fn parses_launch_lifecycle_event() {
        let detail = parse_launch_event(launch_event())
            .expect("event should parse")
            .expect("launch event should produce a detail");

        assert_eq!(detail.instance_id, "i-0abc123");
        assert_eq!(detail.lifecycle_hook_name, "launch-hook");
        assert_eq!(detail.auto_scaling_group_name, "vmseries-asg");
        assert_eq!(detail.lifecycle_action_token, "token-1");
    }

    #[test]
    fn ignores_other_detail_types() {
        let event = json!({
            "detail-type": "EC2 Instance-terminate Lifecycle Action",
            "detail": {"EC2InstanceId": "i-0abc123"}
        });

        assert_eq!(parse_launch_event(event).expect("event should parse"), None);
    }

    #[test]
    fn rejects_event_without_detail_type() {
        let error = parse_launch_event(json!({"detail": {}})).expect_err("event should fail");
        assert_eq!(
            error.message(),
            "Event payload must carry a detail-type string"
        );
    }

    #[test]
    fn rejects_launch_event_missing_fields() {
        let event = json!({
            "detail-type": LAUNCH_DETAIL_TYPE,
            "detail": {
                "EC2InstanceId": "i-0abc123",
                "LifecycleHookName": "launch-hook",
            }
        });

        let error = parse_launch_event(event).expect_err("event should fail");
        assert!(error.message().starts_with("Malformed lifecycle event"));
    }

    #[test]
    fn rejects_launch_event_with_blank_instance_id() {
        let mut event = launch_event();
        event["detail"]["EC2InstanceId"] = Value::from("  ");

        let error = parse_launch_event(event).expect_err("event should fail");
        assert_eq!(error.message(), "EC2InstanceId cannot be empty");
    }

    #[test]
    fn rejects_non_object_payload() {
        let error = parse_launch_event(Value::from("launch")).expect_err("event should fail");
        assert_eq!(error.message(), "Event payload must be a JSON object");
    }
}
