/// Everything the Auto Scaling API needs to release a paused lifecycle action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleCompletion {
    pub lifecycle_hook_name: String,
    pub auto_scaling_group_name: String,
    pub lifecycle_action_token: String,
    pub lifecycle_action_result: String,
}

pub trait LifecycleHookApi {
    fn complete_lifecycle_action(&self, completion: &LifecycleCompletion) -> Result<(), String>;
}
