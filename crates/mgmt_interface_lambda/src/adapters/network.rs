/// Where an instance landed: its data subnet and availability zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstancePlacement {
    pub subnet_id: String,
    pub availability_zone: Option<String>,
}

/// Compute/networking control-plane calls the launch handler depends on.
///
/// Lookup methods distinguish "the API call failed" (`Err`) from "the API
/// answered but found nothing" (`Ok(None)`); the handler treats both as a
/// reason to skip downstream steps, but logs them differently.
pub trait NetworkApi {
    fn instance_placement(&self, instance_id: &str) -> Result<InstancePlacement, String>;

    fn subnet_name_tag(&self, subnet_id: &str) -> Result<Option<String>, String>;

    fn subnet_id_by_name_tag(&self, subnet_name: &str) -> Result<Option<String>, String>;

    fn create_interface(
        &self,
        subnet_id: &str,
        security_group_ids: &[String],
    ) -> Result<String, String>;

    fn attach_interface(
        &self,
        interface_id: &str,
        instance_id: &str,
        device_index: i32,
    ) -> Result<String, String>;

    fn enable_delete_on_termination(
        &self,
        interface_id: &str,
        attachment_id: &str,
    ) -> Result<(), String>;

    fn delete_interface(&self, interface_id: &str) -> Result<(), String>;
}
