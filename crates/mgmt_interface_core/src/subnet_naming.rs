pub const DATA_SUBNET_MARKER: &str = "data";
pub const MANAGEMENT_SUBNET_MARKER: &str = "mng";

/// Derives the management subnet Name from the data subnet Name by mapping
/// every `data` marker to `mng`. Names without the marker pass through
/// unchanged, which makes the later tag lookup resolve back to the same
/// subnet name and fail to find a management subnet.
pub fn management_subnet_name(data_subnet_name: &str) -> String {
    data_subnet_name.replace(DATA_SUBNET_MARKER, MANAGEMENT_SUBNET_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_data_marker_to_management_marker() {
        assert_eq!(management_subnet_name("vpc-a-data-1a"), "vpc-a-mng-1a");
    }

    #[test]
    fn maps_every_marker_occurrence() {
        assert_eq!(management_subnet_name("data-subnet-data"), "mng-subnet-mng");
    }

    #[test]
    fn passes_through_names_without_marker() {
        assert_eq!(management_subnet_name("vpc-a-public-1a"), "vpc-a-public-1a");
    }
}
