//! Column names of the pour and material datasets.

pub const BATCH_START_TIME: &str = "payload_event_batch_start_time";
pub const BATCH_END_TIME: &str = "payload_event_batch_end_time";
pub const DEPARTURE_TIME: &str = "payload_event_departure_time";
pub const ARRIVAL_TIME: &str = "payload_event_arrival_time";
pub const POURING_START_TIME: &str = "payload_event_pouring_start_time";
pub const POURING_FINISH_TIME: &str = "payload_event_pouring_finish_time";
pub const QUANTITY: &str = "quantity";

/// Timestamp columns of the pour dataset, in pipeline order.
pub const POUR_TIMESTAMP_COLUMNS: [&str; 6] = [
    BATCH_START_TIME,
    BATCH_END_TIME,
    DEPARTURE_TIME,
    ARRIVAL_TIME,
    POURING_START_TIME,
    POURING_FINISH_TIME,
];

/// Every column the pour dataset must carry.
pub const POUR_REQUIRED_COLUMNS: [&str; 7] = [
    BATCH_START_TIME,
    BATCH_END_TIME,
    DEPARTURE_TIME,
    ARRIVAL_TIME,
    POURING_START_TIME,
    POURING_FINISH_TIME,
    QUANTITY,
];

pub const MATERIAL: &str = "material";
pub const REQUIRED_QTY: &str = "required_qty";
pub const BATCHED_QTY: &str = "batched_qty";

/// Every column the material dataset must carry.
pub const MATERIAL_REQUIRED_COLUMNS: [&str; 3] = [MATERIAL, REQUIRED_QTY, BATCHED_QTY];

/// Returns the required columns that are not present in `available`.
pub fn missing_columns<S: AsRef<str>>(required: &[&str], available: &[S]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !available.iter().any(|a| a.as_ref() == **name))
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_reports_in_required_order() {
        let available = vec!["material", "batched_qty"];
        assert_eq!(
            missing_columns(&MATERIAL_REQUIRED_COLUMNS, &available),
            vec!["required_qty".to_string()]
        );
    }

    #[test]
    fn test_no_missing_columns() {
        let available: Vec<String> = POUR_REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect();
        assert!(missing_columns(&POUR_REQUIRED_COLUMNS, &available).is_empty());
    }
}
