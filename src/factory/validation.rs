use super::record::OutputRecord;

/// Something wrong with a series, located by hour
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub hour: u64,
    pub column: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hour {}: {}: {}", self.hour, self.column, self.message)
    }
}

const UNIT_COLUMNS: [&str; 4] = ["OEE", "availability", "performance", "quality"];
const NON_NEGATIVE_COLUMNS: [&str; 4] = ["rawInventory", "wip", "finishedInventory", "MTBF"];
const OEE_TOLERANCE: f64 = 1e-12;

/// Check a series against the invariants every emitted series satisfies
pub fn validate_series(records: &[OutputRecord]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut issue = |hour, column, message: String| {
        issues.push(ValidationIssue {
            hour,
            column,
            message,
        })
    };

    let mut previous: Option<&OutputRecord> = None;
    for (index, record) in records.iter().enumerate() {
        let hour = record.hour;
        if hour != index as u64 {
            issue(hour, "hour", format!("expected hour {}", index));
        }

        for (column, value) in record.float_columns() {
            if !value.is_finite() {
                issue(hour, column, format!("non-finite value {}", value));
            } else if UNIT_COLUMNS.contains(&column) && !(0.0..=1.0).contains(&value) {
                issue(hour, column, format!("{} outside [0, 1]", value));
            } else if NON_NEGATIVE_COLUMNS.contains(&column) && value < 0.0 {
                issue(hour, column, format!("negative value {}", value));
            }
        }

        let product = record.availability * record.performance * record.quality;
        if (record.oee - product).abs() > OEE_TOLERANCE {
            issue(
                hour,
                "OEE",
                format!("{} differs from A*P*Q = {}", record.oee, product),
            );
        }
        if !(0.0..=1.5).contains(&record.voltage) {
            issue(hour, "voltage", format!("{} outside [0, 1.5]", record.voltage));
        }
        if record.shift > 2 {
            issue(hour, "shift", format!("unknown shift {}", record.shift));
        }
        if record.maintenance_flag > 1 {
            issue(hour, "maintenanceFlag", format!("{} is not a flag", record.maintenance_flag));
        }
        if record.downtime_flag > 1 {
            issue(hour, "downtimeFlag", format!("{} is not a flag", record.downtime_flag));
        }
        if let Some(prev) = previous {
            if record.finished_inventory < prev.finished_inventory {
                issue(
                    hour,
                    "finishedInventory",
                    format!(
                        "decreased from {} to {}",
                        prev.finished_inventory, record.finished_inventory
                    ),
                );
            }
        }
        previous = Some(record);
    }
    issues
}
