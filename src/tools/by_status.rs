use serde_json::Value;

use crate::store::{EmployeeStore, TrainingStatus};
use crate::tools::{arg_string, employees_output};
use crate::types::Identity;

/// Scan for all employees in a given training status. An unknown status
/// string reads as an empty scan, reported in the output payload.
pub fn fetch_records_by_status(
    args: &Value,
    store: &dyn EmployeeStore,
) -> anyhow::Result<(Value, Option<Identity>)> {
    let status = arg_string(args, "status").and_then(|raw| TrainingStatus::parse(&raw));
    let Some(status) = status else {
        return Ok((employees_output(&[]), None));
    };
    let records = store.get_by_status(status)?;
    Ok((employees_output(&records), None))
}
