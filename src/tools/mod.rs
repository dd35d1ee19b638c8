mod by_status;
mod check_identity;
mod other_record;
mod own_record;
mod own_status;
mod statistics;

pub use by_status::fetch_records_by_status;
pub use check_identity::check_identity;
pub use other_record::fetch_other_record;
pub use own_record::fetch_own_record;
pub use own_status::fetch_own_status;
pub use statistics::fetch_summary_statistics;

use serde_json::Value;

use crate::store::{DATE_FORMAT, EmployeeRecord, VIDEO_NAMES};

pub(crate) const ERR_EMPLOYEE_NOT_FOUND: &str = "Employee data not found";
pub(crate) const ERR_STATUS_NOT_FOUND: &str = "Training status not found";
pub(crate) const ERR_NO_EMPLOYEES_WITH_STATUS: &str = "No employees found with this status";

/// Read a string-ish argument; the model occasionally sends ids as numbers.
pub(crate) fn arg_string(args: &Value, key: &str) -> Option<String> {
    match &args[key] {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn error_output(message: &str) -> Value {
    serde_json::json!({ "error": message })
}

/// Full record payload: personal data, per-video timings and the derived
/// training status.
pub(crate) fn record_output(record: &EmployeeRecord) -> Value {
    let fmt = |t: Option<chrono::NaiveDateTime>| -> Value {
        match t {
            Some(t) => Value::String(t.format(DATE_FORMAT).to_string()),
            None => Value::Null,
        }
    };

    let mut videos = serde_json::Map::new();
    for (i, video) in VIDEO_NAMES.iter().enumerate() {
        videos.insert(
            video.to_string(),
            serde_json::json!({
                "started_at": fmt(record.starts[i]),
                "finished_at": fmt(record.finishes[i]),
                "days_to_finish": record.video_days(i),
            }),
        );
    }

    serde_json::json!({
        "personal_data": {
            "employee_id": record.employee_id,
            "employee_name": record.employee_name,
            "employee_last_name": record.employee_last_name,
            "employee_division": record.employee_division,
        },
        "videos": videos,
        "training_status": record.status().as_str(),
    })
}

/// Listing payload for a status scan; an empty scan keeps the list and count
/// fields so the model can still read a consistent shape.
pub(crate) fn employees_output(records: &[EmployeeRecord]) -> Value {
    if records.is_empty() {
        return serde_json::json!({
            "error": ERR_NO_EMPLOYEES_WITH_STATUS,
            "employees": [],
            "count": 0,
        });
    }
    let employees: Vec<Value> = records
        .iter()
        .map(|record| {
            serde_json::json!({
                "employee_id": record.employee_id,
                "employee_name": record.employee_name,
                "employee_last_name": record.employee_last_name,
                "employee_division": record.employee_division,
            })
        })
        .collect();
    serde_json::json!({ "employees": employees, "count": records.len() })
}
