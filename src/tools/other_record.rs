use serde_json::Value;

use crate::store::EmployeeStore;
use crate::tools::{ERR_EMPLOYEE_NOT_FOUND, arg_string, error_output, record_output};
use crate::types::Identity;

/// Arbitrary employee lookup by id and name. Only advertised to the CISO
/// persona; the gating happens in the persona tool subsets.
pub fn fetch_other_record(
    args: &Value,
    store: &dyn EmployeeStore,
) -> anyhow::Result<(Value, Option<Identity>)> {
    let (Some(employee_id), Some(employee_name)) =
        (arg_string(args, "employee_id"), arg_string(args, "employee_name"))
    else {
        return Ok((error_output(ERR_EMPLOYEE_NOT_FOUND), None));
    };
    let output = match store.get_record(&employee_id, &employee_name)? {
        Some(record) => record_output(&record),
        None => error_output(ERR_EMPLOYEE_NOT_FOUND),
    };
    Ok((output, None))
}
