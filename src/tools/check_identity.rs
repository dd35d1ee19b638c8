use serde_json::Value;

use crate::store::EmployeeStore;
use crate::tools::arg_string;
use crate::types::Identity;

/// Existence check against the store. The checked id/name become a resolved
/// identity only when the record exists; a failed check resolves nothing.
pub fn check_identity(
    args: &Value,
    store: &dyn EmployeeStore,
) -> anyhow::Result<(Value, Option<Identity>)> {
    let (Some(employee_id), Some(employee_name)) =
        (arg_string(args, "employee_id"), arg_string(args, "employee_name"))
    else {
        return Ok((serde_json::json!({ "exists": false }), None));
    };

    let exists = store.exists(&employee_id, &employee_name)?;
    let identity = exists.then(|| Identity {
        employee_id,
        employee_name,
    });
    Ok((serde_json::json!({ "exists": exists }), identity))
}
