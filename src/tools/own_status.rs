use serde_json::Value;

use crate::store::EmployeeStore;
use crate::tools::{ERR_STATUS_NOT_FOUND, error_output};
use crate::types::Identity;

/// Derived training status only, for the already authenticated caller.
pub fn fetch_own_status(
    identity: Option<&Identity>,
    store: &dyn EmployeeStore,
) -> anyhow::Result<(Value, Option<Identity>)> {
    let Some(identity) = identity else {
        return Ok((error_output(ERR_STATUS_NOT_FOUND), None));
    };
    let output = match store.get_status(&identity.employee_id, &identity.employee_name)? {
        Some(status) => serde_json::json!({ "training_status": status.as_str() }),
        None => error_output(ERR_STATUS_NOT_FOUND),
    };
    Ok((output, None))
}
