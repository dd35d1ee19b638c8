use serde_json::Value;

use crate::store::EmployeeStore;
use crate::tools::{ERR_EMPLOYEE_NOT_FOUND, error_output, record_output};
use crate::types::Identity;

/// Full personal and training record for the already authenticated caller.
/// Takes no arguments; the identity comes from the orchestrator.
pub fn fetch_own_record(
    identity: Option<&Identity>,
    store: &dyn EmployeeStore,
) -> anyhow::Result<(Value, Option<Identity>)> {
    let Some(identity) = identity else {
        return Ok((error_output(ERR_EMPLOYEE_NOT_FOUND), None));
    };
    let output = match store.get_record(&identity.employee_id, &identity.employee_name)? {
        Some(record) => record_output(&record),
        None => error_output(ERR_EMPLOYEE_NOT_FOUND),
    };
    Ok((output, None))
}
