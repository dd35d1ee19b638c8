use serde_json::Value;

use crate::store::EmployeeStore;
use crate::types::Identity;

/// Aggregate training statistics over the whole store.
pub fn fetch_summary_statistics(
    store: &dyn EmployeeStore,
) -> anyhow::Result<(Value, Option<Identity>)> {
    let summary = store.get_summary()?;
    Ok((serde_json::to_value(summary)?, None))
}
