use serde_json::Value;

use crate::error::BackendError;
use crate::store::EmployeeStore;
use crate::tools;
use crate::types::Identity;

pub const TOOL_CHECK_IDENTITY: &str = "check_identity";
pub const TOOL_FETCH_OWN_RECORD: &str = "fetch_own_record";
pub const TOOL_FETCH_OWN_STATUS: &str = "fetch_own_status";
pub const TOOL_FETCH_SUMMARY_STATISTICS: &str = "fetch_summary_statistics";
pub const TOOL_FETCH_RECORDS_BY_STATUS: &str = "fetch_records_by_status";
pub const TOOL_FETCH_OTHER_RECORD: &str = "fetch_other_record";

/// Fixed table of tool schemas plus the name-to-handler dispatch, resolved at
/// startup. Handlers share one signature: (arguments, current identity,
/// store) to (JSON output, optional resolved identity).
pub struct ToolRegistry {
    schemas: Vec<Value>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        // Single source of truth for the tool schemas the model sees.
        let schemas = vec![
            serde_json::json!({
                "type": "function",
                "function": {
                    "name": TOOL_CHECK_IDENTITY,
                    "description":
                        "Check if an employee exists in the database by their employee ID and \
                         employee name. Use this tool to verify employee credentials before \
                         allowing access.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "employee_id": {
                                "type": "string",
                                "description": "The unique employee ID to check"
                            },
                            "employee_name": {
                                "type": "string",
                                "description": "The employee's name to check"
                            }
                        },
                        "required": ["employee_id", "employee_name"]
                    }
                }
            }),
            serde_json::json!({
                "type": "function",
                "function": {
                    "name": TOOL_FETCH_OWN_RECORD,
                    "description":
                        "Fetch the current employee's personal data and their per-video \
                         training progress, including the derived training status.",
                    "parameters": {
                        "type": "object",
                        "properties": {},
                        "required": []
                    }
                }
            }),
            serde_json::json!({
                "type": "function",
                "function": {
                    "name": TOOL_FETCH_OWN_STATUS,
                    "description":
                        "Fetch only the current employee's training status: NOT_STARTED, \
                         IN_PROGRESS or FINISHED.",
                    "parameters": {
                        "type": "object",
                        "properties": {},
                        "required": []
                    }
                }
            }),
            serde_json::json!({
                "type": "function",
                "function": {
                    "name": TOOL_FETCH_SUMMARY_STATISTICS,
                    "description":
                        "Summary statistics over all employees' training: counts per status, \
                         minimum/maximum/average days to finish, and the fastest and slowest \
                         employees.",
                    "parameters": {
                        "type": "object",
                        "properties": {},
                        "required": []
                    }
                }
            }),
            serde_json::json!({
                "type": "function",
                "function": {
                    "name": TOOL_FETCH_RECORDS_BY_STATUS,
                    "description":
                        "List all employees whose training is in the given status.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "status": {
                                "type": "string",
                                "enum": ["NOT_STARTED", "IN_PROGRESS", "FINISHED"],
                                "description": "The training status to filter by"
                            }
                        },
                        "required": ["status"]
                    }
                }
            }),
            serde_json::json!({
                "type": "function",
                "function": {
                    "name": TOOL_FETCH_OTHER_RECORD,
                    "description":
                        "Fetch another employee's personal data and training progress by \
                         their employee ID and name.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "employee_id": {
                                "type": "string",
                                "description": "The employee ID to look up"
                            },
                            "employee_name": {
                                "type": "string",
                                "description": "The employee name to look up"
                            }
                        },
                        "required": ["employee_id", "employee_name"]
                    }
                }
            }),
        ];
        Self { schemas }
    }

    /// Schemas for one persona's allowed subset, in table order.
    pub fn schemas_for(&self, allowed: &[&str]) -> Value {
        Value::Array(
            self.schemas
                .iter()
                .filter(|schema| {
                    schema["function"]["name"]
                        .as_str()
                        .is_some_and(|name| allowed.contains(&name))
                })
                .cloned()
                .collect(),
        )
    }

    /// Execute one named tool invocation. A malformed arguments payload
    /// degrades to empty arguments and the handler reports its own error
    /// output; an unknown tool name is a hard error that fails the pass.
    pub fn dispatch(
        &self,
        name: &str,
        raw_arguments: &str,
        identity: Option<&Identity>,
        store: &dyn EmployeeStore,
    ) -> anyhow::Result<(Value, Option<Identity>)> {
        let args: Value =
            serde_json::from_str(raw_arguments).unwrap_or_else(|_| serde_json::json!({}));

        match name {
            TOOL_CHECK_IDENTITY => tools::check_identity(&args, store),
            TOOL_FETCH_OWN_RECORD => tools::fetch_own_record(identity, store),
            TOOL_FETCH_OWN_STATUS => tools::fetch_own_status(identity, store),
            TOOL_FETCH_SUMMARY_STATISTICS => tools::fetch_summary_statistics(store),
            TOOL_FETCH_RECORDS_BY_STATUS => tools::fetch_records_by_status(&args, store),
            TOOL_FETCH_OTHER_RECORD => tools::fetch_other_record(&args, store),
            other => Err(BackendError::UnknownTool(other.to_string()).into()),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
