use crate::tool_registry::{
    TOOL_CHECK_IDENTITY, TOOL_FETCH_OTHER_RECORD, TOOL_FETCH_OWN_RECORD, TOOL_FETCH_OWN_STATUS,
    TOOL_FETCH_RECORDS_BY_STATUS, TOOL_FETCH_SUMMARY_STATISTICS,
};

const INSTRUCTION_AUTHENTICATE: &str = "user must give you his name and his id. if user gives \
     you these 2, use the tool to check if the employee exists in the database. if the employee \
     exists, ask user what can you do for him. if the employee does not exist, return an error \
     message. tone: keep insisting";

const INSTRUCTION_TRAINING_ASSISTANT: &str = "you are a helpful cybersecurity training \
     assistant. you are given a message from {user_type} and you need to answer the question. \
     if the question is not related to the training, you need to say that you are not sure \
     about the answer and you will ask the employee to contact the training team. tone: \
     friendly and helpful";

/// A persona is an instruction string, an allowed tool subset and a tool-call
/// budget, selected per request by the role router.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Persona {
    Authentication,
    Employee,
    Ciso,
}

impl Persona {
    pub fn name(&self) -> &'static str {
        match self {
            Persona::Authentication => "authentication",
            Persona::Employee => "employee",
            Persona::Ciso => "ciso",
        }
    }

    pub fn instructions(&self) -> String {
        match self {
            Persona::Authentication => INSTRUCTION_AUTHENTICATE.to_string(),
            Persona::Employee => {
                INSTRUCTION_TRAINING_ASSISTANT.replace("{user_type}", "an employee")
            }
            Persona::Ciso => INSTRUCTION_TRAINING_ASSISTANT.replace("{user_type}", "the ciso"),
        }
    }

    /// The only place tool availability is gated per role.
    pub fn allowed_tools(&self) -> &'static [&'static str] {
        match self {
            Persona::Authentication => &[TOOL_CHECK_IDENTITY],
            Persona::Employee => &[TOOL_FETCH_OWN_RECORD, TOOL_FETCH_OWN_STATUS],
            Persona::Ciso => &[
                TOOL_FETCH_SUMMARY_STATISTICS,
                TOOL_FETCH_OWN_RECORD,
                TOOL_FETCH_RECORDS_BY_STATUS,
                TOOL_FETCH_OTHER_RECORD,
            ],
        }
    }

    /// Policy limit on tool invocations per pass, forwarded with the call.
    pub fn max_tool_calls(&self) -> u32 {
        match self {
            Persona::Authentication | Persona::Employee => 1,
            Persona::Ciso => 3,
        }
    }
}
