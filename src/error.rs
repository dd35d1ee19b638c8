use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The model asked for a tool this backend never advertised. That is a
    /// contract violation, not a recoverable condition, so it aborts the
    /// whole orchestration pass.
    #[error("unrecognized tool '{0}' requested by the model")]
    UnknownTool(String),

    #[error("malformed model reply: {0}")]
    MalformedResponse(String),
}
