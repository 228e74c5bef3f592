use thiserror::Error;

/// Failure of a tool call, as handed to `on_tool_error` callbacks.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("user declined call {call_id}")]
    Declined { call_id: String },
    #[error("execution failed: {0}")]
    Execution(String),
}
