//! Error taxonomy for knowledge lookups and tool calls.

use thiserror::Error;

/// Failures raised by the [`KnowledgeStore`](crate::KnowledgeStore).
#[derive(Error, Debug)]
pub enum KnowledgeError {
    /// The requested title is not a key of the store.
    #[error("unknown topic: {topic}")]
    NotFound { topic: String },

    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures raised by tool dispatch and the in-memory transport.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error("transport error: {0}")]
    Transport(String),
}

impl ToolError {
    /// True when the failure is a store lookup miss (a data-integrity problem, not user input).
    pub fn is_not_found(&self) -> bool {
        matches!(self, ToolError::Knowledge(KnowledgeError::NotFound { .. }))
    }
}
