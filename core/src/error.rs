use serde::Serialize;
use utoipa::ToSchema;

/// Failure classes a tool invocation can end in. None of them is fatal to the
/// process; each is rendered back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Requested tool name is not registered.
    UnknownTool,
    /// Arguments failed schema validation.
    InvalidArguments,
    /// The document store could not supply the profile. Retryable.
    DocumentUnavailable,
    /// Unexpected failure inside a handler. Details stay in the logs.
    InternalFault,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::UnknownTool => codes::UNKNOWN_TOOL,
            ErrorKind::InvalidArguments => codes::INVALID_ARGUMENTS,
            ErrorKind::DocumentUnavailable => codes::DOCUMENT_UNAVAILABLE,
            ErrorKind::InternalFault => codes::INTERNAL_ERROR,
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::DocumentUnavailable)
    }
}

/// Structured error payload for agents.
/// Every error carries enough information for an agent to decide whether to
/// fix its arguments, retry, or give up.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ErrorPayload {
    /// Machine-readable error code (e.g. "invalid_arguments", "unknown_tool")
    pub error: String,
    /// Human/agent-readable description of what went wrong
    pub message: String,
    /// Which argument caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Hint about what the correct usage looks like
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
    /// Whether repeating the same call may succeed
    pub retryable: bool,
}

/// Error codes used across the tool surface
pub mod codes {
    pub const UNKNOWN_TOOL: &str = "unknown_tool";
    pub const INVALID_ARGUMENTS: &str = "invalid_arguments";
    pub const DOCUMENT_UNAVAILABLE: &str = "document_unavailable";
    pub const INTERNAL_ERROR: &str = "internal_error";
}
