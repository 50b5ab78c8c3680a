//! Error model for tool callables
//!
//! The registry never invokes tools, but callers that do need a common
//! failure shape to record in the execution log and to decide on retries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured tool error with taxonomy
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ToolError {
    /// Error kind (determines retryability)
    pub kind: ToolErrorKind,

    /// Human-readable error message
    pub message: String,

    /// Underlying error code (if applicable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl ToolError {
    /// Create a new tool error
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            context: None,
        }
    }

    /// Add an error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add context
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Create an invalid-arguments error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Validation, message)
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message)
    }

    /// Create an error for a tool whose backing service is missing or down
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Unavailable, message)
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message)
    }

    /// Check if the caller may retry the same call
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Error kinds for tool callables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// Arguments were rejected
    Validation,

    /// The tool ran and failed
    Execution,

    /// A dependency (API key, upstream service) is not available
    Unavailable,

    /// The caller-enforced deadline elapsed
    Timeout,
}

impl ToolErrorKind {
    /// Check if this error kind is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolErrorKind::Unavailable | ToolErrorKind::Timeout)
    }

    /// Get the string name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorKind::Validation => "validation",
            ToolErrorKind::Execution => "execution",
            ToolErrorKind::Unavailable => "unavailable",
            ToolErrorKind::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(ToolError::timeout("slow").is_retryable());
        assert!(ToolError::unavailable("no key").is_retryable());
        assert!(!ToolError::validation("bad").is_retryable());
        assert!(!ToolError::execution("boom").is_retryable());
    }

    #[test]
    fn test_display() {
        let err = ToolError::unavailable("OPENWEATHER_API_KEY not configured").with_code("E_KEY");
        assert_eq!(
            err.to_string(),
            "unavailable: OPENWEATHER_API_KEY not configured"
        );
        assert_eq!(err.code.as_deref(), Some("E_KEY"));
    }
}
