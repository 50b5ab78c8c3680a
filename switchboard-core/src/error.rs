//! Error types for switchboard operations

use crate::agents::AgentConfigError;
use crate::tools::RegistryError;

/// Result type for switchboard operations
pub type Result<T> = std::result::Result<T, SwitchboardError>;

/// Crate-level error
#[derive(Debug, thiserror::Error)]
pub enum SwitchboardError {
    /// Tool or agent registration failed structurally
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Agent config failed semantic validation
    #[error("Agent config error: {0}")]
    AgentConfig(#[from] AgentConfigError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for SwitchboardError {
    fn from(s: String) -> Self {
        SwitchboardError::Other(s)
    }
}

impl From<&str> for SwitchboardError {
    fn from(s: &str) -> Self {
        SwitchboardError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for SwitchboardError {
    fn from(err: anyhow::Error) -> Self {
        SwitchboardError::Other(err.to_string())
    }
}
