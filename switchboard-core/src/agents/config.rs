//! Agent configuration types

use crate::tools::{AgentCapability, CapabilitySet, ToolCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum accepted per-agent timeout
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Declared configuration of a tool-consuming agent
///
/// `max_concurrent_tools` and `timeout_ms` are declarative. They are
/// validated by the capabilities manager and enforced by whoever runs the
/// agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    pub capabilities: CapabilitySet,
    pub allowed_tool_categories: BTreeSet<ToolCategory>,
    pub max_concurrent_tools: u32,
    pub timeout_ms: u64,
}

impl AgentConfig {
    /// Create a config with no capabilities or categories and default limits
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capabilities: CapabilitySet::new(),
            allowed_tool_categories: BTreeSet::new(),
            max_concurrent_tools: 1,
            timeout_ms: 30_000,
        }
    }

    /// Grant a capability
    pub fn with_capability(mut self, cap: AgentCapability) -> Self {
        self.capabilities.add(cap);
        self
    }

    /// Replace the capability set
    pub fn with_capabilities(mut self, caps: CapabilitySet) -> Self {
        self.capabilities = caps;
        self
    }

    /// Allow a tool category
    pub fn with_category(mut self, category: ToolCategory) -> Self {
        self.allowed_tool_categories.insert(category);
        self
    }

    /// Allow several tool categories
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = ToolCategory>) -> Self {
        self.allowed_tool_categories.extend(categories);
        self
    }

    /// Set the concurrency limit
    pub fn with_max_concurrent_tools(mut self, max: u32) -> Self {
        self.max_concurrent_tools = max;
        self
    }

    /// Set the timeout in milliseconds
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// String-typed agent configuration, as read from config files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub allowed_tool_categories: Vec<String>,
    #[serde(default = "default_max_concurrent_tools")]
    pub max_concurrent_tools: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_max_concurrent_tools() -> u32 {
    1
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl From<&AgentConfig> for AgentDescriptor {
    fn from(config: &AgentConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            capabilities: config.capabilities.iter().map(|c| c.to_string()).collect(),
            allowed_tool_categories: config
                .allowed_tool_categories
                .iter()
                .map(|c| c.to_string())
                .collect(),
            max_concurrent_tools: config.max_concurrent_tools,
            timeout_ms: config.timeout_ms,
        }
    }
}
