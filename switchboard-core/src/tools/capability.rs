//! Capability tags and tool categories
//!
//! Agents declare which capability tiers they hold and which tool categories
//! they may draw from. Tools declare the tiers they require and the category
//! they belong to. Both vocabularies are closed enumerations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Permission tier held by an agent and required by a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentCapability {
    /// Baseline access
    Basic,

    /// Access to heavier or externally-facing tools
    Advanced,

    /// Full administrative access
    Admin,
}

impl AgentCapability {
    /// Get all defined capabilities
    pub fn all() -> &'static [AgentCapability] {
        &[
            AgentCapability::Basic,
            AgentCapability::Advanced,
            AgentCapability::Admin,
        ]
    }

    /// Get the string name of this capability
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentCapability::Basic => "basic",
            AgentCapability::Advanced => "advanced",
            AgentCapability::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AgentCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentCapability {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentCapability::all()
            .iter()
            .copied()
            .find(|cap| cap.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("capability", s))
    }
}

/// Domain a tool belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Weather,
    Search,
    Calculation,
    DataProcessing,
    Communication,
    Utility,
}

impl ToolCategory {
    /// Get all defined categories
    pub fn all() -> &'static [ToolCategory] {
        &[
            ToolCategory::Weather,
            ToolCategory::Search,
            ToolCategory::Calculation,
            ToolCategory::DataProcessing,
            ToolCategory::Communication,
            ToolCategory::Utility,
        ]
    }

    /// Get the string name of this category
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::Weather => "weather",
            ToolCategory::Search => "search",
            ToolCategory::Calculation => "calculation",
            ToolCategory::DataProcessing => "data_processing",
            ToolCategory::Communication => "communication",
            ToolCategory::Utility => "utility",
        }
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ToolCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolCategory::all()
            .iter()
            .copied()
            .find(|cat| cat.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("category", s))
    }
}

/// A string that names no member of a closed enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    /// Which enumeration was being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A set of capability tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    capabilities: BTreeSet<AgentCapability>,
}

impl CapabilitySet {
    /// Create an empty capability set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a capability set with all capabilities
    pub fn all() -> Self {
        Self {
            capabilities: AgentCapability::all().iter().copied().collect(),
        }
    }

    /// Create a capability set from an iterator of capabilities
    pub fn from_capabilities(iter: impl IntoIterator<Item = AgentCapability>) -> Self {
        Self {
            capabilities: iter.into_iter().collect(),
        }
    }

    /// Add a capability
    pub fn add(&mut self, cap: AgentCapability) -> &mut Self {
        self.capabilities.insert(cap);
        self
    }

    /// Remove a capability
    pub fn remove(&mut self, cap: AgentCapability) -> &mut Self {
        self.capabilities.remove(&cap);
        self
    }

    /// Check if capability is present
    pub fn contains(&self, cap: AgentCapability) -> bool {
        self.capabilities.contains(&cap)
    }

    /// Check if any of the given capabilities is present
    pub fn contains_any(&self, caps: &[AgentCapability]) -> bool {
        caps.iter().any(|cap| self.contains(*cap))
    }

    /// Check if all capabilities in `required` are present
    pub fn contains_all(&self, required: &CapabilitySet) -> bool {
        required.capabilities.is_subset(&self.capabilities)
    }

    /// Get missing capabilities compared to required set
    pub fn missing(&self, required: &CapabilitySet) -> CapabilitySet {
        CapabilitySet {
            capabilities: required
                .capabilities
                .difference(&self.capabilities)
                .copied()
                .collect(),
        }
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Number of capabilities in the set
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Get iterator over capabilities, in tier order
    pub fn iter(&self) -> impl Iterator<Item = &AgentCapability> {
        self.capabilities.iter()
    }

    /// Parse a set from string tags, rejecting the first unknown tag
    pub fn parse<S: AsRef<str>>(tags: &[S]) -> Result<Self, UnknownVariant> {
        tags.iter().map(|tag| tag.as_ref().parse()).collect()
    }
}

impl FromIterator<AgentCapability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = AgentCapability>>(iter: T) -> Self {
        Self {
            capabilities: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.capabilities.iter().map(|c| c.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
