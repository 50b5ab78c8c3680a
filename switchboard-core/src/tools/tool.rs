//! Tool definitions
//!
//! A registered tool is metadata plus an opaque callable and an optional
//! presentation adapter. The registry only stores and filters tools; callers
//! invoke the callable themselves.

use super::capability::{AgentCapability, CapabilitySet, ToolCategory};
use super::registry::RegistryError;
use super::result::ToolError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// Typed tool metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMetadata {
    /// Unique, stable identifier
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Domain the tool belongs to
    pub category: ToolCategory,

    /// Tiers an agent must hold to use this tool
    pub required_capabilities: CapabilitySet,

    /// Tool version
    pub version: String,

    /// Tool author
    pub author: String,

    /// Tags for categorization
    pub tags: Vec<String>,

    /// Inactive tools are hidden from every agent
    pub is_active: bool,
}

impl ToolMetadata {
    /// Create new active metadata with required fields
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: ToolCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category,
            required_capabilities: CapabilitySet::new(),
            version: "1.0.0".to_string(),
            author: "System".to_string(),
            tags: Vec::new(),
            is_active: true,
        }
    }

    /// Require a capability
    pub fn with_capability(mut self, cap: AgentCapability) -> Self {
        self.required_capabilities.add(cap);
        self
    }

    /// Replace the required capability set
    pub fn with_capabilities(mut self, caps: CapabilitySet) -> Self {
        self.required_capabilities = caps;
        self
    }

    /// Set version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

/// String-typed tool metadata, as read from JSON or config files
///
/// Converting to [`ToolMetadata`] rejects categories and capabilities that
/// are not part of the closed enumerations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub required_capabilities: Vec<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_author() -> String {
    "System".to_string()
}

fn default_active() -> bool {
    true
}

impl TryFrom<ToolDescriptor> for ToolMetadata {
    type Error = RegistryError;

    fn try_from(raw: ToolDescriptor) -> Result<Self, Self::Error> {
        let category: ToolCategory = raw.category.parse().map_err(|e| {
            RegistryError::invalid_metadata(&raw.id, "category", format!("{}", e))
        })?;

        let required_capabilities = CapabilitySet::parse(&raw.required_capabilities)
            .map_err(|e| {
                RegistryError::invalid_metadata(&raw.id, "requiredCapabilities", format!("{}", e))
            })?;

        Ok(Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            category,
            required_capabilities,
            version: raw.version,
            author: raw.author,
            tags: raw.tags,
            is_active: raw.is_active,
        })
    }
}

/// Context recorded alongside a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecutionContext {
    /// Agent making the call
    pub agent_id: String,

    /// Capabilities the agent held at call time
    pub agent_capabilities: CapabilitySet,

    /// Conversation/session identifier
    pub session_id: String,

    /// Per-request identifier
    pub request_id: String,

    /// When the call was made
    pub timestamp: DateTime<Utc>,
}

impl ToolExecutionContext {
    /// Create a context with fresh session and request ids
    pub fn new(agent_id: impl Into<String>, agent_capabilities: CapabilitySet) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_capabilities,
            session_id: uuid::Uuid::new_v4().to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Set session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Set request ID
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Set timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Executable behaviour behind a tool
///
/// Opaque to the registry. Implementations are retrieved through
/// [`ToolRegistry::get_tools_object_for_agent`](super::ToolRegistry::get_tools_object_for_agent)
/// and invoked by the agent runtime.
#[async_trait]
pub trait ToolCallable: Send + Sync {
    /// Run the tool with the given arguments
    async fn call(&self, args: Value, ctx: &ToolExecutionContext) -> Result<Value, ToolError>;
}

/// Shared handle to a callable
pub type BoxedCallable = Arc<dyn ToolCallable>;

/// Opaque presentation adapter; callers downcast to their own type
pub type RenderComponent = Arc<dyn Any + Send + Sync>;

/// Adapter turning a plain closure into a [`ToolCallable`]
pub struct FnCallable<F> {
    f: F,
}

impl<F> FnCallable<F>
where
    F: Fn(Value, &ToolExecutionContext) -> Result<Value, ToolError> + Send + Sync,
{
    /// Wrap a closure
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Wrap a closure and erase its type
    pub fn boxed(f: F) -> BoxedCallable
    where
        F: 'static,
    {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F> ToolCallable for FnCallable<F>
where
    F: Fn(Value, &ToolExecutionContext) -> Result<Value, ToolError> + Send + Sync,
{
    async fn call(&self, args: Value, ctx: &ToolExecutionContext) -> Result<Value, ToolError> {
        (self.f)(args, ctx)
    }
}

/// A tool as stored in the registry
#[derive(Clone)]
pub struct RegisteredTool {
    /// Tool metadata
    pub metadata: ToolMetadata,

    /// Executable behaviour
    pub callable: BoxedCallable,

    /// Optional presentation adapter
    pub render_component: Option<RenderComponent>,
}

impl RegisteredTool {
    /// Get tool id (convenience method)
    pub fn id(&self) -> &str {
        &self.metadata.id
    }
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("metadata", &self.metadata)
            .field("has_render_component", &self.render_component.is_some())
            .finish()
    }
}
