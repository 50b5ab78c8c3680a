//! Request-level capability requirements

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A requirement inferred from a single inbound request
///
/// Distinct from an agent's [`AgentCapability`](crate::tools::AgentCapability):
/// these describe what the serving provider must support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestCapability {
    NeedsTools,
    NeedsVision,
    NeedsImageGen,
    NeedsAudioIn,
    NeedsAudioOut,
    NeedsCodeGen,
    NeedsStreaming,
    /// Nothing specific was detected
    BasicChat,
}

impl RequestCapability {
    /// Get all defined request capabilities
    pub fn all() -> &'static [RequestCapability] {
        &[
            RequestCapability::NeedsTools,
            RequestCapability::NeedsVision,
            RequestCapability::NeedsImageGen,
            RequestCapability::NeedsAudioIn,
            RequestCapability::NeedsAudioOut,
            RequestCapability::NeedsCodeGen,
            RequestCapability::NeedsStreaming,
            RequestCapability::BasicChat,
        ]
    }

    /// Get the string name of this capability
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestCapability::NeedsTools => "needs_tools",
            RequestCapability::NeedsVision => "needs_vision",
            RequestCapability::NeedsImageGen => "needs_image_gen",
            RequestCapability::NeedsAudioIn => "needs_audio_in",
            RequestCapability::NeedsAudioOut => "needs_audio_out",
            RequestCapability::NeedsCodeGen => "needs_code_gen",
            RequestCapability::NeedsStreaming => "needs_streaming",
            RequestCapability::BasicChat => "basic_chat",
        }
    }
}

impl std::fmt::Display for RequestCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestCapability {
    type Err = crate::tools::UnknownVariant;

    /// Accepts `needs_vision` as well as `needs-vision`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        RequestCapability::all()
            .iter()
            .copied()
            .find(|cap| cap.as_str() == normalized)
            .ok_or_else(|| crate::tools::UnknownVariant {
                kind: "request capability",
                value: s.to_string(),
            })
    }
}

/// Flags describing the request beyond its text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    pub has_audio_input: bool,
    pub expects_audio_output: bool,
    pub has_image_input: bool,
    /// Informational; not used by inference
    pub attachment_count: Option<u32>,
    /// Informational; not used by inference
    pub message_length: Option<usize>,
}

impl RequestContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the request as carrying audio
    pub fn with_audio_input(mut self) -> Self {
        self.has_audio_input = true;
        self
    }

    /// Mark the request as expecting spoken output
    pub fn with_audio_output(mut self) -> Self {
        self.expects_audio_output = true;
        self
    }

    /// Mark the request as carrying an image
    pub fn with_image_input(mut self) -> Self {
        self.has_image_input = true;
        self
    }

    /// Record the attachment count
    pub fn with_attachment_count(mut self, count: u32) -> Self {
        self.attachment_count = Some(count);
        self
    }
}
