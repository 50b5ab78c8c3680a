//! Keyword and flag based request analysis
//!
//! Each rule fires independently. The result keeps rule order and holds each
//! capability at most once.

use super::capability::{RequestCapability, RequestContext};
use crate::tools::{AgentCapability, CapabilitySet};

/// Phrases that indicate the user wants code written
pub const CODE_GEN_PHRASES: &[&str] = &[
    "write code",
    "code for",
    "function",
    "class",
    "implement",
    "script",
];

/// Phrases that indicate the user wants an image produced
pub const IMAGE_GEN_PHRASES: &[&str] = &[
    "generate image",
    "create image",
    "draw",
    "picture of",
    "visualize",
];

/// Infer the capabilities a request needs
///
/// Never returns an empty list: `needs_streaming` is always present, and a
/// request with nothing else detected also gets `basic_chat`.
pub fn analyze_request(
    message: &str,
    agent_capabilities: &CapabilitySet,
    context: Option<&RequestContext>,
) -> Vec<RequestCapability> {
    let mut capabilities = Vec::new();
    let context = context.cloned().unwrap_or_default();

    if agent_capabilities.contains_any(&[AgentCapability::Advanced, AgentCapability::Admin]) {
        capabilities.push(RequestCapability::NeedsTools);
    }

    let lower = message.to_lowercase();

    if contains_any_phrase(&lower, CODE_GEN_PHRASES) {
        capabilities.push(RequestCapability::NeedsCodeGen);
    }

    if contains_any_phrase(&lower, IMAGE_GEN_PHRASES) {
        capabilities.push(RequestCapability::NeedsImageGen);
    }

    if context.has_audio_input {
        capabilities.push(RequestCapability::NeedsAudioIn);
    }
    if context.expects_audio_output {
        capabilities.push(RequestCapability::NeedsAudioOut);
    }
    if context.has_image_input {
        capabilities.push(RequestCapability::NeedsVision);
    }

    capabilities.push(RequestCapability::NeedsStreaming);

    if capabilities == [RequestCapability::NeedsStreaming] {
        capabilities.push(RequestCapability::BasicChat);
    }

    tracing::debug!(
        message_len = message.len(),
        capabilities = ?capabilities,
        "Analyzed request"
    );
    capabilities
}

fn contains_any_phrase(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}
