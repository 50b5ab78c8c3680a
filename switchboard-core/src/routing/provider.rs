//! Provider capability descriptors

use super::capability::RequestCapability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a provider/model can do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCapability {
    /// Display name
    pub name: String,
    #[serde(default)]
    pub supports_tools: bool,
    #[serde(default)]
    pub supports_vision: bool,
    #[serde(default)]
    pub supports_image_gen: bool,
    #[serde(default)]
    pub supports_audio_in: bool,
    #[serde(default)]
    pub supports_audio_out: bool,
    #[serde(default)]
    pub supports_streaming: bool,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_token: Option<f64>,
}

impl ProviderCapability {
    /// Create a descriptor that supports nothing
    pub fn new(name: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            name: name.into(),
            supports_tools: false,
            supports_vision: false,
            supports_image_gen: false,
            supports_audio_in: false,
            supports_audio_out: false,
            supports_streaming: false,
            max_tokens,
            cost_per_token: None,
        }
    }

    pub fn with_tools(mut self) -> Self {
        self.supports_tools = true;
        self
    }

    pub fn with_vision(mut self) -> Self {
        self.supports_vision = true;
        self
    }

    pub fn with_image_gen(mut self) -> Self {
        self.supports_image_gen = true;
        self
    }

    pub fn with_audio_in(mut self) -> Self {
        self.supports_audio_in = true;
        self
    }

    pub fn with_audio_out(mut self) -> Self {
        self.supports_audio_out = true;
        self
    }

    pub fn with_streaming(mut self) -> Self {
        self.supports_streaming = true;
        self
    }

    pub fn with_cost_per_token(mut self, cost: f64) -> Self {
        self.cost_per_token = Some(cost);
        self
    }

    /// Check a single request capability against the descriptor flags
    ///
    /// `needs_code_gen` and `basic_chat` have no flag and always pass.
    pub fn supports(&self, capability: RequestCapability) -> bool {
        match capability {
            RequestCapability::NeedsTools => self.supports_tools,
            RequestCapability::NeedsVision => self.supports_vision,
            RequestCapability::NeedsImageGen => self.supports_image_gen,
            RequestCapability::NeedsAudioIn => self.supports_audio_in,
            RequestCapability::NeedsAudioOut => self.supports_audio_out,
            RequestCapability::NeedsStreaming => self.supports_streaming,
            RequestCapability::NeedsCodeGen | RequestCapability::BasicChat => true,
        }
    }

    /// Required capabilities this descriptor fails, in input order
    pub fn unmet(&self, required: &[RequestCapability]) -> Vec<RequestCapability> {
        required
            .iter()
            .copied()
            .filter(|cap| !self.supports(*cap))
            .collect()
    }
}

/// The built-in provider table
pub fn default_providers() -> BTreeMap<String, ProviderCapability> {
    [
        (
            "openai/gpt-4o",
            ProviderCapability::new("GPT-4o", 128_000)
                .with_tools()
                .with_vision()
                .with_streaming(),
        ),
        (
            "openai/gpt-4-turbo",
            ProviderCapability::new("GPT-4 Turbo", 128_000)
                .with_tools()
                .with_streaming(),
        ),
        (
            "openai/dall-e-3",
            ProviderCapability::new("DALL-E 3", 4000).with_image_gen(),
        ),
        (
            "openai/tts",
            ProviderCapability::new("OpenAI TTS", 4096).with_audio_out(),
        ),
        (
            "anthropic/claude-3",
            ProviderCapability::new("Claude 3", 200_000)
                .with_tools()
                .with_vision()
                .with_streaming(),
        ),
        (
            "google/text-to-speech",
            ProviderCapability::new("Google TTS", 5000).with_audio_out(),
        ),
        (
            "unknown-provider",
            ProviderCapability::new("Unknown Provider", 4096).with_streaming(),
        ),
    ]
    .into_iter()
    .map(|(id, cap)| (id.to_string(), cap))
    .collect()
}
