//! Capability to candidate-provider routing rules

use super::capability::RequestCapability;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Wildcard entry in a candidate list
pub const WILDCARD: &str = "*";

/// One entry of a candidate list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Candidate {
    /// A concrete provider id
    Provider(String),
    /// Any provider can serve the capability; never scored
    Any,
}

impl Candidate {
    /// Provider id, or `None` for the wildcard
    pub fn provider_id(&self) -> Option<&str> {
        match self {
            Candidate::Provider(id) => Some(id),
            Candidate::Any => None,
        }
    }
}

impl From<&str> for Candidate {
    fn from(s: &str) -> Self {
        if s == WILDCARD {
            Candidate::Any
        } else {
            Candidate::Provider(s.to_string())
        }
    }
}

impl From<String> for Candidate {
    fn from(s: String) -> Self {
        if s == WILDCARD {
            Candidate::Any
        } else {
            Candidate::Provider(s)
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider_id().unwrap_or(WILDCARD))
    }
}

impl Serialize for Candidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.provider_id().unwrap_or(WILDCARD))
    }
}

impl<'de> Deserialize<'de> for Candidate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(String::deserialize(deserializer)?.into())
    }
}

/// Candidate providers per request capability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingRules {
    rules: BTreeMap<RequestCapability, Vec<Candidate>>,
}

impl RoutingRules {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table
    pub fn defaults() -> Self {
        use RequestCapability::*;

        Self::new()
            .with_rule(
                NeedsTools,
                ["openai/gpt-4o", "anthropic/claude-3", "openai/gpt-4-turbo"],
            )
            .with_rule(
                NeedsVision,
                ["openai/gpt-4o", "anthropic/claude-3", "google/gemini-pro-vision"],
            )
            .with_rule(
                NeedsImageGen,
                ["openai/dall-e-3", "stability/stable-diffusion", "midjourney/midjourney"],
            )
            .with_rule(NeedsAudioIn, ["openai/whisper", "google/speech-to-text"])
            .with_rule(
                NeedsAudioOut,
                ["openai/tts", "google/text-to-speech", "amazon/polly"],
            )
            .with_rule(
                NeedsCodeGen,
                ["openai/gpt-4o", "anthropic/claude-3", "codellama/code-llama"],
            )
            .with_rule(
                NeedsStreaming,
                ["openai/gpt-4o", "anthropic/claude-3", "openai/gpt-4-turbo"],
            )
            .with_rule(BasicChat, [WILDCARD])
    }

    /// Set the candidate list for a capability, replacing any existing one
    pub fn with_rule<I, C>(mut self, capability: RequestCapability, candidates: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Candidate>,
    {
        self.set(capability, candidates.into_iter().map(Into::into).collect());
        self
    }

    /// Set the candidate list for a capability
    pub fn set(&mut self, capability: RequestCapability, candidates: Vec<Candidate>) {
        self.rules.insert(capability, candidates);
    }

    /// Candidate list for a capability
    pub fn candidates(&self, capability: RequestCapability) -> &[Candidate] {
        self.rules.get(&capability).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Overlay another table; its lists replace ours per capability
    pub fn merge(&mut self, other: RoutingRules) {
        self.rules.extend(other.rules);
    }

    /// Score providers for a set of required capabilities
    ///
    /// Each provider gains one point per required capability whose list
    /// names it. Wildcards are skipped and each capability counts once.
    /// Providers are returned in first-seen order: capabilities in
    /// declaration order, then list order.
    pub fn score(&self, required: &[RequestCapability]) -> Vec<(String, usize)> {
        let mut scores: Vec<(String, usize)> = Vec::new();
        for (capability, candidates) in &self.rules {
            if !required.contains(capability) {
                continue;
            }
            for id in candidates.iter().filter_map(Candidate::provider_id) {
                match scores.iter_mut().find(|(seen, _)| seen == id) {
                    Some((_, score)) => *score += 1,
                    None => scores.push((id.to_string(), 1)),
                }
            }
        }
        scores
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
