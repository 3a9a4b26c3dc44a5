//! Provider-neutral request/response types and the backend trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::LlmError;

/// Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Claude,
}

impl Provider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" | "vertex" => Some(Provider::Gemini),
            "claude" | "anthropic" => Some(Provider::Claude),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Claude => "claude",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Safety filtering level requested from the provider.
///
/// Only Gemini exposes per-category thresholds; Claude applies its own
/// policy and ignores this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafetyThreshold {
    /// Block medium-and-above across all harm categories.
    #[default]
    Standard,
    /// Harassment and hate-speech categories only (routing calls).
    Minimal,
}

/// Per-call generation parameters.
///
/// Temperature and token budgets vary per agent: creative agents run hot
/// with large budgets, analytical agents run cold with small ones.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: usize,
    pub top_p: f32,
    pub safety: SafetyThreshold,
    /// System instruction, when the caller wants one.
    pub system: Option<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
            top_p: 0.95,
            safety: SafetyThreshold::Standard,
            system: None,
        }
    }
}

impl GenerationParams {
    pub fn new(temperature: f32, max_tokens: usize) -> Self {
        Self {
            temperature,
            max_tokens,
            ..Default::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_safety(mut self, safety: SafetyThreshold) -> Self {
        self.safety = safety;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }
}

/// Structural completion classification.
///
/// Callers branch on this instead of provider-specific error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Normal completion.
    Stop,
    /// Hit the token budget.
    MaxTokens,
    /// Generation was cut or withheld on safety grounds.
    Safety,
    /// The prompt itself was blocked before generation.
    Blocked,
    /// Anything the provider reported that has no mapping.
    Other,
}

impl FinishReason {
    /// True for both safety-cut and prompt-blocked outcomes.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Safety | Self::Blocked)
    }
}

/// Token accounting, when the provider reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Standardized model response across providers.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub finish_reason: FinishReason,
    pub provider: Provider,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// One generative backend (a single provider).
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate a completion for `prompt` with the given model and params.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, LlmError>;

    fn provider(&self) -> Provider;

    /// The model used when no explicit selection is made.
    fn default_model(&self) -> &str;

    /// Known model names for this provider.
    fn available_models(&self) -> Vec<String>;
}

/// What agent handlers and the router depend on: a generator wired to the
/// process-wide active provider selection.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, LlmError>;

    /// Generate honoring a per-call preference of the form `"provider"` or
    /// `"provider:model"` (custom agents carry one). The default ignores
    /// the preference and uses the active selection.
    async fn generate_preferring(
        &self,
        preference: Option<&str>,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, LlmError> {
        let _ = preference;
        self.generate(prompt, params).await
    }

    /// False when no backend is initialized; routing reports
    /// `Unavailable` in that case instead of `None`.
    fn is_ready(&self) -> bool;
}
