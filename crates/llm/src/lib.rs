//! Unified LLM provider adapter.
//!
//! One call shape over two generative backends (Gemini and Claude), with a
//! process-wide active-provider selection that can be switched at runtime.
//! Callers depend on the [`TextGenerator`] trait and never branch on a
//! concrete provider type.

pub mod claude;
pub mod client;
pub mod gemini;
pub mod provider;

pub use claude::{ClaudeBackend, ClaudeConfig};
pub use client::LlmClient;
pub use gemini::{GeminiBackend, GeminiConfig};
pub use provider::{
    FinishReason, Generation, GenerationParams, GenerativeBackend, Provider, SafetyThreshold,
    TextGenerator, TokenUsage,
};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider not initialized: {0}")]
    ProviderNotInitialized(String),

    #[error("No provider available")]
    NoProvider,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Network(format!("Request timed out: {}", err))
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for insight_core::Error {
    fn from(err: LlmError) -> Self {
        insight_core::Error::Llm(err.to_string())
    }
}
