//! Insight agents.
//!
//! Built-in agents are configuration records, not distinct code paths: one
//! generic handler merges a descriptor's template with the transcript text,
//! calls the provider adapter, and interprets the result. Custom agents are
//! the same records created at runtime over the wire.

pub mod descriptor;
pub mod formatter;
pub mod handler;
pub mod prompts;
pub mod registry;
pub mod versions;

pub use descriptor::{builtins, find_builtin, AgentSpec, ContextMode};
pub use formatter::{format_agent_response, is_non_answer, MessageKind};
pub use handler::{execute, AgentInvocation};
pub use registry::{AgentRegistry, CustomAgentConfig};
pub use versions::{JsonFileVersionStore, PromptVersion, PromptVersionStore};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Unknown agent: {0}")]
    NotFound(String),

    #[error("Version '{version}' not found for agent '{agent}'")]
    VersionNotFound { agent: String, version: String },

    #[error("Version store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<AgentError> for insight_core::Error {
    fn from(err: AgentError) -> Self {
        insight_core::Error::Agent(err.to_string())
    }
}
