//! Core traits and types for the meeting insight agent.
//!
//! Everything shared across crates lives here: the transcript types fed in
//! by the transcription collaborator, the bounded context buffer, the wire
//! message enum, the routing decision type, and the broadcaster seam that
//! agent handlers emit through.

pub mod broadcast;
pub mod message;
pub mod outcome;
pub mod routing;
pub mod transcript;

pub use broadcast::Broadcaster;
pub use message::OutboundMessage;
pub use outcome::{AgentOutcome, SuppressReason};
pub use routing::RoutingDecision;
pub use transcript::{ContextBuffer, TranscriptEvent, Transcriber};

use thiserror::Error;

/// Core errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Generation failed: {0}")]
    Llm(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Broadcast error: {0}")]
    Broadcast(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;
