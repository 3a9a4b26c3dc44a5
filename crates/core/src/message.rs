//! Wire-level outbound messages.
//!
//! Everything the server sends to clients is one of these variants,
//! serialized as JSON with a `type` tag. Insights are the only variant
//! rendered as cards; `silent_error` exists so the frontend can log agent
//! failures without surfacing them mid-meeting.

use serde::{Deserialize, Serialize};

/// Messages sent to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A generated insight card.
    Insight { agent: String, content: String },
    /// Telemetry-only agent failure; never rendered as a card.
    SilentError { agent: String, message: String },
    /// Terminal connection-level error (e.g. backends not ready).
    Error { message: String },
    /// Acknowledgement / status text for control messages.
    SystemMessage { message: String },
    /// Transcript echo for live display.
    Transcript { text: String, is_final: bool },
    /// Current prompt text for an agent.
    AgentPrompt {
        agent_name: String,
        prompt_text: String,
        is_original: bool,
    },
    /// All stored prompt versions for an agent.
    AgentVersions {
        agent_name: String,
        versions: serde_json::Value,
    },
    /// Model catalog grouped by provider, plus the active selection.
    AvailableModels {
        models: serde_json::Value,
        active_provider: String,
        active_model: String,
    },
}

impl OutboundMessage {
    pub fn insight(agent: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Insight {
            agent: agent.into(),
            content: content.into(),
        }
    }

    pub fn silent_error(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SilentError {
            agent: agent.into(),
            message: message.into(),
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self::SystemMessage {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_wire_shape() {
        let msg = OutboundMessage::insight("Debate Agent", "a tension exists");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "insight");
        assert_eq!(json["agent"], "Debate Agent");
        assert_eq!(json["content"], "a tension exists");
    }

    #[test]
    fn test_silent_error_is_not_error() {
        let msg = OutboundMessage::silent_error("Product Agent", "handler failed");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"silent_error\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_transcript_roundtrip() {
        let msg = OutboundMessage::Transcript {
            text: "hello".to_string(),
            is_final: true,
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: OutboundMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
