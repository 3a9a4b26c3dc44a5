//! Response formatter.
//!
//! Normalizes agent output into wire messages. Low-quality generations that
//! read as apologies or deflections are suppressed rather than shown, and
//! explicit errors go out on the silent-error channel so end users never
//! see failure cards during a live meeting.

use insight_core::{Broadcaster, OutboundMessage};

/// Message kind requested by the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Insight,
    Error,
}

/// Apology/deflection markers that disqualify an insight.
const NON_ANSWER_MARKERS: &[&str] = &[
    "sorry",
    "i apologize",
    "not enough context",
    "insufficient context",
    "doesn't provide enough",
    "limited information",
];

/// True when the content reads as a non-answer rather than an insight.
pub fn is_non_answer(content: &str) -> bool {
    let lower = content.to_lowercase();
    NON_ANSWER_MARKERS.iter().any(|m| lower.contains(m))
}

/// Format and broadcast one agent response.
///
/// Returns `true` if a message actually went out. Insights that look like
/// non-answers are dropped here; errors always go out, but only as
/// `silent_error` telemetry.
pub async fn format_agent_response(
    agent_name: &str,
    content: &str,
    broadcaster: &dyn Broadcaster,
    kind: MessageKind,
) -> bool {
    let clean = content.trim();

    match kind {
        MessageKind::Insight => {
            if is_non_answer(clean) {
                tracing::warn!(
                    agent = %agent_name,
                    "Response reads as an apology or non-answer, not sending"
                );
                return false;
            }
            tracing::info!(
                agent = %agent_name,
                chars = clean.len(),
                "Broadcasting insight"
            );
            broadcaster
                .send(OutboundMessage::insight(agent_name, clean))
                .await;
            true
        }
        MessageKind::Error => {
            tracing::warn!(agent = %agent_name, message = %clean, "Sending silent error");
            broadcaster
                .send(OutboundMessage::silent_error(agent_name, clean))
                .await;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingBroadcaster {
        sent: Mutex<Vec<OutboundMessage>>,
    }

    #[async_trait]
    impl Broadcaster for RecordingBroadcaster {
        async fn send(&self, message: OutboundMessage) {
            self.sent.lock().push(message);
        }
    }

    #[test]
    fn test_non_answer_markers() {
        assert!(is_non_answer("Sorry, I can't help with that."));
        assert!(is_non_answer("There is insufficient context here."));
        assert!(is_non_answer("The transcript doesn't provide enough detail"));
        assert!(!is_non_answer("Meetings could run themselves by 2030."));
    }

    #[tokio::test]
    async fn test_insight_broadcast() {
        let broadcaster = RecordingBroadcaster::default();
        let sent = format_agent_response(
            "Product Agent",
            "  A living-building sensor mesh.  ",
            &broadcaster,
            MessageKind::Insight,
        )
        .await;
        assert!(sent);
        let messages = broadcaster.sent.lock();
        assert_eq!(
            messages[0],
            OutboundMessage::insight("Product Agent", "A living-building sensor mesh.")
        );
    }

    #[tokio::test]
    async fn test_apology_suppressed() {
        let broadcaster = RecordingBroadcaster::default();
        let sent = format_agent_response(
            "Product Agent",
            "I apologize, but I cannot see a product here.",
            &broadcaster,
            MessageKind::Insight,
        )
        .await;
        assert!(!sent);
        assert!(broadcaster.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_error_goes_out_silently() {
        let broadcaster = RecordingBroadcaster::default();
        let sent = format_agent_response(
            "Debate Agent",
            "Insufficient context to identify tensions.",
            &broadcaster,
            MessageKind::Error,
        )
        .await;
        assert!(sent);
        let messages = broadcaster.sent.lock();
        match &messages[0] {
            OutboundMessage::SilentError { agent, .. } => assert_eq!(agent, "Debate Agent"),
            other => panic!("expected silent_error, got {:?}", other),
        }
    }
}
