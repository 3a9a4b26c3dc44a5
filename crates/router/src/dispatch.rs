//! Agent dispatch.
//!
//! Maps a routed agent name to its handler, supplies the right context
//! shape, and isolates failures: one failing agent must never crash the
//! session loop or block subsequent segments.

use insight_agents::{find_builtin, AgentInvocation, AgentRegistry, ContextMode};
use insight_core::{AgentOutcome, Broadcaster, ContextBuffer};
use insight_llm::TextGenerator;

/// Dispatch one routed decision.
///
/// Lookup order: custom registry first (a runtime agent shadows a built-in
/// of the same name), then the built-in table. Unknown names log and no-op.
pub async fn dispatch(
    agent_name: &str,
    segment: &str,
    context: &ContextBuffer,
    registry: &AgentRegistry,
    generator: &dyn TextGenerator,
    broadcaster: &dyn Broadcaster,
) {
    let invocation = if let Some(custom) = registry.get(agent_name) {
        tracing::info!(agent = %agent_name, "Dispatching custom agent with current segment");
        AgentInvocation::custom(&custom, segment)
    } else if let Some(spec) = find_builtin(agent_name) {
        match spec.context {
            ContextMode::Buffer => {
                let joined = context.joined();
                tracing::info!(
                    agent = %agent_name,
                    context_chars = joined.len(),
                    "Dispatching with rolling context buffer"
                );
                AgentInvocation::builtin(spec, &joined)
            }
            ContextMode::Segment => {
                tracing::info!(
                    agent = %agent_name,
                    segment_chars = segment.len(),
                    "Dispatching with current segment"
                );
                AgentInvocation::builtin(spec, segment)
            }
        }
    } else {
        tracing::warn!(agent = %agent_name, "Attempted to dispatch unknown agent");
        return;
    };

    match insight_agents::execute(&invocation, generator, broadcaster).await {
        AgentOutcome::Emit(_) => {
            tracing::info!(agent = %agent_name, "Agent emitted an insight");
        }
        AgentOutcome::Suppress(reason) => {
            tracing::debug!(agent = %agent_name, reason = reason.as_str(), "Agent suppressed output");
        }
        AgentOutcome::Fail(error) => {
            tracing::error!(agent = %agent_name, error = %error, "Agent execution failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use insight_agents::CustomAgentConfig;
    use insight_core::OutboundMessage;
    use insight_llm::{FinishReason, Generation, GenerationParams, LlmError, Provider};
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

    /// Fails the first N calls, then answers; records every prompt.
    struct FlakyGenerator {
        fail_first: Mutex<usize>,
        prompts: Mutex<Vec<String>>,
    }

    impl FlakyGenerator {
        fn new(fail_first: usize) -> Self {
            Self {
                fail_first: Mutex::new(fail_first),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FlakyGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _params: &GenerationParams,
        ) -> Result<Generation, LlmError> {
            self.prompts.lock().push(prompt.to_string());
            let mut remaining = self.fail_first.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(LlmError::Api("upstream exploded".to_string()));
            }
            Ok(Generation {
                text: "🎯 A sharp insight.".to_string(),
                finish_reason: FinishReason::Stop,
                provider: Provider::Gemini,
                model: "mock".to_string(),
                usage: None,
            })
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    fn buffer_with(segments: &[&str]) -> ContextBuffer {
        let mut buffer = ContextBuffer::new(10);
        for s in segments {
            buffer.push(*s);
        }
        buffer
    }

    #[tokio::test]
    async fn test_buffer_agent_gets_joined_context() {
        let generator = FlakyGenerator::new(0);
        let broadcaster = RecordingBroadcaster::default();
        let registry = AgentRegistry::new();
        let context = buffer_with(&[
            "we should ship in March",
            "marketing wants to wait until June",
        ]);

        dispatch(
            "Debate Agent",
            "debate agent, let's analyze this conflict",
            &context,
            &registry,
            &generator,
            &broadcaster,
        )
        .await;

        let prompts = generator.prompts.lock();
        assert_eq!(prompts.len(), 1);
        // The handler saw the whole buffer, not just the trigger segment.
        assert!(prompts[0].contains("we should ship in March"));
        assert!(prompts[0].contains("marketing wants to wait until June"));
    }

    #[tokio::test]
    async fn test_segment_agent_gets_segment_only() {
        let generator = FlakyGenerator::new(0);
        let broadcaster = RecordingBroadcaster::default();
        let registry = AgentRegistry::new();
        let context = buffer_with(&["older discussion about something else entirely"]);

        dispatch(
            "Radical Expander",
            "our weekly status meetings waste too much time",
            &context,
            &registry,
            &generator,
            &broadcaster,
        )
        .await;

        let prompts = generator.prompts.lock();
        assert!(prompts[0].contains("weekly status meetings"));
        assert!(!prompts[0].contains("older discussion"));
    }

    #[tokio::test]
    async fn test_unknown_agent_is_noop() {
        let generator = FlakyGenerator::new(0);
        let broadcaster = RecordingBroadcaster::default();
        let registry = AgentRegistry::new();
        let context = ContextBuffer::new(10);

        dispatch(
            "Ghost Agent",
            "some segment",
            &context,
            &registry,
            &generator,
            &broadcaster,
        )
        .await;

        assert!(generator.prompts.lock().is_empty());
        assert!(broadcaster.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_isolated_across_dispatches() {
        let generator = FlakyGenerator::new(1);
        let broadcaster = RecordingBroadcaster::default();
        let registry = AgentRegistry::new();
        let context = ContextBuffer::new(10);

        // First dispatch fails upstream; nothing reaches users.
        dispatch(
            "Radical Expander",
            "our weekly status meetings waste too much time",
            &context,
            &registry,
            &generator,
            &broadcaster,
        )
        .await;
        assert!(broadcaster.sent.lock().is_empty());

        // An independent later segment still routes and emits.
        dispatch(
            "Radical Expander",
            "our quarterly planning process needs a rethink",
            &context,
            &registry,
            &generator,
            &broadcaster,
        )
        .await;
        let sent = broadcaster.sent.lock();
        assert_eq!(sent.len(), 1);
        assert!(matches!(sent[0], OutboundMessage::Insight { .. }));
    }

    #[tokio::test]
    async fn test_custom_agent_shadows_builtin() {
        let generator = FlakyGenerator::new(0);
        let broadcaster = RecordingBroadcaster::default();
        let registry = AgentRegistry::new();
        registry.create(CustomAgentConfig {
            name: "Product Agent".to_string(),
            goal: "a very specific product lens".to_string(),
            prompt: None,
            triggers: vec![],
            model: None,
            icon: None,
        });
        let context = ContextBuffer::new(10);

        dispatch(
            "Product Agent",
            "customers keep asking for offline support",
            &context,
            &registry,
            &generator,
            &broadcaster,
        )
        .await;

        let prompts = generator.prompts.lock();
        // Custom template, not the built-in product prompt.
        assert!(prompts[0].contains("a very specific product lens"));
    }
}
