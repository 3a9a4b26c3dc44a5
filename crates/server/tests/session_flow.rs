//! End-to-end session flow: finalized segment in, broadcast insight out,
//! with routing, dispatch and suppression behaving as one pipeline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use insight_agents::{AgentRegistry, CustomAgentConfig};
use insight_config::Settings;
use insight_core::{Broadcaster, OutboundMessage};
use insight_llm::{
    FinishReason, Generation, GenerationParams, LlmError, Provider, TextGenerator,
};
use insight_router::{Router, RouterConfig};
use insight_server::session::{SessionDeps, SessionState};

#[derive(Default)]
struct RecordingBroadcaster {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingBroadcaster {
    fn messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn send(&self, message: OutboundMessage) {
        self.sent.lock().push(message);
    }
}

/// Plays the classifier when the prompt looks like a routing request and
/// the agent otherwise; records every prompt it sees.
struct ScriptedGenerator {
    classifier_answer: String,
    agent_answer: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(classifier_answer: &str, agent_answer: &str) -> Self {
        Self {
            classifier_answer: classifier_answer.to_string(),
            agent_answer: agent_answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<Generation, LlmError> {
        self.prompts.lock().push(prompt.to_string());
        let text = if prompt.contains("Traffic Cop") {
            self.classifier_answer.clone()
        } else {
            self.agent_answer.clone()
        };
        Ok(Generation {
            text,
            finish_reason: FinishReason::Stop,
            provider: Provider::Gemini,
            model: "scripted".to_string(),
            usage: None,
        })
    }

    fn is_ready(&self) -> bool {
        true
    }
}

fn deps(
    generator: Arc<ScriptedGenerator>,
    broadcaster: Arc<RecordingBroadcaster>,
    registry: Arc<AgentRegistry>,
) -> SessionDeps {
    SessionDeps {
        // Classifier-only fallback for determinism.
        router: Arc::new(Router::new(RouterConfig {
            random_route_probability: 0.0,
            route_weights: Default::default(),
        })),
        registry,
        generator,
        broadcaster,
    }
}

fn instant_settings() -> Settings {
    let mut settings = Settings::default();
    settings.router.min_interval_secs = 0.0;
    settings
}

/// Dispatch is fire-and-forget; poll until the broadcast lands.
async fn wait_for_messages(broadcaster: &RecordingBroadcaster, count: usize) {
    for _ in 0..100 {
        if broadcaster.sent.lock().len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {} broadcast message(s), got {:?}",
        count,
        broadcaster.messages()
    );
}

#[tokio::test]
async fn classifier_routes_internal_process_to_radical_expander() {
    let generator = Arc::new(ScriptedGenerator::new(
        "Radical Expander",
        "🚀 Status meetings become ambient dashboards everyone trusts.",
    ));
    let broadcaster = Arc::new(RecordingBroadcaster::default());
    let registry = Arc::new(AgentRegistry::new());
    let deps = deps(generator.clone(), broadcaster.clone(), registry);
    let mut session = SessionState::new(&instant_settings());

    // Seed the buffer with a below-threshold segment (buffered, never
    // routed), then the routed segment.
    session.handle_final_segment("okay", &deps).await;
    session
        .handle_final_segment(
            "We should restructure our weekly status meetings, they waste too much time",
            &deps,
        )
        .await;

    wait_for_messages(&broadcaster, 1).await;
    match &broadcaster.messages()[0] {
        OutboundMessage::Insight { agent, .. } => assert_eq!(agent, "Radical Expander"),
        other => panic!("expected insight, got {:?}", other),
    }

    // The agent prompt carried only the current segment, not the buffer.
    let agent_prompt = generator
        .prompts()
        .into_iter()
        .rev()
        .find(|p| !p.contains("Traffic Cop"))
        .expect("agent prompt recorded");
    assert!(agent_prompt.contains("weekly status meetings"));
    assert!(!agent_prompt.contains("okay"));
}

#[tokio::test]
async fn debate_trigger_bypasses_classifier_and_gets_buffer() {
    let generator = Arc::new(ScriptedGenerator::new(
        "None",
        "⚖️ The team disagrees about the launch date more than it admits.",
    ));
    let broadcaster = Arc::new(RecordingBroadcaster::default());
    let registry = Arc::new(AgentRegistry::new());
    let deps = deps(generator.clone(), broadcaster.clone(), registry);
    let mut session = SessionState::new(&instant_settings());

    session
        .handle_final_segment("engineering wants to ship in March", &deps)
        .await;
    session
        .handle_final_segment("marketing insists on waiting until June", &deps)
        .await;
    session
        .handle_final_segment("debate agent, let's analyze this conflict", &deps)
        .await;

    wait_for_messages(&broadcaster, 1).await;

    // No classifier call happened for the trigger segment; the dispatched
    // prompt saw the whole rolling buffer.
    let prompts = generator.prompts();
    let debate_prompt = prompts.last().unwrap();
    assert!(!debate_prompt.contains("Traffic Cop"));
    assert!(debate_prompt.contains("ship in March"));
    assert!(debate_prompt.contains("waiting until June"));
}

#[tokio::test]
async fn custom_trigger_beats_llm_routable_builtins() {
    let generator = Arc::new(ScriptedGenerator::new(
        "Product Agent",
        "💡 Tiered pricing unlocks the mid-market.",
    ));
    let broadcaster = Arc::new(RecordingBroadcaster::default());
    let registry = Arc::new(AgentRegistry::new());
    registry.create(CustomAgentConfig {
        name: "Pricing Agent".to_string(),
        goal: "pricing strategy and monetization".to_string(),
        prompt: None,
        triggers: vec!["pricing".to_string()],
        model: None,
        icon: None,
    });
    let deps = deps(generator.clone(), broadcaster.clone(), registry);
    let mut session = SessionState::new(&instant_settings());

    session
        .handle_final_segment("let's talk about pricing strategy", &deps)
        .await;

    wait_for_messages(&broadcaster, 1).await;
    match &broadcaster.messages()[0] {
        OutboundMessage::Insight { agent, .. } => assert_eq!(agent, "Pricing Agent"),
        other => panic!("expected insight, got {:?}", other),
    }

    // The classifier was never consulted.
    assert!(generator.prompts().iter().all(|p| !p.contains("Traffic Cop")));
}

#[tokio::test]
async fn sentinel_answer_reaches_no_listener() {
    let generator = Arc::new(ScriptedGenerator::new(
        "Radical Expander",
        "NO_BUSINESS_CONTEXT",
    ));
    let broadcaster = Arc::new(RecordingBroadcaster::default());
    let registry = Arc::new(AgentRegistry::new());
    let deps = deps(generator.clone(), broadcaster.clone(), registry);
    let mut session = SessionState::new(&instant_settings());

    session
        .handle_final_segment(
            "a segment long enough to route somewhere interesting",
            &deps,
        )
        .await;

    // Give the detached dispatch time to complete, then assert silence.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(broadcaster.messages().is_empty());
}
