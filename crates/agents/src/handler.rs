//! The generic agent handler.
//!
//! Every agent, built-in or custom, runs through [`execute`]: validate
//! preconditions, build the prompt, call the adapter, interpret the result,
//! emit at most one outbound message. Upstream failures never propagate to
//! the caller.

use insight_core::{AgentOutcome, Broadcaster, SuppressReason};
use insight_llm::{GenerationParams, TextGenerator};

use crate::descriptor::AgentSpec;
use crate::formatter::{format_agent_response, MessageKind};
use crate::prompts;
use crate::registry::CustomAgentConfig;

/// A fully-resolved agent run: name, rendered prompt, parameters, and the
/// sentinels that mean "nothing worth surfacing".
#[derive(Debug, Clone)]
pub struct AgentInvocation {
    pub agent_name: String,
    pub input_text: String,
    pub min_chars: usize,
    pub prompt: String,
    pub params: GenerationParams,
    pub sentinels: Vec<&'static str>,
    /// Model preference (`"provider"` or `"provider:model"`), custom
    /// agents only.
    pub model_preference: Option<String>,
    /// User-visible notice for the insufficient-context path.
    pub insufficient_notice: String,
}

impl AgentInvocation {
    /// Build an invocation for a built-in agent.
    pub fn builtin(spec: &AgentSpec, input_text: &str) -> Self {
        Self::builtin_with_prompt(spec, spec.template, input_text)
    }

    /// Build a built-in invocation with a prompt override (versioned
    /// prompts swap the template, everything else stays).
    pub fn builtin_with_prompt(spec: &AgentSpec, template: &str, input_text: &str) -> Self {
        Self {
            agent_name: spec.name.to_string(),
            input_text: input_text.to_string(),
            min_chars: spec.min_chars,
            prompt: prompts::render(template, spec.name, spec.description, input_text),
            params: GenerationParams::new(spec.temperature, spec.max_tokens)
                .with_system(prompts::MEETING_ASSISTANT_SYSTEM),
            sentinels: vec![prompts::BUILTIN_SENTINEL, prompts::CUSTOM_SENTINEL],
            model_preference: None,
            insufficient_notice: format!(
                "Insufficient context to generate insights for {}.",
                spec.name
            ),
        }
    }

    /// Build an invocation for a runtime-created agent, optionally with a
    /// prompt override (used by `use_agent_version`).
    pub fn custom(config: &CustomAgentConfig, input_text: &str) -> Self {
        Self::custom_with_prompt(config, config.prompt.as_deref(), input_text)
    }

    pub fn custom_with_prompt(
        config: &CustomAgentConfig,
        prompt_template: Option<&str>,
        input_text: &str,
    ) -> Self {
        let template = prompt_template
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(prompts::CUSTOM_AGENT_TEMPLATE);
        Self {
            agent_name: config.name.clone(),
            input_text: input_text.to_string(),
            min_chars: 15,
            prompt: prompts::render(template, &config.name, &config.goal, input_text),
            params: GenerationParams::new(0.7, 500)
                .with_system(prompts::MEETING_ASSISTANT_SYSTEM),
            sentinels: vec![prompts::CUSTOM_SENTINEL, prompts::BUILTIN_SENTINEL],
            model_preference: config.model.clone(),
            insufficient_notice: format!(
                "Insufficient context to generate insights for {}.",
                config.name
            ),
        }
    }
}

/// True when an error message indicates upstream quota or rate-limit
/// exhaustion; these get a distinguishing log line so operators know to
/// raise the routing interval.
fn is_quota_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("429") || lower.contains("quota") || lower.contains("resource exhausted")
}

/// Run one agent invocation end to end.
///
/// Guarantee: at most one outbound message per call. Either one insight,
/// or one silent "insufficient context" notice, or nothing.
pub async fn execute(
    invocation: &AgentInvocation,
    generator: &dyn TextGenerator,
    broadcaster: &dyn Broadcaster,
) -> AgentOutcome {
    let agent_name = invocation.agent_name.as_str();
    tracing::info!(agent = %agent_name, "Running agent");

    if !generator.is_ready() {
        tracing::error!(agent = %agent_name, "No LLM provider available");
        return AgentOutcome::Fail("no provider available".to_string());
    }

    if invocation.input_text.trim().len() < invocation.min_chars {
        tracing::warn!(
            agent = %agent_name,
            chars = invocation.input_text.trim().len(),
            "Input text too short, skipping"
        );
        format_agent_response(
            agent_name,
            &invocation.insufficient_notice,
            broadcaster,
            MessageKind::Error,
        )
        .await;
        return AgentOutcome::Fail("input too short".to_string());
    }

    let generation = match generator
        .generate_preferring(
            invocation.model_preference.as_deref(),
            &invocation.prompt,
            &invocation.params,
        )
        .await
    {
        Ok(generation) => generation,
        Err(e) => {
            let message = e.to_string();
            if is_quota_error(&message) {
                tracing::error!(
                    agent = %agent_name,
                    "RATE LIMIT: API quota exceeded; consider raising router.min_interval_secs"
                );
            } else {
                tracing::error!(agent = %agent_name, error = %message, "Generation failed");
            }
            return AgentOutcome::Fail(message);
        }
    };

    if generation.finish_reason.is_blocked() {
        tracing::warn!(agent = %agent_name, "Generation safety-blocked, suppressing");
        return AgentOutcome::Suppress(SuppressReason::SafetyBlocked);
    }

    let text = generation.text.trim();
    if text.is_empty() {
        tracing::warn!(agent = %agent_name, "Generation produced empty text, suppressing");
        return AgentOutcome::Suppress(SuppressReason::Empty);
    }

    if invocation
        .sentinels
        .iter()
        .any(|s| text.eq_ignore_ascii_case(s))
    {
        tracing::info!(agent = %agent_name, "No-context sentinel detected, not sending card");
        return AgentOutcome::Suppress(SuppressReason::Sentinel);
    }

    if format_agent_response(agent_name, text, broadcaster, MessageKind::Insight).await {
        AgentOutcome::Emit(text.to_string())
    } else {
        AgentOutcome::Suppress(SuppressReason::NonAnswer)
    }
}
