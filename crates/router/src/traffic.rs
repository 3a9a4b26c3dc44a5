//! The traffic cop.
//!
//! Decision order per invocation: custom-agent trigger words, then built-in
//! trigger phrases in declaration order, then the LLM-routable fallback:
//! a weighted random draw with configured probability (never calls the
//! model), otherwise one classification prompt. Pure LLM classification is
//! too slow and expensive to run on every segment and is measurably biased
//! toward a subset of agents; explicit triggers keep a deterministic path
//! and the weight table is the corrective knob for the bias.

use std::collections::HashMap;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use insight_agents::{builtins, AgentRegistry, AgentSpec};
use insight_core::RoutingDecision;
use insight_llm::{GenerationParams, SafetyThreshold, TextGenerator};

/// Router tuning.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Probability of skipping the classifier for a weighted random draw.
    pub random_route_probability: f64,
    /// Weights over LLM-routable agents; missing names default to 1.0.
    pub route_weights: HashMap<String, f64>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            random_route_probability: 0.6,
            route_weights: HashMap::new(),
        }
    }
}

impl From<&insight_config::RouterSettings> for RouterConfig {
    fn from(settings: &insight_config::RouterSettings) -> Self {
        Self {
            random_route_probability: settings.random_route_probability,
            route_weights: settings.route_weights.clone(),
        }
    }
}

/// The routing core. Stateless across invocations; the rate limiter and
/// the custom-agent registry are owned by the caller.
pub struct Router {
    config: RouterConfig,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Decide which agent (if any) should handle `segment`.
    pub async fn route(
        &self,
        segment: &str,
        registry: &AgentRegistry,
        generator: &dyn TextGenerator,
    ) -> RoutingDecision {
        let lower = segment.to_lowercase();

        // 1. Custom-agent trigger words: highest priority.
        if let Some(custom) = registry.match_trigger(segment) {
            tracing::info!(agent = %custom.name, "Custom trigger matched");
            return RoutingDecision::Agent(custom.name);
        }

        // 2. Built-in trigger phrases, declaration order breaking ties.
        for spec in builtins() {
            if spec.triggers.iter().any(|t| lower.contains(t)) {
                tracing::info!(agent = %spec.name, "Explicit trigger matched");
                return RoutingDecision::Agent(spec.name.to_string());
            }
        }

        // 3. LLM-routable fallback.
        let routable: Vec<&AgentSpec> = builtins().iter().filter(|s| s.routable).collect();
        if routable.is_empty() {
            tracing::warn!("No LLM-routable agents configured, skipping");
            return RoutingDecision::None;
        }

        {
            let mut rng = rand::thread_rng();
            if rng.gen::<f64>() < self.config.random_route_probability {
                if let Some(name) = self.weighted_pick(&routable, &mut rng) {
                    tracing::info!(agent = %name, "Weighted random route");
                    return RoutingDecision::Agent(name);
                }
                // All-zero weights: fall through to the classifier.
            }
        }

        self.classify(segment, &routable, generator).await
    }

    fn weighted_pick(&self, routable: &[&AgentSpec], rng: &mut impl Rng) -> Option<String> {
        let weights: Vec<f64> = routable
            .iter()
            .map(|s| {
                self.config
                    .route_weights
                    .get(s.name)
                    .copied()
                    .unwrap_or(1.0)
            })
            .collect();

        let index = WeightedIndex::new(&weights).ok()?;
        Some(routable[index.sample(rng)].name.to_string())
    }

    async fn classify(
        &self,
        segment: &str,
        routable: &[&AgentSpec],
        generator: &dyn TextGenerator,
    ) -> RoutingDecision {
        if !generator.is_ready() {
            tracing::error!("Routing failed: no model available for content-based routing");
            return RoutingDecision::Unavailable;
        }

        let prompt = classification_prompt(segment, routable);
        let params = GenerationParams::new(0.2, 50).with_safety(SafetyThreshold::Minimal);

        match generator.generate(&prompt, &params).await {
            Ok(generation) => {
                if generation.finish_reason.is_blocked() {
                    tracing::warn!("Routing decision blocked by safety settings, defaulting to none");
                    return RoutingDecision::None;
                }
                let names: Vec<&str> = routable.iter().map(|s| s.name).collect();
                parse_classifier_response(&generation.text, &names)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error during content-based routing");
                RoutingDecision::Unavailable
            }
        }
    }
}

/// Build the classification prompt: candidate domains plus worked examples
/// contrasting internal-process and external-product segments.
fn classification_prompt(segment: &str, routable: &[&AgentSpec]) -> String {
    let mut candidates = String::new();
    for spec in routable {
        candidates.push_str(&format!("- {}: {}\n", spec.name, spec.description));
    }

    format!(
        r#"You are a "Traffic Cop" AI analyzing meeting transcript segments. Your job is to determine which specialized AI agent should process each segment next, IF ANY.

Available Agents (Choose ONE or None):
{candidates}
Transcript Segment:
"{segment}"

Examples of Routing Decisions (pay close attention to internal vs. external focus):
- "Our weekly status meetings are incredibly inefficient and waste a lot of time." -> Radical Expander (internal process)
- "What new AI-powered tools could help us automate expense reporting for employees?" -> Radical Expander (internal process)
- "Should we offer a personalized meal planning subscription service to our customers?" -> Product Agent (external service)
- "Customer churn is way too high; we need to reduce it for our premium product." -> Product Agent (external product)
- "Should we completely reimagine our sales compensation structure?" -> Radical Expander (internal structure)
- "We're getting a lot of negative feedback about the mobile app's user interface." -> Product Agent (external product)

Which agent from the list above is the MOST relevant for this specific segment? Output ONLY the name of the chosen agent or the word "None"."#
    )
}

/// Parse a classifier response against the known names.
///
/// Exact case-insensitive match first, then substring containment, then
/// explicit "none"; anything unrecognized fails closed to `None`.
pub fn parse_classifier_response(raw: &str, names: &[&str]) -> RoutingDecision {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '.' | '`'))
        .collect();
    let cleaned_lower = cleaned.to_lowercase();

    for name in names {
        if name.eq_ignore_ascii_case(cleaned.trim()) {
            tracing::info!(agent = %name, "Routing decision (exact match)");
            return RoutingDecision::Agent(name.to_string());
        }
    }

    for name in names {
        if cleaned_lower.contains(&name.to_lowercase()) {
            tracing::info!(agent = %name, "Routing decision (contained match)");
            return RoutingDecision::Agent(name.to_string());
        }
    }

    if cleaned_lower.contains("none") {
        tracing::info!("Routing decision: no agent needed");
        return RoutingDecision::None;
    }

    tracing::warn!(response = %cleaned, "Unrecognized routing response, defaulting to none");
    RoutingDecision::None
}
