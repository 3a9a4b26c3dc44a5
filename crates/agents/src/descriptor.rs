//! Built-in agent descriptors.
//!
//! The roster is a static table; adding an agent means adding a record, not
//! a code path. Declaration order doubles as trigger priority when several
//! phrase sets overlap.

use crate::prompts;

/// Which input shape an agent receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMode {
    /// The single segment that triggered routing.
    Segment,
    /// The joined rolling context buffer.
    Buffer,
}

/// One built-in agent, fully described by data.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    /// Unique display name (dispatch key).
    pub name: &'static str,
    /// Domain description shown to the routing classifier.
    pub description: &'static str,
    /// Explicit trigger phrases (case-insensitive substring match).
    pub triggers: &'static [&'static str],
    /// Eligible for LLM classification and the weighted random draw.
    pub routable: bool,
    pub context: ContextMode,
    /// Inputs shorter than this are rejected as insufficient context.
    pub min_chars: usize,
    pub temperature: f32,
    pub max_tokens: usize,
    pub template: &'static str,
}

static BUILTINS: &[AgentSpec] = &[
    AgentSpec {
        name: "Radical Expander",
        description: "internal business operations, workflows, or organizational design: how \
            meetings are run, how information is reported, how teams are structured, how \
            internal processes work",
        triggers: &[],
        routable: true,
        context: ContextMode::Segment,
        min_chars: 15,
        temperature: 1.0,
        max_tokens: 500,
        template: prompts::RADICAL_EXPANDER_TEMPLATE,
    },
    AgentSpec {
        name: "Product Agent",
        description: "external, customer-facing offerings: products or services offered to \
            customers, new product concepts, improvements to existing offerings, customer \
            needs and feedback",
        triggers: &[],
        routable: true,
        context: ContextMode::Segment,
        min_chars: 15,
        temperature: 1.0,
        max_tokens: 600,
        template: prompts::PRODUCT_AGENT_TEMPLATE,
    },
    AgentSpec {
        name: "Debate Agent",
        description: "explicitly requested conflict analysis over recent discussion",
        triggers: &["debate agent", "analyze conflict"],
        routable: false,
        context: ContextMode::Buffer,
        min_chars: 25,
        temperature: 0.5,
        max_tokens: 300,
        template: prompts::DEBATE_AGENT_TEMPLATE,
    },
    AgentSpec {
        name: "Skeptical Agent",
        description: "explicitly requested critical examination of an idea",
        triggers: &["skeptical agent", "devil's advocate", "what could go wrong"],
        routable: false,
        context: ContextMode::Segment,
        min_chars: 15,
        temperature: 0.4,
        max_tokens: 350,
        template: prompts::SKEPTICAL_AGENT_TEMPLATE,
    },
    AgentSpec {
        name: "One Small Thing",
        description: "explicitly requested immediate next step",
        triggers: &["one small thing", "next steps", "quick win"],
        routable: false,
        context: ContextMode::Segment,
        min_chars: 15,
        temperature: 0.6,
        max_tokens: 250,
        template: prompts::ONE_SMALL_THING_TEMPLATE,
    },
    AgentSpec {
        name: "Disruptor",
        description: "explicitly requested disruption analysis",
        triggers: &["disruptor", "disrupt this"],
        routable: false,
        context: ContextMode::Segment,
        min_chars: 15,
        temperature: 0.9,
        max_tokens: 500,
        template: prompts::DISRUPTOR_TEMPLATE,
    },
];

/// The built-in roster, in trigger-priority order.
pub fn builtins() -> &'static [AgentSpec] {
    BUILTINS
}

/// Look up a built-in by name, case-insensitively.
pub fn find_builtin(name: &str) -> Option<&'static AgentSpec> {
    BUILTINS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}
