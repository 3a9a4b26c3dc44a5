//! Routing decision type.

/// Output of one router invocation.
///
/// `Unavailable` is distinct from `None`: it means the adapter itself was
/// unreachable, so the caller should not log the decision as a deliberate
/// no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Run this agent (by unique name).
    Agent(String),
    /// No agent is relevant for this segment.
    None,
    /// The routing backend was unreachable; nothing was decided.
    Unavailable,
}

impl RoutingDecision {
    pub fn agent(name: impl Into<String>) -> Self {
        Self::Agent(name.into())
    }

    pub fn agent_name(&self) -> Option<&str> {
        match self {
            Self::Agent(name) => Some(name),
            _ => None,
        }
    }
}
