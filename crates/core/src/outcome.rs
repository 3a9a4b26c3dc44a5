//! Agent invocation outcomes.
//!
//! The three-way branch every handler ends in: emit an insight, suppress
//! deliberately, or fail. Suppression is not an error; it is the normal
//! path for safety blocks, empty generations, and the reserved
//! "nothing to say" sentinel.

/// Why a generation was suppressed rather than emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// The provider blocked the generation on safety grounds.
    SafetyBlocked,
    /// The generation was empty after trimming.
    Empty,
    /// The agent answered with the reserved no-context sentinel.
    Sentinel,
    /// The content read as an apology/deflection rather than an insight.
    NonAnswer,
}

impl SuppressReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SafetyBlocked => "safety_blocked",
            Self::Empty => "empty",
            Self::Sentinel => "sentinel",
            Self::NonAnswer => "non_answer",
        }
    }
}

/// Result of one agent invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    /// Content worth surfacing to listeners.
    Emit(String),
    /// Deliberate non-response; logged, nothing sent.
    Suppress(SuppressReason),
    /// Upstream failure; logged, nothing sent.
    Fail(String),
}

impl AgentOutcome {
    pub fn is_emit(&self) -> bool {
        matches!(self, Self::Emit(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_branches() {
        assert!(AgentOutcome::Emit("x".to_string()).is_emit());
        assert!(!AgentOutcome::Suppress(SuppressReason::Sentinel).is_emit());
        assert!(!AgentOutcome::Fail("boom".to_string()).is_emit());
    }
}
