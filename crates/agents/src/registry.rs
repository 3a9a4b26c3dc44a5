//! Runtime custom-agent registry.
//!
//! Process-wide mutable state with no persistence guarantee beyond process
//! lifetime; create/update/delete races resolve last-writer-wins.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Operator-supplied agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomAgentConfig {
    pub name: String,
    pub goal: String,
    /// Prompt template with `{name}`/`{goal}`/`{text}` placeholders; the
    /// default template is used when absent.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Trigger words (case-insensitive substring match, highest routing
    /// priority).
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Model preference, `"provider"` or `"provider:model"`.
    #[serde(default)]
    pub model: Option<String>,
    /// Frontend icon hint; carried through untouched.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Custom-agent registry.
#[derive(Default)]
pub struct AgentRegistry {
    agents: RwLock<HashMap<String, CustomAgentConfig>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace an agent under its own name.
    pub fn create(&self, config: CustomAgentConfig) {
        tracing::info!(agent = %config.name, "Registered custom agent");
        self.agents.write().insert(config.name.clone(), config);
    }

    /// Replace the agent stored under `old_name` (which may differ from the
    /// new config's name on rename).
    pub fn update(&self, old_name: &str, config: CustomAgentConfig) {
        let mut agents = self.agents.write();
        agents.remove(old_name);
        tracing::info!(old = %old_name, new = %config.name, "Updated custom agent");
        agents.insert(config.name.clone(), config);
    }

    /// Remove an agent; returns whether it existed.
    pub fn delete(&self, name: &str) -> bool {
        let removed = self.agents.write().remove(name).is_some();
        if removed {
            tracing::info!(agent = %name, "Deleted custom agent");
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<CustomAgentConfig> {
        let agents = self.agents.read();
        agents.get(name).cloned().or_else(|| {
            agents
                .values()
                .find(|a| a.name.eq_ignore_ascii_case(name))
                .cloned()
        })
    }

    pub fn list(&self) -> Vec<CustomAgentConfig> {
        self.agents.read().values().cloned().collect()
    }

    /// First agent with a trigger word appearing in `text`
    /// (case-insensitive substring).
    pub fn match_trigger(&self, text: &str) -> Option<CustomAgentConfig> {
        let lower = text.to_lowercase();
        self.agents
            .read()
            .values()
            .find(|agent| {
                agent
                    .triggers
                    .iter()
                    .any(|t| !t.trim().is_empty() && lower.contains(&t.trim().to_lowercase()))
            })
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: &str, triggers: &[&str]) -> CustomAgentConfig {
        CustomAgentConfig {
            name: name.to_string(),
            goal: "test goal".to_string(),
            prompt: None,
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            model: None,
            icon: None,
        }
    }

    #[test]
    fn test_create_get_delete() {
        let registry = AgentRegistry::new();
        registry.create(agent("Pricing Agent", &["pricing"]));

        assert!(registry.get("Pricing Agent").is_some());
        assert!(registry.get("pricing agent").is_some());
        assert!(registry.delete("Pricing Agent"));
        assert!(!registry.delete("Pricing Agent"));
        assert!(registry.get("Pricing Agent").is_none());
    }

    #[test]
    fn test_update_renames() {
        let registry = AgentRegistry::new();
        registry.create(agent("Old Name", &[]));
        registry.update("Old Name", agent("New Name", &[]));

        assert!(registry.get("Old Name").is_none());
        assert!(registry.get("New Name").is_some());
    }

    #[test]
    fn test_last_writer_wins() {
        let registry = AgentRegistry::new();
        registry.create(agent("Pricing Agent", &["pricing"]));
        let mut replacement = agent("Pricing Agent", &["cost"]);
        replacement.goal = "updated goal".to_string();
        registry.create(replacement);

        let stored = registry.get("Pricing Agent").unwrap();
        assert_eq!(stored.goal, "updated goal");
        assert_eq!(stored.triggers, vec!["cost".to_string()]);
    }

    #[test]
    fn test_trigger_match_case_insensitive_substring() {
        let registry = AgentRegistry::new();
        registry.create(agent("Pricing Agent", &["pricing"]));

        let hit = registry.match_trigger("Let's talk about PRICING strategy");
        assert_eq!(hit.unwrap().name, "Pricing Agent");
        assert!(registry.match_trigger("no relevant words here").is_none());
    }

    #[test]
    fn test_blank_triggers_never_match() {
        let registry = AgentRegistry::new();
        registry.create(agent("Quiet Agent", &["", "  "]));
        assert!(registry.match_trigger("anything at all").is_none());
    }
}
