//! Control messages.
//!
//! Text frames on the session channel carry these. Each yields a reply on
//! the same channel; `use_agent_version` additionally broadcasts its
//! insight to every listener like a normal dispatch.

use serde::Deserialize;

use insight_agents::{
    find_builtin, prompts, AgentInvocation, CustomAgentConfig, PromptVersionStore,
};
use insight_core::OutboundMessage;
use insight_llm::Provider;

use crate::state::AppState;

/// Inbound control messages (JSON text frames).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    CreateAgent {
        config: CustomAgentConfig,
    },
    UpdateAgent {
        old_name: String,
        config: CustomAgentConfig,
    },
    DeleteAgent {
        name: String,
    },
    GetAvailableModels,
    SetModel {
        provider: String,
        #[serde(default)]
        model: Option<String>,
    },
    GetAgentPrompt {
        agent_name: String,
    },
    GetAgentVersions {
        agent_name: String,
    },
    CreateAgentVersion {
        agent_name: String,
        version_name: String,
        prompt_text: String,
        #[serde(default)]
        description: String,
    },
    DeleteAgentVersion {
        agent_name: String,
        version_name: String,
    },
    UseAgentVersion {
        agent_name: String,
        version_name: String,
        text: String,
    },
}

/// Handle one control message, returning the same-channel reply.
pub async fn handle_control(state: &AppState, message: ControlMessage) -> OutboundMessage {
    match message {
        ControlMessage::CreateAgent { config } => {
            if config.name.trim().is_empty() {
                return OutboundMessage::system("Agent name must not be empty.");
            }
            let name = config.name.clone();
            state.registry.create(config);
            OutboundMessage::system(format!("Created custom agent '{}'.", name))
        }

        ControlMessage::UpdateAgent { old_name, config } => {
            if config.name.trim().is_empty() {
                return OutboundMessage::system("Agent name must not be empty.");
            }
            let name = config.name.clone();
            state.registry.update(&old_name, config);
            OutboundMessage::system(format!("Updated agent '{}'.", name))
        }

        ControlMessage::DeleteAgent { name } => {
            if state.registry.delete(&name) {
                OutboundMessage::system(format!("Deleted agent '{}'.", name))
            } else {
                OutboundMessage::system(format!("Unknown agent '{}'.", name))
            }
        }

        ControlMessage::GetAvailableModels => {
            let (active_provider, active_model) = state
                .llm
                .active()
                .map(|(p, m)| (p.to_string(), m))
                .unwrap_or_else(|| ("none".to_string(), String::new()));
            OutboundMessage::AvailableModels {
                models: state.llm.available_models(),
                active_provider,
                active_model,
            }
        }

        ControlMessage::SetModel { provider, model } => {
            let Some(provider) = Provider::from_str(&provider) else {
                return OutboundMessage::system(format!("Unknown provider '{}'.", provider));
            };
            match state.llm.set_active(provider, model.as_deref()) {
                Ok(()) => {
                    let active_model = state.llm.active().map(|(_, m)| m).unwrap_or_default();
                    OutboundMessage::system(format!(
                        "Switched to {} model '{}'.",
                        provider, active_model
                    ))
                }
                Err(e) => OutboundMessage::system(format!("Cannot switch provider: {}", e)),
            }
        }

        ControlMessage::GetAgentPrompt { agent_name } => {
            // Latest stored version wins; otherwise the original template.
            match state.versions.latest(&agent_name) {
                Ok(Some(version)) => OutboundMessage::AgentPrompt {
                    agent_name,
                    prompt_text: version.prompt_text,
                    is_original: false,
                },
                Ok(None) => {
                    if let Some(custom) = state.registry.get(&agent_name) {
                        OutboundMessage::AgentPrompt {
                            agent_name,
                            prompt_text: custom
                                .prompt
                                .unwrap_or_else(|| prompts::CUSTOM_AGENT_TEMPLATE.to_string()),
                            is_original: true,
                        }
                    } else if let Some(spec) = find_builtin(&agent_name) {
                        OutboundMessage::AgentPrompt {
                            agent_name,
                            prompt_text: spec.template.to_string(),
                            is_original: true,
                        }
                    } else {
                        OutboundMessage::system(format!("Unknown agent '{}'.", agent_name))
                    }
                }
                Err(e) => OutboundMessage::system(format!("Version store error: {}", e)),
            }
        }

        ControlMessage::GetAgentVersions { agent_name } => {
            match state.versions.versions(&agent_name) {
                Ok(versions) => OutboundMessage::AgentVersions {
                    agent_name,
                    versions: serde_json::json!(versions),
                },
                Err(e) => OutboundMessage::system(format!("Version store error: {}", e)),
            }
        }

        ControlMessage::CreateAgentVersion {
            agent_name,
            version_name,
            prompt_text,
            description,
        } => match state
            .versions
            .create(&agent_name, &version_name, &prompt_text, &description)
        {
            Ok(version) => OutboundMessage::system(format!(
                "Created version '{}' of '{}'.",
                version.version_name, agent_name
            )),
            Err(e) => OutboundMessage::system(format!("Failed to create version: {}", e)),
        },

        ControlMessage::DeleteAgentVersion {
            agent_name,
            version_name,
        } => match state.versions.delete(&agent_name, &version_name) {
            Ok(()) => OutboundMessage::system(format!(
                "Deleted version '{}' of '{}'.",
                version_name, agent_name
            )),
            Err(e) => OutboundMessage::system(format!("Failed to delete version: {}", e)),
        },

        ControlMessage::UseAgentVersion {
            agent_name,
            version_name,
            text,
        } => {
            let version = match state.versions.get(&agent_name, &version_name) {
                Ok(version) => version,
                Err(e) => {
                    return OutboundMessage::system(format!("Cannot run version: {}", e));
                }
            };

            let invocation = if let Some(custom) = state.registry.get(&agent_name) {
                AgentInvocation::custom_with_prompt(&custom, Some(&version.prompt_text), &text)
            } else if let Some(spec) = find_builtin(&agent_name) {
                AgentInvocation::builtin_with_prompt(spec, &version.prompt_text, &text)
            } else {
                return OutboundMessage::system(format!("Unknown agent '{}'.", agent_name));
            };

            let generator = state.llm.clone();
            let broadcaster = state.broadcaster.clone();
            tokio::spawn(async move {
                insight_agents::execute(&invocation, generator.as_ref(), broadcaster.as_ref())
                    .await;
            });

            OutboundMessage::system(format!(
                "Running '{}' with version '{}'.",
                agent_name, version_name
            ))
        }
    }
}
