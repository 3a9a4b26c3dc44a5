//! Application state.
//!
//! Shared across all handlers. The custom-agent registry and the active
//! provider selection inside `LlmClient` are deliberately process-wide:
//! any session may change them, affecting all sessions going forward.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use insight_agents::{AgentRegistry, PromptVersionStore};
use insight_config::Settings;
use insight_core::{Broadcaster, Transcriber};
use insight_llm::{LlmClient, TextGenerator};
use insight_router::{Router, RouterConfig};

use crate::broadcast::ConnectionManager;
use crate::session::SessionDeps;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub llm: Arc<LlmClient>,
    pub registry: Arc<AgentRegistry>,
    pub versions: Arc<dyn PromptVersionStore>,
    pub router: Arc<Router>,
    pub broadcaster: Arc<ConnectionManager>,
    pub transcriber: Arc<dyn Transcriber>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(
        settings: Settings,
        llm: Arc<LlmClient>,
        transcriber: Arc<dyn Transcriber>,
        versions: Arc<dyn PromptVersionStore>,
        metrics: PrometheusHandle,
    ) -> Self {
        let router = Router::new(RouterConfig::from(&settings.router));
        Self {
            settings: Arc::new(settings),
            llm,
            registry: Arc::new(AgentRegistry::new()),
            versions,
            router: Arc::new(router),
            broadcaster: Arc::new(ConnectionManager::new()),
            transcriber,
            metrics,
        }
    }

    /// The bundle a session loop needs for routing and dispatch.
    pub fn session_deps(&self) -> SessionDeps {
        SessionDeps {
            router: self.router.clone(),
            registry: self.registry.clone(),
            generator: self.llm.clone() as Arc<dyn TextGenerator>,
            broadcaster: self.broadcaster.clone() as Arc<dyn Broadcaster>,
        }
    }
}
