//! Unified client over the initialized backends.
//!
//! Owns the process-wide active-provider selection. Any session may switch
//! it, affecting all sessions going forward; this is an accepted
//! single-tenant simplification, not a per-session setting.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use insight_config::LlmSettings;

use crate::claude::{ClaudeBackend, ClaudeConfig};
use crate::gemini::{GeminiBackend, GeminiConfig};
use crate::provider::{
    Generation, GenerationParams, GenerativeBackend, Provider, TextGenerator,
};
use crate::LlmError;

#[derive(Debug, Clone)]
struct ActiveSelection {
    provider: Provider,
    model: String,
}

/// Unified client for interacting with the configured LLM providers.
pub struct LlmClient {
    gemini: Option<Arc<GeminiBackend>>,
    claude: Option<Arc<ClaudeBackend>>,
    active: RwLock<Option<ActiveSelection>>,
}

impl LlmClient {
    /// Build backends from settings.
    ///
    /// A provider that fails to initialize (missing key, bad endpoint) is
    /// logged and skipped; the client is still usable with whatever came
    /// up. Zero initialized backends is legal here and reported through
    /// [`TextGenerator::is_ready`] so the connection layer can refuse
    /// sessions instead.
    pub fn from_settings(settings: &LlmSettings) -> Self {
        let mut timeout = std::time::Duration::from_secs(settings.timeout_secs);
        if timeout.is_zero() {
            timeout = std::time::Duration::from_secs(60);
        }

        let gemini = if settings.gemini.enabled {
            let mut config = GeminiConfig::default().with_timeout(timeout);
            if let Some(key) = &settings.gemini.api_key {
                config.api_key = key.clone();
            }
            if let Some(model) = &settings.gemini.model {
                config.model = model.clone();
            }
            if let Some(endpoint) = &settings.gemini.endpoint {
                config.endpoint = endpoint.clone();
            }
            match GeminiBackend::new(config) {
                Ok(backend) => {
                    tracing::info!(model = %backend.default_model(), "Initialized Gemini backend");
                    Some(Arc::new(backend))
                }
                Err(e) => {
                    tracing::error!("Failed to initialize Gemini backend: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let claude = if settings.claude.enabled {
            let mut config = ClaudeConfig::default().with_timeout(timeout);
            if let Some(key) = &settings.claude.api_key {
                config.api_key = key.clone();
            }
            if let Some(model) = &settings.claude.model {
                config.model = model.clone();
            }
            if let Some(endpoint) = &settings.claude.endpoint {
                config.endpoint = endpoint.clone();
            }
            match ClaudeBackend::new(config) {
                Ok(backend) => {
                    tracing::info!(model = %backend.default_model(), "Initialized Claude backend");
                    Some(Arc::new(backend))
                }
                Err(e) => {
                    tracing::error!("Failed to initialize Claude backend: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let client = Self {
            gemini,
            claude,
            active: RwLock::new(None),
        };

        // Honor the configured preference, then fall back to whatever is up.
        let preferred = Provider::from_str(&settings.active_provider);
        for candidate in [preferred, Some(Provider::Gemini), Some(Provider::Claude)]
            .into_iter()
            .flatten()
        {
            if client.set_active(candidate, None).is_ok() {
                break;
            }
        }

        if let Some(selection) = client.active.read().as_ref() {
            tracing::info!(
                provider = %selection.provider,
                model = %selection.model,
                "Active LLM provider selected"
            );
        } else {
            tracing::warn!("No LLM provider could be initialized");
        }

        client
    }

    fn backend(&self, provider: Provider) -> Option<Arc<dyn GenerativeBackend>> {
        match provider {
            Provider::Gemini => self
                .gemini
                .clone()
                .map(|b| b as Arc<dyn GenerativeBackend>),
            Provider::Claude => self
                .claude
                .clone()
                .map(|b| b as Arc<dyn GenerativeBackend>),
        }
    }

    /// Current active provider and model, if any backend is up.
    pub fn active(&self) -> Option<(Provider, String)> {
        self.active
            .read()
            .as_ref()
            .map(|s| (s.provider, s.model.clone()))
    }

    /// Switch the active provider (and optionally model).
    ///
    /// Fails without touching the current selection when the requested
    /// provider was never initialized.
    pub fn set_active(&self, provider: Provider, model: Option<&str>) -> Result<(), LlmError> {
        let backend = self
            .backend(provider)
            .ok_or_else(|| LlmError::ProviderNotInitialized(provider.to_string()))?;

        let model = match model {
            Some(m) if !m.trim().is_empty() => m.trim().to_string(),
            _ => backend.default_model().to_string(),
        };

        tracing::info!(provider = %provider, model = %model, "Set active provider");
        *self.active.write() = Some(ActiveSelection { provider, model });
        Ok(())
    }

    /// Model catalog grouped by initialized provider.
    pub fn available_models(&self) -> serde_json::Value {
        let mut models = serde_json::Map::new();
        if let Some(gemini) = &self.gemini {
            models.insert(
                Provider::Gemini.as_str().to_string(),
                serde_json::json!(gemini.available_models()),
            );
        }
        if let Some(claude) = &self.claude {
            models.insert(
                Provider::Claude.as_str().to_string(),
                serde_json::json!(claude.available_models()),
            );
        }
        serde_json::Value::Object(models)
    }

    /// Generate with an optional per-call preference of the form
    /// `"provider"` or `"provider:model"` (custom agents carry one).
    /// Falls back to the active selection when the preference names an
    /// uninitialized provider.
    pub async fn generate_with_preference(
        &self,
        preference: Option<&str>,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, LlmError> {
        if let Some(pref) = preference {
            let (provider_str, model) = match pref.split_once(':') {
                Some((p, m)) => (p, Some(m)),
                None => (pref, None),
            };
            if let Some(provider) = Provider::from_str(provider_str) {
                if let Some(backend) = self.backend(provider) {
                    let model = model
                        .filter(|m| !m.trim().is_empty())
                        .map(|m| m.trim().to_string())
                        .unwrap_or_else(|| backend.default_model().to_string());
                    return backend.generate(&model, prompt, params).await;
                }
                tracing::warn!(
                    preference = %pref,
                    "Preferred provider not initialized, using active selection"
                );
            } else {
                tracing::warn!(preference = %pref, "Unrecognized model preference, using active selection");
            }
        }
        TextGenerator::generate(self, prompt, params).await
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, LlmError> {
        let selection = self.active.read().clone().ok_or(LlmError::NoProvider)?;
        let backend = self
            .backend(selection.provider)
            .ok_or(LlmError::NoProvider)?;
        backend.generate(&selection.model, prompt, params).await
    }

    async fn generate_preferring(
        &self,
        preference: Option<&str>,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, LlmError> {
        self.generate_with_preference(preference, prompt, params)
            .await
    }

    fn is_ready(&self) -> bool {
        self.active.read().is_some()
    }
}
