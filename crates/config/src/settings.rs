//! Main settings module

use std::collections::HashMap;
use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// LLM provider configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Router tuning
    #[serde(default)]
    pub router: RouterSettings,

    /// Per-session state sizing
    #[serde(default)]
    pub session: SessionSettings,

    /// Transcription collaborator endpoint
    #[serde(default)]
    pub transcription: TranscriptionSettings,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// One provider's settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderSettings {
    /// Enable this provider at startup
    #[serde(default)]
    pub enabled: bool,

    /// API key; falls back to the provider's conventional env var
    #[serde(default)]
    pub api_key: Option<String>,

    /// Default model name
    #[serde(default)]
    pub model: Option<String>,

    /// API endpoint override (testing or proxy)
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Provider activated at startup ("gemini" or "claude")
    #[serde(default = "default_active_provider")]
    pub active_provider: String,

    #[serde(default = "default_gemini")]
    pub gemini: ProviderSettings,

    #[serde(default = "default_claude")]
    pub claude: ProviderSettings,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_active_provider() -> String {
    "gemini".to_string()
}

fn default_gemini() -> ProviderSettings {
    ProviderSettings {
        enabled: true,
        api_key: None,
        model: Some("gemini-1.5-pro-002".to_string()),
        endpoint: None,
    }
}

fn default_claude() -> ProviderSettings {
    ProviderSettings {
        enabled: true,
        api_key: None,
        model: Some("claude-3-7-sonnet-20250219".to_string()),
        endpoint: None,
    }
}

fn default_llm_timeout_secs() -> u64 {
    60
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            active_provider: default_active_provider(),
            gemini: default_gemini(),
            claude: default_claude(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

/// Router tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterSettings {
    /// Minimum seconds between routing decisions per session
    #[serde(default = "default_min_interval_secs")]
    pub min_interval_secs: f64,

    /// Probability of the weighted-random short-circuit (0.0 disables it,
    /// 1.0 never calls the classifier)
    #[serde(default = "default_random_route_probability")]
    pub random_route_probability: f64,

    /// Weight table over LLM-routable agents; corrects classifier bias
    /// without code changes. Missing agents default to weight 1.0.
    #[serde(default)]
    pub route_weights: HashMap<String, f64>,
}

fn default_min_interval_secs() -> f64 {
    15.0
}

fn default_random_route_probability() -> f64 {
    0.6
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            min_interval_secs: default_min_interval_secs(),
            random_route_probability: default_random_route_probability(),
            route_weights: HashMap::new(),
        }
    }
}

/// Per-session state sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Context buffer capacity (most recent finalized segments)
    #[serde(default = "default_context_capacity")]
    pub context_capacity: usize,

    /// Segments shorter than this (after trim) never reach the router
    #[serde(default = "default_min_segment_chars")]
    pub min_segment_chars: usize,
}

fn default_context_capacity() -> usize {
    10
}

fn default_min_segment_chars() -> usize {
    5
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            context_capacity: default_context_capacity(),
            min_segment_chars: default_min_segment_chars(),
        }
    }
}

/// Transcription collaborator endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// Base URL of the speech-to-text sidecar
    #[serde(default = "default_stt_url")]
    pub url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_stt_timeout_ms")]
    pub timeout_ms: u64,

    /// Audio bytes buffered before a chunk is sent (16 kHz 16-bit mono)
    #[serde(default = "default_stt_chunk_bytes")]
    pub chunk_bytes: usize,
}

fn default_stt_url() -> String {
    "http://127.0.0.1:8090".to_string()
}

fn default_stt_timeout_ms() -> u64 {
    30_000
}

fn default_stt_chunk_bytes() -> usize {
    32_000 // 1 second at 16 kHz, 16-bit mono
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            url: default_stt_url(),
            timeout_ms: default_stt_timeout_ms(),
            chunk_bytes: default_stt_chunk_bytes(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON-formatted logs
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.router.random_route_probability) {
            return Err(ConfigError::InvalidValue {
                field: "router.random_route_probability".to_string(),
                message: format!(
                    "Must be between 0.0 and 1.0, got {}",
                    self.router.random_route_probability
                ),
            });
        }

        if self.router.min_interval_secs < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "router.min_interval_secs".to_string(),
                message: "Must be non-negative".to_string(),
            });
        }

        for (name, weight) in &self.router.route_weights {
            if *weight < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("router.route_weights.{}", name),
                    message: format!("Weight must be non-negative, got {}", weight),
                });
            }
        }

        if self.session.context_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.context_capacity".to_string(),
                message: "Capacity must be at least 1".to_string(),
            });
        }

        match self.llm.active_provider.as_str() {
            "gemini" | "claude" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "llm.active_provider".to_string(),
                    message: format!("Unknown provider '{}'", other),
                });
            }
        }

        Ok(())
    }
}

/// Load settings from files and environment.
///
/// Priority: env vars (`INSIGHT_` prefix, `__` separator) >
/// `config/{env}.yaml` > `config/default.yaml` > defaults.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if Path::new("config/default.yaml").exists() {
        builder = builder.add_source(File::with_name("config/default"));
    }

    if let Some(env_name) = env {
        let env_file = format!("config/{}", env_name);
        if Path::new(&format!("{}.yaml", env_file)).exists() {
            builder = builder.add_source(File::with_name(&env_file));
        }
    }

    builder = builder.add_source(Environment::with_prefix("INSIGHT").separator("__"));

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
