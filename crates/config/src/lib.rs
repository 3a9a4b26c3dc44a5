//! Layered configuration.
//!
//! Priority: environment variables > `config/{env}.yaml` >
//! `config/default.yaml` > compiled defaults.

pub mod settings;

pub use settings::{
    load_settings, LlmSettings, ObservabilityConfig, ProviderSettings, RouterSettings,
    RuntimeEnvironment, ServerConfig, SessionSettings, Settings, TranscriptionSettings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}
