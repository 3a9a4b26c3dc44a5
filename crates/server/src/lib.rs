//! Meeting insight server.
//!
//! Provides the WebSocket endpoint, the per-connection session loop, and
//! broadcast fan-out to all connected listeners.

pub mod broadcast;
pub mod control;
pub mod http;
pub mod metrics;
pub mod rate_limit;
pub mod session;
pub mod state;
pub mod transcribe;
pub mod websocket;

pub use broadcast::ConnectionManager;
pub use http::create_router;
pub use metrics::init_metrics;
pub use rate_limit::RateLimiter;
pub use session::SessionState;
pub use state::AppState;
pub use transcribe::HttpTranscriber;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Session(_) => axum::http::StatusCode::NOT_FOUND,
            ServerError::WebSocket(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Transcription(_) => axum::http::StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
