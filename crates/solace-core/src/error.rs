//! Error types for the Solace core.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result alias for startup-time operations.
pub type StartupResult<T> = Result<T, StartupError>;

/// Failures that must halt process startup. Never recovered.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Missing generation backend credential: set OPENROUTER_API_KEY (or api_key in config)")]
    MissingCredential,

    #[error("Unknown llm_mode '{0}' (expected \"live\" or \"mock\")")]
    UnknownLlmMode(String),

    #[error("Cannot read classifier artifact {path}: {source}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse classifier artifact {path}: {source}")]
    ArtifactFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid classifier artifact {path}: {reason}")]
    ArtifactInvalid { path: PathBuf, reason: String },

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Any failure talking to, or parsing the answer from, the generation service.
/// Recovered by the pipeline; carried only for logging.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Authentication rejected ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    #[error("Rate limited: {body}")]
    RateLimited { body: String },

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl BackendError {
    /// Short stable name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::Transport(_) => "transport",
            BackendError::Timeout(_) => "timeout",
            BackendError::Unauthorized { .. } => "unauthorized",
            BackendError::RateLimited { .. } => "rate_limited",
            BackendError::Status { .. } => "status",
            BackendError::Malformed(_) => "malformed",
        }
    }
}
