//! Core configuration loaded from `config/solace.toml` and the environment.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | SOLACE_CONFIG | config/solace.toml | Optional TOML file path |
//! | OPENROUTER_API_KEY | (none) | Generation backend credential; required in live mode |
//! | SOLACE__LLM_MODE | live | "live" calls OpenRouter, "mock" answers offline |
//! | SOLACE__MODEL | deepseek/deepseek-r1-0528:free | Model identifier sent to the backend |
//! | SOLACE__VECTORIZER_PATH | sentiment_vectorizer.json | Pre-trained vectorizer artifact |
//! | SOLACE__CLASSIFIER_PATH | sentiment_classifier.json | Pre-trained classifier artifact |
//!
//! Every other field in [`CoreConfig`] can be overridden the same way (`SOLACE__<FIELD>`).

use crate::error::{StartupError, StartupResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const ENV_CONFIG_PATH: &str = "SOLACE_CONFIG";
const ENV_OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
const DEFAULT_CONFIG_PATH: &str = "config/solace.toml";

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1-0528:free";
pub const DEFAULT_REFERER: &str = "https://yourprojecturl.com";
pub const DEFAULT_TITLE: &str = "Mental Health Chatbot";
pub const DEFAULT_FALLBACK_REPLY: &str = "⚠️ Sorry, something went wrong. Please try again later.";

/// Which generation backend the pipeline talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LlmMode {
    /// OpenRouter chat completions.
    #[default]
    Live,
    /// Deterministic offline replies for local development.
    Mock,
}

impl LlmMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "live" => Some(LlmMode::Live),
            "mock" => Some(LlmMode::Mock),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmMode::Live => "live",
            LlmMode::Mock => "mock",
        }
    }
}

/// Process-wide configuration. Built once at startup and passed down explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    /// "live" or "mock"; see [`CoreConfig::llm_mode`].
    pub llm_mode: String,
    /// Full chat-completions endpoint.
    pub api_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    /// Sent as `HTTP-Referer` for backend attribution.
    pub referer: String,
    /// Sent as `X-Title` for backend attribution.
    pub title: String,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    pub vectorizer_path: String,
    pub classifier_path: String,
    pub fallback_reply: String,
    /// Comma-separated allowed origins. Empty = any origin.
    #[serde(default)]
    pub cors_origins: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_TITLE.to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            llm_mode: LlmMode::Live.as_str().to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            request_timeout_secs: 60,
            temperature: None,
            max_tokens: None,
            vectorizer_path: "sentiment_vectorizer.json".to_string(),
            classifier_path: "sentiment_classifier.json".to_string(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
            cors_origins: String::new(),
        }
    }
}

impl CoreConfig {
    /// Load config. Precedence: `SOLACE__*` env > file at `SOLACE_CONFIG` (or `config/solace.toml`) > defaults.
    /// `OPENROUTER_API_KEY` wins over any configured `api_key`.
    pub fn load() -> StartupResult<Self> {
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = Self::load_from(Path::new(&config_path))?;
        if let Some(key) = env_opt_string(ENV_OPENROUTER_API_KEY) {
            cfg.api_key = Some(key);
        }
        Ok(cfg)
    }

    /// Load from an explicit file (skipped when missing) plus `SOLACE__*` environment overrides.
    pub fn load_from(path: &Path) -> StartupResult<Self> {
        let d = Self::default();
        let builder = config::Config::builder()
            .set_default("app_name", d.app_name)?
            .set_default("host", d.host)?
            .set_default("port", d.port as i64)?
            .set_default("llm_mode", d.llm_mode)?
            .set_default("api_url", d.api_url)?
            .set_default("model", d.model)?
            .set_default("referer", d.referer)?
            .set_default("title", d.title)?
            .set_default("request_timeout_secs", d.request_timeout_secs as i64)?
            .set_default("vectorizer_path", d.vectorizer_path)?
            .set_default("classifier_path", d.classifier_path)?
            .set_default("fallback_reply", d.fallback_reply)?
            .set_default("cors_origins", d.cors_origins)?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("SOLACE").separator("__"))
            .build()?;

        Ok(built.try_deserialize()?)
    }

    /// Parsed backend mode. Unknown strings are a startup error, not a silent default.
    pub fn llm_mode(&self) -> StartupResult<LlmMode> {
        LlmMode::parse(&self.llm_mode).ok_or_else(|| StartupError::UnknownLlmMode(self.llm_mode.clone()))
    }

    /// Backend credential, trimmed. Missing or blank fails with [`StartupError::MissingCredential`].
    pub fn require_api_key(&self) -> StartupResult<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(StartupError::MissingCredential)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Allowed CORS origins; empty means any origin.
    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Fails fast on anything that would make the pipeline unusable: bad mode, or live mode without a key.
    pub fn validate(&self) -> StartupResult<LlmMode> {
        let mode = self.llm_mode()?;
        if mode == LlmMode::Live {
            self.require_api_key()?;
        }
        Ok(mode)
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
