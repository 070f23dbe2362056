//! Generation backend: OpenRouter (OpenAI-compatible chat completions) plus an offline mock.
//!
//! API key: `OPENROUTER_API_KEY` in `.env`. Default model: `deepseek/deepseek-r1-0528:free`.
//! `HTTP-Referer` and `X-Title` are attribution headers only.

use crate::config::{CoreConfig, LlmMode};
use crate::error::{BackendError, StartupError, StartupResult};
use crate::orchestrator::AssembledContext;
use crate::shared::Role;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Error bodies kept in [`BackendError`] are cut to this many characters.
pub const MAX_ERROR_BODY_CHARS: usize = 512;

/// Produces reply text for an assembled context.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    async fn generate(&self, context: &AssembledContext) -> Result<String, BackendError>;
}

// OpenAI-compatible request/response for OpenRouter
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct TokenUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Everything the live backend needs; built from [`CoreConfig`] at startup.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub referer: String,
    pub title: String,
    pub timeout: Duration,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl BackendSettings {
    /// Requires a credential; a missing key is a startup failure.
    pub fn from_config(config: &CoreConfig) -> StartupResult<Self> {
        Ok(Self {
            api_url: config.api_url.clone(),
            api_key: config.require_api_key()?.to_string(),
            model: config.model.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
            timeout: config.request_timeout(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

/// Live backend: one POST per request, bounded by the client timeout.
pub struct OpenRouterBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl OpenRouterBackend {
    pub fn new(settings: BackendSettings) -> StartupResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(StartupError::HttpClient)?;
        Ok(Self { settings, client })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.settings.timeout)
        } else {
            BackendError::Transport(e)
        }
    }
}

#[async_trait::async_trait]
impl GenerationBackend for OpenRouterBackend {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn generate(&self, context: &AssembledContext) -> Result<String, BackendError> {
        let body = ChatRequest {
            model: &self.settings.model,
            messages: context
                .turns()
                .iter()
                .map(|t| ChatMessage {
                    role: t.role(),
                    content: t.content(),
                })
                .collect(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        tracing::debug!(
            target: "solace::openrouter",
            model = %self.settings.model,
            messages = body.messages.len(),
            "Dispatching chat completion"
        );

        let res = self
            .client
            .post(&self.settings.api_url)
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .header("HTTP-Referer", &self.settings.referer)
            .header("X-Title", &self.settings.title)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();
        let text = res.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let text = truncate_body(text);
            return Err(match status.as_u16() {
                401 | 403 => BackendError::Unauthorized {
                    status: status.as_u16(),
                    body: text,
                },
                429 => BackendError::RateLimited { body: text },
                code => BackendError::Status { status: code, body: text },
            });
        }

        let reply = extract_reply(&text)?;
        tracing::debug!(
            target: "solace::openrouter",
            status = %status,
            reply_len = reply.len(),
            "Chat completion received"
        );
        Ok(reply)
    }
}

/// First choice's message content from a chat-completions body.
pub fn extract_reply(body: &str) -> Result<String, BackendError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Malformed(format!("unparseable body: {}", e)))?;

    if let Some(usage) = &parsed.usage {
        tracing::debug!(
            target: "solace::openrouter",
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Token usage"
        );
    }

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::Malformed("response has no choices".to_string()))?;
    choice
        .message
        .content
        .ok_or_else(|| BackendError::Malformed("first choice has no message content".to_string()))
}

/// Keeps at most [`MAX_ERROR_BODY_CHARS`] characters, marking the cut with `…`.
pub fn truncate_body(body: String) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => {
            let mut short = body[..cut].to_string();
            short.push('…');
            short
        }
        None => body,
    }
}

/// Offline backend: deterministic reply, never fails. For local development without a key.
#[derive(Debug, Default, Clone)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        Self
    }

    fn mock_generate(context: &AssembledContext) -> String {
        let input = context.latest().content();
        let preview: String = input
            .chars()
            .take(60)
            .chain(if input.chars().count() > 60 { "…" } else { "" }.chars())
            .collect();
        format!(
            "[Generated – Mock LLM]\n\nThank you for sharing that with me (\"{}\").\n\n{}\n\nYou're not alone, and you can come back anytime.",
            preview,
            context.directive().content()
        )
    }
}

#[async_trait::async_trait]
impl GenerationBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, context: &AssembledContext) -> Result<String, BackendError> {
        Ok(Self::mock_generate(context))
    }
}

/// Picks the backend for the configured mode. Live mode without a credential fails here.
pub fn build_backend(config: &CoreConfig) -> StartupResult<Arc<dyn GenerationBackend>> {
    match config.validate()? {
        LlmMode::Live => Ok(Arc::new(OpenRouterBackend::new(BackendSettings::from_config(config)?)?)),
        LlmMode::Mock => Ok(Arc::new(MockBackend::new())),
    }
}
