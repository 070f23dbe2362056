//! solace-core: sentiment-aware response pipeline for a supportive mental-health chatbot.
//!
//! Classifies each user message, picks a sentiment directive, assembles the prompt with the
//! fixed persona and caller history, and asks the generation backend (OpenRouter) for a reply.
//! The gateway add-on wraps [`ResponsePipeline`] in an HTTP API.

mod config;
mod error;
mod openrouter_service;
mod orchestrator;
mod sentiment;
mod shared;

// Shared types
pub use shared::{
    ChatReply, ChatRequest, ConfidenceKind, ConversationHistory, ConversationTurn, Role,
    SentimentLabel, SentimentResult,
};

// Configuration
pub use config::{
    CoreConfig, LlmMode, DEFAULT_API_URL, DEFAULT_FALLBACK_REPLY, DEFAULT_MODEL, DEFAULT_REFERER,
    DEFAULT_TITLE,
};

pub use error::{BackendError, StartupError, StartupResult};

// Sentiment classifier
pub use sentiment::{
    LinearModel, ModelKind, MultiClass, Norm, Prediction, SentimentAnalyzer, SentimentClassifier,
    SparseRow, TextVectorizer, VectorizerKind, DEFAULT_TOKEN_PATTERN,
};

// Orchestrator
pub use orchestrator::{
    assemble, select_directive, AssembledContext, ResponsePipeline,
    NEGATIVE_DIRECTIVE, NEUTRAL_DIRECTIVE, PERSONA_DIRECTIVE, POSITIVE_DIRECTIVE,
};

// Generation backend
pub use openrouter_service::{
    build_backend, extract_reply, truncate_body, BackendSettings, GenerationBackend, MockBackend,
    OpenRouterBackend, MAX_ERROR_BODY_CHARS,
};
