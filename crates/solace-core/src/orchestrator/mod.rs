//! Response pipeline: classify → select directive → assemble → generate → package.
//!
//! One request is one straight-line pass. Backend failures never escape: they are logged
//! and replaced by the configured fallback reply, while sentiment and confidence are still
//! reported from the classifier.

mod context;
mod directive;
mod persona;

pub use context::{assemble, AssembledContext};
pub use directive::{select_directive, NEGATIVE_DIRECTIVE, NEUTRAL_DIRECTIVE, POSITIVE_DIRECTIVE};
pub use persona::PERSONA_DIRECTIVE;

use crate::config::{CoreConfig, DEFAULT_FALLBACK_REPLY};
use crate::openrouter_service::GenerationBackend;
use crate::sentiment::SentimentAnalyzer;
use crate::shared::{ChatReply, ChatRequest, ConversationTurn};
use std::sync::Arc;

/// Stateless per request; share one instance across handlers via `Arc`.
pub struct ResponsePipeline {
    analyzer: Arc<dyn SentimentAnalyzer>,
    backend: Arc<dyn GenerationBackend>,
    fallback_reply: String,
}

impl ResponsePipeline {
    pub fn new(analyzer: Arc<dyn SentimentAnalyzer>, backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            analyzer,
            backend,
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }

    pub fn with_fallback_reply(mut self, reply: impl Into<String>) -> Self {
        self.fallback_reply = reply.into();
        self
    }

    /// Wires the pipeline with the config's fallback reply.
    pub fn from_config(
        config: &CoreConfig,
        analyzer: Arc<dyn SentimentAnalyzer>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self::new(analyzer, backend).with_fallback_reply(config.fallback_reply.clone())
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn fallback_reply(&self) -> &str {
        &self.fallback_reply
    }

    /// Always yields a well-formed reply.
    pub async fn respond(&self, user_input: &str, history: &[ConversationTurn]) -> ChatReply {
        let sentiment = self.analyzer.classify(user_input);
        let directive = sentiment.label.directive();
        let context = assemble(PERSONA_DIRECTIVE, directive, history, user_input);

        tracing::debug!(
            target: "solace::pipeline",
            label = %sentiment.label,
            confidence = sentiment.confidence,
            saturated = sentiment.is_saturated(),
            history_len = history.len(),
            input_len = user_input.len(),
            "Context assembled"
        );

        let reply = match self.backend.generate(&context).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    target: "solace::pipeline",
                    backend = self.backend.name(),
                    kind = e.kind(),
                    error = %e,
                    "Generation failed; returning fallback reply"
                );
                self.fallback_reply.clone()
            }
        };

        tracing::info!(
            target: "solace::pipeline",
            label = %sentiment.label,
            confidence = sentiment.confidence,
            reply_len = reply.len(),
            "Reply ready"
        );

        ChatReply {
            reply,
            sentiment: sentiment.label,
            confidence: sentiment.confidence,
        }
    }

    pub async fn handle(&self, request: &ChatRequest) -> ChatReply {
        self.respond(&request.user_input, &request.history).await
    }
}
