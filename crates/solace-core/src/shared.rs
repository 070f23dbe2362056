//! Shared types used across the pipeline and the gateway.

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn. Serialized lower-case (`"system"`, `"user"`, `"assistant"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in a conversation. Fields are private so a turn cannot change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: Role,
    content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Caller-supplied prior turns, oldest first.
pub type ConversationHistory = Vec<ConversationTurn>;

/// Coarse emotional classification of user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Exact match on the lower-case names. `None` for anything else, including case or
    /// whitespace variants.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(SentimentLabel::Positive),
            "negative" => Some(SentimentLabel::Negative),
            "neutral" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }

    /// Lossy parse: unknown or empty labels become `Neutral`.
    pub fn parse_or_neutral(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a confidence value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceKind {
    /// Max class probability reported by the model.
    Probability,
    /// Model has no probability output; confidence is pinned to 1.0.
    Saturated,
}

/// Output of the sentiment classifier for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Lower-cased label exactly as the model emitted it (may be outside the known set).
    pub raw_label: String,
    /// Always within [0.0, 1.0].
    pub confidence: f64,
    pub confidence_kind: ConfidenceKind,
}

impl SentimentResult {
    /// Builds a result from a measured probability; the value is clamped into [0, 1].
    pub fn with_probability(label: SentimentLabel, confidence: f64) -> Self {
        Self {
            label,
            raw_label: label.as_str().to_string(),
            confidence: clamp_unit(confidence),
            confidence_kind: ConfidenceKind::Probability,
        }
    }

    /// Builds a result for a model without probability support (confidence 1.0).
    pub fn saturated(label: SentimentLabel) -> Self {
        Self {
            label,
            raw_label: label.as_str().to_string(),
            confidence: 1.0,
            confidence_kind: ConfidenceKind::Saturated,
        }
    }

    /// True when 1.0 is a placeholder rather than a measured probability.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.confidence_kind == ConfidenceKind::Saturated
    }
}

pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// One pipeline invocation's input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_input: String,
    #[serde(default)]
    pub history: ConversationHistory,
}

/// One pipeline invocation's output. Exactly these three fields on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parse_is_exact() {
        assert_eq!(SentimentLabel::parse("positive"), Some(SentimentLabel::Positive));
        assert_eq!(SentimentLabel::parse("negative"), Some(SentimentLabel::Negative));
        assert_eq!(SentimentLabel::parse("neutral"), Some(SentimentLabel::Neutral));
        assert_eq!(SentimentLabel::parse(" positive "), None);
        assert_eq!(SentimentLabel::parse("NEGATIVE"), None);
        assert_eq!(SentimentLabel::parse("joyful"), None);
        assert_eq!(SentimentLabel::parse_or_neutral("Positive"), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::parse_or_neutral("joyful"), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::parse_or_neutral(""), SentimentLabel::Neutral);
    }

    #[test]
    fn turn_serializes_with_lowercase_role() {
        let turn = ConversationTurn::assistant("hello");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "assistant", "content": "hello" }));

        let back: ConversationTurn =
            serde_json::from_value(serde_json::json!({ "role": "user", "content": "hi" })).unwrap();
        assert_eq!(back.role(), Role::User);
        assert_eq!(back.content(), "hi");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let res: Result<ConversationTurn, _> =
            serde_json::from_value(serde_json::json!({ "role": "tool", "content": "x" }));
        assert!(res.is_err());
    }

    #[test]
    fn chat_request_history_defaults_to_empty() {
        let req: ChatRequest = serde_json::from_str(r#"{"user_input":"hey"}"#).unwrap();
        assert!(req.history.is_empty());
    }

    #[test]
    fn chat_reply_has_exactly_three_fields() {
        let reply = ChatReply {
            reply: "ok".into(),
            sentiment: SentimentLabel::Negative,
            confidence: 0.83,
        };
        let json = serde_json::to_value(&reply).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(json["sentiment"], "negative");
        assert_eq!(json["confidence"], 0.83);
    }

    #[test]
    fn probability_is_clamped() {
        assert_eq!(SentimentResult::with_probability(SentimentLabel::Positive, 1.2).confidence, 1.0);
        assert_eq!(SentimentResult::with_probability(SentimentLabel::Positive, -0.1).confidence, 0.0);
        assert_eq!(SentimentResult::with_probability(SentimentLabel::Positive, f64::NAN).confidence, 0.0);
        let sat = SentimentResult::saturated(SentimentLabel::Neutral);
        assert!(sat.is_saturated());
        assert_eq!(sat.confidence, 1.0);
    }
}
