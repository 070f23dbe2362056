//! Sentiment classifier: pre-trained vectorizer + pre-trained linear model, loaded once at startup.
//!
//! Artifacts are JSON exports of the trained models (see `sentiment_vectorizer.json` /
//! `sentiment_classifier.json` under `data/`). Loading validates that the two agree on the
//! feature space; any mismatch is a [`StartupError`].

mod model;
mod vectorizer;

pub use model::{LinearModel, ModelKind, MultiClass, Prediction};
pub use vectorizer::{Norm, SparseRow, TextVectorizer, VectorizerKind, DEFAULT_TOKEN_PATTERN};

use crate::error::{StartupError, StartupResult};
use crate::shared::{SentimentLabel, SentimentResult};
use std::path::Path;

/// Turns raw text into a (label, confidence) pair. Implementations must be pure and thread-safe.
pub trait SentimentAnalyzer: Send + Sync {
    fn classify(&self, text: &str) -> SentimentResult;
}

/// Read-only classifier artifacts. Build once, share via `Arc`.
#[derive(Debug)]
pub struct SentimentClassifier {
    vectorizer: TextVectorizer,
    model: LinearModel,
}

impl SentimentClassifier {
    /// Loads and cross-validates both artifacts from disk.
    pub fn load(vectorizer_path: impl AsRef<Path>, classifier_path: impl AsRef<Path>) -> StartupResult<Self> {
        let vectorizer_path = vectorizer_path.as_ref();
        let classifier_path = classifier_path.as_ref();
        let vectorizer_json = read_artifact(vectorizer_path)?;
        let classifier_json = read_artifact(classifier_path)?;
        let classifier = Self::from_json_parts(
            vectorizer_path,
            &vectorizer_json,
            classifier_path,
            &classifier_json,
        )?;
        tracing::info!(
            target: "solace::sentiment",
            vectorizer = %vectorizer_path.display(),
            classifier = %classifier_path.display(),
            features = classifier.vectorizer.n_features(),
            classes = ?classifier.model.classes(),
            probabilities = classifier.model.supports_probabilities(),
            "Sentiment artifacts loaded"
        );
        Ok(classifier)
    }

    /// Builds from in-memory JSON (paths are only used for error messages).
    pub fn from_json(vectorizer_json: &str, classifier_json: &str) -> StartupResult<Self> {
        Self::from_json_parts(
            Path::new("<vectorizer>"),
            vectorizer_json,
            Path::new("<classifier>"),
            classifier_json,
        )
    }

    fn from_json_parts(
        vectorizer_path: &Path,
        vectorizer_json: &str,
        classifier_path: &Path,
        classifier_json: &str,
    ) -> StartupResult<Self> {
        let vspec = serde_json::from_str(vectorizer_json).map_err(|source| StartupError::ArtifactFormat {
            path: vectorizer_path.to_path_buf(),
            source,
        })?;
        let vectorizer = TextVectorizer::from_spec(vspec).map_err(|reason| StartupError::ArtifactInvalid {
            path: vectorizer_path.to_path_buf(),
            reason,
        })?;

        let mspec = serde_json::from_str(classifier_json).map_err(|source| StartupError::ArtifactFormat {
            path: classifier_path.to_path_buf(),
            source,
        })?;
        let model = LinearModel::from_spec(mspec, vectorizer.n_features()).map_err(|reason| {
            StartupError::ArtifactInvalid {
                path: classifier_path.to_path_buf(),
                reason,
            }
        })?;

        Ok(Self { vectorizer, model })
    }

    pub fn vectorizer(&self) -> &TextVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }
}

impl SentimentAnalyzer for SentimentClassifier {
    fn classify(&self, text: &str) -> SentimentResult {
        let features = self.vectorizer.transform(text);
        let prediction = self.model.predict(&features);
        let raw_label = prediction.class.to_lowercase();

        let label = SentimentLabel::parse(&raw_label).unwrap_or_else(|| {
            tracing::warn!(
                target: "solace::sentiment",
                raw_label = %raw_label,
                "Classifier emitted an unknown label; treating as neutral"
            );
            SentimentLabel::Neutral
        });

        let mut result = match prediction.max_probability() {
            Some(p) => SentimentResult::with_probability(label, p),
            None => SentimentResult::saturated(label),
        };
        result.raw_label = raw_label;
        result
    }
}

fn read_artifact(path: &Path) -> StartupResult<String> {
    std::fs::read_to_string(path).map_err(|source| StartupError::ArtifactIo {
        path: path.to_path_buf(),
        source,
    })
}
