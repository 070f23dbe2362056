//! Pre-trained text vectorizer (bag-of-words counts or TF-IDF over word n-grams).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Default token pattern: runs of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

static DEFAULT_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_TOKEN_PATTERN).expect("default token pattern compiles"));

/// Sparse feature row: column -> weight. Ordered so that dot products sum in a fixed order.
pub type SparseRow = BTreeMap<usize, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorizerKind {
    Tfidf,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk shape of `sentiment_vectorizer.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct VectorizerSpec {
    kind: VectorizerKind,
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    idf: Option<Vec<f64>>,
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default)]
    token_pattern: Option<String>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    stop_words: Vec<String>,
    #[serde(default)]
    binary: bool,
    #[serde(default)]
    sublinear_tf: bool,
    /// `None` when the key is absent (kind decides), `Some(None)` for an explicit `null`.
    #[serde(default, deserialize_with = "deserialize_explicit_norm")]
    norm: Option<Option<Norm>>,
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn deserialize_explicit_norm<'de, D>(d: D) -> Result<Option<Option<Norm>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Norm>::deserialize(d).map(Some)
}

/// Immutable vectorizer. Safe to share across threads.
#[derive(Debug)]
pub struct TextVectorizer {
    kind: VectorizerKind,
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    lowercase: bool,
    token_re: Option<Regex>,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    binary: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
    n_features: usize,
}

impl TextVectorizer {
    /// Validates the spec and builds the vectorizer. Errors are human-readable reasons.
    pub(crate) fn from_spec(spec: VectorizerSpec) -> Result<Self, String> {
        if spec.vocabulary.is_empty() {
            return Err("vocabulary is empty".to_string());
        }
        let n_features = spec.vocabulary.len();
        if let Some((term, &idx)) = spec.vocabulary.iter().find(|&(_, &i)| i >= n_features) {
            return Err(format!(
                "vocabulary index {} for term '{}' is out of range (size {})",
                idx, term, n_features
            ));
        }
        let mut seen = vec![false; n_features];
        for &idx in spec.vocabulary.values() {
            if seen[idx] {
                return Err(format!("vocabulary index {} is used more than once", idx));
            }
            seen[idx] = true;
        }

        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({}, {})", min_n, max_n));
        }

        let idf = match (spec.kind, spec.idf) {
            (VectorizerKind::Tfidf, None) => return Err("tfidf vectorizer requires idf weights".to_string()),
            (VectorizerKind::Tfidf, Some(idf)) => {
                if idf.len() != n_features {
                    return Err(format!(
                        "idf has {} entries but vocabulary has {}",
                        idf.len(),
                        n_features
                    ));
                }
                if idf.iter().any(|v| !v.is_finite()) {
                    return Err("idf contains a non-finite weight".to_string());
                }
                Some(idf)
            }
            (VectorizerKind::Count, _) => None,
        };

        let token_re = match spec.token_pattern {
            Some(p) if p != DEFAULT_TOKEN_PATTERN => {
                Some(Regex::new(&p).map_err(|e| format!("token_pattern does not compile: {}", e))?)
            }
            _ => None,
        };

        let norm = match spec.norm {
            Some(explicit) => explicit,
            None if spec.kind == VectorizerKind::Tfidf => Some(Norm::L2),
            None => None,
        };

        let stop_words = spec
            .stop_words
            .into_iter()
            .map(|w| if spec.lowercase { w.to_lowercase() } else { w })
            .collect();

        Ok(Self {
            kind: spec.kind,
            vocabulary: spec.vocabulary,
            idf,
            lowercase: spec.lowercase,
            token_re,
            ngram_range: spec.ngram_range,
            stop_words,
            binary: spec.binary,
            sublinear_tf: spec.sublinear_tf,
            norm,
            n_features,
        })
    }

    /// Number of feature columns (vocabulary size).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn kind(&self) -> VectorizerKind {
        self.kind
    }

    /// Tokens after lower-casing and stop-word removal.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let prepared = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let re = self.token_re.as_ref().unwrap_or(&DEFAULT_TOKEN_RE);
        re.find_iter(&prepared)
            .map(|m| m.as_str().to_string())
            .filter(|t| !self.stop_words.contains(t))
            .collect()
    }

    /// Word n-grams in `ngram_range`, joined by a single space.
    fn ngrams(&self, tokens: &[String]) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        let mut out = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                out.push(window.join(" "));
            }
        }
        out
    }

    /// Feature row for one document. Unknown terms are ignored; empty text gives an empty row.
    pub fn transform(&self, text: &str) -> SparseRow {
        let tokens = self.tokenize(text);
        let mut row = SparseRow::new();
        for term in self.ngrams(&tokens) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *row.entry(col).or_insert(0.0) += 1.0;
            }
        }

        for tf in row.values_mut() {
            if self.binary {
                *tf = 1.0;
            } else if self.sublinear_tf {
                *tf = 1.0 + tf.ln();
            }
        }

        if let Some(idf) = &self.idf {
            for (col, v) in row.iter_mut() {
                *v *= idf[*col];
            }
        }

        if let Some(norm) = self.norm {
            let total = match norm {
                Norm::L1 => row.values().map(|v| v.abs()).sum::<f64>(),
                Norm::L2 => row.values().map(|v| v * v).sum::<f64>().sqrt(),
            };
            if total > 0.0 {
                for v in row.values_mut() {
                    *v /= total;
                }
            }
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(json: serde_json::Value) -> VectorizerSpec {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn default_tokenizer_drops_single_chars_and_lowercases() {
        let v = TextVectorizer::from_spec(spec(serde_json::json!({
            "kind": "count",
            "vocabulary": { "feel": 0 }
        })))
        .unwrap();
        assert_eq!(v.tokenize("I FEEL a Bit lost!"), vec!["feel", "bit", "lost"]);
    }

    #[test]
    fn count_vectorizer_counts_known_terms_only() {
        let v = TextVectorizer::from_spec(spec(serde_json::json!({
            "kind": "count",
            "vocabulary": { "sad": 0, "happy": 1 }
        })))
        .unwrap();
        let row = v.transform("sad sad happy unknown");
        assert_eq!(row.get(&0), Some(&2.0));
        assert_eq!(row.get(&1), Some(&1.0));
        assert_eq!(row.len(), 2);
        assert!(v.transform("").is_empty());
    }

    #[test]
    fn tfidf_is_l2_normalized_by_default() {
        let v = TextVectorizer::from_spec(spec(serde_json::json!({
            "kind": "tfidf",
            "vocabulary": { "sad": 0, "happy": 1 },
            "idf": [2.0, 1.0]
        })))
        .unwrap();
        let row = v.transform("sad happy");
        let norm: f64 = row.values().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(row[&0] > row[&1]);
    }

    #[test]
    fn explicit_null_norm_disables_normalization() {
        let v = TextVectorizer::from_spec(spec(serde_json::json!({
            "kind": "tfidf",
            "vocabulary": { "sad": 0 },
            "idf": [3.0],
            "norm": null
        })))
        .unwrap();
        assert_eq!(v.transform("sad sad")[&0], 6.0);
    }

    #[test]
    fn bigrams_and_stop_words() {
        let v = TextVectorizer::from_spec(spec(serde_json::json!({
            "kind": "count",
            "vocabulary": { "not good": 0, "good": 1, "not": 2 },
            "ngram_range": [1, 2],
            "stop_words": ["very"]
        })))
        .unwrap();
        let row = v.transform("not very good");
        assert_eq!(row.get(&0), Some(&1.0));
        assert_eq!(row.get(&1), Some(&1.0));
        assert_eq!(row.get(&2), Some(&1.0));
    }

    #[test]
    fn sublinear_and_binary_tf() {
        let sub = TextVectorizer::from_spec(spec(serde_json::json!({
            "kind": "count",
            "vocabulary": { "sad": 0 },
            "sublinear_tf": true
        })))
        .unwrap();
        assert!((sub.transform("sad sad sad")[&0] - (1.0 + 3f64.ln())).abs() < 1e-12);

        let bin = TextVectorizer::from_spec(spec(serde_json::json!({
            "kind": "count",
            "vocabulary": { "sad": 0 },
            "binary": true
        })))
        .unwrap();
        assert_eq!(bin.transform("sad sad sad")[&0], 1.0);
    }

    #[test]
    fn rejects_inconsistent_specs() {
        let missing_idf = TextVectorizer::from_spec(spec(serde_json::json!({
            "kind": "tfidf",
            "vocabulary": { "a": 0 }
        })));
        assert!(missing_idf.unwrap_err().contains("idf"));

        let bad_index = TextVectorizer::from_spec(spec(serde_json::json!({
            "kind": "count",
            "vocabulary": { "a": 0, "b": 5 }
        })));
        assert!(bad_index.unwrap_err().contains("out of range"));

        let bad_range = TextVectorizer::from_spec(spec(serde_json::json!({
            "kind": "count",
            "vocabulary": { "a": 0 },
            "ngram_range": [2, 1]
        })));
        assert!(bad_range.unwrap_err().contains("ngram_range"));

        let bad_pattern = TextVectorizer::from_spec(spec(serde_json::json!({
            "kind": "count",
            "vocabulary": { "a": 0 },
            "token_pattern": "(unclosed"
        })));
        assert!(bad_pattern.unwrap_err().contains("token_pattern"));
    }
}
