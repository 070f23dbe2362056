//! Pre-trained linear label classifier (logistic regression, multinomial naive Bayes, linear SVM).

use super::vectorizer::SparseRow;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    /// `coef` holds feature log-probabilities, `intercept` the class log-priors.
    MultinomialNb,
    /// No probability output.
    LinearSvc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    #[default]
    Multinomial,
    Ovr,
}

/// On-disk shape of `sentiment_classifier.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelSpec {
    kind: ModelKind,
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    #[serde(default)]
    multi_class: MultiClass,
}

/// One prediction: the winning class and, when the model supports it, per-class probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class: String,
    pub probabilities: Option<Vec<f64>>,
}

impl Prediction {
    /// Highest class probability, if the model produces probabilities.
    pub fn max_probability(&self) -> Option<f64> {
        self.probabilities
            .as_ref()
            .and_then(|p| p.iter().copied().reduce(f64::max))
    }
}

/// Immutable linear classifier. Decision per row: `coef[k] · x + intercept[k]`.
#[derive(Debug)]
pub struct LinearModel {
    kind: ModelKind,
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    multi_class: MultiClass,
}

impl LinearModel {
    /// Validates the spec against the vectorizer's feature count.
    pub(crate) fn from_spec(spec: ModelSpec, n_features: usize) -> Result<Self, String> {
        let n_classes = spec.classes.len();
        if n_classes < 2 {
            return Err(format!("need at least 2 classes, got {}", n_classes));
        }
        let binary_rows = n_classes == 2 && spec.coef.len() == 1;
        if spec.coef.len() != n_classes && !binary_rows {
            return Err(format!(
                "coef has {} rows for {} classes",
                spec.coef.len(),
                n_classes
            ));
        }
        if let Some((i, row)) = spec.coef.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(format!(
                "coef row {} has {} columns but the vectorizer produces {} features",
                i,
                row.len(),
                n_features
            ));
        }
        if spec.intercept.len() != spec.coef.len() {
            return Err(format!(
                "intercept has {} entries for {} coef rows",
                spec.intercept.len(),
                spec.coef.len()
            ));
        }
        let all_finite = spec
            .coef
            .iter()
            .flatten()
            .chain(spec.intercept.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err("coef/intercept contain a non-finite weight".to_string());
        }
        Ok(Self {
            kind: spec.kind,
            classes: spec.classes,
            coef: spec.coef,
            intercept: spec.intercept,
            multi_class: spec.multi_class,
        })
    }

    #[inline]
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// True when the model family yields class probabilities.
    #[inline]
    pub fn supports_probabilities(&self) -> bool {
        !matches!(self.kind, ModelKind::LinearSvc)
    }

    fn decision(&self, x: &SparseRow) -> Vec<f64> {
        self.coef
            .iter()
            .zip(self.intercept.iter())
            .map(|(row, b)| x.iter().map(|(&col, &v)| row[col] * v).sum::<f64>() + b)
            .collect()
    }

    pub fn predict(&self, x: &SparseRow) -> Prediction {
        let scores = self.decision(x);

        if scores.len() == 1 {
            let d = scores[0];
            let class = if d > 0.0 { &self.classes[1] } else { &self.classes[0] };
            let probabilities = self.supports_probabilities().then(|| {
                let p = sigmoid(d);
                vec![1.0 - p, p]
            });
            return Prediction {
                class: class.clone(),
                probabilities,
            };
        }

        let best = argmax(&scores);
        let probabilities = match (self.kind, self.multi_class) {
            (ModelKind::LinearSvc, _) => None,
            (ModelKind::LogisticRegression, MultiClass::Ovr) => {
                let raw: Vec<f64> = scores.iter().map(|&d| sigmoid(d)).collect();
                let total: f64 = raw.iter().sum();
                Some(if total > 0.0 {
                    raw.iter().map(|p| p / total).collect()
                } else {
                    vec![1.0 / raw.len() as f64; raw.len()]
                })
            }
            _ => Some(softmax(&scores)),
        };
        Prediction {
            class: self.classes[best].clone(),
            probabilities,
        }
    }
}

fn argmax(xs: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in xs.iter().enumerate().skip(1) {
        if v > xs[best] {
            best = i;
        }
    }
    best
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

fn softmax(xs: &[f64]) -> Vec<f64> {
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = xs.iter().map(|&x| (x - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(json: serde_json::Value, n_features: usize) -> Result<LinearModel, String> {
        LinearModel::from_spec(serde_json::from_value(json).unwrap(), n_features)
    }

    fn row(pairs: &[(usize, f64)]) -> SparseRow {
        pairs.iter().copied().collect()
    }

    #[test]
    fn multinomial_logistic_uses_softmax() {
        let m = model(
            serde_json::json!({
                "kind": "logistic_regression",
                "classes": ["Negative", "Neutral", "Positive"],
                "coef": [[2.0, 0.0], [0.0, 0.0], [0.0, 2.0]],
                "intercept": [0.0, 0.5, 0.0]
            }),
            2,
        )
        .unwrap();
        let p = m.predict(&row(&[(0, 1.0)]));
        assert_eq!(p.class, "Negative");
        let probs = p.probabilities.clone().unwrap();
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        let e2 = 2f64.exp();
        let e05 = 0.5f64.exp();
        assert!((p.max_probability().unwrap() - e2 / (e2 + e05 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn empty_row_falls_back_to_intercepts() {
        let m = model(
            serde_json::json!({
                "kind": "logistic_regression",
                "classes": ["negative", "neutral", "positive"],
                "coef": [[1.0], [0.0], [1.0]],
                "intercept": [-0.2, 0.3, 0.1]
            }),
            1,
        )
        .unwrap();
        assert_eq!(m.predict(&SparseRow::new()).class, "neutral");
    }

    #[test]
    fn binary_single_row_uses_sigmoid() {
        let m = model(
            serde_json::json!({
                "kind": "logistic_regression",
                "classes": ["negative", "positive"],
                "coef": [[3.0]],
                "intercept": [0.0]
            }),
            1,
        )
        .unwrap();
        let pos = m.predict(&row(&[(0, 1.0)]));
        assert_eq!(pos.class, "positive");
        assert!((pos.max_probability().unwrap() - sigmoid(3.0)).abs() < 1e-12);
        let neg = m.predict(&SparseRow::new());
        assert_eq!(neg.class, "negative");
        assert!((neg.max_probability().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ovr_probabilities_are_normalized() {
        let m = model(
            serde_json::json!({
                "kind": "logistic_regression",
                "multi_class": "ovr",
                "classes": ["a", "b", "c"],
                "coef": [[1.0], [0.0], [-1.0]],
                "intercept": [0.0, 0.0, 0.0]
            }),
            1,
        )
        .unwrap();
        let p = m.predict(&row(&[(0, 1.0)])).probabilities.unwrap();
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p[0] > p[1] && p[1] > p[2]);
    }

    #[test]
    fn naive_bayes_softmaxes_joint_log_likelihood() {
        let m = model(
            serde_json::json!({
                "kind": "multinomial_nb",
                "classes": ["negative", "positive"],
                "coef": [[(0.8f64).ln(), (0.2f64).ln()], [(0.2f64).ln(), (0.8f64).ln()]],
                "intercept": [(0.5f64).ln(), (0.5f64).ln()]
            }),
            2,
        )
        .unwrap();
        let p = m.predict(&row(&[(1, 1.0)]));
        assert_eq!(p.class, "positive");
        assert!((p.max_probability().unwrap() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn linear_svc_has_no_probabilities() {
        let m = model(
            serde_json::json!({
                "kind": "linear_svc",
                "classes": ["negative", "neutral", "positive"],
                "coef": [[1.0], [0.0], [-1.0]],
                "intercept": [0.0, 0.0, 0.0]
            }),
            1,
        )
        .unwrap();
        assert!(!m.supports_probabilities());
        let p = m.predict(&row(&[(0, 1.0)]));
        assert_eq!(p.class, "negative");
        assert!(p.probabilities.is_none());
        assert!(p.max_probability().is_none());
    }

    #[test]
    fn rejects_shape_mismatches() {
        let width = model(
            serde_json::json!({
                "kind": "logistic_regression",
                "classes": ["a", "b", "c"],
                "coef": [[1.0, 2.0], [0.0], [1.0]],
                "intercept": [0.0, 0.0, 0.0]
            }),
            1,
        );
        assert!(width.unwrap_err().contains("columns"));

        let rows = model(
            serde_json::json!({
                "kind": "logistic_regression",
                "classes": ["a", "b", "c"],
                "coef": [[1.0]],
                "intercept": [0.0]
            }),
            1,
        );
        assert!(rows.unwrap_err().contains("rows"));

        let intercept = model(
            serde_json::json!({
                "kind": "linear_svc",
                "classes": ["a", "b"],
                "coef": [[1.0]],
                "intercept": [0.0, 1.0]
            }),
            1,
        );
        assert!(intercept.unwrap_err().contains("intercept"));

        let single = model(
            serde_json::json!({
                "kind": "linear_svc",
                "classes": ["a"],
                "coef": [[1.0]],
                "intercept": [0.0]
            }),
            1,
        );
        assert!(single.unwrap_err().contains("at least 2"));
    }
}
