//! JSON-encoded linear classifiers
//!
//! Two artifact kinds are supported, distinguished by the `kind` tag:
//!
//! ```json
//! {"kind": "numeric_logistic", "classes": [0, 1],
//!  "scaler": {"mean": [45, 6, 6, 5], "scale": [8, 2, 2, 2]},
//!  "coefficients": [0.6, 0.5, -0.7, 0.9], "intercept": -0.4}
//!
//! {"kind": "text_linear", "classes": [0, 1],
//!  "weights": {"exhausted": 1.2, "rested": -0.9}, "intercept": -0.5,
//!  "probability": false}
//! ```
//!
//! Both are binary logistic models: `p = sigmoid(intercept + w . x)` is the
//! probability of `classes[1]`.

use super::artifact::{ClassLabel, Classifier, ModelArtifact, ModelError, ProbabilisticClassifier};
use super::features::{FeatureInput, NUM_FEATURES};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Decision threshold on the probability of `classes[1]`
const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum LinearArtifact {
    NumericLogistic(NumericLogistic),
    TextLinear(TextLinear),
}

/// Standardization applied before the linear model
#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Logistic regression over the numeric feature row
#[derive(Debug, Clone, Deserialize)]
pub struct NumericLogistic {
    classes: Vec<ClassLabel>,
    #[serde(default)]
    scaler: Option<Scaler>,
    coefficients: Vec<f64>,
    #[serde(default)]
    intercept: f64,
    #[serde(default = "default_probability")]
    probability: bool,
}

/// Bag-of-words logistic model over the combined text sample
#[derive(Debug, Clone, Deserialize)]
pub struct TextLinear {
    classes: Vec<ClassLabel>,
    weights: HashMap<String, f64>,
    #[serde(default)]
    intercept: f64,
    #[serde(default = "default_probability")]
    probability: bool,
}

fn default_probability() -> bool {
    true
}

/// Decode a JSON artifact
pub fn load_json_artifact(bytes: &[u8]) -> Result<ModelArtifact, ModelError> {
    let artifact: LinearArtifact = serde_json::from_slice(bytes)?;
    match artifact {
        LinearArtifact::NumericLogistic(model) => {
            check_binary(&model.classes)?;
            Ok(wrap(model.probability, Arc::new(model)))
        }
        LinearArtifact::TextLinear(model) => {
            check_binary(&model.classes)?;
            Ok(wrap(model.probability, Arc::new(model)))
        }
    }
}

fn wrap<M: ProbabilisticClassifier + 'static>(probability: bool, model: Arc<M>) -> ModelArtifact {
    if probability {
        ModelArtifact::WithProbability(model)
    } else {
        ModelArtifact::LabelOnly(model)
    }
}

fn check_binary(classes: &[ClassLabel]) -> Result<(), ModelError> {
    if classes.len() != 2 {
        return Err(ModelError::Decode(format!(
            "linear artifacts are binary, found {} classes",
            classes.len()
        )));
    }
    Ok(())
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn binary_proba(p: f64) -> Vec<f64> {
    vec![1.0 - p, p]
}

fn binary_label(classes: &[ClassLabel], p: f64) -> ClassLabel {
    let idx = usize::from(p >= DECISION_THRESHOLD);
    classes[idx].clone()
}

impl NumericLogistic {
    fn positive_probability(&self, input: &FeatureInput<'_>) -> Result<f64, ModelError> {
        let row = match input {
            FeatureInput::Numeric(row) => row,
            FeatureInput::Text(_) => return Err(ModelError::IncompatibleInput("text")),
        };
        if self.coefficients.len() != NUM_FEATURES {
            return Err(ModelError::ShapeMismatch {
                expected: NUM_FEATURES,
                actual: self.coefficients.len(),
            });
        }

        let mut z = self.intercept;
        for (i, (x, w)) in row.iter().zip(&self.coefficients).enumerate() {
            z += self.standardize(i, *x)? * w;
        }
        Ok(sigmoid(z))
    }

    fn standardize(&self, i: usize, x: f64) -> Result<f64, ModelError> {
        let Some(scaler) = &self.scaler else {
            return Ok(x);
        };
        let (mean, scale) = match (scaler.mean.get(i), scaler.scale.get(i)) {
            (Some(m), Some(s)) => (*m, *s),
            _ => {
                return Err(ModelError::ShapeMismatch {
                    expected: NUM_FEATURES,
                    actual: scaler.mean.len().min(scaler.scale.len()),
                })
            }
        };
        // Constant features carry a zero scale
        let scale = if scale == 0.0 { 1.0 } else { scale };
        Ok((x - mean) / scale)
    }
}

impl Classifier for NumericLogistic {
    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    fn predict(&self, input: &FeatureInput<'_>) -> Result<ClassLabel, ModelError> {
        let p = self.positive_probability(input)?;
        Ok(binary_label(&self.classes, p))
    }

    fn kind(&self) -> &'static str {
        "numeric_logistic"
    }
}

impl ProbabilisticClassifier for NumericLogistic {
    fn predict_proba(&self, input: &FeatureInput<'_>) -> Result<Vec<f64>, ModelError> {
        Ok(binary_proba(self.positive_probability(input)?))
    }
}

/// Lower-cased tokens of a text sample. `=` and `.` stay inside tokens so
/// `hours=52.5` survives as one token; trailing dots are dropped.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || (c.is_ascii_punctuation() && c != '=' && c != '.'))
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl TextLinear {
    fn positive_probability(&self, input: &FeatureInput<'_>) -> Result<f64, ModelError> {
        let text = match input {
            FeatureInput::Text(text) => text,
            FeatureInput::Numeric(_) => return Err(ModelError::IncompatibleInput("numeric")),
        };
        let z = tokenize(text)
            .iter()
            .filter_map(|t| self.weights.get(t))
            .fold(self.intercept, |acc, w| acc + w);
        Ok(sigmoid(z))
    }
}

impl Classifier for TextLinear {
    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    fn predict(&self, input: &FeatureInput<'_>) -> Result<ClassLabel, ModelError> {
        let p = self.positive_probability(input)?;
        Ok(binary_label(&self.classes, p))
    }

    fn kind(&self) -> &'static str {
        "text_linear"
    }
}

impl ProbabilisticClassifier for TextLinear {
    fn predict_proba(&self, input: &FeatureInput<'_>) -> Result<Vec<f64>, ModelError> {
        Ok(binary_proba(self.positive_probability(input)?))
    }
}
