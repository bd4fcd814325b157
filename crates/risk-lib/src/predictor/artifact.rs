//! Classifier capability interface
//!
//! A loaded artifact either exposes class probabilities or only a predicted
//! label. The two shapes are separate traits so the engine never has to
//! probe an artifact at runtime to find out what it can do.

use super::features::FeatureInput;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading an artifact or running one of its pathways
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode artifact: {0}")]
    Decode(String),

    #[error("unsupported artifact format: {0}")]
    UnsupportedFormat(String),

    #[error("artifact does not accept {0} input")]
    IncompatibleInput(&'static str),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("predicted label {0} cannot be read as a class index")]
    UnexpectedLabel(ClassLabel),

    #[error("probability {0} is not a finite number")]
    InvalidProbability(f64),
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Decode(err.to_string())
    }
}

/// A class value as enumerated by an artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ClassLabel {
    /// Integer reading of the label, if it has one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ClassLabel::Int(v) => Some(*v),
            ClassLabel::Bool(b) => Some(i64::from(*b)),
            ClassLabel::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            ClassLabel::Float(_) => None,
            ClassLabel::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Numeric class value 1, whether stored as an integer or a float
    fn is_numeric_one(&self) -> bool {
        match self {
            ClassLabel::Int(v) => *v == 1,
            ClassLabel::Float(v) => *v == 1.0,
            _ => false,
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Bool(b) => write!(f, "{}", b),
            ClassLabel::Int(v) => write!(f, "{}", v),
            ClassLabel::Float(v) => write!(f, "{:?}", v),
            ClassLabel::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Index of the positive ("burnout") class: numeric 1 (`1` or `1.0`), then
/// boolean true, otherwise the last position.
pub fn positive_class_index(classes: &[ClassLabel]) -> usize {
    classes
        .iter()
        .position(ClassLabel::is_numeric_one)
        .or_else(|| classes.iter().position(|c| matches!(c, ClassLabel::Bool(true))))
        .unwrap_or_else(|| classes.len().saturating_sub(1))
}

/// Probability mass of the positive class. Not clamped.
pub fn positive_probability(classes: &[ClassLabel], probabilities: &[f64]) -> Result<f64, ModelError> {
    let idx = positive_class_index(classes);
    let p = *probabilities.get(idx).ok_or(ModelError::ShapeMismatch {
        expected: idx + 1,
        actual: probabilities.len(),
    })?;
    if !p.is_finite() {
        return Err(ModelError::InvalidProbability(p));
    }
    Ok(p)
}

/// Classifier that can only return a predicted label
pub trait Classifier: Send + Sync {
    /// Class enumeration, in the order used by probability vectors
    fn classes(&self) -> &[ClassLabel];

    /// Predict the class of a single sample
    fn predict(&self, input: &FeatureInput<'_>) -> Result<ClassLabel, ModelError>;

    /// Short description of the artifact kind
    fn kind(&self) -> &'static str;
}

/// Classifier that also reports per-class probabilities
pub trait ProbabilisticClassifier: Classifier {
    /// Per-class probabilities for a single sample, ordered as `classes()`
    fn predict_proba(&self, input: &FeatureInput<'_>) -> Result<Vec<f64>, ModelError>;
}

/// A loaded artifact, tagged with the capability it offers
#[derive(Clone)]
pub enum ModelArtifact {
    WithProbability(Arc<dyn ProbabilisticClassifier>),
    LabelOnly(Arc<dyn Classifier>),
}

impl ModelArtifact {
    /// Predicted class for a single sample
    pub fn predict(&self, input: &FeatureInput<'_>) -> Result<ClassLabel, ModelError> {
        match self {
            ModelArtifact::WithProbability(m) => m.predict(input),
            ModelArtifact::LabelOnly(m) => m.predict(input),
        }
    }

    pub fn has_probability(&self) -> bool {
        matches!(self, ModelArtifact::WithProbability(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::WithProbability(m) => m.kind(),
            ModelArtifact::LabelOnly(m) => m.kind(),
        }
    }

    pub fn classes(&self) -> &[ClassLabel] {
        match self {
            ModelArtifact::WithProbability(m) => m.classes(),
            ModelArtifact::LabelOnly(m) => m.classes(),
        }
    }
}

impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("kind", &self.kind())
            .field("has_probability", &self.has_probability())
            .field("classes", &self.classes())
            .finish()
    }
}
