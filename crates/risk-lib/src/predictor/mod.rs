//! Burnout risk prediction engine

mod artifact;
mod engine;
mod features;
mod inference;
mod linear;
mod loader;
mod output;
mod rules;

pub use artifact::{
    positive_class_index, positive_probability, ClassLabel, Classifier, ModelArtifact, ModelError,
    ProbabilisticClassifier,
};
pub use engine::{predict, score_with_model, PredictionEngine, MODEL_CASCADE};
pub use features::{numeric_features, text_features, FeatureInput, FEATURE_NAMES, NUM_FEATURES};
pub use inference::{load_onnx_artifact, OnnxClassifier};
pub use linear::{load_json_artifact, tokenize};
pub use loader::{read_artifact, ArtifactInfo, ArtifactLoader, LoadedArtifact};
pub use output::{class_to_score, clamp_score, probability_to_score, MAX_SCORE};
pub use rules::{RulePredictor, NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS, TYPICAL_RANGES};
