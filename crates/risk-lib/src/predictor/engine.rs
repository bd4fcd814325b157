//! Prediction cascade
//!
//! The engine walks a fixed sequence of steps: numeric model, text model,
//! rules. Model steps return a `Result` and the first success wins; the
//! rule step cannot fail, so every call produces a complete result.

use super::artifact::{positive_probability, ModelArtifact, ModelError};
use super::features::{numeric_features, text_features, FeatureInput};
use super::loader::{ArtifactInfo, ArtifactLoader};
use super::output::{class_to_score, probability_to_score, report_probability};
use super::rules::RulePredictor;
use crate::config::EngineConfig;
use crate::models::{InputPayload, Pathway, PredictionResult};
use crate::observability::EngineMetrics;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::debug;

/// Model steps tried in order before falling back to rules
pub const MODEL_CASCADE: [Pathway; 2] = [Pathway::NumericModel, Pathway::TextModel];

static GLOBAL_ENGINE: OnceLock<PredictionEngine> = OnceLock::new();

/// Burnout risk prediction engine
pub struct PredictionEngine {
    config: EngineConfig,
    loader: ArtifactLoader,
    metrics: EngineMetrics,
}

impl PredictionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            loader: ArtifactLoader::new(),
            metrics: EngineMetrics::new(),
        }
    }

    /// Process-wide engine configured from the environment
    pub fn global() -> &'static PredictionEngine {
        GLOBAL_ENGINE.get_or_init(|| PredictionEngine::new(EngineConfig::from_env()))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score a payload. `model_path` overrides the configured artifact path.
    pub fn predict(&self, payload: &InputPayload, model_path: Option<&Path>) -> PredictionResult {
        let start = Instant::now();
        let result = self.run_cascade(payload, model_path);
        self.metrics
            .observe_prediction(result.pathway(), start.elapsed().as_secs_f64());
        result
    }

    fn run_cascade(&self, payload: &InputPayload, model_path: Option<&Path>) -> PredictionResult {
        let path = model_path.unwrap_or(&self.config.model_path);
        let Some(loaded) = self.loader.get(path) else {
            return RulePredictor::predict(payload);
        };

        for pathway in MODEL_CASCADE {
            match score_with_model(&loaded.artifact, payload, pathway) {
                Ok(result) => return result,
                Err(e) => {
                    self.metrics.inc_pathway_failures(pathway);
                    debug!(
                        pathway = %pathway,
                        kind = loaded.artifact.kind(),
                        error = %e,
                        "Model pathway failed, trying next step"
                    );
                }
            }
        }

        RulePredictor::predict(payload)
    }

    /// Status of the artifact at `model_path` (or the configured path),
    /// loading it if this is the first use
    pub fn artifact_info(&self, model_path: Option<&Path>) -> ArtifactInfo {
        let path = model_path.unwrap_or(&self.config.model_path);
        match self.loader.get(path) {
            Some(loaded) => loaded.info(),
            None => ArtifactInfo::missing(path),
        }
    }

    /// Number of artifact files read from disk by this engine
    pub fn disk_reads(&self) -> u64 {
        self.loader.disk_reads()
    }
}

/// Predict with the process-wide engine and the configured artifact path
pub fn predict(payload: &InputPayload) -> PredictionResult {
    PredictionEngine::global().predict(payload, None)
}

/// Run one model step against an artifact
pub fn score_with_model(
    artifact: &ModelArtifact,
    payload: &InputPayload,
    pathway: Pathway,
) -> Result<PredictionResult, ModelError> {
    let text;
    let input = match pathway {
        Pathway::NumericModel => FeatureInput::Numeric(numeric_features(&payload.signals())),
        Pathway::TextModel => {
            text = text_features(payload);
            FeatureInput::Text(&text)
        }
        Pathway::Rules => return Ok(RulePredictor::predict(payload)),
    };

    let label = artifact.predict(&input)?;
    let result = match artifact {
        ModelArtifact::WithProbability(model) => {
            let probabilities = model.predict_proba(&input)?;
            let p = positive_probability(model.classes(), &probabilities)?;
            PredictionResult::from_model(probability_to_score(p), Some(report_probability(p)), pathway)
        }
        ModelArtifact::LabelOnly(_) => PredictionResult::from_model(class_to_score(&label)?, None, pathway),
    };
    Ok(result)
}
