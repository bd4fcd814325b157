//! Local scoring with the embedded engine

use anyhow::Result;
use risk_lib::models::PredictionResponse;
use risk_lib::predictor::RulePredictor;
use risk_lib::{EngineConfig, PredictionEngine};
use std::path::Path;

use super::InputArgs;
use crate::output::{print_info, print_prediction, OutputFormat};

/// Score inputs in-process against the artifact at `model_path`
pub fn score(args: &InputArgs, model_path: &Path, verbose: bool, format: OutputFormat) -> Result<()> {
    let engine = PredictionEngine::new(EngineConfig::with_model_path(model_path));
    let response = score_payload(&engine, args);

    if verbose && format == OutputFormat::Table {
        let info = engine.artifact_info(None);
        if info.loaded {
            print_info(&format!(
                "Using {} artifact at {}",
                info.kind.as_deref().unwrap_or("unknown"),
                info.path
            ));
        } else {
            print_info(&format!("No usable artifact at {}", info.path));
        }
    }

    print_prediction(&response, format)
}

pub(crate) fn score_payload(engine: &PredictionEngine, args: &InputArgs) -> PredictionResponse {
    let payload = args.to_payload();
    let result = engine.predict(&payload, None);
    let mut response = PredictionResponse::from(&result);
    if args.explain {
        response.explanation = Some(RulePredictor::explain(&payload));
    }
    response
}
