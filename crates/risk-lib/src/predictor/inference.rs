//! ONNX inference using tract
//!
//! Runs numeric classifiers exported to ONNX (for example with skl2onnx and
//! `zipmap` disabled). The graph takes a `float32[1, 4]` row; output 0 is
//! the predicted label as int64 and the optional output 1 is the
//! `float32[1, n_classes]` probability matrix.

use super::artifact::{ClassLabel, Classifier, ModelArtifact, ModelError, ProbabilisticClassifier};
use super::features::{FeatureInput, NUM_FEATURES};
use std::sync::Arc;
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Maximum inference latency before warning (5ms target)
const MAX_INFERENCE_MS: u128 = 5;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX-based classifier using tract for lightweight inference
pub struct OnnxClassifier {
    model: TractModel,
    classes: Vec<ClassLabel>,
}

/// Decode an ONNX artifact. Graphs with a second output are treated as
/// exposing class probabilities.
pub fn load_onnx_artifact(bytes: &[u8]) -> Result<ModelArtifact, ModelError> {
    let (model, num_outputs) = OnnxClassifier::load_model(bytes)?;
    let classifier = Arc::new(OnnxClassifier {
        model,
        // sklearn sorts binary labels, so column 1 is the positive class
        classes: vec![ClassLabel::Int(0), ClassLabel::Int(1)],
    });

    if num_outputs >= 2 {
        Ok(ModelArtifact::WithProbability(classifier))
    } else {
        Ok(ModelArtifact::LabelOnly(classifier))
    }
}

impl OnnxClassifier {
    /// Load and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8]) -> Result<(TractModel, usize), ModelError> {
        let decode = |e: anyhow::Error| ModelError::Decode(format!("{:#}", e));

        let optimized = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .map_err(decode)?
            .with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
            .map_err(decode)?
            .into_optimized()
            .map_err(decode)?;
        let num_outputs = optimized.outputs.len();
        let runnable = optimized.into_runnable().map_err(decode)?;
        Ok((runnable, num_outputs))
    }

    /// Convert a numeric feature row to the input tensor
    fn features_to_tensor(&self, input: &FeatureInput<'_>) -> Result<Tensor, ModelError> {
        let row = match input {
            FeatureInput::Numeric(row) => row,
            FeatureInput::Text(_) => return Err(ModelError::IncompatibleInput("text")),
        };
        let data: Vec<f32> = row.iter().map(|v| *v as f32).collect();
        let array = tract_ndarray::Array2::from_shape_vec((1, NUM_FEATURES), data)
            .map_err(|e| ModelError::Inference(e.to_string()))?;
        Ok(array.into())
    }

    fn run(&self, input: &FeatureInput<'_>) -> Result<TVec<TValue>, ModelError> {
        let start = Instant::now();
        let tensor = self.features_to_tensor(input)?;
        let outputs = self
            .model
            .run(tvec!(tensor.into()))
            .map_err(|e| ModelError::Inference(format!("{:#}", e)))?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        Ok(outputs)
    }
}

impl Classifier for OnnxClassifier {
    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    fn predict(&self, input: &FeatureInput<'_>) -> Result<ClassLabel, ModelError> {
        let outputs = self.run(input)?;
        let labels = outputs
            .first()
            .ok_or(ModelError::ShapeMismatch { expected: 1, actual: 0 })?;
        let view = labels
            .to_array_view::<i64>()
            .map_err(|e| ModelError::Inference(format!("{:#}", e)))?;
        let label = view
            .iter()
            .next()
            .copied()
            .ok_or(ModelError::ShapeMismatch { expected: 1, actual: 0 })?;
        Ok(ClassLabel::Int(label))
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}

impl ProbabilisticClassifier for OnnxClassifier {
    fn predict_proba(&self, input: &FeatureInput<'_>) -> Result<Vec<f64>, ModelError> {
        let outputs = self.run(input)?;
        let probabilities = outputs.get(1).ok_or(ModelError::ShapeMismatch {
            expected: 2,
            actual: outputs.len(),
        })?;
        let view = probabilities
            .to_array_view::<f32>()
            .map_err(|e| ModelError::Inference(format!("{:#}", e)))?;
        let values: Vec<f64> = view.iter().map(|v| *v as f64).collect();

        if values.len() < self.classes.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.classes.len(),
                actual: values.len(),
            });
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // p = sigmoid(x . [0.1, 0.2, -0.3, 0.4] - 5.5), see tests/fixtures
    const PROBA_GRAPH: &[u8] = include_bytes!("../../tests/fixtures/logistic_proba.onnx");
    const LABEL_GRAPH: &[u8] = include_bytes!("../../tests/fixtures/logistic_label.onnx");

    const DEFAULT_ROW: FeatureInput<'static> = FeatureInput::Numeric([45.0, 6.0, 6.0, 5.0]);
    const LOW_ROW: FeatureInput<'static> = FeatureInput::Numeric([30.0, 1.0, 10.0, 1.0]);

    #[test]
    fn test_invalid_onnx_bytes_rejected() {
        let err = load_onnx_artifact(b"definitely not a protobuf graph").unwrap_err();
        assert!(matches!(err, ModelError::Decode(_)));
    }

    #[test]
    fn test_two_output_graph_exposes_probabilities() {
        let artifact = load_onnx_artifact(PROBA_GRAPH).unwrap();
        assert!(artifact.has_probability());
        assert_eq!(artifact.kind(), "onnx");
        assert_eq!(artifact.classes(), &[ClassLabel::Int(0), ClassLabel::Int(1)]);

        let ModelArtifact::WithProbability(model) = artifact else {
            panic!("expected probabilistic artifact");
        };

        // logit 0.4
        let proba = model.predict_proba(&DEFAULT_ROW).unwrap();
        assert_eq!(proba.len(), 2);
        assert!((proba[1] - 0.598_688).abs() < 1e-4);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-5);
        assert_eq!(model.predict(&DEFAULT_ROW).unwrap(), ClassLabel::Int(1));

        // logit -4.9
        let proba = model.predict_proba(&LOW_ROW).unwrap();
        assert!(proba[1] < 0.01);
        assert_eq!(model.predict(&LOW_ROW).unwrap(), ClassLabel::Int(0));
    }

    #[test]
    fn test_single_output_graph_is_label_only() {
        let artifact = load_onnx_artifact(LABEL_GRAPH).unwrap();
        assert!(!artifact.has_probability());
        assert!(matches!(artifact, ModelArtifact::LabelOnly(_)));
        assert_eq!(artifact.predict(&DEFAULT_ROW).unwrap(), ClassLabel::Int(1));
        assert_eq!(artifact.predict(&LOW_ROW).unwrap(), ClassLabel::Int(0));
    }

    #[test]
    fn test_text_input_rejected() {
        for bytes in [PROBA_GRAPH, LABEL_GRAPH] {
            let artifact = load_onnx_artifact(bytes).unwrap();
            let err = artifact.predict(&FeatureInput::Text("exhausted")).unwrap_err();
            assert!(matches!(err, ModelError::IncompatibleInput("text")));
        }
    }
}
