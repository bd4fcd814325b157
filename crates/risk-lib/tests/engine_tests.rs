//! End-to-end tests through the public engine API

use risk_lib::health::{components, HealthRegistry};
use risk_lib::predictor::{read_artifact, score_with_model, ModelError};
use risk_lib::{
    ComponentStatus, EngineConfig, InputPayload, Pathway, PredictionEngine, RiskLabel,
};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const TEXT_MODEL: &str = r#"{
    "kind": "text_linear",
    "classes": [0, 1],
    "weights": {"exhausted": 2.0, "deadline": 1.0, "rested": -3.0},
    "intercept": -1.0
}"#;

const SCALED_MODEL: &str = r#"{
    "kind": "numeric_logistic",
    "classes": [1, 0],
    "scaler": {"mean": [45, 6, 6, 5], "scale": [10, 2, 2, 2]},
    "coefficients": [0, 0, 0, 0],
    "intercept": 1.0
}"#;

fn payload(text: &str, hours: f64, workload: f64, sleep: f64, stress: f64) -> InputPayload {
    InputPayload {
        free_text: text.to_string(),
        hours: Some(hours),
        workload: Some(workload),
        sleep: Some(sleep),
        stress: Some(stress),
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn engine_with(dir: &TempDir, name: &str, contents: &str) -> PredictionEngine {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    PredictionEngine::new(EngineConfig::with_model_path(path))
}

#[test]
fn test_global_predict_without_artifact() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("MODEL_PATH", dir.path().join("absent.json"));

    let result = risk_lib::predict(&payload("", 45.0, 6.0, 6.0, 5.0));
    assert_eq!(result.score(), 3);
    assert_eq!(result.label(), RiskLabel::Low);
    assert_eq!(result.probability(), None);
    assert!(result.used_fallback());
    assert_eq!(result.pathway(), Pathway::Rules);

    let again = risk_lib::predict(&payload("", 45.0, 6.0, 6.0, 5.0));
    assert_eq!(again, result);
}

#[test]
fn test_text_model_answers_when_numeric_fails() {
    let dir = TempDir::new().unwrap();
    let engine = engine_with(&dir, "text.json", TEXT_MODEL);

    // -1 + 2 + 1 = 2 -> sigmoid(2) = 0.8808
    let result = engine.predict(&payload("Exhausted; deadline tomorrow", 45.0, 6.0, 6.0, 5.0), None);
    assert_eq!(result.pathway(), Pathway::TextModel);
    assert_eq!(result.score(), 88);
    assert_eq!(result.label(), RiskLabel::High);
    assert!(!result.used_fallback());
    let p = result.probability().unwrap();
    assert!((p - 0.8808).abs() < 1e-3);
}

#[test]
fn test_class_order_is_respected() {
    let dir = TempDir::new().unwrap();
    let engine = engine_with(&dir, "scaled.json", SCALED_MODEL);

    // sigmoid(1) = 0.731 is the probability of classes[1], which is class 0
    let result = engine.predict(&InputPayload::default(), None);
    assert_eq!(result.pathway(), Pathway::NumericModel);
    assert_eq!(result.score(), 27);
    assert_eq!(result.label(), RiskLabel::Low);
}

#[test]
fn test_malformed_artifact_falls_back_and_is_cached() {
    let dir = TempDir::new().unwrap();
    let engine = engine_with(&dir, "broken.json", r#"{"kind": "forest"}"#);

    for _ in 0..3 {
        let result = engine.predict(&payload("tired", 45.0, 6.0, 6.0, 5.0), None);
        assert_eq!(result.pathway(), Pathway::Rules);
        // tired (8) + workload (2.5)
        assert_eq!(result.score(), 11);
    }
    assert_eq!(engine.disk_reads(), 1);
    assert!(!engine.artifact_info(None).loaded);
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("burnout_model.pkl");
    std::fs::write(&path, b"\x80\x04").unwrap();

    assert!(matches!(read_artifact(&path), Err(ModelError::UnsupportedFormat(_))));

    let engine = PredictionEngine::new(EngineConfig::with_model_path(&path));
    let result = engine.predict(&InputPayload::default(), None);
    assert!(result.used_fallback());
}

#[test]
fn test_score_label_consistency() {
    let dir = TempDir::new().unwrap();
    let rules = PredictionEngine::new(EngineConfig::with_model_path(dir.path().join("none.json")));
    let text = engine_with(&dir, "text.json", TEXT_MODEL);

    let texts = ["", "rested and balanced", "exhausted, burnout, overwhelmed", "deadline"];
    for engine in [&rules, &text] {
        for t in texts {
            for hours in [30.0, 45.0, 80.0] {
                for stress in [1.0, 5.0, 10.0] {
                    let result = engine.predict(&payload(t, hours, 6.0, 4.0, stress), None);
                    assert!(result.score() <= 100);
                    assert_eq!(result.label(), RiskLabel::from_score(result.score()));
                    assert_eq!(result.used_fallback(), result.pathway() == Pathway::Rules);
                    if let Some(p) = result.probability() {
                        assert!((0.0..=1.0).contains(&p));
                    }
                }
            }
        }
    }
}

#[test]
fn test_concurrent_predictions_share_one_load() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(engine_with(&dir, "text.json", TEXT_MODEL));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                let text = if i % 2 == 0 { "exhausted" } else { "rested" };
                engine.predict(&payload(text, 45.0, 6.0, 6.0, 5.0), None)
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert_eq!(result.pathway(), Pathway::TextModel);
    }
    assert_eq!(engine.disk_reads(), 1);
}

#[test]
fn test_health_reflects_artifact_state() {
    let dir = TempDir::new().unwrap();
    let loaded = engine_with(&dir, "text.json", TEXT_MODEL);
    let missing = PredictionEngine::new(EngineConfig::with_model_path(dir.path().join("none.json")));

    tokio_test::block_on(async {
        let registry = HealthRegistry::new();
        registry.register(components::ENGINE).await;

        registry.report_artifact(&loaded.artifact_info(None)).await;
        assert_eq!(registry.health().await.status, ComponentStatus::Healthy);

        registry.report_artifact(&missing.artifact_info(None)).await;
        assert_eq!(registry.health().await.status, ComponentStatus::Degraded);
    });
}

#[test]
fn test_onnx_probability_graph() {
    let engine =
        PredictionEngine::new(EngineConfig::with_model_path(fixture("logistic_proba.onnx")));

    let info = engine.artifact_info(None);
    assert!(info.loaded);
    assert_eq!(info.kind.as_deref(), Some("onnx"));
    assert!(info.has_probability);

    // logit 0.4 -> p = 0.5987
    let result = engine.predict(&InputPayload::default(), None);
    assert_eq!(result.pathway(), Pathway::NumericModel);
    assert_eq!(result.score(), 60);
    assert_eq!(result.label(), RiskLabel::Moderate);
    assert!(!result.used_fallback());
    assert!((result.probability().unwrap() - 0.5987).abs() < 1e-3);

    // logit -4.9
    let result = engine.predict(&payload("", 30.0, 1.0, 10.0, 1.0), None);
    assert_eq!(result.pathway(), Pathway::NumericModel);
    assert_eq!(result.score(), 1);
    assert_eq!(result.label(), RiskLabel::Low);
}

#[test]
fn test_onnx_label_only_graph() {
    let engine =
        PredictionEngine::new(EngineConfig::with_model_path(fixture("logistic_label.onnx")));
    assert!(!engine.artifact_info(None).has_probability);

    let result = engine.predict(&InputPayload::default(), None);
    assert_eq!(result.pathway(), Pathway::NumericModel);
    assert_eq!(result.score(), 100);
    assert_eq!(result.label(), RiskLabel::High);
    assert_eq!(result.probability(), None);

    let result = engine.predict(&payload("", 30.0, 1.0, 10.0, 1.0), None);
    assert_eq!(result.score(), 0);
    assert_eq!(result.label(), RiskLabel::Low);
}

#[test]
fn test_onnx_rejects_text_step() {
    for name in ["logistic_proba.onnx", "logistic_label.onnx"] {
        let loaded = read_artifact(&fixture(name)).unwrap();
        let input = payload("exhausted", 45.0, 6.0, 6.0, 5.0);

        let err = score_with_model(&loaded.artifact, &input, Pathway::TextModel).unwrap_err();
        assert!(matches!(err, ModelError::IncompatibleInput("text")));

        // Terminal step still answers for the same artifact
        let result = score_with_model(&loaded.artifact, &input, Pathway::Rules).unwrap();
        assert_eq!(result.pathway(), Pathway::Rules);
        assert_eq!(result.score(), 13);
    }
}

#[test]
fn test_float_class_artifact_is_used() {
    let dir = TempDir::new().unwrap();
    let engine = engine_with(
        &dir,
        "float.json",
        r#"{"kind": "numeric_logistic", "classes": [0.0, 1.0], "coefficients": [0, 0, 0, 0], "intercept": 1.0}"#,
    );

    // sigmoid(1) = 0.731 for class 1.0
    let result = engine.predict(&InputPayload::default(), None);
    assert_eq!(result.pathway(), Pathway::NumericModel);
    assert_eq!(result.score(), 73);
    assert_eq!(result.label(), RiskLabel::High);
    assert!(engine.artifact_info(None).loaded);
}
