//! Observability infrastructure for the risk engine
//!
//! Provides:
//! - Prometheus metrics (prediction latency, predictions per pathway, pathway failures, artifact state)
//! - Structured JSON logging with tracing

use crate::models::{Pathway, PredictionResult};
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter_vec, register_int_gauge, GaugeVec,
    Histogram, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<EngineMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct EngineMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounterVec,
    pathway_failures_total: IntCounterVec,
    artifact_loaded: IntGauge,
    artifact_info: GaugeVec,
}

impl EngineMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "burnout_risk_prediction_latency_seconds",
                "Time spent producing a burnout risk prediction",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "burnout_risk_predictions_total",
                "Predictions produced, by the pathway that produced them",
                &["pathway"]
            )
            .expect("Failed to register predictions_total"),

            pathway_failures_total: register_int_counter_vec!(
                "burnout_risk_pathway_failures_total",
                "Model pathway attempts that failed and fell through",
                &["pathway"]
            )
            .expect("Failed to register pathway_failures_total"),

            artifact_loaded: register_int_gauge!(
                "burnout_risk_artifact_loaded",
                "1 if a trained model artifact is in use, 0 if running rules only"
            )
            .expect("Failed to register artifact_loaded"),

            artifact_info: register_gauge_vec!(
                "burnout_risk_artifact_info",
                "Information about the loaded model artifact",
                &["kind", "sha256"]
            )
            .expect("Failed to register artifact_info"),
        }
    }
}

/// Engine metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct EngineMetrics {
    _private: (),
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(EngineMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &EngineMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a completed prediction
    pub fn observe_prediction(&self, pathway: Pathway, duration_secs: f64) {
        let inner = self.inner();
        inner.prediction_latency_seconds.observe(duration_secs);
        inner
            .predictions_total
            .with_label_values(&[pathway.as_str()])
            .inc();
    }

    /// Count a model pathway that failed and fell through
    pub fn inc_pathway_failures(&self, pathway: Pathway) {
        self.inner()
            .pathway_failures_total
            .with_label_values(&[pathway.as_str()])
            .inc();
    }

    /// Record the artifact currently in use, or `None` for rules only
    pub fn set_artifact(&self, artifact: Option<(&str, &str)>) {
        let inner = self.inner();
        inner.artifact_info.reset();
        match artifact {
            Some((kind, sha256)) => {
                inner.artifact_loaded.set(1);
                inner.artifact_info.with_label_values(&[kind, sha256]).set(1.0);
            }
            None => inner.artifact_loaded.set(0),
        }
    }

    /// Total predictions recorded for a pathway
    pub fn predictions(&self, pathway: Pathway) -> u64 {
        self.inner()
            .predictions_total
            .with_label_values(&[pathway.as_str()])
            .get()
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for predictions
/// and lifecycle events.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Log a prediction event
    pub fn log_prediction(&self, result: &PredictionResult) {
        info!(
            event = "prediction_generated",
            service = %self.service,
            score = result.score(),
            label = %result.label(),
            probability = ?result.probability(),
            used_fallback = result.used_fallback(),
            pathway = %result.pathway(),
            "Generated burnout risk prediction"
        );
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, model_path: &str, artifact_loaded: bool) {
        if artifact_loaded {
            info!(
                event = "server_started",
                service = %self.service,
                version = %version,
                model_path = %model_path,
                artifact_loaded = true,
                "Risk server started"
            );
        } else {
            warn!(
                event = "server_started",
                service = %self.service,
                version = %version,
                model_path = %model_path,
                artifact_loaded = false,
                "Risk server started without a model artifact, predictions use rules only"
            );
        }
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "server_shutdown",
            service = %self.service,
            reason = %reason,
            "Risk server shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_metrics_creation() {
        // Metrics live in the global Prometheus registry; repeated handles share them.
        let metrics = EngineMetrics::new();
        let before = metrics.predictions(Pathway::TextModel);

        metrics.observe_prediction(Pathway::TextModel, 0.0001);
        metrics.inc_pathway_failures(Pathway::NumericModel);
        metrics.set_artifact(Some(("numeric_logistic", "abc123")));
        metrics.set_artifact(None);

        assert!(EngineMetrics::new().predictions(Pathway::TextModel) >= before + 1);
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("risk-server");
        assert_eq!(logger.service, "risk-server");
        logger.log_prediction(&PredictionResult::from_rules(42));
    }
}
