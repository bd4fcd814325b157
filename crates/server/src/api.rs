//! HTTP API: the HTML form, JSON prediction endpoint, health checks and
//! Prometheus metrics

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use risk_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    models::{InputPayload, PredictionResponse, PredictionResult},
    observability::{EngineMetrics, StructuredLogger},
    predictor::{ArtifactInfo, RulePredictor},
    PredictionEngine,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::page;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PredictionEngine>,
    pub health_registry: HealthRegistry,
    pub metrics: EngineMetrics,
    pub logger: StructuredLogger,
    artifact_reported: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(engine: Arc<PredictionEngine>, health_registry: HealthRegistry) -> Self {
        Self {
            engine,
            health_registry,
            metrics: EngineMetrics::new(),
            logger: StructuredLogger::new("risk-server"),
            artifact_reported: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Resolve the configured artifact and publish its state to health and
    /// metrics
    pub async fn refresh_artifact(&self) -> ArtifactInfo {
        let engine = self.engine.clone();
        let info = match tokio::task::spawn_blocking(move || engine.artifact_info(None)).await {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Artifact resolution task failed");
                ArtifactInfo::missing(&self.engine.config().model_path)
            }
        };

        self.artifact_reported.store(true, Ordering::Relaxed);
        self.health_registry.report_artifact(&info).await;
        match (&info.kind, &info.sha256) {
            (Some(kind), Some(sha256)) => self.metrics.set_artifact(Some((kind.as_str(), sha256.as_str()))),
            _ => self.metrics.set_artifact(None),
        }
        info
    }

    /// Run the engine off the async reactor. The first call may read the
    /// artifact from disk; its outcome is then published the same way as a
    /// startup preload.
    pub async fn predict(&self, payload: InputPayload) -> PredictionResult {
        let engine = self.engine.clone();
        let task_payload = payload.clone();
        let result = match tokio::task::spawn_blocking(move || engine.predict(&task_payload, None)).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Prediction task failed, scoring with rules");
                self.health_registry
                    .set_unhealthy(components::ENGINE, e.to_string())
                    .await;
                RulePredictor::predict(&payload)
            }
        };
        self.logger.log_prediction(&result);

        if !self.artifact_reported.load(Ordering::Relaxed) {
            self.refresh_artifact().await;
        }
        result
    }
}

/// Raw form fields, all optional strings as posted by the browser
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormFields {
    pub free_text: String,
    pub hours: String,
    pub workload: String,
    pub sleep: String,
    pub stress: String,
}

impl FormFields {
    fn to_payload(&self) -> InputPayload {
        InputPayload::from_fields(
            self.free_text.clone(),
            &self.hours,
            &self.workload,
            &self.sleep,
            &self.stress,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictParams {
    #[serde(default)]
    pub explain: bool,
}

/// Empty form
async fn form_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let model_path = state.engine.config().model_path.display().to_string();
    Html(page::render(&model_path, &InputPayload::default(), None))
}

/// Form submission
async fn form_submit(State(state): State<Arc<AppState>>, Form(fields): Form<FormFields>) -> Html<String> {
    let payload = fields.to_payload();
    let result = state.predict(payload.clone()).await;
    let model_path = state.engine.config().model_path.display().to_string();
    Html(page::render(&model_path, &payload, Some(&result)))
}

/// Error body for requests that cannot be scored
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON prediction endpoint. Individual bad fields fall back to their
/// defaults; only a body that does not decode as a payload is rejected
/// with 422.
async fn predict_json(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictParams>,
    body: Bytes,
) -> Response {
    let payload: InputPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Rejected prediction request body");
            let error = ErrorResponse {
                error: format!("invalid JSON payload: {}", e),
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(error)).into_response();
        }
    };

    let result = state.predict(payload.clone()).await;
    let mut response = PredictionResponse::from(&result);
    if params.explain {
        response.explanation = Some(RulePredictor::explain(&payload));
    }
    Json(response).into_response()
}

/// Artifact status
async fn model_info(State(state): State<Arc<AppState>>) -> Json<ArtifactInfo> {
    Json(state.refresh_artifact().await)
}

/// Health check response - returns 200 if healthy or degraded, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Rules still answer
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            Vec::new(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(form_page).post(form_submit))
        .route("/api/v1/predict", post(predict_json))
        .route("/api/v1/model", get(model_info))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the HTTP server and run until `shutdown` resolves
pub async fn serve(
    addr: &str,
    state: Arc<AppState>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
