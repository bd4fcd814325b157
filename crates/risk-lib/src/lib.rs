//! Burnout risk engine
//!
//! This crate provides the core functionality for:
//! - Rule-based burnout risk scoring
//! - Trained-model scoring over numeric and text inputs
//! - Artifact loading and caching
//! - Health checks and observability

pub mod config;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;

pub use config::EngineConfig;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{EngineMetrics, StructuredLogger};
pub use predictor::{predict, PredictionEngine};
