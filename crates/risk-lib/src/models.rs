//! Core data models for the burnout risk engine

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// Default weekly working hours when the field is missing or malformed
pub const DEFAULT_HOURS: f64 = 45.0;
/// Default perceived workload (1-10)
pub const DEFAULT_WORKLOAD: f64 = 6.0;
/// Default sleep quality (1-10)
pub const DEFAULT_SLEEP: f64 = 6.0;
/// Default stress level (1-10)
pub const DEFAULT_STRESS: f64 = 5.0;

/// Self-reported signals as submitted by a caller.
///
/// Numeric fields accept JSON numbers or strings (as posted by HTML forms).
/// Anything that does not parse to a finite number, including numbers too
/// large for an `f64`, is dropped here and replaced by its default in
/// [`InputPayload::signals`]. Decoding is JSON-only: each field is read as
/// raw JSON text first so one bad value cannot fail the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    pub free_text: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub workload: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sleep: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub stress: Option<f64>,
}

impl InputPayload {
    /// Build a payload from raw form-style string fields
    pub fn from_fields(
        free_text: impl Into<String>,
        hours: &str,
        workload: &str,
        sleep: &str,
        stress: &str,
    ) -> Self {
        Self {
            free_text: free_text.into(),
            hours: parse_number(hours),
            workload: parse_number(workload),
            sleep: parse_number(sleep),
            stress: parse_number(stress),
        }
    }

    /// Numeric signals with defaults applied
    pub fn signals(&self) -> Signals {
        Signals {
            hours: self.hours.unwrap_or(DEFAULT_HOURS),
            workload: self.workload.unwrap_or(DEFAULT_WORKLOAD),
            sleep: self.sleep.unwrap_or(DEFAULT_SLEEP),
            stress: self.stress.unwrap_or(DEFAULT_STRESS),
        }
    }
}

/// Coerced numeric signals, always populated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub hours: f64,
    pub workload: f64,
    pub sleep: f64,
    pub stress: f64,
}

impl Default for Signals {
    fn default() -> Self {
        Self {
            hours: DEFAULT_HOURS,
            workload: DEFAULT_WORKLOAD,
            sleep: DEFAULT_SLEEP,
            stress: DEFAULT_STRESS,
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientValue {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Decode one field from its raw JSON text. Out-of-range numbers such as
/// `1e999` are rejected by serde_json's number parser and come back as `None`.
fn lenient_value<'de, D>(deserializer: D) -> Result<Option<LenientValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    Ok(serde_json::from_str(raw.get()).ok())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match lenient_value(deserializer)? {
        Some(LenientValue::Number(v)) if v.is_finite() => Some(v),
        Some(LenientValue::Text(s)) => parse_number(&s),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match lenient_value(deserializer)? {
        Some(LenientValue::Text(s)) => s,
        Some(LenientValue::Number(v)) => v.to_string(),
        _ => String::new(),
    })
}

/// Three-tier risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Moderate,
    High,
}

/// Lower bound (inclusive) of the Moderate band
pub const MODERATE_THRESHOLD: u8 = 35;
/// Lower bound (inclusive) of the High band
pub const HIGH_THRESHOLD: u8 = 70;

impl RiskLabel {
    /// Map a clamped score to its label
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_THRESHOLD {
            RiskLabel::High
        } else if score >= MODERATE_THRESHOLD {
            RiskLabel::Moderate
        } else {
            RiskLabel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Low => "Low",
            RiskLabel::Moderate => "Moderate",
            RiskLabel::High => "High",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which step of the cascade produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pathway {
    NumericModel,
    TextModel,
    Rules,
}

impl Pathway {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pathway::NumericModel => "numeric_model",
            Pathway::TextModel => "text_model",
            Pathway::Rules => "rules",
        }
    }
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine output. The label is always derived from the score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    score: u8,
    label: RiskLabel,
    probability: Option<f64>,
    used_fallback: bool,
    pathway: Pathway,
}

impl PredictionResult {
    /// Result produced by a model pathway
    pub fn from_model(score: u8, probability: Option<f64>, pathway: Pathway) -> Self {
        Self::new(score, probability, pathway)
    }

    /// Result produced by the rule strategy
    pub fn from_rules(score: u8) -> Self {
        Self::new(score, None, Pathway::Rules)
    }

    fn new(score: u8, probability: Option<f64>, pathway: Pathway) -> Self {
        let score = score.min(100);
        Self {
            score,
            label: RiskLabel::from_score(score),
            probability,
            used_fallback: pathway == Pathway::Rules,
            pathway,
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn label(&self) -> RiskLabel {
        self.label
    }

    pub fn probability(&self) -> Option<f64> {
        self.probability
    }

    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    pub fn pathway(&self) -> Pathway {
        self.pathway
    }
}

/// Wire form of a prediction result, as returned by the HTTP API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub score: u8,
    pub label: RiskLabel,
    pub probability: Option<f64>,
    pub used_fallback: bool,
    pub pathway: Pathway,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Vec<String>>,
}

impl From<&PredictionResult> for PredictionResponse {
    fn from(result: &PredictionResult) -> Self {
        Self {
            score: result.score,
            label: result.label,
            probability: result.probability,
            used_fallback: result.used_fallback,
            pathway: result.pathway,
            explanation: None,
        }
    }
}
