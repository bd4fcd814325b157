//! Deterministic rule-based scoring
//!
//! Used whenever no artifact is loaded or every model pathway fails. The
//! score is a weighted keyword count over the lower-cased free text plus a
//! linear penalty on the numeric signals. Keywords match as substrings, so
//! "sleep" also matches inside "sleepless".

use super::output::clamp_score;
use crate::models::{InputPayload, PredictionResult, Signals};

/// Keywords that raise the score, with their weights
pub const NEGATIVE_KEYWORDS: &[(&str, f64)] = &[
    ("exhausted", 10.0),
    ("tired", 8.0),
    ("overwhelmed", 12.0),
    ("anxious", 8.0),
    ("stressed", 10.0),
    ("burnout", 15.0),
    ("deadline", 6.0),
    ("pressure", 7.0),
    ("sleep", 6.0),
    ("insomnia", 10.0),
    ("depressed", 14.0),
    ("fatigue", 10.0),
    ("cynical", 8.0),
    ("drained", 10.0),
];

/// Keywords that lower the score, with their (negative) weights
pub const POSITIVE_KEYWORDS: &[(&str, f64)] = &[
    ("supported", -8.0),
    ("energized", -8.0),
    ("motivated", -6.0),
    ("rested", -8.0),
    ("balanced", -10.0),
];

const BASELINE_HOURS: f64 = 45.0;
const HOURS_WEIGHT: f64 = 0.9;
const BASELINE_WORKLOAD: f64 = 5.0;
const WORKLOAD_WEIGHT: f64 = 2.5;
const BASELINE_STRESS: f64 = 5.0;
const STRESS_WEIGHT: f64 = 3.0;
const BASELINE_SLEEP: f64 = 6.0;
const SLEEP_WEIGHT: f64 = 3.0;

// Explanation flag thresholds
const LONG_HOURS: f64 = 50.0;
const HIGH_WORKLOAD: f64 = 7.0;
const HIGH_STRESS: f64 = 7.0;
const POOR_SLEEP: f64 = 4.0;

/// Message used when no keyword or numeric flag fired
pub const TYPICAL_RANGES: &str = "inputs within typical ranges";

/// Rule-based predictor. Stateless; every call is a pure function of the
/// payload.
pub struct RulePredictor;

impl RulePredictor {
    /// Score a payload. Always succeeds.
    pub fn predict(payload: &InputPayload) -> PredictionResult {
        PredictionResult::from_rules(clamp_score(Self::raw_total(payload)))
    }

    /// Unrounded, unclamped rule total
    pub fn raw_total(payload: &InputPayload) -> f64 {
        Self::text_total(&payload.free_text) + Self::numeric_total(&payload.signals())
    }

    /// Keyword contribution of the free text
    pub fn text_total(text: &str) -> f64 {
        let text = text.to_lowercase();
        NEGATIVE_KEYWORDS
            .iter()
            .chain(POSITIVE_KEYWORDS)
            .filter(|(keyword, _)| text.contains(keyword))
            .map(|(_, weight)| weight)
            .sum()
    }

    /// Numeric contribution of the signals
    pub fn numeric_total(signals: &Signals) -> f64 {
        (signals.hours - BASELINE_HOURS).max(0.0) * HOURS_WEIGHT
            + (signals.workload - BASELINE_WORKLOAD) * WORKLOAD_WEIGHT
            + (signals.stress - BASELINE_STRESS) * STRESS_WEIGHT
            + (BASELINE_SLEEP - signals.sleep).max(0.0) * SLEEP_WEIGHT
    }

    /// Matched keywords, in vocabulary order
    pub fn matched_keywords(text: &str) -> Vec<&'static str> {
        let text = text.to_lowercase();
        NEGATIVE_KEYWORDS
            .iter()
            .chain(POSITIVE_KEYWORDS)
            .filter(|(keyword, _)| text.contains(keyword))
            .map(|(keyword, _)| *keyword)
            .collect()
    }

    /// Human-readable reasons behind a rule score
    pub fn explain(payload: &InputPayload) -> Vec<String> {
        let mut reasons = Vec::new();

        let keywords = Self::matched_keywords(&payload.free_text);
        if !keywords.is_empty() {
            reasons.push(format!("keywords: {}", keywords.join(", ")));
        }

        let s = payload.signals();
        if s.hours > LONG_HOURS {
            reasons.push(format!("long weekly hours ({})", s.hours));
        }
        if s.workload >= HIGH_WORKLOAD {
            reasons.push(format!("high workload ({})", s.workload));
        }
        if s.stress >= HIGH_STRESS {
            reasons.push(format!("high stress ({})", s.stress));
        }
        if s.sleep <= POOR_SLEEP {
            reasons.push(format!("poor sleep quality ({})", s.sleep));
        }

        if reasons.is_empty() {
            reasons.push(TYPICAL_RANGES.to_string());
        }
        reasons
    }
}
