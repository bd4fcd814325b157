//! Feature encoding for model inference
//!
//! An artifact is fed either the four numeric signals as a single row, or one
//! text sample that carries the free text followed by the numeric signals in
//! `key=value` form.

use crate::models::{InputPayload, Signals};

/// Number of numeric features expected by numeric artifacts
pub const NUM_FEATURES: usize = 4;

/// Column order of the numeric feature row
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = ["hours", "workload", "sleep", "stress"];

/// A single sample in one of the two supported encodings
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureInput<'a> {
    Numeric([f64; NUM_FEATURES]),
    Text(&'a str),
}

impl FeatureInput<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            FeatureInput::Numeric(_) => "numeric",
            FeatureInput::Text(_) => "text",
        }
    }
}

/// Numeric feature row `[hours, workload, sleep, stress]`
pub fn numeric_features(signals: &Signals) -> [f64; NUM_FEATURES] {
    [signals.hours, signals.workload, signals.sleep, signals.stress]
}

/// Combined text sample: `"{text} hours={h} workload={w} sleep={s} stress={t}"`
pub fn text_features(payload: &InputPayload) -> String {
    let s = payload.signals();
    format!(
        "{} hours={} workload={} sleep={} stress={}",
        payload.free_text.trim(),
        s.hours,
        s.workload,
        s.sleep,
        s.stress
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_features_order() {
        let signals = Signals {
            hours: 50.0,
            workload: 7.0,
            sleep: 4.0,
            stress: 8.0,
        };
        assert_eq!(numeric_features(&signals), [50.0, 7.0, 4.0, 8.0]);
    }

    #[test]
    fn test_text_features_format() {
        let payload = InputPayload {
            free_text: "  feeling drained ".to_string(),
            hours: Some(52.5),
            workload: None,
            sleep: Some(3.0),
            stress: Some(9.0),
        };
        assert_eq!(
            text_features(&payload),
            "feeling drained hours=52.5 workload=6 sleep=3 stress=9"
        );
    }

    #[test]
    fn test_text_features_empty_text() {
        let payload = InputPayload::default();
        assert_eq!(
            text_features(&payload),
            " hours=45 workload=6 sleep=6 stress=5"
        );
    }
}
