//! Score post-processing shared by every strategy
//!
//! Raw totals and probabilities are rounded and clamped into the 0-100
//! score range here; labels are derived from the clamped score by
//! [`RiskLabel::from_score`](crate::models::RiskLabel::from_score).

use super::artifact::{ClassLabel, ModelError};

/// Upper bound of the score range
pub const MAX_SCORE: u8 = 100;

/// Round half away from zero and clamp into [0, 100]
pub fn clamp_score(total: f64) -> u8 {
    if total.is_nan() {
        return 0;
    }
    total.round().clamp(0.0, MAX_SCORE as f64) as u8
}

/// Map a positive-class probability to a score
pub fn probability_to_score(probability: f64) -> u8 {
    clamp_score(probability * 100.0)
}

/// Probability as reported to callers, bounded to [0, 1]
pub fn report_probability(probability: f64) -> f64 {
    probability.clamp(0.0, 1.0)
}

/// Binary score for artifacts without probabilities: 100 for the positive
/// class, 0 otherwise
pub fn class_to_score(label: &ClassLabel) -> Result<u8, ModelError> {
    match label.as_int() {
        Some(1) => Ok(MAX_SCORE),
        Some(_) => Ok(0),
        None => Err(ModelError::UnexpectedLabel(label.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score_rounding() {
        assert_eq!(clamp_score(2.5), 3);
        assert_eq!(clamp_score(34.4), 34);
        assert_eq!(clamp_score(34.6), 35);
        assert_eq!(clamp_score(35.0), 35);
    }

    #[test]
    fn test_clamp_score_bounds() {
        assert_eq!(clamp_score(-12.0), 0);
        assert_eq!(clamp_score(250.0), 100);
        assert_eq!(clamp_score(f64::INFINITY), 100);
        assert_eq!(clamp_score(f64::NEG_INFINITY), 0);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[test]
    fn test_probability_to_score() {
        assert_eq!(probability_to_score(0.8), 80);
        assert_eq!(probability_to_score(0.35), 35);
        assert_eq!(probability_to_score(0.0), 0);
        assert_eq!(probability_to_score(1.0), 100);
        assert_eq!(probability_to_score(1.2), 100);
    }

    #[test]
    fn test_class_to_score() {
        assert_eq!(class_to_score(&ClassLabel::Int(1)).unwrap(), 100);
        assert_eq!(class_to_score(&ClassLabel::Int(0)).unwrap(), 0);
        assert_eq!(class_to_score(&ClassLabel::Bool(true)).unwrap(), 100);
        assert_eq!(class_to_score(&ClassLabel::Text("1".to_string())).unwrap(), 100);
        assert!(class_to_score(&ClassLabel::Text("high".to_string())).is_err());
        assert_eq!(class_to_score(&ClassLabel::Float(1.0)).unwrap(), 100);
        assert_eq!(class_to_score(&ClassLabel::Float(0.0)).unwrap(), 0);
        assert!(class_to_score(&ClassLabel::Float(0.5)).is_err());
    }
}
