//! Subcommand implementations

pub mod model;
pub mod predict;
pub mod score;

use clap::Args;
use risk_lib::models::InputPayload;

/// Self-reported inputs shared by `score` and `predict`.
///
/// Numbers are taken as text so that malformed values fall back to their
/// defaults instead of failing argument parsing.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// How the person describes their recent state
    #[arg(long, short, default_value = "")]
    pub text: String,

    /// Weekly working hours (default 45)
    #[arg(long, default_value = "")]
    pub hours: String,

    /// Perceived workload, 1-10 (default 6)
    #[arg(long, default_value = "")]
    pub workload: String,

    /// Sleep quality, 1 = poor, 10 = great (default 6)
    #[arg(long, default_value = "")]
    pub sleep: String,

    /// Stress level, 1-10 (default 5)
    #[arg(long, default_value = "")]
    pub stress: String,

    /// Include the factors behind the score
    #[arg(long)]
    pub explain: bool,
}

impl InputArgs {
    pub fn to_payload(&self) -> InputPayload {
        InputPayload::from_fields(
            self.text.clone(),
            &self.hours,
            &self.workload,
            &self.sleep,
            &self.stress,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_numbers_are_dropped() {
        let args = InputArgs {
            text: "tired".to_string(),
            hours: "sixty".to_string(),
            workload: "8".to_string(),
            ..Default::default()
        };
        let payload = args.to_payload();
        assert_eq!(payload.free_text, "tired");
        assert_eq!(payload.hours, None);
        assert_eq!(payload.workload, Some(8.0));
        assert_eq!(payload.signals().hours, 45.0);
    }
}
