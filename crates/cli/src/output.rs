//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use risk_lib::models::{PredictionResponse, RiskLabel};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table from a list of items
pub fn print_table<T: Tabled + Serialize>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", "No items found".yellow());
                return;
            }
            let table = Table::new(items).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(&items) {
                println!("{}", json);
            }
        }
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a model probability, or explain why there is none
pub fn format_probability(probability: Option<f64>) -> String {
    match probability {
        Some(p) => format!("{:.2}", p),
        None => "unavailable".to_string(),
    }
}

/// Color a risk label by severity
pub fn color_label(label: RiskLabel) -> String {
    match label {
        RiskLabel::Low => label.as_str().green().to_string(),
        RiskLabel::Moderate => label.as_str().yellow().to_string(),
        RiskLabel::High => label.as_str().red().bold().to_string(),
    }
}

/// Render a prediction in the requested format
pub fn print_prediction(response: &PredictionResponse, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(response)?,
        OutputFormat::Table => {
            println!("{}", "Burnout Risk".bold());
            println!("{}", "=".repeat(50));
            println!(
                "Score:                  {} / 100",
                response.score.to_string().bold()
            );
            println!("Label:                  {}", color_label(response.label));
            println!(
                "Probability:            {}",
                format_probability(response.probability)
            );
            println!("Pathway:                {}", response.pathway.as_str().cyan());

            if response.used_fallback {
                println!();
                print_warning("Fallback rules used (trained model missing or incompatible)");
            }

            if let Some(reasons) = &response.explanation {
                println!();
                println!("{}", "Contributing Factors".bold());
                println!("{}", "-".repeat(50));
                for reason in reasons {
                    println!("  • {}", reason);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_probability() {
        assert_eq!(format_probability(Some(0.8)), "0.80");
        assert_eq!(format_probability(None), "unavailable");
    }

    #[test]
    fn test_color_label_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(color_label(RiskLabel::Low), "Low");
        assert_eq!(color_label(RiskLabel::Moderate), "Moderate");
        assert_eq!(color_label(RiskLabel::High), "High");
    }
}
