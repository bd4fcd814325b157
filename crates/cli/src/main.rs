//! Burnout Risk Predictor CLI
//!
//! Scores self-reported inputs locally with the embedded engine, or against
//! a running risk server, and inspects model artifacts.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{model, predict, score, InputArgs};
use std::path::PathBuf;

/// Burnout Risk Predictor CLI
#[derive(Parser)]
#[command(name = "brp")]
#[command(author, version, about = "CLI for Burnout Risk Predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via BRP_API_URL env var)
    #[arg(long, env = "BRP_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score inputs locally with the embedded engine
    Score {
        #[command(flatten)]
        input: InputArgs,

        /// Model artifact path (can also be set via MODEL_PATH env var)
        #[arg(long, env = "MODEL_PATH")]
        model_path: Option<PathBuf>,
    },

    /// Score inputs on a running server
    Predict {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show model artifact status
    Model {
        /// Model artifact path (can also be set via MODEL_PATH env var)
        #[arg(long, env = "MODEL_PATH")]
        model_path: Option<PathBuf>,

        /// Ask the server instead of reading the file locally
        #[arg(long)]
        remote: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load()?;

    match cli.command {
        Commands::Score { input, model_path } => {
            let path = config.model_path(model_path.as_deref());
            score::score(&input, &path, cli.verbose, cli.format)?;
        }
        Commands::Predict { input } => {
            let client = client::ApiClient::new(&config.api_url(cli.api_url.as_deref()))?;
            predict::predict(&client, &input, cli.format).await?;
        }
        Commands::Model { model_path, remote } => {
            if remote {
                let client = client::ApiClient::new(&config.api_url(cli.api_url.as_deref()))?;
                model::show_remote(&client, cli.format).await?;
            } else {
                model::show_local(&config.model_path(model_path.as_deref()), cli.format)?;
            }
        }
    }

    Ok(())
}
