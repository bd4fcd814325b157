//! Artifact inspection

use anyhow::Result;
use colored::Colorize;
use risk_lib::predictor::{read_artifact, ArtifactInfo};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{print_json, print_table, print_warning, OutputFormat};

/// Row for the class table
#[derive(Tabled, Serialize)]
struct ClassRow {
    #[tabled(rename = "Index")]
    index: usize,
    #[tabled(rename = "Class")]
    class: String,
}

/// Inspect the artifact at `path` without going through the cache
pub fn show_local(path: &Path, format: OutputFormat) -> Result<()> {
    let info = match read_artifact(path) {
        Ok(loaded) => loaded.info(),
        Err(e) => {
            if format == OutputFormat::Table {
                print_warning(&format!("Artifact not usable: {}", e));
            }
            ArtifactInfo::missing(path)
        }
    };
    print_info_block(&info, format)
}

/// Artifact status reported by a running server
pub async fn show_remote(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let info = client.model_info().await?;
    print_info_block(&info, format)
}

fn print_info_block(info: &ArtifactInfo, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(info),
        OutputFormat::Table => {
            println!("{}", "Model Artifact".bold());
            println!("{}", "=".repeat(50));
            println!("Path:                   {}", info.path);

            if !info.loaded {
                println!("Status:                 {}", "not loaded".yellow());
                println!();
                print_warning("Predictions will use rule-based scoring");
                return Ok(());
            }

            println!("Status:                 {}", "loaded".green());
            println!(
                "Kind:                   {}",
                info.kind.as_deref().unwrap_or("unknown").cyan()
            );
            println!(
                "Probabilities:          {}",
                if info.has_probability { "yes" } else { "no" }
            );
            if let Some(size) = info.size_bytes {
                println!("Size:                   {} bytes", size);
            }
            if let Some(sha256) = &info.sha256 {
                println!("SHA-256:                {}", sha256);
            }
            println!();

            let rows: Vec<ClassRow> = info
                .classes
                .iter()
                .enumerate()
                .map(|(index, class)| ClassRow {
                    index,
                    class: class.to_string(),
                })
                .collect();
            print_table(&rows, format);
            Ok(())
        }
    }
}
