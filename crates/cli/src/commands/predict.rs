//! Remote scoring against a running server

use anyhow::Result;

use super::InputArgs;
use crate::client::ApiClient;
use crate::output::{print_prediction, OutputFormat};

/// Send inputs to the server's prediction endpoint
pub async fn predict(client: &ApiClient, args: &InputArgs, format: OutputFormat) -> Result<()> {
    let response = client.predict(&args.to_payload(), args.explain).await?;
    print_prediction(&response, format)
}
