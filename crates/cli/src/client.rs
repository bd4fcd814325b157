//! API client for a running risk server

use anyhow::{Context, Result};
use reqwest::Client;
use risk_lib::models::{InputPayload, PredictionResponse};
use risk_lib::predictor::ArtifactInfo;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

/// API client for the risk server
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Score a payload on the server
    pub async fn predict(&self, payload: &InputPayload, explain: bool) -> Result<PredictionResponse> {
        let path = if explain {
            "api/v1/predict?explain=true"
        } else {
            "api/v1/predict"
        };
        self.post(path, payload).await
    }

    /// Artifact status as seen by the server
    pub async fn model_info(&self) -> Result<ArtifactInfo> {
        self.get("api/v1/model").await
    }
}
